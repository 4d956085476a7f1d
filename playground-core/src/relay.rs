//! Console relay: sandbox console messages mirrored into the host panel

use serde::Deserialize;

use crate::model::{ConsoleEntry, ConsoleLevel};

/// Browser noise triggered by the sandbox itself, never shown in the panel
pub const NOISE_DENYLIST: &[&str] = &[
    "Blocked a frame",
    "Blocked script execution",
    "Unsafe attempt to initiate navigation",
    "sandboxed and lacks the \"allow-same-origin\"",
];

/// Message posted by the sandboxed document to its parent
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundMessage {
    Console {
        method: ConsoleLevel,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl InboundMessage {
    /// Parse a posted message. Anything that isn't a well-formed console
    /// message yields `None` and is ignored by the host.
    pub fn parse(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

/// Visibility of the console panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Hidden,
    Visible,
}

/// Console panel state machine and its append-only entry list
#[derive(Debug, Clone, Default)]
pub struct ConsoleRelay {
    state: PanelState,
    entries: Vec<ConsoleEntry>,
}

impl ConsoleRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == PanelState::Visible
    }

    pub fn toggle(&mut self) -> PanelState {
        self.state = match self.state {
            PanelState::Hidden => PanelState::Visible,
            PanelState::Visible => PanelState::Hidden,
        };
        self.state
    }

    pub fn entries(&self) -> &[ConsoleEntry] {
        &self.entries
    }

    /// Drop all entries; called at the start of every render cycle
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn accept(&mut self, message: InboundMessage) -> Option<&ConsoleEntry> {
        match message {
            InboundMessage::Console { method, args } => self.push(method, &args),
        }
    }

    /// Append an entry unless it matches the noise denylist. An accepted
    /// error forces the panel open.
    pub fn push(&mut self, level: ConsoleLevel, args: &[String]) -> Option<&ConsoleEntry> {
        let entry = ConsoleEntry::new(level, args);
        if is_noise(&entry.message) {
            log::debug!("dropping sandbox noise: {}", entry.message);
            return None;
        }

        if level == ConsoleLevel::Error && self.state == PanelState::Hidden {
            self.state = PanelState::Visible;
        }

        self.entries.push(entry);
        self.entries.last()
    }
}

fn is_noise(message: &str) -> bool {
    NOISE_DENYLIST.iter().any(|noise| message.contains(noise))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_console_message() {
        let msg = InboundMessage::parse(r#"{"type":"console","method":"log","args":["x"]}"#);
        assert_eq!(
            msg,
            Some(InboundMessage::Console {
                method: ConsoleLevel::Log,
                args: args(&["x"]),
            })
        );
    }

    #[test]
    fn test_parse_ignores_foreign_messages() {
        assert_eq!(InboundMessage::parse(r#"{"type":"resize","height":3}"#), None);
        assert_eq!(InboundMessage::parse(r#"{"type":"console","method":"debug","args":[]}"#), None);
        assert_eq!(InboundMessage::parse(r#"{"type":"console","method":"log","args":[1]}"#), None);
        assert_eq!(InboundMessage::parse("\"webpackOk\""), None);
    }

    #[test]
    fn test_entries_keep_receipt_order() {
        let mut relay = ConsoleRelay::new();
        relay.push(ConsoleLevel::Log, &args(&["first"]));
        relay.push(ConsoleLevel::Warn, &args(&["second", "half"]));
        relay.push(ConsoleLevel::Log, &args(&["third"]));

        let lines: Vec<String> = relay.entries().iter().map(ConsoleEntry::render).collect();
        assert_eq!(lines, vec!["[LOG] first", "[WARN] second half", "[LOG] third"]);
    }

    #[test]
    fn test_noise_is_dropped() {
        let mut relay = ConsoleRelay::new();
        let noise = args(&["Blocked a frame with origin \"null\" from accessing a cross-origin frame."]);
        assert!(relay.push(ConsoleLevel::Error, &noise).is_none());
        assert!(relay.entries().is_empty());
        assert!(!relay.is_visible());
    }

    #[test]
    fn test_error_forces_panel_visible() {
        let mut relay = ConsoleRelay::new();
        relay.push(ConsoleLevel::Warn, &args(&["careful"]));
        assert_eq!(relay.state(), PanelState::Hidden);

        relay.push(ConsoleLevel::Error, &args(&["boom"]));
        assert_eq!(relay.state(), PanelState::Visible);

        relay.push(ConsoleLevel::Error, &args(&["again"]));
        assert_eq!(relay.state(), PanelState::Visible);
    }

    #[test]
    fn test_toggle_and_clear() {
        let mut relay = ConsoleRelay::new();
        assert_eq!(relay.toggle(), PanelState::Visible);
        relay.push(ConsoleLevel::Log, &args(&["x"]));
        relay.clear();
        assert!(relay.entries().is_empty());
        assert_eq!(relay.toggle(), PanelState::Hidden);
    }
}
