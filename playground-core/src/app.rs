use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::capability::CodeFormatter;
use crate::compose::compose_document;
use crate::debounce::Debouncer;
use crate::error::{PlaygroundError, PlaygroundResult};
use crate::export::{self, ExportFormat, ProjectFiles};
use crate::model::{
    Buffers, ConsoleEntry, EditorState, FontSize, Language, LibrarySelection, Settings, ViewportMode,
};
use crate::persist::{self, KeyValueStore};
use crate::relay::{ConsoleRelay, InboundMessage};
use crate::templates::Template;

/// Idle time after the last edit before the preview is rebuilt and persisted
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// Transient user-visible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Platform-agnostic application state
pub struct Playground {
    pub buffers: Buffers,
    pub active: Language,
    pub libraries: LibrarySelection,
    pub settings: Settings,
    pub console: ConsoleRelay,
    pub notice: Option<Notice>,

    debounce: Debouncer,
    runs: u64,
}

impl Playground {
    pub fn new() -> Self {
        Self::with_state(Buffers::default(), LibrarySelection::new(), Settings::default())
    }

    fn with_state(buffers: Buffers, libraries: LibrarySelection, settings: Settings) -> Self {
        Self {
            buffers,
            active: Language::Html,
            libraries,
            settings,
            console: ConsoleRelay::new(),
            notice: None,

            debounce: Debouncer::new(DEBOUNCE_DELAY),
            runs: 0,
        }
    }

    /// Restore buffers, libraries and settings from storage
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self::with_state(
            persist::load_buffers(store),
            persist::load_libraries(store),
            persist::load_settings(store),
        )
    }

    pub fn active_editor(&self) -> &EditorState {
        self.buffers.get(self.active)
    }

    pub fn active_editor_mut(&mut self) -> &mut EditorState {
        self.buffers.get_mut(self.active)
    }

    pub fn switch_tab(&mut self, language: Language) {
        self.active = language;
    }

    pub fn next_tab(&mut self) {
        self.active = self.active.next();
    }

    /// Replace a buffer's content, as reported by an external editor widget
    pub fn edit(&mut self, language: Language, content: &str, now_ms: u64) {
        let editor = self.buffers.get_mut(language);
        if editor.content == content {
            return;
        }
        editor.set_content(content);
        self.debounce.schedule(now_ms);
    }

    /// Re-arm the debounce after in-place edits through `active_editor_mut`
    pub fn touch(&mut self, now_ms: u64) {
        self.debounce.schedule(now_ms);
    }

    /// True once the debounce window has elapsed since the last edit. The
    /// caller then runs the preview and persists.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        self.debounce.poll(now_ms)
    }

    pub fn pending(&self, now_ms: u64) -> Option<Duration> {
        self.debounce.remaining(now_ms)
    }

    /// Start a render cycle: clear the console and compose the preview
    pub fn run(&mut self) -> String {
        self.console.clear();
        self.runs += 1;
        log::debug!("render cycle {}", self.runs);
        compose_document(&self.buffers, &self.libraries)
    }

    /// Number of render cycles started so far
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Feed a message posted by the sandbox. Returns the entry if it was shown.
    pub fn receive(&mut self, json: &str) -> Option<ConsoleEntry> {
        let message = InboundMessage::parse(json)?;
        self.console.accept(message).cloned()
    }

    /// Write the buffers through to storage. Failures are logged and
    /// reported as an error notice, never propagated.
    pub fn persist<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> bool {
        match persist::save_buffers(store, &self.buffers) {
            Ok(()) => {
                self.buffers.mark_clean();
                true
            }
            Err(e) => {
                log::error!("failed to persist buffers: {}", e);
                self.notify(NoticeKind::Error, format!("Failed to save code: {}", e));
                false
            }
        }
    }

    /// Persist settings and library selection
    pub fn save_preferences<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> bool {
        let result = persist::save_settings(store, &self.settings)
            .and_then(|()| persist::save_libraries(store, &self.libraries));
        if let Err(e) = result {
            log::error!("failed to persist preferences: {}", e);
            return false;
        }
        true
    }

    /// Flip a library. The caller re-runs the preview.
    pub fn toggle_library(&mut self, id: &str) -> bool {
        let enabled = self.libraries.toggle(id);
        log::info!("library {} {}", id, if enabled { "enabled" } else { "disabled" });
        enabled
    }

    pub fn toggle_console(&mut self) -> bool {
        self.console.toggle();
        self.console.is_visible()
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.settings.dark_mode = !self.settings.dark_mode;
        self.settings.dark_mode
    }

    pub fn set_font_size(&mut self, size: FontSize) {
        self.settings.font_size = size;
    }

    pub fn set_viewport(&mut self, viewport: ViewportMode) {
        self.settings.viewport = viewport;
    }

    pub fn toggle_layout(&mut self) {
        self.settings.layout = self.settings.layout.toggled();
    }

    /// Replace all buffers with a built-in template and focus the HTML tab
    pub fn load_template(&mut self, id: &str) -> PlaygroundResult<&'static Template> {
        let Some(template) = Template::find(id) else {
            self.notify(NoticeKind::Error, format!("Template '{}' not found", id));
            return Err(PlaygroundError::UnknownTemplate(id.to_string()));
        };

        self.buffers.replace_all(template.html, template.css, template.js);
        self.active = Language::Html;
        self.debounce.cancel();
        self.notify(NoticeKind::Success, format!("Loaded template \"{}\"", template.name));
        Ok(template)
    }

    /// Replace all buffers from a JSON export
    pub fn import_json(&mut self, json: &str) -> PlaygroundResult<()> {
        let files = export::from_json(json)?;
        self.buffers.replace_all(&files.html, &files.css, &files.js);
        self.debounce.cancel();
        Ok(())
    }

    pub fn project(&self) -> ProjectFiles {
        ProjectFiles::from(&self.buffers)
    }

    pub fn export(&self, format: ExportFormat, created_at: DateTime<Utc>) -> PlaygroundResult<Vec<u8>> {
        export::export(&self.project(), format, created_at)
    }

    /// Format the active buffer in place
    pub fn format_active(&mut self, formatter: &dyn CodeFormatter, now_ms: u64) -> PlaygroundResult<()> {
        if !formatter.is_available() {
            self.notify(NoticeKind::Error, "Code formatter is not available");
            return Err(PlaygroundError::Unavailable("code formatter"));
        }

        let language = self.active;
        let formatted = match formatter.format(language, &self.active_editor().content) {
            Ok(formatted) => formatted,
            Err(e) => {
                self.notify(NoticeKind::Error, format!("Formatting failed: {}", e));
                return Err(e);
            }
        };

        self.edit(language, &formatted, now_ms);
        self.notify(NoticeKind::Success, format!("Formatted {} code", language.label()));
        Ok(())
    }

    pub fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            text: text.into(),
        });
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}

impl Default for Playground {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::NoFormatter;
    use crate::persist::MemoryStore;

    #[test]
    fn test_edits_within_window_trigger_one_cycle() {
        let mut app = Playground::new();
        let mut store = MemoryStore::new();
        let mut cycles = 0;

        let mut text = String::new();
        for (i, now) in (0..1_000u64).step_by(120).enumerate() {
            text.push_str(&format!("<p>{}</p>", i));
            app.edit(Language::Html, &text, now);
            if app.poll(now) {
                cycles += 1;
            }
        }

        for now in (1_000..3_000u64).step_by(100) {
            if app.poll(now) {
                app.run();
                app.persist(&mut store);
                cycles += 1;
            }
        }

        assert_eq!(cycles, 1);
        assert_eq!(app.runs(), 1);
        assert_eq!(store.get("html").unwrap().as_deref(), Some(text.as_str()));
        assert!(!app.buffers.is_dirty());
    }

    #[test]
    fn test_unchanged_edit_does_not_arm() {
        let mut app = Playground::new();
        let current = app.buffers.content(Language::Css).to_string();
        app.edit(Language::Css, &current, 0);
        assert!(app.pending(0).is_none());
    }

    #[test]
    fn test_run_clears_console() {
        let mut app = Playground::new();
        app.receive(r#"{"type":"console","method":"log","args":["old"]}"#);
        assert_eq!(app.console.entries().len(), 1);

        app.run();
        assert!(app.console.entries().is_empty());
    }

    #[test]
    fn test_persist_failure_is_swallowed() {
        let mut app = Playground::new();
        let mut store = MemoryStore::with_quota(4);
        app.edit(Language::Js, "console.log('too big for quota')", 0);

        assert!(!app.persist(&mut store));
        assert!(app.buffers.is_dirty());
        let notice = app.notice.as_ref().expect("failure is reported");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.text.contains("quota exceeded"));
        app.edit(Language::Js, "still editing", 10);
        assert_eq!(app.buffers.content(Language::Js), "still editing");
    }

    #[test]
    fn test_load_template() {
        let mut app = Playground::new();
        app.switch_tab(Language::Js);
        app.edit(Language::Js, "x", 0);

        let template = app.load_template("flexbox").unwrap();
        assert_eq!(template.name, "Flexbox Layout");
        assert_eq!(app.active, Language::Html);
        assert!(app.buffers.content(Language::Html).contains("class=\"box\""));
        assert_eq!(app.buffers.html.cursor(), 0);
        assert!(app.pending(0).is_none());

        assert!(app.load_template("nope").is_err());
        assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[test]
    fn test_import_json() {
        let mut app = Playground::new();
        app.import_json(r#"{"html":"<i>a</i>","css":"i{}","js":"1"}"#).unwrap();
        assert_eq!(
            app.project(),
            ProjectFiles {
                html: "<i>a</i>".into(),
                css: "i{}".into(),
                js: "1".into(),
            }
        );
        assert!(app.import_json(r#"{"html":""}"#).is_err());
    }

    #[test]
    fn test_format_without_provider_is_noop() {
        let mut app = Playground::new();
        let before = app.buffers.clone();
        assert!(app.format_active(&NoFormatter, 0).is_err());
        assert_eq!(app.buffers, before);
        assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[test]
    fn test_preferences_round_trip() {
        let mut app = Playground::new();
        let mut store = MemoryStore::new();
        app.toggle_dark_mode();
        app.set_font_size(FontSize::Small);
        app.toggle_layout();
        app.toggle_library("vue");
        assert!(app.save_preferences(&mut store));

        let restored = Playground::load(&store);
        assert_eq!(restored.settings, app.settings);
        assert!(restored.libraries.is_enabled("vue"));
    }
}
