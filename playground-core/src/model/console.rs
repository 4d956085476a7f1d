use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Console method intercepted inside the sandbox
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Log,
    Warn,
    Error,
}

impl ConsoleLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleLevel::Log => "log",
            ConsoleLevel::Warn => "warn",
            ConsoleLevel::Error => "error",
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ConsoleLevel::Log => "LOG",
            ConsoleLevel::Warn => "WARN",
            ConsoleLevel::Error => "ERROR",
        }
    }
}

/// One line of the console panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub level: ConsoleLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsoleEntry {
    pub fn new(level: ConsoleLevel, args: &[String]) -> Self {
        Self {
            level,
            message: args.join(" "),
            timestamp: Utc::now(),
        }
    }

    /// Panel text, e.g. `[WARN] deprecated call`
    pub fn render(&self) -> String {
        format!("[{}] {}", self.level.tag(), self.message)
    }
}
