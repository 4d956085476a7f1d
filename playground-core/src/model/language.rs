use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three source languages edited side by side
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Html,
    Css,
    Js,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[Language::Html, Language::Css, Language::Js]
    }

    /// Key under which the buffer is persisted, also used as the JSON export field
    pub fn storage_key(&self) -> &'static str {
        match self {
            Language::Html => "html",
            Language::Css => "css",
            Language::Js => "js",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Js => "JavaScript",
        }
    }

    /// File name used inside exported archives
    pub fn file_name(&self) -> &'static str {
        match self {
            Language::Html => "index.html",
            Language::Css => "style.css",
            Language::Js => "script.js",
        }
    }

    pub fn next(&self) -> Language {
        match self {
            Language::Html => Language::Css,
            Language::Css => Language::Js,
            Language::Js => Language::Html,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Language::Html),
            "css" => Ok(Language::Css),
            "js" | "javascript" => Ok(Language::Js),
            other => Err(format!("unknown language '{}'", other)),
        }
    }
}
