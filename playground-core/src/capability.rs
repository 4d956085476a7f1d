//! Optional third-party integrations behind explicit provider traits
//!
//! Each frontend detects its providers once at startup. A missing provider
//! is replaced by a no-op implementation so the dependent action degrades to
//! a notice instead of failing.

use crate::error::{PlaygroundError, PlaygroundResult};
use crate::model::Language;

/// Source code formatter (Prettier in the browser or on the PATH)
pub trait CodeFormatter {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool {
        true
    }

    fn format(&self, language: Language, source: &str) -> PlaygroundResult<String>;
}

/// Fallback used when no formatter could be detected
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFormatter;

impl CodeFormatter for NoFormatter {
    fn name(&self) -> &'static str {
        "code formatter"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn format(&self, _language: Language, _source: &str) -> PlaygroundResult<String> {
        Err(PlaygroundError::Unavailable("code formatter"))
    }
}

/// Prettier parser name for a language
pub fn prettier_parser(language: Language) -> &'static str {
    match language {
        Language::Html => "html",
        Language::Css => "css",
        Language::Js => "babel",
    }
}

/// Pick the first available formatter, or the no-op fallback
pub fn select_formatter(candidates: Vec<Box<dyn CodeFormatter>>) -> Box<dyn CodeFormatter> {
    for candidate in candidates {
        if candidate.is_available() {
            log::info!("using {} for code formatting", candidate.name());
            return candidate;
        }
        log::warn!("{} not available", candidate.name());
    }
    log::warn!("no code formatter available, formatting disabled");
    Box::new(NoFormatter)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper(bool);

    impl CodeFormatter for Upper {
        fn name(&self) -> &'static str {
            "upper"
        }

        fn is_available(&self) -> bool {
            self.0
        }

        fn format(&self, _language: Language, source: &str) -> PlaygroundResult<String> {
            Ok(source.to_uppercase())
        }
    }

    #[test]
    fn test_select_first_available() {
        let chosen = select_formatter(vec![Box::new(Upper(false)), Box::new(Upper(true))]);
        assert!(chosen.is_available());
        assert_eq!(chosen.format(Language::Css, "a{}").unwrap(), "A{}");
    }

    #[test]
    fn test_fallback_is_noop() {
        let chosen = select_formatter(vec![Box::new(Upper(false))]);
        assert!(!chosen.is_available());
        assert!(matches!(
            chosen.format(Language::Js, "x"),
            Err(PlaygroundError::Unavailable(_))
        ));
    }
}
