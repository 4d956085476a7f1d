//! Prettier on the PATH as the terminal frontend's code formatter

use std::io::Write;
use std::process::{Command, Stdio};

use playground_core::capability::{prettier_parser, select_formatter};
use playground_core::{CodeFormatter, Language, PlaygroundError, PlaygroundResult};

pub struct PrettierCommand {
    program: String,
    available: bool,
}

impl PrettierCommand {
    /// Probe `program --version` once
    pub fn detect(program: &str) -> Self {
        let available = Command::new(program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);

        Self {
            program: program.to_string(),
            available,
        }
    }
}

impl CodeFormatter for PrettierCommand {
    fn name(&self) -> &'static str {
        "prettier"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn format(&self, language: Language, source: &str) -> PlaygroundResult<String> {
        let failed = |message: String| PlaygroundError::Format { language, message };

        let mut child = Command::new(&self.program)
            .args(["--parser", prettier_parser(language), "--tab-width", "2"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(failed(String::from_utf8_lossy(&output.stderr).trim().to_string()));
        }
        String::from_utf8(output.stdout).map_err(|e| failed(e.to_string()))
    }
}

/// Formatter for this session: Prettier if installed, otherwise the no-op
pub fn detect_formatter() -> Box<dyn CodeFormatter> {
    select_formatter(vec![Box::new(PrettierCommand::detect("prettier"))])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_unavailable() {
        let formatter = PrettierCommand::detect("definitely-not-a-prettier-binary");
        assert!(!formatter.is_available());
    }
}
