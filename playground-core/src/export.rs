use std::fmt;
use std::io::{Cursor, Write};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{PlaygroundError, PlaygroundResult};
use crate::model::{Buffers, Language};

/// The three sources as exported and imported: `{"html", "css", "js"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFiles {
    pub html: String,
    pub css: String,
    pub js: String,
}

impl ProjectFiles {
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Html => &self.html,
            Language::Css => &self.css,
            Language::Js => &self.js,
        }
    }
}

impl From<&Buffers> for ProjectFiles {
    fn from(buffers: &Buffers) -> Self {
        Self {
            html: buffers.html.content.clone(),
            css: buffers.css.content.clone(),
            js: buffers.js.content.clone(),
        }
    }
}

/// Supported export targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Standalone `index.html` with inline style and script
    Html,
    /// `{"html", "css", "js"}` object
    Json,
    /// Labeled plain-text triple
    Text,
    /// Archive with three files and a README manifest
    Zip,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Html, ExportFormat::Json, ExportFormat::Text, ExportFormat::Zip]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
            ExportFormat::Text => "text",
            ExportFormat::Zip => "zip",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Html => "index.html",
            ExportFormat::Json => "playground.json",
            ExportFormat::Text => "playground.txt",
            ExportFormat::Zip => "web-project.zip",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Html => "text/html",
            ExportFormat::Json => "application/json",
            ExportFormat::Text => "text/plain",
            ExportFormat::Zip => "application/zip",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = PlaygroundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PlaygroundError::UnknownFormat(s.to_string()))
    }
}

/// Render a project in the given format
pub fn export(files: &ProjectFiles, format: ExportFormat, created_at: DateTime<Utc>) -> PlaygroundResult<Vec<u8>> {
    match format {
        ExportFormat::Html => Ok(to_html_file(files).into_bytes()),
        ExportFormat::Json => Ok(to_json(files)?.into_bytes()),
        ExportFormat::Text => Ok(to_labeled_text(files).into_bytes()),
        ExportFormat::Zip => to_zip(files, created_at),
    }
}

/// Standalone page. Unlike the preview document this carries no console shim.
pub fn to_html_file(files: &ProjectFiles) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>My Web Page</title>
    <style>
{}
    </style>
</head>
<body>
{}
    <script>
{}
    </script>
</body>
</html>"#,
        files.css, files.html, files.js
    )
}

pub fn to_json(files: &ProjectFiles) -> PlaygroundResult<String> {
    Ok(serde_json::to_string(files)?)
}

/// Parse a JSON export. All three fields are required.
pub fn from_json(json: &str) -> PlaygroundResult<ProjectFiles> {
    Ok(serde_json::from_str(json)?)
}

pub fn to_labeled_text(files: &ProjectFiles) -> String {
    format!(
        "HTML:\n{}\n\nCSS:\n{}\n\nJavaScript:\n{}",
        files.html, files.css, files.js
    )
}

/// Manifest written into exported archives
pub fn readme(created_at: DateTime<Utc>) -> String {
    let mut readme = String::new();

    readme.push_str("# Web Code Editor Project\n\n");
    readme.push_str("This archive contains the following files:\n\n");
    for language in Language::all() {
        readme.push_str(&format!("- {} - {} code\n", language.file_name(), language.label()));
    }
    readme.push_str("\n## Usage\n\n");
    readme.push_str("1. Extract the archive\n");
    readme.push_str("2. Open index.html in a browser\n");
    readme.push_str("3. Edit the files as needed\n\n");
    readme.push_str(&format!(
        "Created: {}\n",
        created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    readme
}

pub fn to_zip(files: &ProjectFiles, created_at: DateTime<Utc>) -> PlaygroundResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for language in Language::all() {
        zip.start_file(language.file_name(), options)?;
        zip.write_all(files.get(*language).as_bytes())?;
    }
    zip.start_file("README.md", options)?;
    zip.write_all(readme(created_at).as_bytes())?;

    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::io::Read;

    fn files() -> ProjectFiles {
        ProjectFiles {
            html: "<p>hi</p>".to_string(),
            css: "p{color:red}".to_string(),
            js: "console.log('x')".to_string(),
        }
    }

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_json_round_trip() {
        let original = ProjectFiles {
            html: "<div class=\"a\">\n  \u{1F680}</div>".to_string(),
            css: "a::after { content: \"\\\"\"; }".to_string(),
            js: "const s = `line\nbreak`;".to_string(),
        };
        let json = to_json(&original).unwrap();
        assert_eq!(from_json(&json).unwrap(), original);
    }

    #[test]
    fn test_json_requires_all_fields() {
        assert!(from_json(r#"{"html":"x","css":"y"}"#).is_err());
        assert!(from_json("[]").is_err());
    }

    #[test]
    fn test_labeled_text() {
        assert_eq!(
            to_labeled_text(&files()),
            "HTML:\n<p>hi</p>\n\nCSS:\np{color:red}\n\nJavaScript:\nconsole.log('x')"
        );
    }

    #[test]
    fn test_html_file_inlines_sources() {
        let page = to_html_file(&files());
        let style = page.find("p{color:red}").unwrap();
        let body = page.find("<p>hi</p>").unwrap();
        let script = page.find("console.log('x')").unwrap();
        assert!(style < body && body < script);
        assert!(!page.contains("postMessage"));
    }

    #[test]
    fn test_zip_contains_files_and_manifest() {
        let bytes = to_zip(&files(), created_at()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 4);

        let mut css = String::new();
        archive.by_name("style.css").unwrap().read_to_string(&mut css).unwrap();
        assert_eq!(css, "p{color:red}");

        let mut manifest = String::new();
        archive.by_name("README.md").unwrap().read_to_string(&mut manifest).unwrap();
        assert!(manifest.contains("- script.js - JavaScript code"));
        assert!(manifest.contains("Created: 2024-05-01 12:30:00 UTC"));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("ZIP".parse::<ExportFormat>().unwrap(), ExportFormat::Zip);
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(PlaygroundError::UnknownFormat(_))
        ));
    }
}
