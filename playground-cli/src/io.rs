//! File I/O for native CLI

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use playground_core::export::{self, ProjectFiles};
use playground_core::{KeyValueStore, PlaygroundError, PlaygroundResult};

use crate::config::SourceArgs;

/// Key-value store persisted as one JSON object, rewritten on every set
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store, starting empty when the file is missing or unreadable
    pub fn open(path: &Path) -> Self {
        let values = match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("ignoring malformed store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("failed to read store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            values,
        }
    }

    fn flush(&self, key: &str) -> PlaygroundResult<()> {
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)
            .map_err(|e| PlaygroundError::storage(key, format!("{}: {}", self.path.display(), e)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PlaygroundResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PlaygroundResult<()> {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value.to_string());
        self.flush(key)
    }
}

/// Create the data directory if needed
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(())
}

fn read_optional(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => Ok(String::new()),
    }
}

/// Resolve the project sources from explicit files, a JSON export, or
/// the persisted store
pub fn load_sources(sources: &SourceArgs, store: &FileStore) -> Result<ProjectFiles> {
    if let Some(json_path) = &sources.from_json {
        let json = fs::read_to_string(json_path)
            .with_context(|| format!("Failed to read file: {}", json_path.display()))?;
        return export::from_json(&json)
            .with_context(|| format!("Invalid project JSON: {}", json_path.display()));
    }

    if sources.is_empty() {
        let buffers = playground_core::persist::load_buffers(store);
        return Ok(ProjectFiles::from(&buffers));
    }

    Ok(ProjectFiles {
        html: read_optional(sources.html.as_ref())?,
        css: read_optional(sources.css.as_ref())?,
        js: read_optional(sources.js.as_ref())?,
    })
}

/// Write bytes to a file, or stdout when no path is given
pub fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let mut store = FileStore::open(&path);
        assert_eq!(store.get("html").unwrap(), None);
        store.set("html", "<p>saved</p>").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("html").unwrap().as_deref(), Some("<p>saved</p>"));
    }

    #[test]
    fn test_malformed_store_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{oops").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("css").unwrap(), None);
    }

    #[test]
    fn test_write_failure_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("storage.json");

        let mut store = FileStore::open(&path);
        let err = store.set("js", "1").unwrap_err();
        assert!(matches!(err, PlaygroundError::Storage { ref key, .. } if key == "js"));
    }

    #[test]
    fn test_sources_from_files_and_store() {
        let dir = tempfile::tempdir().unwrap();
        let css = dir.path().join("style.css");
        fs::write(&css, "p{color:red}").unwrap();

        let mut store = FileStore::open(&dir.path().join("storage.json"));
        store.set("html", "<p>stored</p>").unwrap();

        let sources = SourceArgs {
            css: Some(css),
            ..SourceArgs::default()
        };
        let files = load_sources(&sources, &store).unwrap();
        assert_eq!(files.css, "p{color:red}");
        assert_eq!(files.html, "");

        let files = load_sources(&SourceArgs::default(), &store).unwrap();
        assert_eq!(files.html, "<p>stored</p>");
    }
}
