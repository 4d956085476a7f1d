//! Playground CLI - Terminal HTML/CSS/JS playground with a file-backed preview

mod config;
mod format;
mod io;
mod tui;
mod ui;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use chrono::Utc;

use playground_core::export::{self, ProjectFiles};
use playground_core::meta::{inject_meta, render_meta_tags};
use playground_core::{compose_document, Buffers, Library, LibrarySelection, Playground, SiteConfig};

use crate::config::{Args, Command, Config, SiteArgs};
use crate::io::FileStore;

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_args(&args)?;
    io::ensure_dir(&config.data_dir)?;

    let interactive = matches!(args.command, None | Some(Command::Edit));
    init_logging(&config, interactive)?;

    match args.command {
        None | Some(Command::Edit) => tui::run(&config),
        Some(Command::Compose {
            sources,
            libraries,
            output,
        }) => {
            let store = FileStore::open(&config.storage_path());
            let files = io::load_sources(&sources, &store)?;
            let doc = compose_files(&files, &libraries);
            io::write_output(output.as_deref(), doc.as_bytes())
        }
        Some(Command::Export {
            sources,
            format,
            output,
        }) => {
            let store = FileStore::open(&config.storage_path());
            let files = io::load_sources(&sources, &store)?;
            let bytes = export::export(&files, format, Utc::now())?;
            let path = output.unwrap_or_else(|| PathBuf::from(format.file_name()));
            io::write_output(Some(path.as_path()), &bytes)?;
            log::info!("exported {} to {}", format, path.display());
            eprintln!("Exported to {}", path.display());
            Ok(())
        }
        Some(Command::Import { file }) => import(&config, &file),
        Some(Command::Meta { site }) => {
            let tags = meta_tags(&site)?;
            println!("{}", tags);
            Ok(())
        }
        Some(Command::Page {
            template,
            site,
            output,
        }) => {
            let page = fs::read_to_string(&template)
                .with_context(|| format!("Failed to read file: {}", template.display()))?;
            let tags = meta_tags(&site)?;
            io::write_output(output.as_deref(), inject_meta(&page, &tags).as_bytes())
        }
    }
}

/// The terminal editor owns stdout, so its log goes to a file in the data
/// directory. One-shot commands log to stderr.
fn init_logging(config: &Config, interactive: bool) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    );

    if interactive {
        let log_path = config.log_path();
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn compose_files(files: &ProjectFiles, library_ids: &[String]) -> String {
    let libraries: LibrarySelection = library_ids
        .iter()
        .filter(|id| {
            let known = Library::find(id).is_some();
            if !known {
                log::warn!("unknown library '{}' ignored", id);
            }
            known
        })
        .map(|id| (id.as_str(), true))
        .collect();

    let buffers = Buffers::new(files.html.as_str(), files.css.as_str(), files.js.as_str());
    compose_document(&buffers, &libraries)
}

fn import(config: &Config, file: &Path) -> Result<()> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    let mut store = FileStore::open(&config.storage_path());
    let mut app = Playground::load(&store);
    app.import_json(&json)
        .with_context(|| format!("Invalid project JSON: {}", file.display()))?;

    if !app.persist(&mut store) {
        anyhow::bail!("Failed to save imported code to {}", config.storage_path().display());
    }
    eprintln!("Imported {}", file.display());
    Ok(())
}

fn meta_tags(site: &SiteArgs) -> Result<String> {
    let config = SiteConfig::load(&site.config)
        .with_context(|| format!("Failed to load site config: {}", site.config.display()))?;
    Ok(render_meta_tags(&config, site.url.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_files_skips_unknown_libraries() {
        let files = ProjectFiles {
            html: "<p>hi</p>".to_string(),
            css: String::new(),
            js: String::new(),
        };
        let doc = compose_files(&files, &["vue".to_string(), "left-pad".to_string()]);

        assert!(doc.contains("vue"));
        assert!(!doc.contains("left-pad"));
        assert!(doc.contains("<p>hi</p>"));
    }

    #[test]
    fn test_import_replaces_persisted_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            log_level: "info".to_string(),
        };
        let file = dir.path().join("project.json");
        fs::write(&file, r#"{"html":"<b>x</b>","css":"b{}","js":"1;"}"#).unwrap();

        import(&config, &file).unwrap();

        let store = FileStore::open(&config.storage_path());
        let buffers = playground_core::persist::load_buffers(&store);
        assert_eq!(buffers.html.content, "<b>x</b>");
        assert_eq!(buffers.js.content, "1;");
    }

    #[test]
    fn test_import_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            log_level: "info".to_string(),
        };
        let file = dir.path().join("broken.json");
        fs::write(&file, "not json").unwrap();

        assert!(import(&config, &file).is_err());
    }
}
