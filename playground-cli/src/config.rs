//! Command-line arguments and resolved runtime configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};

use playground_core::ExportFormat;

/// Command-line arguments for the playground
#[derive(Debug, Parser)]
#[command(name = "playground")]
#[command(about = "HTML/CSS/JS playground with a live preview")]
#[command(version)]
pub struct Args {
    /// Directory holding persisted buffers, the preview file and the log
    #[arg(long, global = true, help = "Data directory (default: ~/.playground)")]
    pub data_dir: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Edit the persisted buffers in the terminal (default)
    Edit,
    /// Compose the preview document from source files
    Compose {
        #[command(flatten)]
        sources: SourceArgs,
        /// Library id to include; repeat for several
        #[arg(long = "library", value_name = "ID")]
        libraries: Vec<String>,
        #[arg(short, long, help = "Output file (default: stdout)")]
        output: Option<PathBuf>,
    },
    /// Export the project as html, json, text or zip
    Export {
        #[command(flatten)]
        sources: SourceArgs,
        #[arg(short, long, value_parser = parse_format, default_value = "html")]
        format: ExportFormat,
        #[arg(short, long, help = "Output file (default: the format's file name)")]
        output: Option<PathBuf>,
    },
    /// Replace the persisted buffers with a JSON export
    Import {
        file: PathBuf,
    },
    /// Print the Open Graph / Twitter Card meta tags
    Meta {
        #[command(flatten)]
        site: SiteArgs,
    },
    /// Render a page shell, replacing its {{meta}} marker
    Page {
        #[arg(long)]
        template: PathBuf,
        #[command(flatten)]
        site: SiteArgs,
        #[arg(short, long, help = "Output file (default: stdout)")]
        output: Option<PathBuf>,
    },
}

/// Where the three sources come from. Without any of these, the persisted
/// buffers are used.
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct SourceArgs {
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    pub css: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    pub js: Option<PathBuf>,
    #[arg(long, value_name = "FILE", conflicts_with_all = ["html", "css", "js"])]
    pub from_json: Option<PathBuf>,
}

impl SourceArgs {
    pub fn is_empty(&self) -> bool {
        self.html.is_none() && self.css.is_none() && self.js.is_none() && self.from_json.is_none()
    }
}

#[derive(Debug, Clone, ClapArgs)]
pub struct SiteArgs {
    #[arg(long, default_value = ".env", help = "Site config file (falls back to <file>.example)")]
    pub config: PathBuf,
    #[arg(long, help = "Page URL for canonical and og:url (default: SITE_URL)")]
    pub url: Option<String>,
}

fn parse_format(value: &str) -> Result<ExportFormat, String> {
    value.parse().map_err(|e: playground_core::PlaygroundError| e.to_string())
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: &Args) -> Result<Self> {
        let data_dir = match &args.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::home_dir()
                .context("Could not find home directory")?
                .join(".playground"),
        };

        Ok(Config {
            data_dir,
            log_level: args.log_level.clone(),
        })
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }

    pub fn preview_path(&self) -> PathBuf {
        self.data_dir.join("preview.html")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("playground.log")
    }
}
