//! Playground Core - Platform-agnostic HTML/CSS/JS playground library
//!
//! This crate provides the buffers, preview composition, console relay and
//! persistence logic of the Playground editor. It's designed to work both in
//! the native terminal frontend and in the WASM browser frontend.

pub mod app;
pub mod capability;
pub mod compose;
pub mod debounce;
pub mod error;
pub mod export;
pub mod meta;
pub mod model;
pub mod persist;
pub mod relay;
pub mod sanitize;
pub mod templates;

pub use app::{Notice, NoticeKind, Playground, DEBOUNCE_DELAY};
pub use capability::{CodeFormatter, NoFormatter};
pub use compose::{compose, compose_document, CONSOLE_SHIM, SANDBOX_PERMISSIONS};
pub use debounce::Debouncer;
pub use error::{PlaygroundError, PlaygroundResult};
pub use export::{ExportFormat, ProjectFiles};
pub use meta::SiteConfig;
pub use model::{
    Buffers, ConsoleEntry, ConsoleLevel, EditorState, FontSize, Language, LayoutMode, Library,
    LibrarySelection, Settings, ViewportMode,
};
pub use persist::{KeyValueStore, MemoryStore};
pub use relay::{ConsoleRelay, InboundMessage, PanelState};
pub use sanitize::sanitize_markup;
pub use templates::Template;
