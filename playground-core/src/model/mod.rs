pub mod buffers;
pub mod console;
pub mod editor;
pub mod language;
pub mod library;
pub mod settings;

pub use buffers::Buffers;
pub use console::{ConsoleEntry, ConsoleLevel};
pub use editor::EditorState;
pub use language::Language;
pub use library::{Library, LibrarySelection};
pub use settings::{FontSize, LayoutMode, Settings, ViewportMode};
