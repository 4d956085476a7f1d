//! Write-through persistence of buffers and settings into a flat key-value store
//!
//! Layout: `html`, `css`, `js`, `darkMode`, `fontSize`, `viewport`, `layout`
//! and `libraries` (a JSON object). Absent or unreadable keys fall back to
//! defaults so older or partial stores keep loading.

use std::collections::BTreeMap;

use crate::error::{PlaygroundError, PlaygroundResult};
use crate::model::{Buffers, FontSize, Language, LayoutMode, LibrarySelection, Settings, ViewportMode};

pub const KEY_DARK_MODE: &str = "darkMode";
pub const KEY_FONT_SIZE: &str = "fontSize";
pub const KEY_VIEWPORT: &str = "viewport";
pub const KEY_LAYOUT: &str = "layout";
pub const KEY_LIBRARIES: &str = "libraries";

/// Durable string key-value storage (localStorage, a JSON file, memory)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PlaygroundResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> PlaygroundResult<()>;
}

/// In-memory store with an optional byte quota
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes once keys plus values would exceed `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: BTreeMap::new(),
            quota: Some(bytes),
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.values
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PlaygroundResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PlaygroundResult<()> {
        if let Some(quota) = self.quota {
            if self.used_without(key) + key.len() + value.len() > quota {
                return Err(PlaygroundError::storage(key, "quota exceeded"));
            }
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn read<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("failed to read '{}' from storage: {}", key, e);
            None
        }
    }
}

/// Persisted content per buffer, or the built-in sample
pub fn load_buffers<S: KeyValueStore + ?Sized>(store: &S) -> Buffers {
    let content = |language: Language| {
        read(store, language.storage_key())
            .unwrap_or_else(|| Buffers::default_content(language).to_string())
    };
    Buffers::new(
        content(Language::Html),
        content(Language::Css),
        content(Language::Js),
    )
}

pub fn save_buffers<S: KeyValueStore + ?Sized>(store: &mut S, buffers: &Buffers) -> PlaygroundResult<()> {
    for editor in buffers.iter() {
        store.set(editor.language.storage_key(), &editor.content)?;
    }
    Ok(())
}

pub fn load_settings<S: KeyValueStore + ?Sized>(store: &S) -> Settings {
    let defaults = Settings::default();
    Settings {
        dark_mode: read(store, KEY_DARK_MODE).as_deref() == Some("true"),
        font_size: read(store, KEY_FONT_SIZE)
            .and_then(|v| FontSize::parse(&v))
            .unwrap_or(defaults.font_size),
        viewport: read(store, KEY_VIEWPORT)
            .and_then(|v| ViewportMode::parse(&v))
            .unwrap_or(defaults.viewport),
        layout: read(store, KEY_LAYOUT)
            .and_then(|v| LayoutMode::parse(&v))
            .unwrap_or(defaults.layout),
    }
}

pub fn save_settings<S: KeyValueStore + ?Sized>(store: &mut S, settings: &Settings) -> PlaygroundResult<()> {
    store.set(KEY_DARK_MODE, if settings.dark_mode { "true" } else { "false" })?;
    store.set(KEY_FONT_SIZE, settings.font_size.as_str())?;
    store.set(KEY_VIEWPORT, settings.viewport.as_str())?;
    store.set(KEY_LAYOUT, settings.layout.as_str())?;
    Ok(())
}

pub fn load_libraries<S: KeyValueStore + ?Sized>(store: &S) -> LibrarySelection {
    let Some(json) = read(store, KEY_LIBRARIES) else {
        return LibrarySelection::new();
    };
    serde_json::from_str(&json).unwrap_or_else(|e| {
        log::warn!("ignoring unreadable library selection: {}", e);
        LibrarySelection::new()
    })
}

pub fn save_libraries<S: KeyValueStore + ?Sized>(
    store: &mut S,
    libraries: &LibrarySelection,
) -> PlaygroundResult<()> {
    let json = serde_json::to_string(libraries)?;
    store.set(KEY_LIBRARIES, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_yields_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load_buffers(&store), Buffers::default());
        assert_eq!(load_settings(&store), Settings::default());
        assert_eq!(load_libraries(&store), LibrarySelection::new());
    }

    #[test]
    fn test_buffers_round_trip() {
        let mut store = MemoryStore::new();
        let buffers = Buffers::new("<b>x</b>", "b{}", "alert(1)");
        save_buffers(&mut store, &buffers).unwrap();

        assert_eq!(store.get("html").unwrap().as_deref(), Some("<b>x</b>"));
        let loaded = load_buffers(&store);
        assert_eq!(loaded.content(Language::Css), "b{}");
        assert_eq!(loaded.content(Language::Js), "alert(1)");
    }

    #[test]
    fn test_partial_store_mixes_defaults() {
        let mut store = MemoryStore::new();
        store.set("css", "").unwrap();
        let loaded = load_buffers(&store);
        assert_eq!(loaded.content(Language::Css), "");
        assert_eq!(loaded.content(Language::Html), Buffers::default_content(Language::Html));
    }

    #[test]
    fn test_settings_round_trip_and_garbage() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            dark_mode: true,
            font_size: FontSize::Large,
            viewport: ViewportMode::Mobile,
            layout: LayoutMode::Vertical,
        };
        save_settings(&mut store, &settings).unwrap();
        assert_eq!(load_settings(&store), settings);

        store.set(KEY_FONT_SIZE, "gigantic").unwrap();
        assert_eq!(load_settings(&store).font_size, FontSize::Medium);
    }

    #[test]
    fn test_libraries_round_trip_and_garbage() {
        let mut store = MemoryStore::new();
        let libs: LibrarySelection = [("react", true), ("jquery", false)].into_iter().collect();
        save_libraries(&mut store, &libs).unwrap();
        assert_eq!(load_libraries(&store), libs);

        store.set(KEY_LIBRARIES, "{not json").unwrap();
        assert_eq!(load_libraries(&store), LibrarySelection::new());
    }

    #[test]
    fn test_quota_rejects_writes() {
        let mut store = MemoryStore::with_quota(16);
        let buffers = Buffers::new("x".repeat(64), "", "");
        let err = save_buffers(&mut store, &buffers).unwrap_err();
        assert!(matches!(err, PlaygroundError::Storage { ref key, .. } if key == "html"));
    }
}
