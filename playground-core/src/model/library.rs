use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A third-party library that can be pulled into the preview document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Library {
    pub id: &'static str,
    pub name: &'static str,
    pub stylesheets: &'static [&'static str],
    pub scripts: &'static [&'static str],
}

const CATALOG: &[Library] = &[
    Library {
        id: "jquery",
        name: "jQuery 3.7",
        stylesheets: &[],
        scripts: &["https://cdnjs.cloudflare.com/ajax/libs/jquery/3.7.1/jquery.min.js"],
    },
    Library {
        id: "lodash",
        name: "Lodash 4.17",
        stylesheets: &[],
        scripts: &["https://cdnjs.cloudflare.com/ajax/libs/lodash.js/4.17.21/lodash.min.js"],
    },
    Library {
        id: "bootstrap",
        name: "Bootstrap 5.3",
        stylesheets: &["https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css"],
        scripts: &["https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/js/bootstrap.bundle.min.js"],
    },
    Library {
        id: "tailwind",
        name: "Tailwind CSS (Play CDN)",
        stylesheets: &[],
        scripts: &["https://cdn.tailwindcss.com"],
    },
    Library {
        id: "vue",
        name: "Vue 3",
        stylesheets: &[],
        scripts: &["https://unpkg.com/vue@3/dist/vue.global.prod.js"],
    },
    Library {
        id: "react",
        name: "React 18",
        stylesheets: &[],
        scripts: &[
            "https://unpkg.com/react@18/umd/react.production.min.js",
            "https://unpkg.com/react-dom@18/umd/react-dom.production.min.js",
        ],
    },
    Library {
        id: "animate",
        name: "Animate.css 4.1",
        stylesheets: &["https://cdnjs.cloudflare.com/ajax/libs/animate.css/4.1.1/animate.min.css"],
        scripts: &[],
    },
    Library {
        id: "chartjs",
        name: "Chart.js 4.4",
        stylesheets: &[],
        scripts: &["https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"],
    },
];

impl Library {
    pub fn catalog() -> &'static [Library] {
        CATALOG
    }

    pub fn find(id: &str) -> Option<&'static Library> {
        CATALOG.iter().find(|lib| lib.id == id)
    }

    /// `<link>`/`<script>` tags, stylesheets first
    pub fn tags(&self) -> Vec<String> {
        let links = self
            .stylesheets
            .iter()
            .map(|href| format!(r#"<link rel="stylesheet" href="{}">"#, href));
        let scripts = self
            .scripts
            .iter()
            .map(|src| format!(r#"<script src="{}"></script>"#, src));
        links.chain(scripts).collect()
    }
}

/// Enabled/disabled flag per library id, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibrarySelection {
    entries: IndexMap<String, bool>,
}

impl LibrarySelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: &str, enabled: bool) {
        self.entries.insert(id.to_string(), enabled);
    }

    /// Flip a library and return its new state
    pub fn toggle(&mut self, id: &str) -> bool {
        let flag = self.entries.entry(id.to_string()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.entries.get(id).copied().unwrap_or(false)
    }

    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(id, _)| id.as_str())
    }

    /// Head tags for every enabled library. Ids missing from the catalog are skipped.
    pub fn head_tags(&self) -> Vec<String> {
        self.enabled()
            .filter_map(Library::find)
            .flat_map(Library::tags)
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for LibrarySelection {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(id, on)| (id.into(), on)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_tags_follow_selection_order() {
        let mut selection = LibrarySelection::new();
        selection.set("lodash", true);
        selection.set("bootstrap", true);
        selection.set("jquery", false);

        let tags = selection.head_tags();
        assert_eq!(tags.len(), 3);
        assert!(tags[0].contains("lodash.min.js"));
        assert!(tags[1].starts_with("<link"));
        assert!(tags[2].contains("bootstrap.bundle.min.js"));
    }

    #[test]
    fn test_toggle_and_unknown_ids() {
        let mut selection = LibrarySelection::new();
        assert!(selection.toggle("nope"));
        assert!(selection.is_enabled("nope"));
        assert!(selection.head_tags().is_empty());
        assert!(!selection.toggle("nope"));
    }

    #[test]
    fn test_json_shape() {
        let selection: LibrarySelection = [("vue", true), ("react", false)].into_iter().collect();
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"{"vue":true,"react":false}"#);

        let back: LibrarySelection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selection);
    }
}
