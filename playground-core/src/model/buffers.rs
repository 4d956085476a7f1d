use super::{EditorState, Language};

const DEFAULT_HTML: &str = "<h1>Hello World!</h1>\n<p>Write your HTML here</p>";
const DEFAULT_CSS: &str =
    "body {\n  font-family: Arial, sans-serif;\n  padding: 20px;\n}\n\nh1 {\n  color: #4CAF50;\n}";
const DEFAULT_JS: &str =
    "// Write your JavaScript here\nconsole.log(\"Hello from JavaScript!\");";

/// The three source buffers of a playground
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffers {
    pub html: EditorState,
    pub css: EditorState,
    pub js: EditorState,
}

impl Buffers {
    pub fn new(html: impl Into<String>, css: impl Into<String>, js: impl Into<String>) -> Self {
        Self {
            html: EditorState::new(Language::Html, html),
            css: EditorState::new(Language::Css, css),
            js: EditorState::new(Language::Js, js),
        }
    }

    /// Built-in sample shown when nothing has been persisted yet
    pub fn default_content(language: Language) -> &'static str {
        match language {
            Language::Html => DEFAULT_HTML,
            Language::Css => DEFAULT_CSS,
            Language::Js => DEFAULT_JS,
        }
    }

    pub fn get(&self, language: Language) -> &EditorState {
        match language {
            Language::Html => &self.html,
            Language::Css => &self.css,
            Language::Js => &self.js,
        }
    }

    pub fn get_mut(&mut self, language: Language) -> &mut EditorState {
        match language {
            Language::Html => &mut self.html,
            Language::Css => &mut self.css,
            Language::Js => &mut self.js,
        }
    }

    pub fn content(&self, language: Language) -> &str {
        &self.get(language).content
    }

    pub fn iter(&self) -> impl Iterator<Item = &EditorState> {
        [&self.html, &self.css, &self.js].into_iter()
    }

    pub fn is_dirty(&self) -> bool {
        self.iter().any(|editor| editor.dirty)
    }

    pub fn mark_clean(&mut self) {
        self.html.mark_clean();
        self.css.mark_clean();
        self.js.mark_clean();
    }

    /// Replace all three contents at once and move every cursor to the top
    pub fn replace_all(&mut self, html: &str, css: &str, js: &str) {
        for (language, text) in [(Language::Html, html), (Language::Css, css), (Language::Js, js)] {
            let editor = self.get_mut(language);
            editor.set_content(text);
            editor.move_to_top();
        }
    }
}

impl Default for Buffers {
    fn default() -> Self {
        Self::new(DEFAULT_HTML, DEFAULT_CSS, DEFAULT_JS)
    }
}
