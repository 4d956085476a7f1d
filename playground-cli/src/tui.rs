//! Terminal editing session: three buffers, debounced preview file output

use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use playground_core::{CodeFormatter, ExportFormat, Library, NoticeKind, Playground, Template};

use crate::config::Config;
use crate::format::detect_formatter;
use crate::io::{self, FileStore};
use crate::ui;

const IDLE_POLL: Duration = Duration::from_millis(250);
const INDENT: &str = "  ";

/// Session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Edit,
    Help,
    TemplatePicker,
    LibraryPicker,
    ExportPicker,
}

/// Terminal frontend state around the platform-agnostic playground
pub struct Session {
    pub app: Playground,
    pub mode: Mode,
    pub picker_selected: usize,
    pub running: bool,
    pub preview_path: PathBuf,
    pub export_dir: PathBuf,

    store: FileStore,
    formatter: Box<dyn CodeFormatter>,
    started: Instant,
}

impl Session {
    pub fn new(
        store: FileStore,
        formatter: Box<dyn CodeFormatter>,
        preview_path: PathBuf,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            app: Playground::load(&store),
            mode: Mode::Edit,
            picker_selected: 0,
            running: true,
            preview_path,
            export_dir,

            store,
            formatter,
            started: Instant::now(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Time until the pending debounce fires, bounded for idle redraws
    pub fn poll_timeout(&self) -> Duration {
        self.app
            .pending(self.now_ms())
            .map(|left| left.min(IDLE_POLL))
            .unwrap_or(IDLE_POLL)
    }

    /// Fire the debounce if due
    pub fn tick(&mut self) {
        if self.app.poll(self.now_ms()) {
            self.refresh();
        }
    }

    /// Render cycle: compose, write the preview file, persist
    pub fn refresh(&mut self) {
        let doc = self.app.run();
        if let Err(e) = std::fs::write(&self.preview_path, doc) {
            log::error!("failed to write preview {}: {}", self.preview_path.display(), e);
            self.app
                .notify(NoticeKind::Error, format!("Preview not written: {}", e));
        }
        self.app.persist(&mut self.store);
    }

    fn save_preferences(&mut self) {
        if !self.app.save_preferences(&mut self.store) {
            self.app.notify(NoticeKind::Error, "Failed to save settings");
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Clear notice on any key
        self.app.clear_notice();

        match self.mode {
            Mode::Edit => self.handle_edit_mode(key),
            Mode::Help => self.mode = Mode::Edit,
            Mode::TemplatePicker => self.handle_picker(key, Template::all().len()),
            Mode::LibraryPicker => self.handle_picker(key, Library::catalog().len()),
            Mode::ExportPicker => self.handle_picker(key, ExportFormat::all().len()),
        }
    }

    fn open_picker(&mut self, mode: Mode) {
        self.picker_selected = 0;
        self.mode = mode;
    }

    fn handle_edit_mode(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            self.handle_command(key.code);
            return;
        }

        match key.code {
            KeyCode::BackTab => {
                self.app.next_tab();
                return;
            }
            KeyCode::F(1) => {
                self.mode = Mode::Help;
                return;
            }
            _ => {}
        }

        let now = self.now_ms();
        let editor = self.app.active_editor_mut();
        let edited = match key.code {
            KeyCode::Char(c) => {
                editor.insert_char(c);
                true
            }
            KeyCode::Enter => {
                editor.insert_newline();
                true
            }
            KeyCode::Tab => {
                editor.insert_str(INDENT);
                true
            }
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Delete => editor.delete(),
            KeyCode::Left => {
                editor.move_left();
                false
            }
            KeyCode::Right => {
                editor.move_right();
                false
            }
            KeyCode::Up => {
                editor.move_up();
                false
            }
            KeyCode::Down => {
                editor.move_down();
                false
            }
            KeyCode::Home => {
                editor.move_to_line_start();
                false
            }
            KeyCode::End => {
                editor.move_to_line_end();
                false
            }
            KeyCode::PageUp => {
                editor.move_to_top();
                false
            }
            KeyCode::PageDown => {
                editor.move_to_bottom();
                false
            }
            _ => false,
        };

        if edited {
            self.app.touch(now);
        }
    }

    fn handle_command(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => {
                if self.app.buffers.is_dirty() {
                    self.app.persist(&mut self.store);
                }
                self.running = false;
            }
            KeyCode::Char('n') => self.app.next_tab(),
            KeyCode::Char('r') => {
                self.refresh();
                self.app.notify(NoticeKind::Success, "Code executed");
            }
            KeyCode::Char('s') => {
                if self.app.persist(&mut self.store) {
                    self.app.notify(NoticeKind::Success, "Code saved");
                } else {
                    self.app.notify(NoticeKind::Error, "Failed to save code");
                }
            }
            KeyCode::Char('f') => {
                let now = self.now_ms();
                if let Err(e) = self.app.format_active(self.formatter.as_ref(), now) {
                    log::debug!("format skipped: {}", e);
                }
            }
            KeyCode::Char('d') => {
                self.app.toggle_dark_mode();
                self.save_preferences();
            }
            KeyCode::Char('o') => {
                self.app.toggle_layout();
                self.save_preferences();
            }
            KeyCode::Char('t') => self.open_picker(Mode::TemplatePicker),
            KeyCode::Char('l') => self.open_picker(Mode::LibraryPicker),
            KeyCode::Char('e') => self.open_picker(Mode::ExportPicker),
            KeyCode::Left => self.app.active_editor_mut().move_word_back(),
            KeyCode::Right => self.app.active_editor_mut().move_word_forward(),
            _ => {}
        }
    }

    fn handle_picker(&mut self, key: KeyEvent, len: usize) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Edit,
            KeyCode::Char('j') | KeyCode::Down => {
                self.picker_selected = (self.picker_selected + 1) % len;
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.picker_selected = if self.picker_selected == 0 {
                    len - 1
                } else {
                    self.picker_selected - 1
                };
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.pick(),
            _ => {}
        }
    }

    fn pick(&mut self) {
        let index = self.picker_selected;
        match self.mode {
            Mode::TemplatePicker => {
                let id = Template::all()[index].id;
                if self.app.load_template(id).is_ok() {
                    self.refresh();
                }
                self.mode = Mode::Edit;
            }
            Mode::LibraryPicker => {
                let library = Library::catalog()[index];
                let enabled = self.app.toggle_library(library.id);
                self.save_preferences();
                self.refresh();
                self.app.notify(
                    NoticeKind::Info,
                    format!("{} {}", library.name, if enabled { "enabled" } else { "disabled" }),
                );
            }
            Mode::ExportPicker => {
                let format = ExportFormat::all()[index];
                self.export(format);
                self.mode = Mode::Edit;
            }
            Mode::Edit | Mode::Help => {}
        }
    }

    fn export(&mut self, format: ExportFormat) {
        let path = self.export_dir.join(format.file_name());
        let result = self
            .app
            .export(format, Utc::now())
            .map_err(anyhow::Error::from)
            .and_then(|bytes| io::write_output(Some(path.as_path()), &bytes));

        match result {
            Ok(()) => {
                log::info!("exported {} to {}", format, path.display());
                self.app
                    .notify(NoticeKind::Success, format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("export failed: {:#}", e);
                self.app.notify(NoticeKind::Error, format!("Export failed: {}", e));
            }
        }
    }
}

/// Run the terminal editor until the user quits
pub fn run(config: &Config) -> Result<()> {
    let store = FileStore::open(&config.storage_path());
    let export_dir = std::env::current_dir()?;
    let mut session = Session::new(store, detect_formatter(), config.preview_path(), export_dir);
    session.refresh();
    session.app.notify(
        NoticeKind::Info,
        format!("Preview: {}  (F1 for help)", config.preview_path().display()),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut session);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, session: &mut Session) -> Result<()> {
    while session.running {
        terminal.draw(|f| ui::draw(f, session))?;

        if event::poll(session.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    session.handle_key(key);
                }
            }
        }

        session.tick();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_core::{KeyValueStore, Language, NoFormatter};

    fn session(dir: &std::path::Path) -> Session {
        let store = FileStore::open(&dir.join("storage.json"));
        Session::new(
            store,
            Box::new(NoFormatter),
            dir.join("preview.html"),
            dir.to_path_buf(),
        )
    }

    fn press(session: &mut Session, code: KeyCode) {
        session.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(session: &mut Session, c: char) {
        session.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    #[test]
    fn test_typing_edits_active_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        ctrl(&mut session, 'n');
        assert_eq!(session.app.active, Language::Css);

        press(&mut session, KeyCode::PageUp);
        for c in "a{}".chars() {
            press(&mut session, KeyCode::Char(c));
        }
        press(&mut session, KeyCode::Enter);
        assert!(session.app.buffers.content(Language::Css).starts_with("a{}\n"));
        assert!(session.app.pending(session.now_ms()).is_some());
    }

    #[test]
    fn test_run_writes_preview_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        press(&mut session, KeyCode::Char('!'));
        ctrl(&mut session, 'r');

        let preview = std::fs::read_to_string(dir.path().join("preview.html")).unwrap();
        assert!(preview.contains("!<h1>Hello World!</h1>"));

        let store = FileStore::open(&dir.path().join("storage.json"));
        assert!(store.get("html").unwrap().unwrap().starts_with("!<h1>"));
    }

    #[test]
    fn test_template_picker() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        ctrl(&mut session, 't');
        assert_eq!(session.mode, Mode::TemplatePicker);

        press(&mut session, KeyCode::Down);
        press(&mut session, KeyCode::Enter);
        assert_eq!(session.mode, Mode::Edit);
        assert!(session.app.buffers.content(Language::Html).contains("<title>My Page</title>"));
    }

    #[test]
    fn test_library_picker_toggles_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        ctrl(&mut session, 'l');
        press(&mut session, KeyCode::Enter);
        assert!(session.app.libraries.is_enabled("jquery"));

        let preview = std::fs::read_to_string(dir.path().join("preview.html")).unwrap();
        assert!(preview.contains("jquery.min.js"));

        let store = FileStore::open(&dir.path().join("storage.json"));
        assert_eq!(store.get("libraries").unwrap().as_deref(), Some(r#"{"jquery":true}"#));
    }

    #[test]
    fn test_export_picker_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        ctrl(&mut session, 'e');
        press(&mut session, KeyCode::Down);
        press(&mut session, KeyCode::Enter);

        let json = std::fs::read_to_string(dir.path().join("playground.json")).unwrap();
        assert!(json.starts_with("{\"html\":"));
    }

    #[test]
    fn test_format_without_prettier_leaves_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        let before = session.app.buffers.clone();
        ctrl(&mut session, 'f');
        assert_eq!(session.app.buffers, before);
        assert_eq!(session.app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
    }
}
