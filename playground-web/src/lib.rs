//! Playground Web - WebAssembly frontend of the HTML/CSS/JS playground
//!
//! The page shell (`index.html`) provides three textareas, a sandboxed
//! iframe and the console panel. This crate wires them to the
//! platform-agnostic `Playground` from playground-core.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use chrono::Utc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlSelectElement};
use web_sys::{KeyboardEvent, MessageEvent};

use playground_core::{
    CodeFormatter, ExportFormat, FontSize, Language, NoticeKind, Playground, ViewportMode,
    DEBOUNCE_DELAY,
};

pub mod format;
pub mod io;
mod logger;
pub mod share;
mod ui;

use crate::io::LocalStorage;
use crate::share::ShareLinks;

const CLICK_TARGETS: &str =
    "[data-action],[data-tab],[data-template],[data-export],[data-viewport],[data-open],[data-close],[data-share]";

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

fn report(result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::error!("DOM update failed: {:?}", e);
    }
}

/// Page-lifetime state shared by every event handler
struct Runtime {
    app: RefCell<Playground>,
    store: RefCell<LocalStorage>,
    formatter: Box<dyn CodeFormatter>,
    /// Pending `setTimeout` handle of the debounce
    timer: Cell<Option<i32>>,
    tick: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Runtime {
    fn new() -> Rc<Self> {
        let store = LocalStorage::open();
        let app = Playground::load(&store);

        let runtime = Rc::new(Self {
            app: RefCell::new(app),
            store: RefCell::new(store),
            formatter: format::detect_formatter(),
            timer: Cell::new(None),
            tick: RefCell::new(None),
        });

        let weak = Rc::downgrade(&runtime);
        let tick = Closure::<dyn FnMut()>::new(move || {
            if let Some(runtime) = weak.upgrade() {
                runtime.on_tick();
            }
        });
        *runtime.tick.borrow_mut() = Some(tick);

        runtime
    }

    fn cancel_timer(&self) {
        if let Some(handle) = self.timer.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
    }

    /// Re-arm the single debounce timer
    fn schedule(&self, delay: Duration) {
        self.cancel_timer();
        let Some(window) = web_sys::window() else {
            return;
        };
        let tick = self.tick.borrow();
        let Some(tick) = tick.as_ref() else {
            return;
        };

        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            delay.as_millis() as i32,
        ) {
            Ok(handle) => self.timer.set(Some(handle)),
            Err(e) => log::error!("failed to schedule preview refresh: {:?}", e),
        }
    }

    fn on_tick(&self) {
        self.timer.set(None);
        let now = now_ms();
        let fired = self.app.borrow_mut().poll(now);
        if fired {
            self.refresh();
            return;
        }

        // Timer fired ahead of the deadline
        let pending = self.app.borrow().pending(now);
        if let Some(left) = pending {
            self.schedule(left.max(Duration::from_millis(1)));
        }
    }

    /// Render cycle: compose, replace the sandbox, persist
    fn refresh(&self) {
        self.cancel_timer();
        let doc = self.app.borrow_mut().run();
        report(ui::clear_console());
        report(ui::load_preview(&doc));

        let saved = {
            let mut store = self.store.borrow_mut();
            self.app.borrow_mut().persist(&mut *store)
        };
        if !saved {
            self.flush_notice();
        }
    }

    fn flush_notice(&self) {
        let notice = self.app.borrow_mut().notice.take();
        if let Some(notice) = notice {
            report(ui::show_notice(&notice));
        }
    }

    fn notify(&self, kind: NoticeKind, text: impl Into<String>) {
        self.app.borrow_mut().notify(kind, text);
        self.flush_notice();
    }

    fn sync_editors(&self) {
        let app = self.app.borrow();
        report(ui::sync_editors(
            app.buffers.iter().map(|e| (e.language, e.content.as_str())),
        ));
        report(ui::show_tab(app.active));
    }

    fn save_preferences(&self) {
        let saved = {
            let app = self.app.borrow();
            report(ui::apply_settings(&app.settings));
            let mut store = self.store.borrow_mut();
            app.save_preferences(&mut *store)
        };
        if !saved {
            self.notify(NoticeKind::Error, "Failed to save settings");
        }
    }

    fn on_input(&self, language: Language) {
        let Ok(area) = ui::editor(language) else {
            return;
        };
        let value = area.value();
        self.app.borrow_mut().edit(language, &value, now_ms());
        self.schedule(DEBOUNCE_DELAY);
    }

    fn on_message(&self, event: &MessageEvent) {
        let Some(json) = js_sys::JSON::stringify(&event.data())
            .ok()
            .and_then(|s| s.as_string())
        else {
            return;
        };

        let mut app = self.app.borrow_mut();
        if let Some(entry) = app.receive(&json) {
            report(ui::append_console(&entry));
            report(ui::show_console(app.console.is_visible()));
        }
    }

    fn run(&self) {
        self.refresh();
        self.notify(NoticeKind::Success, "Code executed");
    }

    fn save(&self) {
        let saved = {
            let mut store = self.store.borrow_mut();
            self.app.borrow_mut().persist(&mut *store)
        };
        if saved {
            self.notify(NoticeKind::Success, "Code saved");
        } else {
            self.notify(NoticeKind::Error, "Failed to save code");
        }
    }

    fn format(&self) {
        let formatted = self
            .app
            .borrow_mut()
            .format_active(self.formatter.as_ref(), now_ms())
            .is_ok();
        if formatted {
            self.sync_editors();
            self.schedule(DEBOUNCE_DELAY);
        }
        self.flush_notice();
    }

    fn load_template(&self, id: &str) {
        let loaded = self.app.borrow_mut().load_template(id).is_ok();
        if loaded {
            self.sync_editors();
            self.refresh();
        }
        report(ui::close_modals());
        self.flush_notice();
    }

    fn import_json(&self, json: &str) {
        let result = self.app.borrow_mut().import_json(json);
        match result {
            Ok(()) => {
                self.sync_editors();
                self.refresh();
                self.notify(NoticeKind::Success, "Project imported");
            }
            Err(e) => {
                log::warn!("import rejected: {}", e);
                self.notify(NoticeKind::Error, format!("Import failed: {}", e));
            }
        }
    }

    fn import_file(self: &Rc<Self>, input: &HtmlInputElement) -> Result<(), JsValue> {
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return Ok(());
        };

        let reader = web_sys::FileReader::new()?;
        let onload = Closure::once_into_js({
            let reader = reader.clone();
            let runtime = self.clone();
            move || {
                let text = reader
                    .result()
                    .ok()
                    .and_then(|value| value.as_string())
                    .unwrap_or_default();
                runtime.import_json(&text);
            }
        });
        reader.set_onload(Some(onload.unchecked_ref()));
        reader.read_as_text(&file)?;
        input.set_value("");
        Ok(())
    }

    /// Text goes to the clipboard, everything else is downloaded
    fn export(self: &Rc<Self>, format: ExportFormat) {
        report(ui::close_modals());
        let result = self.app.borrow().export(format, Utc::now());
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("{} export failed: {}", format, e);
                self.notify(NoticeKind::Error, format!("Export failed: {}", e));
                return;
            }
        };

        if format == ExportFormat::Text {
            let runtime = self.clone();
            let text = String::from_utf8_lossy(&bytes).into_owned();
            io::copy_text(&text, move |copied| {
                if copied {
                    runtime.notify(NoticeKind::Success, "Code copied to clipboard");
                } else {
                    runtime.notify(NoticeKind::Error, "Copy failed");
                }
            });
            return;
        }

        match io::download_bytes(format.file_name(), format.mime_type(), &bytes) {
            Ok(()) => self.notify(NoticeKind::Success, format!("Downloaded {}", format.file_name())),
            Err(e) => {
                log::error!("download of {} failed: {:?}", format.file_name(), e);
                self.notify(NoticeKind::Error, "Download failed");
            }
        }
    }

    fn open_share(&self) {
        let Some(page) = share::current_page() else {
            self.notify(NoticeKind::Error, "Page URL unavailable");
            return;
        };
        report(ui::set_share_url(&page));
        report(ui::open_modal("share-modal"));
    }

    fn share_to(&self, target: &str) {
        let Some(page) = share::current_page() else {
            return;
        };
        let links = ShareLinks::for_page(&page);
        let Some(url) = links.get(target) else {
            log::warn!("unknown share target '{}'", target);
            return;
        };
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.open_with_url_and_target(url, "_blank") {
                log::error!("failed to open share window: {:?}", e);
            }
        }
    }

    fn copy_share_url(self: &Rc<Self>) {
        let Some(page) = share::current_page() else {
            return;
        };
        let runtime = self.clone();
        io::copy_text(&page, move |copied| {
            if copied {
                runtime.notify(NoticeKind::Success, "URL copied");
            } else {
                runtime.notify(NoticeKind::Error, "Copy failed");
            }
        });
    }

    fn action(self: &Rc<Self>, action: &str) {
        match action {
            "run" => self.run(),
            "save" => self.save(),
            "format" => self.format(),
            "console" => {
                let mut app = self.app.borrow_mut();
                app.toggle_console();
                report(ui::render_console(&app.console));
            }
            "layout" => {
                self.app.borrow_mut().toggle_layout();
                self.save_preferences();
            }
            "share" => self.open_share(),
            "copy-share" => self.copy_share_url(),
            "import" => {
                if let Ok(input) = ui::element("import-file") {
                    if let Ok(input) = input.dyn_into::<HtmlElement>() {
                        input.click();
                    }
                }
            }
            other => log::warn!("unknown action '{}'", other),
        }
    }

    fn on_click(self: &Rc<Self>, event: &Event) {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let Ok(Some(control)) = target.closest(CLICK_TARGETS) else {
            return;
        };
        let data = |name: &str| control.get_attribute(&format!("data-{}", name));

        if let Some(action) = data("action") {
            self.action(&action);
        } else if let Some(tab) = data("tab") {
            if let Ok(language) = tab.parse::<Language>() {
                self.app.borrow_mut().switch_tab(language);
                report(ui::show_tab(language));
            }
        } else if let Some(id) = data("template") {
            self.load_template(&id);
        } else if let Some(format) = data("export") {
            match format.parse::<ExportFormat>() {
                Ok(format) => self.export(format),
                Err(e) => log::warn!("{}", e),
            }
        } else if let Some(viewport) = data("viewport") {
            if let Some(viewport) = ViewportMode::parse(&viewport) {
                self.app.borrow_mut().set_viewport(viewport);
                self.save_preferences();
            }
        } else if let Some(modal) = data("open") {
            report(ui::open_modal(&modal));
        } else if data("close").is_some() {
            report(ui::close_modals());
        } else if let Some(target) = data("share") {
            self.share_to(&target);
        }
    }

    fn on_change(self: &Rc<Self>, event: &Event) {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };

        if let Some(id) = target.get_attribute("data-library") {
            let enabled = self.app.borrow_mut().toggle_library(&id);
            self.save_preferences();
            self.refresh();
            let name = playground_core::Library::find(&id).map_or(id.as_str(), |lib| lib.name);
            self.notify(
                NoticeKind::Info,
                format!("{} {}", name, if enabled { "enabled" } else { "disabled" }),
            );
            return;
        }

        match target.id().as_str() {
            "dark-mode" => {
                self.app.borrow_mut().toggle_dark_mode();
                self.save_preferences();
            }
            "font-size" => {
                let Ok(select) = target.dyn_into::<HtmlSelectElement>() else {
                    return;
                };
                if let Some(size) = FontSize::parse(&select.value()) {
                    self.app.borrow_mut().set_font_size(size);
                    self.save_preferences();
                }
            }
            "import-file" => {
                if let Ok(input) = target.dyn_into::<HtmlInputElement>() {
                    report(self.import_file(&input));
                }
            }
            _ => {}
        }
    }

    fn on_key(&self, event: &KeyboardEvent) {
        if event.key() == "Escape" {
            report(ui::close_modals());
            return;
        }
        if !(event.ctrl_key() || event.meta_key()) {
            return;
        }

        let key = event.key();
        if event.shift_key() && key.eq_ignore_ascii_case("f") {
            event.prevent_default();
            self.format();
        } else if key == "s" {
            event.prevent_default();
            self.save();
        } else if key == "Enter" {
            event.prevent_default();
            self.run();
        }
    }
}

/// Register a handler for the lifetime of the page
fn listen<E: JsCast + 'static>(
    target: &EventTarget,
    kind: &str,
    mut handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Initialize the Playground web application
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);

    let runtime = Runtime::new();
    {
        let app = runtime.app.borrow();
        ui::sync_editors(app.buffers.iter().map(|e| (e.language, e.content.as_str())))?;
        ui::show_tab(app.active)?;
        ui::apply_settings(&app.settings)?;
        ui::render_libraries(&app.libraries)?;
        ui::show_console(app.console.is_visible())?;
    }

    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    for &language in Language::all() {
        let runtime = runtime.clone();
        let area: EventTarget = ui::editor(language)?.into();
        listen(&area, "input", move |_: Event| runtime.on_input(language))?;
    }

    listen(&window, "message", {
        let runtime = runtime.clone();
        move |event: MessageEvent| runtime.on_message(&event)
    })?;
    listen(&document, "click", {
        let runtime = runtime.clone();
        move |event: Event| runtime.on_click(&event)
    })?;
    listen(&document, "change", {
        let runtime = runtime.clone();
        move |event: Event| runtime.on_change(&event)
    })?;
    listen(&document, "keydown", {
        let runtime = runtime.clone();
        move |event: KeyboardEvent| runtime.on_key(&event)
    })?;

    runtime.refresh();
    log::info!("playground initialized, formatter: {}", runtime.formatter.name());

    Ok(())
}
