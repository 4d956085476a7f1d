//! DOM rendering for the browser frontend
//!
//! Every function here looks its elements up by id in the page shell
//! (`index.html`). A missing element is a broken page, reported as `Err`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, HtmlIFrameElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

use playground_core::{
    ConsoleEntry, ConsoleRelay, Language, Library, LibrarySelection, Notice, NoticeKind, Settings,
    ViewportMode, SANDBOX_PERMISSIONS,
};

use crate::io;

const NOTICE_MS: i32 = 3000;
const REVOKE_MS: i32 = 1000;

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))
}

pub fn element(id: &str) -> Result<Element, JsValue> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element #{}", id)))
}

fn element_as<T: JsCast>(id: &str) -> Result<T, JsValue> {
    element(id)?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Unexpected element type for #{}", id)))
}

fn editor_id(language: Language) -> String {
    format!("editor-{}", language.storage_key())
}

pub fn editor(language: Language) -> Result<HtmlTextAreaElement, JsValue> {
    element_as(&editor_id(language))
}

/// Write every buffer into its textarea
pub fn sync_editors<'a>(
    contents: impl IntoIterator<Item = (Language, &'a str)>,
) -> Result<(), JsValue> {
    for (language, text) in contents {
        let area = editor(language)?;
        if area.value() != text {
            area.set_value(text);
        }
    }
    Ok(())
}

pub fn show_tab(active: Language) -> Result<(), JsValue> {
    for &language in Language::all() {
        let selected = language == active;
        editor(language)?
            .class_list()
            .toggle_with_force("active", selected)?;
        element(&format!("tab-{}", language.storage_key()))?
            .class_list()
            .toggle_with_force("active", selected)?;
    }
    if let Ok(area) = editor(active) {
        let _ = area.focus();
    }
    Ok(())
}

/// Replace the whole sandbox with a freshly composed document
pub fn load_preview(html: &str) -> Result<(), JsValue> {
    let frame: HtmlIFrameElement = element_as("preview")?;
    frame.set_attribute("sandbox", SANDBOX_PERMISSIONS)?;

    let url = io::document_url(html)?;
    frame.set_src(&url);

    let window = web_sys::window().ok_or("No window")?;
    let revoke = Closure::once_into_js(move || {
        let _ = web_sys::Url::revoke_object_url(&url);
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(revoke.unchecked_ref(), REVOKE_MS)?;
    Ok(())
}

pub fn apply_settings(settings: &Settings) -> Result<(), JsValue> {
    let body = document()?.body().ok_or("No body")?;
    body.class_list()
        .toggle_with_force("dark-mode", settings.dark_mode)?;

    let font = format!("font-size: {}px", settings.font_size.px());
    for &language in Language::all() {
        editor(language)?.set_attribute("style", &font)?;
    }

    element("workspace")?
        .class_list()
        .toggle_with_force("vertical", settings.layout == playground_core::LayoutMode::Vertical)?;

    element_as::<HtmlElement>("preview")?
        .style()
        .set_property("width", settings.viewport.frame_width())?;
    for &mode in ViewportMode::all() {
        element(&format!("viewport-{}", mode.as_str()))?
            .class_list()
            .toggle_with_force("active", mode == settings.viewport)?;
    }

    element_as::<HtmlInputElement>("dark-mode")?.set_checked(settings.dark_mode);
    element_as::<HtmlSelectElement>("font-size")?.set_value(settings.font_size.as_str());
    Ok(())
}

/// Build the library checkboxes once, from the catalog
pub fn render_libraries(selection: &LibrarySelection) -> Result<(), JsValue> {
    let document = document()?;
    let container = element("libraries")?;
    container.set_inner_html("");

    for library in Library::catalog() {
        let label = document.create_element("label")?;
        label.set_class_name("library-option");

        let checkbox: HtmlInputElement = document.create_element("input")?.dyn_into()?;
        checkbox.set_type("checkbox");
        checkbox.set_checked(selection.is_enabled(library.id));
        checkbox.set_attribute("data-library", library.id)?;

        let name = document.create_element("span")?;
        name.set_text_content(Some(library.name));

        label.append_child(&checkbox)?;
        label.append_child(&name)?;
        container.append_child(&label)?;
    }
    Ok(())
}

pub fn show_console(visible: bool) -> Result<(), JsValue> {
    element("console")?
        .class_list()
        .toggle_with_force("visible", visible)?;
    Ok(())
}

pub fn clear_console() -> Result<(), JsValue> {
    element("console-lines")?.set_inner_html("");
    Ok(())
}

pub fn append_console(entry: &ConsoleEntry) -> Result<(), JsValue> {
    let line = document()?.create_element("div")?;
    line.set_class_name(&format!("console-line console-{}", entry.level.as_str()));
    line.set_text_content(Some(&entry.render()));

    let lines = element("console-lines")?;
    lines.append_child(&line)?;
    lines.set_scroll_top(lines.scroll_height());
    Ok(())
}

/// Re-render the panel from the relay, after a toggle
pub fn render_console(relay: &ConsoleRelay) -> Result<(), JsValue> {
    clear_console()?;
    for entry in relay.entries() {
        append_console(entry)?;
    }
    show_console(relay.is_visible())
}

/// Show a toast that hides itself
pub fn show_notice(notice: &Notice) -> Result<(), JsValue> {
    let kind = match notice.kind {
        NoticeKind::Success => "success",
        NoticeKind::Error => "error",
        NoticeKind::Info => "info",
    };

    let toast = element("notice")?;
    toast.set_text_content(Some(&notice.text));
    toast.set_class_name(&format!("toast toast-{} show", kind));

    let window = web_sys::window().ok_or("No window")?;
    let hide = Closure::once_into_js(move || {
        let _ = toast.class_list().remove_1("show");
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(hide.unchecked_ref(), NOTICE_MS)?;
    Ok(())
}

pub fn open_modal(id: &str) -> Result<(), JsValue> {
    element(id)?.class_list().add_1("open")
}

pub fn close_modals() -> Result<(), JsValue> {
    let open = document()?.query_selector_all(".modal.open")?;
    for i in 0..open.length() {
        if let Some(modal) = open.item(i).and_then(|node| node.dyn_into::<Element>().ok()) {
            modal.class_list().remove_1("open")?;
        }
    }
    Ok(())
}

pub fn set_share_url(url: &str) -> Result<(), JsValue> {
    element_as::<HtmlInputElement>("share-url")?.set_value(url);
    Ok(())
}
