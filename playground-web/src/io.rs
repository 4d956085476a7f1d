//! Browser-side storage, downloads and clipboard using Web APIs

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, HtmlAnchorElement, HtmlDocument, HtmlTextAreaElement, Storage, Url};

use playground_core::{KeyValueStore, PlaygroundError, PlaygroundResult};

/// `window.localStorage` as a key-value store
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    /// Open localStorage. Private browsing modes may deny it; the store then
    /// reads nothing and every write fails.
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable, nothing will be saved");
        }
        Self { storage }
    }
}

fn describe(value: JsValue) -> String {
    value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{:?}", value))
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> PlaygroundResult<Option<String>> {
        let Some(storage) = &self.storage else {
            return Ok(None);
        };
        storage
            .get_item(key)
            .map_err(|e| PlaygroundError::storage(key, describe(e)))
    }

    fn set(&mut self, key: &str, value: &str) -> PlaygroundResult<()> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| PlaygroundError::storage(key, "localStorage unavailable"))?;
        // QuotaExceededError surfaces here
        storage
            .set_item(key, value)
            .map_err(|e| PlaygroundError::storage(key, describe(e)))
    }
}

/// Download bytes as a file
pub fn download_bytes(filename: &str, mime_type: &str, bytes: &[u8]) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    let blob_parts = js_sys::Array::new();
    blob_parts.push(&js_sys::Uint8Array::from(bytes));

    let blob_options = web_sys::BlobPropertyBag::new();
    blob_options.set_type(mime_type);

    let blob = Blob::new_with_u8_array_sequence_and_options(&blob_parts, &blob_options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    // Create a temporary anchor element and trigger download
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    Url::revoke_object_url(&url)?;

    Ok(())
}

/// Object URL for a composed preview document
pub fn document_url(html: &str) -> Result<String, JsValue> {
    let blob_parts = js_sys::Array::new();
    blob_parts.push(&JsValue::from_str(html));

    let blob_options = web_sys::BlobPropertyBag::new();
    blob_options.set_type("text/html");

    let blob = Blob::new_with_str_sequence_and_options(&blob_parts, &blob_options)?;
    Url::create_object_url_with_blob(&blob)
}

/// Copy through a hidden textarea and `execCommand("copy")`
fn copy_with_exec_command(text: &str) -> Result<bool, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let body = document.body().ok_or("No body")?;

    let area: HtmlTextAreaElement = document.create_element("textarea")?.dyn_into()?;
    area.set_value(text);
    area.set_attribute("readonly", "")?;
    area.set_attribute("style", "position: fixed; left: -9999px")?;
    body.append_child(&area)?;
    area.select();

    let copied = document
        .dyn_into::<HtmlDocument>()
        .map_err(|_| JsValue::from_str("Not an HTML document"))?
        .exec_command("copy");
    body.remove_child(&area)?;
    copied
}

/// Copy text to the clipboard. `done` runs exactly once with the outcome.
///
/// The asynchronous clipboard API is tried first; when it is missing
/// (insecure context) or rejects, the `execCommand` path is used.
pub fn copy_text(text: &str, done: impl FnOnce(bool) + 'static) {
    let fallback = {
        let text = text.to_string();
        move || match copy_with_exec_command(&text) {
            Ok(copied) => copied,
            Err(e) => {
                log::warn!("clipboard fallback failed: {}", describe(e));
                false
            }
        }
    };

    let Some(window) = web_sys::window() else {
        done(false);
        return;
    };
    let navigator = window.navigator();
    let has_clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
        .map(|value| !value.is_undefined() && !value.is_null())
        .unwrap_or(false);

    if !has_clipboard {
        done(fallback());
        return;
    }

    // Both callbacks share the single completion handler
    let done = Rc::new(RefCell::new(Some(done)));
    let finish = {
        let done = done.clone();
        move |copied: bool| {
            if let Some(done) = done.borrow_mut().take() {
                done(copied);
            }
        }
    };

    let on_ok = {
        let finish = finish.clone();
        Closure::once(move |_: JsValue| finish(true))
    };
    let on_err = Closure::once(move |e: JsValue| {
        log::warn!("clipboard write rejected: {}", describe(e));
        finish(fallback());
    });

    let _ = navigator
        .clipboard()
        .write_text(text)
        .then2(&on_ok, &on_err);

    on_ok.forget();
    on_err.forget();
}
