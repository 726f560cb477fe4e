//! Minimal bindings for the extension APIs the content script uses.
//!
//! Nothing here assumes the extension runtime exists: each accessor walks the
//! global object and returns `None` when the path is missing, so the same
//! build also runs as a plain page script.

use js_sys::{Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// A `chrome.storage` area such as `chrome.storage.sync`.
    pub type StorageArea;

    #[wasm_bindgen(method, catch)]
    pub fn get(this: &StorageArea, keys: &str) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub fn set(this: &StorageArea, items: &JsValue) -> Result<Promise, JsValue>;

    /// An extension event such as `chrome.runtime.onMessage`.
    pub type ChromeEvent;

    #[wasm_bindgen(method, js_name = addListener)]
    pub fn add_listener(this: &ChromeEvent, callback: &js_sys::Function);

    #[wasm_bindgen(method, js_name = removeListener)]
    pub fn remove_listener(this: &ChromeEvent, callback: &js_sys::Function);
}

fn lookup(path: &[&str]) -> Option<JsValue> {
    let mut current: JsValue = js_sys::global().into();
    for key in path {
        current = Reflect::get(&current, &JsValue::from_str(key)).ok()?;
        if current.is_undefined() || current.is_null() {
            return None;
        }
    }
    Some(current)
}

pub fn sync_storage() -> Option<StorageArea> {
    lookup(&["chrome", "storage", "sync"]).map(JsCast::unchecked_into)
}

pub fn storage_changed() -> Option<ChromeEvent> {
    lookup(&["chrome", "storage", "onChanged"]).map(JsCast::unchecked_into)
}

pub fn runtime_message() -> Option<ChromeEvent> {
    lookup(&["chrome", "runtime", "onMessage"]).map(JsCast::unchecked_into)
}

/// A closure registered on a [`ChromeEvent`], removed again on drop.
pub struct Listener<F: ?Sized> {
    event: ChromeEvent,
    closure: Closure<F>,
}

impl<F: ?Sized> Listener<F> {
    pub fn attach(event: ChromeEvent, closure: Closure<F>) -> Self {
        event.add_listener(closure.as_ref().unchecked_ref());
        Self { event, closure }
    }
}

impl<F: ?Sized> Drop for Listener<F> {
    fn drop(&mut self) {
        self.event
            .remove_listener(self.closure.as_ref().unchecked_ref());
    }
}
