//! Browser-side configuration backends.

use formulary_core::{Config, ConfigPatch, ConfigStore, StoreError, resolve_stored};
use gloo_events::EventListener;
use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use js_sys::{Object, Reflect};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::chrome::{self, Listener, StorageArea};

/// Key the configuration is stored under, in either backend.
pub const STORAGE_KEY: &str = "formularyConfig";

fn backend_error(err: JsValue) -> StoreError {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    StoreError::Backend(message)
}

fn patch_from_js(value: JsValue) -> Result<Option<ConfigPatch>, StoreError> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| StoreError::Backend(format!("stored configuration unreadable: {}", e)))
}

/// `chrome.storage.sync`, shared across the user's browsers.
pub struct ChromeStore {
    area: StorageArea,
}

impl ChromeStore {
    pub fn new(area: StorageArea) -> Self {
        Self { area }
    }

    /// Call `on_change` whenever another surface writes the configuration.
    pub fn subscribe(&self, mut on_change: impl FnMut(Config) + 'static) -> Option<Subscription> {
        let event = chrome::storage_changed()?;
        let closure = Closure::wrap(Box::new(move |changes: JsValue, area: JsValue| {
            if area.as_string().as_deref() != Some("sync") {
                return;
            }
            let Ok(change) = Reflect::get(&changes, &JsValue::from_str(STORAGE_KEY)) else {
                return;
            };
            if change.is_undefined() {
                return;
            }
            let new_value = Reflect::get(&change, &JsValue::from_str("newValue"))
                .unwrap_or(JsValue::UNDEFINED);
            let config = match patch_from_js(new_value) {
                Ok(Some(patch)) => resolve_stored(&patch),
                Ok(None) => Config::default(),
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring storage change");
                    return;
                }
            };
            tracing::debug!("configuration changed in storage");
            on_change(config);
        }) as Box<dyn FnMut(JsValue, JsValue)>);
        Some(Subscription::Chrome(Listener::attach(event, closure)))
    }
}

impl ConfigStore for ChromeStore {
    async fn load(&self) -> Result<Option<ConfigPatch>, StoreError> {
        let promise = self.area.get(STORAGE_KEY).map_err(backend_error)?;
        let items = JsFuture::from(promise).await.map_err(backend_error)?;
        let value = Reflect::get(&items, &JsValue::from_str(STORAGE_KEY)).map_err(backend_error)?;
        patch_from_js(value)
    }

    async fn save(&self, config: &Config) -> Result<(), StoreError> {
        let value = config
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let items = Object::new();
        Reflect::set(&items, &JsValue::from_str(STORAGE_KEY), &value).map_err(backend_error)?;
        let promise = self.area.set(&items).map_err(backend_error)?;
        JsFuture::from(promise).await.map_err(backend_error)?;
        Ok(())
    }
}

/// `localStorage` of the host page, for running outside the extension runtime.
#[derive(Default)]
pub struct LocalStore;

impl LocalStore {
    /// Call `on_change` when another tab writes the configuration.
    pub fn subscribe(&self, mut on_change: impl FnMut(Config) + 'static) -> Option<Subscription> {
        let window = web_sys::window()?;
        let listener = EventListener::new(&window, "storage", move |event| {
            let Some(event) = event.dyn_ref::<web_sys::StorageEvent>() else {
                return;
            };
            if event.key().as_deref() != Some(STORAGE_KEY) {
                return;
            }
            let config = match event.new_value() {
                None => Config::default(),
                Some(json) => match ConfigPatch::from_json(&json) {
                    Ok(patch) => resolve_stored(&patch),
                    Err(err) => {
                        tracing::warn!(error = %err, "ignoring storage change");
                        return;
                    }
                },
            };
            on_change(config);
        });
        Some(Subscription::Local(listener))
    }
}

impl ConfigStore for LocalStore {
    async fn load(&self) -> Result<Option<ConfigPatch>, StoreError> {
        match LocalStorage::get::<ConfigPatch>(STORAGE_KEY) {
            Ok(patch) => Ok(Some(patch)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(err) => Err(StoreError::Backend(err.to_string())),
        }
    }

    async fn save(&self, config: &Config) -> Result<(), StoreError> {
        LocalStorage::set(STORAGE_KEY, config).map_err(|e| StoreError::Backend(e.to_string()))
    }
}

/// Whichever backend the page offers.
pub enum BrowserStore {
    Chrome(ChromeStore),
    Local(LocalStore),
}

impl BrowserStore {
    /// Prefer extension storage, fall back to `localStorage`.
    pub fn detect() -> Self {
        match chrome::sync_storage() {
            Some(area) => BrowserStore::Chrome(ChromeStore::new(area)),
            None => BrowserStore::Local(LocalStore),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BrowserStore::Chrome(_) => "chrome.storage.sync",
            BrowserStore::Local(_) => "localStorage",
        }
    }

    pub fn subscribe(&self, on_change: impl FnMut(Config) + 'static) -> Option<Subscription> {
        match self {
            BrowserStore::Chrome(store) => store.subscribe(on_change),
            BrowserStore::Local(store) => store.subscribe(on_change),
        }
    }
}

impl ConfigStore for BrowserStore {
    async fn load(&self) -> Result<Option<ConfigPatch>, StoreError> {
        match self {
            BrowserStore::Chrome(store) => store.load().await,
            BrowserStore::Local(store) => store.load().await,
        }
    }

    async fn save(&self, config: &Config) -> Result<(), StoreError> {
        match self {
            BrowserStore::Chrome(store) => store.save(config).await,
            BrowserStore::Local(store) => store.save(config).await,
        }
    }
}

/// A live change subscription. Dropping it unsubscribes.
pub enum Subscription {
    Chrome(Listener<dyn FnMut(JsValue, JsValue)>),
    Local(EventListener),
}
