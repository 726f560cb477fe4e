//! The content-script session exported to JavaScript.

use std::future::Future;
use std::rc::Rc;

use formulary_browser::{Config, ConfigPatch, ConfigService, HostContract, StoreError, Watcher};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::chrome::{self, Listener};
use crate::store::{BrowserStore, Subscription};
use crate::types::{Ack, ContentMessage};

type MessageCallback = dyn FnMut(JsValue, JsValue, js_sys::Function) -> JsValue;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_js(value).map_err(JsValue::from)
}

/// Running content script: the page watcher plus its configuration sources.
#[wasm_bindgen]
pub struct ContentScript {
    watcher: Watcher,
    service: Rc<ConfigService<BrowserStore>>,
    store_changes: Option<Subscription>,
    messages: Option<Listener<MessageCallback>>,
}

/// Load the configuration, start watching the page and listen for changes.
#[wasm_bindgen(js_name = startContentScript)]
pub async fn start_content_script() -> Result<ContentScript, JsError> {
    let store = BrowserStore::detect();
    tracing::debug!(backend = store.name(), "using config store");
    let service = Rc::new(ConfigService::new(store));

    let config = match service.get().await {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "could not load configuration, using defaults");
            Config::default()
        }
    };

    let watcher = Watcher::new(gloo_utils::document(), HostContract::default(), config);
    watcher.start();

    let store_changes = {
        let watcher = watcher.clone();
        service
            .store()
            .subscribe(move |config| watcher.update_config(config))
    };
    let messages = listen_for_messages(watcher.clone());

    tracing::info!("formulary content script started");
    Ok(ContentScript {
        watcher,
        service,
        store_changes,
        messages,
    })
}

fn listen_for_messages(watcher: Watcher) -> Option<Listener<MessageCallback>> {
    let event = chrome::runtime_message()?;
    let closure = Closure::wrap(Box::new(
        move |message: JsValue, _sender: JsValue, send_response: js_sys::Function| {
            // Messages meant for other listeners are not ours to answer.
            let Ok(message) = serde_wasm_bindgen::from_value::<ContentMessage>(message) else {
                return JsValue::FALSE;
            };
            let ack = respond(&watcher, &message);
            if let Ok(response) = to_js(&ack) {
                if let Err(err) = send_response.call1(&JsValue::NULL, &response) {
                    tracing::trace!(?err, "message sender went away");
                }
            }
            JsValue::FALSE
        },
    ) as Box<MessageCallback>);
    Some(Listener::attach(event, closure))
}

fn respond(watcher: &Watcher, message: &ContentMessage) -> Ack {
    match message.resolve() {
        Ok(Some(config)) => {
            watcher.update_config(config);
            Ack::ok()
        }
        Ok(None) => Ack::ok(),
        Err(err) => {
            tracing::warn!(error = %err, "rejected configuration message");
            Ack::rejected(err)
        }
    }
}

/// Await a store write, then show the saved configuration on the page.
/// Storage change events do not reach the tab that wrote the value.
fn persist_and_apply(
    watcher: Watcher,
    saving: impl Future<Output = Result<Config, StoreError>> + 'static,
) -> js_sys::Promise {
    future_to_promise(async move {
        let saved = saving
            .await
            .map_err(|e| JsValue::from(JsError::new(&e.to_string())))?;
        watcher.update_config(saved.clone());
        to_js_value(&saved)
    })
}

#[wasm_bindgen]
impl ContentScript {
    /// Apply a configuration to the page without persisting it.
    #[wasm_bindgen(js_name = updateConfig)]
    pub fn update_config(&self, config: JsValue) -> Result<(), JsError> {
        let patch: ConfigPatch = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
        let config = Config::default()
            .try_merged(&patch)
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.watcher.update_config(config);
        Ok(())
    }

    /// Current configuration as a plain object.
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> Result<JsValue, JsError> {
        to_js(&self.watcher.config())
    }

    /// Answer a settings message the way the runtime listener does.
    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&self, message: JsValue) -> Result<Ack, JsError> {
        let message: ContentMessage = serde_wasm_bindgen::from_value(message)
            .map_err(|e| JsError::new(&format!("Invalid message: {}", e)))?;
        Ok(respond(&self.watcher, &message))
    }

    /// Merge `patch` into the stored configuration, persist it and apply it
    /// to the page. Resolves to the saved configuration.
    #[wasm_bindgen(js_name = saveConfig)]
    pub fn save_config(&self, patch: JsValue) -> Result<js_sys::Promise, JsError> {
        let patch: ConfigPatch = serde_wasm_bindgen::from_value(patch)
            .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
        let service = self.service.clone();
        Ok(persist_and_apply(self.watcher.clone(), async move {
            service.update(&patch).await
        }))
    }

    /// Persist a built-in preset (`default`, `medium`, `fullscreen`) and
    /// apply it to the page.
    #[wasm_bindgen(js_name = applyPreset)]
    pub fn apply_preset(&self, name: String) -> js_sys::Promise {
        let service = self.service.clone();
        persist_and_apply(self.watcher.clone(), async move {
            service.apply_preset(&name).await
        })
    }

    /// Stop watching the page and drop every listener. Patched dialogs stay
    /// as they are.
    pub fn stop(&mut self) {
        self.watcher.stop();
        self.store_changes = None;
        self.messages = None;
        tracing::info!("formulary content script stopped");
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.watcher.is_running()
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::store::STORAGE_KEY;
    use gloo_storage::{LocalStorage, Storage};
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn js(value: &impl Serialize) -> JsValue {
        value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .unwrap()
    }

    async fn started() -> ContentScript {
        LocalStorage::delete(STORAGE_KEY);
        let Ok(script) = start_content_script().await else {
            panic!("content script did not start");
        };
        script
    }

    #[wasm_bindgen_test]
    async fn save_config_applies_to_page() {
        let mut script = started().await;
        let patch = ConfigPatch {
            editor_font_size: Some(20.0),
            ..Default::default()
        };
        let Ok(promise) = script.save_config(js(&patch)) else {
            panic!("patch rejected");
        };
        JsFuture::from(promise).await.unwrap();

        assert_eq!(script.watcher.config().editor_font_size, 20.0);
        let stored: ConfigPatch = LocalStorage::get(STORAGE_KEY).unwrap();
        assert_eq!(stored.editor_font_size, Some(20.0));

        script.stop();
        LocalStorage::delete(STORAGE_KEY);
    }

    #[wasm_bindgen_test]
    async fn apply_preset_applies_to_page() {
        let mut script = started().await;
        JsFuture::from(script.apply_preset("medium".into()))
            .await
            .unwrap();

        let config = script.watcher.config();
        assert_eq!(config.modal_width, 80.0);
        assert_eq!(config.modal_height, 80.0);

        script.stop();
        LocalStorage::delete(STORAGE_KEY);
    }

    #[wasm_bindgen_test]
    async fn handle_message_answers_with_ack() {
        let mut script = started().await;
        let update = serde_json::json!({
            "type": "CONFIG_UPDATE",
            "config": { "editorFontSize": 18 }
        });
        let Ok(ack) = script.handle_message(js(&update)) else {
            panic!("message did not decode");
        };
        assert_eq!(ack, Ack::ok());
        assert_eq!(script.watcher.config().editor_font_size, 18.0);

        let rejected = serde_json::json!({
            "type": "CONFIG_UPDATE",
            "config": { "editorFontSize": 40 }
        });
        let Ok(ack) = script.handle_message(js(&rejected)) else {
            panic!("message did not decode");
        };
        assert!(!ack.ok);
        assert_eq!(script.watcher.config().editor_font_size, 18.0);

        script.stop();
    }
}
