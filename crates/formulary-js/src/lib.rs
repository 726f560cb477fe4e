//! WASM content-script entry for the formula dialog re-skin.
//!
//! Loads the configuration from extension storage (or `localStorage` outside
//! the extension), starts the page watcher and keeps it in sync with storage
//! changes and settings messages.

mod chrome;
mod content;
mod store;
mod types;

pub use content::*;
pub use store::{BrowserStore, ChromeStore, LocalStore, STORAGE_KEY, Subscription};
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
    {
        use tracing::Level;
        use tracing::subscriber::set_global_default;
        use tracing_subscriber::Registry;
        use tracing_subscriber::layer::SubscriberExt;

        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        let wasm_layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(console_level)
                .build(),
        );

        let _ = set_global_default(Registry::default().with(wasm_layer));
    }
}
