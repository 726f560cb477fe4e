//! Error type for DOM operations.

use wasm_bindgen::{JsCast, JsValue};

#[derive(thiserror::Error, Debug)]
pub enum DomError {
    /// The host page does not have the expected structure.
    #[error("structure not found: {0}")]
    StructuralMiss(&'static str),

    /// A DOM call threw.
    #[error("DOM operation failed: {0}")]
    Js(String),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        if let Some(err) = value.dyn_ref::<js_sys::Error>() {
            return DomError::Js(String::from(err.message()));
        }
        match value.as_string() {
            Some(s) => DomError::Js(s),
            None => DomError::Js(format!("{:?}", value)),
        }
    }
}
