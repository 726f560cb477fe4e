//! Browser DOM layer for the formula dialog re-skin.
//!
//! This crate finds formula editor dialogs in a live page and patches them:
//! modal geometry, editor styling and a side-by-side documentation layout.
//! It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `locator`: lookups against the host page's structure
//! - `style`: fonts, theme colors and indent guides for one editor
//! - `layout`: wrapping and unwrapping of the target container
//! - `dialog`: per-dialog sequencing and teardown
//! - `watcher`: page-level session driven by a mutation observer
//!
//! # Re-exports
//!
//! This crate re-exports `formulary-core` for convenience, so consumers
//! only need to depend on `formulary-browser`.

// Re-export core crate
pub use formulary_core;
pub use formulary_core::*;

pub mod dialog;
pub mod dom;
pub mod error;
pub mod layout;
pub mod locator;
pub mod observer;
pub mod style;
pub mod watcher;

pub use dialog::DialogOrchestrator;
pub use error::DomError;
pub use layout::{LayoutEngine, LayoutOutcome};
pub use locator::Locator;
pub use observer::{DomObserver, ObserveOptions};
pub use style::StyleApplicator;
pub use watcher::Watcher;
