//! Owned `MutationObserver` handle.
//!
//! The observer and the closure backing its callback live and die together:
//! dropping a [`DomObserver`] disconnects it and frees the closure, so no
//! `Closure::forget` leaks are needed for observers with a bounded lifetime.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{MutationObserver, MutationObserverInit, MutationRecord, Node};

use crate::error::DomError;

/// Which mutations to watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub subtree: bool,
    pub character_data: bool,
}

impl ObserveOptions {
    /// Structural changes anywhere below the target.
    pub const TREE: ObserveOptions = ObserveOptions {
        child_list: true,
        subtree: true,
        character_data: false,
    };

    /// Structural and text changes anywhere below the target.
    pub const TREE_AND_TEXT: ObserveOptions = ObserveOptions {
        child_list: true,
        subtree: true,
        character_data: true,
    };

    fn to_init(self) -> MutationObserverInit {
        let init = MutationObserverInit::new();
        init.set_child_list(self.child_list);
        init.set_subtree(self.subtree);
        init.set_character_data(self.character_data);
        init
    }
}

type Callback = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;

pub struct DomObserver {
    observer: MutationObserver,
    _callback: Callback,
}

impl DomObserver {
    /// Create an observer that calls `on_batch` with each batch of records.
    pub fn new(mut on_batch: impl FnMut(&[MutationRecord]) + 'static) -> Result<Self, DomError> {
        let callback: Callback = Closure::wrap(Box::new(
            move |records: js_sys::Array, _observer: MutationObserver| {
                let records: Vec<MutationRecord> = records
                    .iter()
                    .filter_map(|record| record.dyn_into::<MutationRecord>().ok())
                    .collect();
                on_batch(&records);
            },
        )
            as Box<dyn FnMut(js_sys::Array, MutationObserver)>);
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    /// Start (or re-configure) observation of `target`.
    pub fn observe(&self, target: &Node, options: ObserveOptions) -> Result<(), DomError> {
        self.observer.observe_with_options(target, &options.to_init())?;
        Ok(())
    }
}

impl Drop for DomObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
