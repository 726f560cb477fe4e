//! Page-level session: finds dialogs as the host renders them and re-drives
//! them on configuration changes.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use formulary_core::{Config, HostContract};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::dialog::DialogOrchestrator;
use crate::locator::Locator;
use crate::observer::{DomObserver, ObserveOptions};

struct WatcherState {
    document: Document,
    config: Config,
    orchestrator: DialogOrchestrator,
    /// Dialogs already handed to the orchestrator. Weakly held, so entries
    /// vanish with the host's elements.
    processed: js_sys::WeakSet,
    observer: Option<DomObserver>,
}

impl WatcherState {
    fn is_processed(&self, dialog: &Element) -> bool {
        self.processed.has(dialog.unchecked_ref::<js_sys::Object>())
    }

    fn mark_processed(&self, dialog: &Element) {
        self.processed.add(dialog.unchecked_ref::<js_sys::Object>());
    }

    fn process_all(&mut self) -> usize {
        let dialogs = self.orchestrator.locator().find_dialogs(&self.document);
        let mut processed = 0;
        for dialog in &dialogs {
            if self.is_processed(dialog) {
                continue;
            }
            // Not marked: the host may still be rendering it.
            if self.orchestrator.locator().find_editor_region(dialog).is_none() {
                tracing::trace!("dialog has no editor yet");
                continue;
            }
            self.mark_processed(dialog);
            self.orchestrator.process_dialog(dialog, &self.config);
            processed += 1;
        }
        if processed > 0 {
            tracing::debug!(dialogs = dialogs.len(), processed, "scan");
        }
        processed
    }

    fn reset_all(&mut self) {
        for dialog in self.orchestrator.locator().find_dialogs(&self.document) {
            self.orchestrator.reset_dialog(&dialog);
        }
        self.processed = js_sys::WeakSet::new();
    }
}

/// Handle to a watcher session. Clones share the same session.
#[derive(Clone)]
pub struct Watcher {
    state: Rc<RefCell<WatcherState>>,
}

impl Watcher {
    pub fn new(document: Document, host: HostContract, config: Config) -> Self {
        let state = WatcherState {
            document,
            config,
            orchestrator: DialogOrchestrator::new(Locator::new(host)),
            processed: js_sys::WeakSet::new(),
            observer: None,
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Process every dialog already on the page, then rescan on every batch of
    /// mutations below `<body>`.
    pub fn start(&self) {
        self.process_all();

        let weak: Weak<RefCell<WatcherState>> = Rc::downgrade(&self.state);
        let observer = DomObserver::new(move |_records| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            // A batch delivered while we are mid-scan is our own mutations.
            let Ok(mut state) = state.try_borrow_mut() else {
                return;
            };
            state.process_all();
        });
        let observer = match observer {
            Ok(observer) => observer,
            Err(err) => {
                tracing::warn!(error = %err, "could not create page observer");
                return;
            }
        };

        let mut state = self.state.borrow_mut();
        let Some(body) = state.document.body() else {
            tracing::warn!("document has no body to observe");
            return;
        };
        if let Err(err) = observer.observe(&body, ObserveOptions::TREE) {
            tracing::warn!(error = %err, "could not observe page");
            return;
        }
        state.observer = Some(observer);
        tracing::debug!("watcher started");
    }

    /// Scan for dialogs not yet processed. Returns how many were processed.
    pub fn process_all(&self) -> usize {
        self.state.borrow_mut().process_all()
    }

    /// Revert every dialog, forget what was processed, then process everything
    /// again under `config`.
    pub fn update_config(&self, config: Config) {
        let mut state = self.state.borrow_mut();
        state.config = config;
        state.reset_all();
        let processed = state.process_all();
        tracing::debug!(processed, "configuration applied");
    }

    /// Disconnect the page observer. Patched dialogs are left as they are.
    pub fn stop(&self) {
        if self.state.borrow_mut().observer.take().is_some() {
            tracing::debug!("watcher stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().observer.is_some()
    }

    pub fn config(&self) -> Config {
        self.state.borrow().config.clone()
    }

    /// Whether `dialog` is in the processed-set.
    pub fn is_processed(&self, dialog: &Element) -> bool {
        self.state.borrow().is_processed(dialog)
    }
}
