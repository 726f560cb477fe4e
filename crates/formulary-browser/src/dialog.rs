//! Per-dialog orchestration: sizing, styling and layout for one dialog, and
//! full teardown.

use formulary_core::Config;
use formulary_core::geometry::{
    BACKDROP_MARKER_ATTR, BACKDROP_STYLE_PROPERTIES, MODAL_STYLE_PROPERTIES,
    backdrop_declarations, modal_declarations,
};
use formulary_core::layout::LAYOUT_MARKER_ATTR;
use web_sys::Element;

use crate::dom::{clear_properties, set_attribute_if_changed, set_declarations};
use crate::error::DomError;
use crate::layout::{LayoutEngine, LayoutOutcome};
use crate::locator::Locator;
use crate::style::StyleApplicator;

pub struct DialogOrchestrator {
    locator: Locator,
    styles: StyleApplicator,
    layout: LayoutEngine,
}

impl DialogOrchestrator {
    pub fn new(locator: Locator) -> Self {
        Self {
            styles: StyleApplicator::new(locator.clone()),
            layout: LayoutEngine::new(locator.clone()),
            locator,
        }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn styles(&self) -> &StyleApplicator {
        &self.styles
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Size, style and lay out one dialog.
    ///
    /// Sizing and styling are reapplied on every call. The layout step is the
    /// one structural mutation, so it runs at most once per target container
    /// until [`reset_dialog`](Self::reset_dialog) clears the marker.
    pub fn process_dialog(&mut self, dialog: &Element, config: &Config) {
        let Some(container) = self.locator.find_target_container(dialog) else {
            tracing::trace!("dialog has no target container, skipping");
            return;
        };

        apply_geometry(dialog, config);

        let editor = self.locator.find_editor_region(dialog);
        if let (Some(editor), Some(document)) = (&editor, dialog.owner_document()) {
            self.styles.apply_styles(&document, editor, config);
        }

        if container.has_attribute(LAYOUT_MARKER_ATTR) {
            tracing::trace!("layout already applied");
            return;
        }
        match self
            .layout
            .apply(&container, editor.as_ref(), &config.doc_layout())
        {
            Ok(LayoutOutcome::Skipped) => {}
            Ok(outcome) => {
                set_attribute_if_changed(&container, LAYOUT_MARKER_ATTR, "");
                tracing::debug!(?outcome, "layout applied");
            }
            Err(err) => tracing::warn!(error = %err, "layout failed"),
        }
    }

    /// Undo everything [`process_dialog`](Self::process_dialog) did. Never fails;
    /// a dialog the host already tore apart is logged and left alone.
    pub fn reset_dialog(&mut self, dialog: &Element) {
        match self.try_reset_dialog(dialog) {
            Ok(()) => {}
            Err(DomError::StructuralMiss(what)) => {
                tracing::trace!(missing = what, "dialog lost its structure before reset");
            }
            Err(err) => tracing::warn!(error = %err, "dialog teardown failed"),
        }
    }

    fn try_reset_dialog(&mut self, dialog: &Element) -> Result<(), DomError> {
        let container = self.locator.find_target_container(dialog);
        if let Some(container) = &container {
            container.remove_attribute(LAYOUT_MARKER_ATTR)?;
        }

        clear_geometry(dialog)?;

        let container = container.ok_or(DomError::StructuralMiss("target container"))?;
        let editor = self.locator.find_editor_region(dialog);
        self.layout.reset(&container, editor.as_ref())
    }
}

/// The overlay behind the dialog: its parent element, unless the host mounts
/// the dialog straight into the page root.
fn backdrop_of(dialog: &Element) -> Option<Element> {
    dialog.parent_element().filter(|parent| {
        let tag = parent.tag_name();
        !tag.eq_ignore_ascii_case("body") && !tag.eq_ignore_ascii_case("html")
    })
}

fn apply_geometry(dialog: &Element, config: &Config) {
    set_declarations(dialog, &modal_declarations(config), true);

    let Some(backdrop) = backdrop_of(dialog) else {
        return;
    };
    let declarations = backdrop_declarations(config);
    if declarations.is_empty() {
        if let Err(err) = clear_backdrop(&backdrop) {
            tracing::trace!(error = %err, "could not clear backdrop");
        }
    } else {
        set_declarations(&backdrop, &declarations, true);
        set_attribute_if_changed(&backdrop, BACKDROP_MARKER_ATTR, "");
    }
}

fn clear_backdrop(backdrop: &Element) -> Result<(), DomError> {
    if backdrop.has_attribute(BACKDROP_MARKER_ATTR) {
        clear_properties(backdrop, &BACKDROP_STYLE_PROPERTIES);
        backdrop.remove_attribute(BACKDROP_MARKER_ATTR)?;
    }
    Ok(())
}

fn clear_geometry(dialog: &Element) -> Result<(), DomError> {
    clear_properties(dialog, &MODAL_STYLE_PROPERTIES);
    match backdrop_of(dialog) {
        Some(backdrop) => clear_backdrop(&backdrop),
        None => Ok(()),
    }
}
