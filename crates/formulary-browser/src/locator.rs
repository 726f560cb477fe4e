//! Element lookups against the host page.
//!
//! Every lookup returns `None` (or an empty list) when the expected structure
//! is missing. The host page re-renders these dialogs whenever it likes, so
//! absence is the normal case and never an error.

use formulary_core::HostContract;
use web_sys::{Document, Element};

use crate::dom::{contains, element_children, elements, query_all};

#[derive(Debug, Clone, Default)]
pub struct Locator {
    host: HostContract,
}

impl Locator {
    pub fn new(host: HostContract) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &HostContract {
        &self.host
    }

    /// Snapshot of every dialog currently in the document.
    pub fn find_dialogs(&self, document: &Document) -> Vec<Element> {
        match document.query_selector_all(&self.host.dialog) {
            Ok(list) => elements(&list),
            Err(_) => Vec::new(),
        }
    }

    /// The formula editor region inside a dialog.
    pub fn find_editor_region(&self, dialog: &Element) -> Option<Element> {
        dialog.query_selector(&self.host.editor).ok().flatten()
    }

    /// The container whose children the layout engine rearranges.
    ///
    /// Tries the structural selector first and falls back to walking the same
    /// path by hand when the selector engine rejects it or finds nothing.
    pub fn find_target_container(&self, dialog: &Element) -> Option<Element> {
        match dialog.query_selector(&self.host.target_path) {
            Ok(Some(found)) => Some(found),
            Ok(None) => self.walk_to_target(dialog),
            Err(err) => {
                tracing::trace!(?err, "structural query threw, walking manually");
                self.walk_to_target(dialog)
            }
        }
    }

    /// Manual form of the structural path: first inner div, then the child at
    /// `target_branch_index`, then its last element child, then that node's
    /// last element child.
    pub fn walk_to_target(&self, dialog: &Element) -> Option<Element> {
        let inner = element_children(dialog)
            .into_iter()
            .find(|child| child.tag_name().eq_ignore_ascii_case("div"))?;
        let branch = inner.children().item(self.host.target_branch_index)?;
        let last = branch.last_element_child()?;
        let target = last.last_element_child();
        if target.is_none() {
            tracing::trace!("target container walk came up short");
        }
        target
    }

    /// Index of the direct child of `container` that is or holds the editor.
    pub fn main_child_index(&self, container: &Element, editor: Option<&Element>) -> Option<usize> {
        let editor = editor?;
        element_children(container)
            .iter()
            .position(|child| contains(child, editor))
    }

    /// Editor line elements, in document order.
    pub fn editor_lines(&self, editor: &Element) -> Vec<Element> {
        query_all(editor, &self.host.editor_line)
    }

    /// The editor region plus every element inside it that carries the editor font.
    pub fn font_targets(&self, editor: &Element) -> Vec<Element> {
        let mut targets = vec![editor.clone()];
        targets.extend(query_all(editor, &self.host.font_targets()));
        targets
    }

    /// The editor region plus its content element, which both paint a background.
    pub fn theme_targets(&self, editor: &Element) -> Vec<Element> {
        let mut targets = vec![editor.clone()];
        targets.extend(query_all(editor, &self.host.editor_content));
        targets
    }

    /// Result list items inside the documentation panel.
    pub fn result_items(&self, side: &Element) -> Vec<Element> {
        query_all(side, &self.host.result_item)
    }
}
