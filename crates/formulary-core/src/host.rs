//! Selectors describing the host page's formula dialog markup.
//!
//! The host page owns this markup and changes it without notice, so every
//! selector lives here rather than being scattered through the DOM layer.

use smol_str::SmolStr;

/// Structural expectations about the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContract {
    /// Modal dialog roots.
    pub dialog: SmolStr,
    /// The formula editor region inside a dialog.
    pub editor: SmolStr,
    /// Editable content element inside the editor region.
    pub editor_content: SmolStr,
    /// One element per editor line.
    pub editor_line: SmolStr,
    /// Syntax-highlighting spans inside editor lines.
    pub syntax_span: SmolStr,
    /// The line the caret is on.
    pub active_line: SmolStr,
    /// Leaf items of the documentation panel's result list.
    pub result_item: SmolStr,
    /// Path from the dialog root to the target container.
    pub target_path: SmolStr,
    /// Child index (0-based) taken at the second step of the fallback walk.
    pub target_branch_index: u32,
}

impl Default for HostContract {
    fn default() -> Self {
        Self {
            dialog: SmolStr::new_static("[role=\"dialog\"]"),
            editor: SmolStr::new_static(".cm-editor"),
            editor_content: SmolStr::new_static(".cm-content"),
            editor_line: SmolStr::new_static(".cm-line"),
            syntax_span: SmolStr::new_static(".cm-line span"),
            active_line: SmolStr::new_static(".cm-activeLine"),
            result_item: SmolStr::new_static("[role=\"option\"]"),
            target_path: SmolStr::new_static(
                ":scope > div:first-of-type > :nth-child(3) > :last-child > :last-child",
            ),
            target_branch_index: 2,
        }
    }
}

impl HostContract {
    /// Selector for every element that should carry the editor font.
    pub fn font_targets(&self) -> String {
        format!(
            "{}, {}, {}",
            self.editor_content, self.editor_line, self.syntax_span
        )
    }
}
