//! Editor styling: fonts, theme colors and indent guides.
//!
//! Everything here is additive and overwrite-on-reapply. Side effects are
//! limited to one `<style>` element per concern, inline styles inside the
//! editor subtree, and `data-indent-level` markers on editor lines.

use formulary_core::css::font_declarations;
use formulary_core::{
    Config, EDITOR_FONT_STYLE_ID, INDENT_GUIDE_STYLE_ID, INDENT_LEVEL_ATTR, Palette,
    editor_font_css, indent_guide_css, indent_marker,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MutationRecord};

use crate::dom::{set_attribute_if_changed, set_declarations};
use crate::error::DomError;
use crate::locator::Locator;
use crate::observer::{DomObserver, ObserveOptions};

/// Insert or replace the `<style>` element with the given id.
pub fn inject_style_block(document: &Document, id: &str, css: &str) -> Result<(), DomError> {
    if let Some(existing) = document.get_element_by_id(id) {
        if existing.text_content().as_deref() != Some(css) {
            existing.set_text_content(Some(css));
        }
        return Ok(());
    }

    let style = document.create_element("style")?;
    style.set_id(id);
    style.set_text_content(Some(css));
    match document.head() {
        Some(head) => head.append_child(&style)?,
        None => document
            .document_element()
            .ok_or(DomError::StructuralMiss("document element"))?
            .append_child(&style)?,
    };
    Ok(())
}

pub fn remove_style_block(document: &Document, id: &str) {
    if let Some(existing) = document.get_element_by_id(id) {
        existing.remove();
    }
}

/// (Re)attach indent markers to every line of one editor.
pub fn mark_indent_levels(locator: &Locator, editor: &Element) {
    for line in locator.editor_lines(editor) {
        let text = line.text_content().unwrap_or_default();
        match indent_marker(&text) {
            Some(level) => set_attribute_if_changed(&line, INDENT_LEVEL_ATTR, &level),
            None => remove_indent_marker(&line),
        }
    }
}

pub fn strip_indent_markers(locator: &Locator, editor: &Element) {
    for line in locator.editor_lines(editor) {
        remove_indent_marker(&line);
    }
}

fn remove_indent_marker(line: &Element) {
    if line.has_attribute(INDENT_LEVEL_ATTR) {
        if let Err(err) = line.remove_attribute(INDENT_LEVEL_ATTR) {
            tracing::trace!(?err, "could not remove indent marker");
        }
    }
}

/// Applies editor styling and owns the observer that keeps indent markers
/// current while the user types.
pub struct StyleApplicator {
    locator: Locator,
    guide_observer: Option<DomObserver>,
}

impl StyleApplicator {
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            guide_observer: None,
        }
    }

    /// Whether an indent-marker observer is active.
    pub fn is_watching_indents(&self) -> bool {
        self.guide_observer.is_some()
    }

    /// Apply fonts, theme and indent guides to one editor region.
    pub fn apply_styles(&mut self, document: &Document, editor: &Element, config: &Config) {
        let host = self.locator.host();
        let font_css = editor_font_css(config, host);
        if let Err(err) = inject_style_block(document, EDITOR_FONT_STYLE_ID, &font_css) {
            tracing::warn!(error = %err, "could not inject editor font styles");
        }

        let fonts = font_declarations(config);
        for target in self.locator.font_targets(editor) {
            set_declarations(&target, &fonts, true);
        }

        let palette = Palette::for_theme(config.editor_theme.as_str());
        let colors = [
            ("background-color", palette.background_css()),
            ("color", palette.foreground_css()),
        ];
        for target in self.locator.theme_targets(editor) {
            set_declarations(&target, &colors, true);
        }

        match indent_guide_css(config, host) {
            Some(css) => {
                if let Err(err) = inject_style_block(document, INDENT_GUIDE_STYLE_ID, &css) {
                    tracing::warn!(error = %err, "could not inject indent guide styles");
                }
                mark_indent_levels(&self.locator, editor);
                self.watch_indents(editor);
            }
            None => {
                remove_style_block(document, INDENT_GUIDE_STYLE_ID);
                strip_indent_markers(&self.locator, editor);
                self.guide_observer = None;
            }
        }
    }

    fn watch_indents(&mut self, editor: &Element) {
        if self.guide_observer.is_none() {
            let locator = self.locator.clone();
            let observer = DomObserver::new(move |records| {
                for root in editor_roots(&locator, records) {
                    mark_indent_levels(&locator, &root);
                }
            });
            match observer {
                Ok(observer) => self.guide_observer = Some(observer),
                Err(err) => {
                    tracing::warn!(error = %err, "could not create indent observer");
                    return;
                }
            }
        }
        if let Some(observer) = &self.guide_observer {
            if let Err(err) = observer.observe(editor, ObserveOptions::TREE_AND_TEXT) {
                tracing::warn!(error = %err, "could not observe editor");
            }
        }
    }
}

/// Distinct editor roots touched by a batch of mutations.
fn editor_roots(locator: &Locator, records: &[MutationRecord]) -> Vec<Element> {
    let mut roots: Vec<Element> = Vec::new();
    for record in records {
        let Some(target) = record.target() else {
            continue;
        };
        let element = match target.dyn_into::<Element>() {
            Ok(element) => element,
            Err(node) => match node.parent_element() {
                Some(parent) => parent,
                None => continue,
            },
        };
        if let Ok(Some(root)) = element.closest(&locator.host().editor) {
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
    }
    roots
}
