//! Small helpers over web-sys shared by the locator, styles and layout.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, Node, NodeList};

use crate::error::DomError;

/// Collect the elements of a `NodeList`, skipping non-element nodes.
pub fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Snapshot of an element's element children, in document order.
pub fn element_children(parent: &Element) -> Vec<Element> {
    let children = parent.children();
    (0..children.length())
        .filter_map(|i| children.item(i))
        .collect()
}

/// `querySelectorAll` that treats a throwing selector as "no matches".
pub fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    match root.query_selector_all(selector) {
        Ok(list) => elements(&list),
        Err(_) => {
            tracing::trace!(selector, "selector rejected by engine");
            Vec::new()
        }
    }
}

/// Whether `node` is `ancestor` or one of its descendants.
pub fn contains(ancestor: &Element, node: &Element) -> bool {
    let node: &Node = node.as_ref();
    ancestor.contains(Some(node))
}

/// Set inline declarations, optionally with `!important`.
pub fn set_declarations(element: &Element, declarations: &[(&str, String)], important: bool) {
    let Some(html) = element.dyn_ref::<HtmlElement>() else {
        return;
    };
    let style = html.style();
    let priority = if important { "important" } else { "" };
    for (property, value) in declarations {
        if let Err(err) = style.set_property_with_priority(property, value, priority) {
            tracing::trace!(property, ?err, "style property rejected");
        }
    }
}

pub fn set_property(element: &Element, property: &str, value: &str) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        if let Err(err) = html.style().set_property(property, value) {
            tracing::trace!(property, ?err, "style property rejected");
        }
    }
}

/// Inline value of a property, empty when unset.
pub fn inline_property(element: &Element, property: &str) -> String {
    element
        .dyn_ref::<HtmlElement>()
        .and_then(|html| html.style().get_property_value(property).ok())
        .unwrap_or_default()
}

/// Computed value of a property, `None` when the element is detached or the
/// window is unavailable.
pub fn computed_property(element: &Element, property: &str) -> Option<String> {
    let window = web_sys::window()?;
    let style = window.get_computed_style(element).ok()??;
    style.get_property_value(property).ok()
}

/// Remove inline properties, then drop the `style` attribute if nothing is left.
pub fn clear_properties(element: &Element, properties: &[&str]) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let style = html.style();
        for property in properties {
            if let Err(err) = style.remove_property(property) {
                tracing::trace!(property, ?err, "style property removal rejected");
            }
        }
    }
    drop_empty_style(element);
}

/// Remove a `style` attribute that no longer declares anything, so a reverted
/// element serializes exactly as it did before it was touched.
pub fn drop_empty_style(element: &Element) {
    let Some(html) = element.dyn_ref::<HtmlElement>() else {
        return;
    };
    if element.has_attribute("style") && html.style().length() == 0 {
        if let Err(err) = element.remove_attribute("style") {
            tracing::trace!(?err, "could not drop empty style attribute");
        }
    }
}

/// Set an attribute only when its value differs, avoiding needless mutations.
pub fn set_attribute_if_changed(element: &Element, name: &str, value: &str) {
    if element.get_attribute(name).as_deref() != Some(value) {
        if let Err(err) = element.set_attribute(name, value) {
            tracing::trace!(name, ?err, "attribute write rejected");
        }
    }
}

/// Stash the element's `style` attribute under `marker` the first time it is
/// touched. Later calls keep the first snapshot.
pub fn remember_style(element: &Element, marker: &str) {
    if !element.has_attribute(marker) {
        let original = element.get_attribute("style").unwrap_or_default();
        if let Err(err) = element.set_attribute(marker, &original) {
            tracing::trace!(marker, ?err, "could not remember style");
        }
    }
}

/// Put back the `style` attribute stashed by [`remember_style`] and drop the
/// marker. Returns `false` when the element carries no snapshot.
pub fn restore_style(element: &Element, marker: &str) -> Result<bool, DomError> {
    let Some(original) = element.get_attribute(marker) else {
        return Ok(false);
    };
    if original.is_empty() {
        element.remove_attribute("style")?;
    } else {
        element.set_attribute("style", &original)?;
    }
    element.remove_attribute(marker)?;
    Ok(true)
}
