//! Layout engine: executes core's [`LayoutPlan`] on a live target container
//! and reverts it.
//!
//! Applying is only ever done on an unpatched container; the orchestrator
//! guards that with an idempotency marker. Reverting does not trust markers:
//! wrappers are found by their structural fingerprint, because a partial
//! failure earlier can leave the DOM wrapped while any flag we kept is gone.

use formulary_core::layout::{
    CHILD_RESET_PROPERTIES, CHILD_STYLE_ATTR, CONTAINER_RESET_PROPERTIES, FIXUP_MARKER_ATTR,
    SIDE_MARKER_ATTR, WRAPPER_MARKER_ATTR,
};
use formulary_core::{DocLayout, LayoutPlan, WrapPlan, plan_layout};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, Node};

use crate::dom::{
    clear_properties, computed_property, contains, element_children, inline_property, query_all,
    remember_style, restore_style, set_declarations, set_property,
};
use crate::error::DomError;
use crate::locator::Locator;
use crate::observer::{DomObserver, ObserveOptions};

/// What [`LayoutEngine::apply`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutOutcome {
    Skipped,
    Hidden,
    Wrapped,
}

/// Keeps the side panel's fixups current while it is wrapped.
struct SideWatch {
    container: Element,
    _observer: DomObserver,
}

pub struct LayoutEngine {
    locator: Locator,
    watches: Vec<SideWatch>,
}

impl LayoutEngine {
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            watches: Vec::new(),
        }
    }

    /// Number of side panels currently being watched.
    pub fn active_watches(&self) -> usize {
        self.watches.len()
    }

    /// Arrange the children of an unpatched `container`.
    pub fn apply(
        &mut self,
        container: &Element,
        editor: Option<&Element>,
        layout: &DocLayout,
    ) -> Result<LayoutOutcome, DomError> {
        self.unwatch(container);

        let children = element_children(container);
        let main = self.locator.main_child_index(container, editor);
        match plan_layout(children.len(), main, layout) {
            LayoutPlan::Skip => {
                tracing::trace!(children = children.len(), "not enough structure for layout");
                Ok(LayoutOutcome::Skipped)
            }
            LayoutPlan::Hide { hidden } => {
                for i in hidden {
                    remember_style(&children[i], CHILD_STYLE_ATTR);
                    set_property(&children[i], "display", "none");
                }
                Ok(LayoutOutcome::Hidden)
            }
            LayoutPlan::Wrap(plan) => {
                self.wrap(container, &children, &plan)?;
                Ok(LayoutOutcome::Wrapped)
            }
        }
    }

    fn wrap(
        &mut self,
        container: &Element,
        children: &[Element],
        plan: &WrapPlan,
    ) -> Result<(), DomError> {
        let main = &children[plan.main];
        let side = &children[plan.side];
        let document = container
            .owner_document()
            .ok_or(DomError::StructuralMiss("owner document"))?;

        for &i in &plan.hidden {
            remember_style(&children[i], CHILD_STYLE_ATTR);
            set_property(&children[i], "display", "none");
        }
        remember_style(main, CHILD_STYLE_ATTR);
        remember_style(side, CHILD_STYLE_ATTR);

        if inline_property(side, "display") == "none" {
            clear_properties(side, &["display"]);
        }
        set_declarations(side, &plan.side_declarations(), false);
        side.set_attribute(SIDE_MARKER_ATTR, "")?;

        let wrapper = document.create_element("div")?;
        wrapper.set_attribute(WRAPPER_MARKER_ATTR, "")?;
        set_declarations(&wrapper, &plan.wrapper_declarations(), false);
        let main_node: &Node = main.as_ref();
        container.insert_before(&wrapper, Some(main_node))?;

        let (first, second) = if plan.side_first { (side, main) } else { (main, side) };
        wrapper.append_child(first)?;
        wrapper.append_child(second)?;
        set_declarations(main, &plan.main_declarations(), false);

        fix_side_panel(&self.locator, side);
        self.watch_side(container, side);

        tracing::debug!(
            direction = plan.direction.as_str(),
            side_first = plan.side_first,
            main_grow = plan.main_grow,
            side_grow = plan.side_grow,
            "wrapped target container"
        );
        Ok(())
    }

    fn watch_side(&mut self, container: &Element, side: &Element) {
        let locator = self.locator.clone();
        let watched = side.clone();
        let observer = match DomObserver::new(move |_| fix_side_panel(&locator, &watched)) {
            Ok(observer) => observer,
            Err(err) => {
                tracing::warn!(error = %err, "could not create side panel observer");
                return;
            }
        };
        if let Err(err) = observer.observe(side, ObserveOptions::TREE) {
            tracing::warn!(error = %err, "could not observe side panel");
            return;
        }
        self.watches.push(SideWatch {
            container: container.clone(),
            _observer: observer,
        });
    }

    /// Disconnect the side observer for `container`, and any whose container
    /// has left the document.
    fn unwatch(&mut self, container: &Element) {
        self.watches
            .retain(|watch| &watch.container != container && watch.container.is_connected());
    }

    /// Return `container` to its unpatched state.
    pub fn reset(&mut self, container: &Element, editor: Option<&Element>) -> Result<(), DomError> {
        self.unwatch(container);

        for child in element_children(container) {
            if is_wrapper(&child) {
                hoist_wrapper(container, &child, editor)?;
            }
        }

        for child in element_children(container) {
            // Without a snapshot (a wrapper found by fingerprint alone), clear
            // everything the engine may have written.
            if !restore_style(&child, CHILD_STYLE_ATTR)? {
                clear_properties(&child, &CHILD_RESET_PROPERTIES);
            }
            if child.has_attribute(SIDE_MARKER_ATTR) {
                child.remove_attribute(SIDE_MARKER_ATTR)?;
            }
            revert_fixups(&child)?;
        }
        clear_properties(container, &CONTAINER_RESET_PROPERTIES);
        Ok(())
    }
}

/// Structural fingerprint of a wrapper: flex display (inline or computed), an
/// inline row/column direction, and at least one child.
///
/// The direction is read inline only; every element computes to `row`.
pub fn is_wrapper(element: &Element) -> bool {
    if element.child_element_count() == 0 {
        return false;
    }
    if element.has_attribute(WRAPPER_MARKER_ATTR) {
        return true;
    }
    if element.dyn_ref::<HtmlElement>().is_none() {
        return false;
    }
    let display_flex = inline_property(element, "display") == "flex"
        || computed_property(element, "display").as_deref() == Some("flex");
    let direction = inline_property(element, "flex-direction");
    display_flex && (direction == "row" || direction == "column")
}

/// Hoist a wrapper's children back into `container` and discard it.
///
/// The editor child goes back where the wrapper stood and the documentation
/// panel returns to the end, where it was before wrapping. Without a way to
/// tell them apart the children are hoisted in wrapper order.
fn hoist_wrapper(
    container: &Element,
    wrapper: &Element,
    editor: Option<&Element>,
) -> Result<(), DomError> {
    let wrapper_node: &Node = wrapper.as_ref();
    let inner = element_children(wrapper);
    let main = editor
        .and_then(|editor| inner.iter().position(|child| contains(child, editor)))
        .or_else(|| {
            inner
                .iter()
                .any(|child| child.has_attribute(SIDE_MARKER_ATTR))
                .then(|| inner.iter().position(|child| !child.has_attribute(SIDE_MARKER_ATTR)))
                .flatten()
        });

    match main {
        Some(m) => {
            container.insert_before(&inner[m], Some(wrapper_node))?;
            for (i, child) in inner.iter().enumerate() {
                if i != m {
                    container.append_child(child)?;
                }
            }
        }
        None => {
            for child in &inner {
                container.insert_before(child, Some(wrapper_node))?;
            }
        }
    }
    wrapper.remove();
    tracing::debug!(children = inner.len(), "removed layout wrapper");
    Ok(())
}

/// Loosen host constraints inside the documentation panel that only made sense
/// before it was wrapped. Safe to run repeatedly.
pub fn fix_side_panel(locator: &Locator, side: &Element) {
    for element in query_all(side, "*") {
        if inline_property(&element, "max-height") == "none" {
            continue;
        }
        let constrained = computed_property(&element, "max-height")
            .is_some_and(|value| !value.is_empty() && value != "none");
        if constrained {
            remember_style(&element, FIXUP_MARKER_ATTR);
            set_property(&element, "max-height", "none");
        }
    }

    for item in locator.result_items(side) {
        let Some(grandparent) = item.parent_element().and_then(|p| p.parent_element()) else {
            continue;
        };
        if &grandparent == side || !contains(side, &grandparent) {
            continue;
        }
        if inline_property(&grandparent, "height") != "100%" {
            remember_style(&grandparent, FIXUP_MARKER_ATTR);
            set_property(&grandparent, "height", "100%");
        }
    }
}

fn revert_fixups(root: &Element) -> Result<(), DomError> {
    for element in query_all(root, &format!("[{FIXUP_MARKER_ATTR}]")) {
        restore_style(&element, FIXUP_MARKER_ATTR)?;
    }
    Ok(())
}
