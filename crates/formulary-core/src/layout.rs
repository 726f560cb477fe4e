//! Layout planning for the dialog's target container.
//!
//! The DOM layer never decides *what* arrangement to build. It hands the child
//! count and the index of the editor child to [`plan_layout`] and executes the
//! returned [`LayoutPlan`]. Keeping the decision pure means every arrangement
//! can be checked without a browser.
//!
//! # States
//!
//! - unpatched: the original flat child list.
//! - hidden: every child except the editor child has `display: none`.
//! - wrapped: a synthetic flex wrapper stands where the editor child was and
//!   holds exactly the editor child and the documentation panel (always the
//!   container's last child). Any children in between are hidden, never removed.

use crate::color::{DIVIDER_COLOR, rgba_u32_to_css};
use crate::config::DocumentationPosition;

/// Set on the target container the first time a layout is applied to it.
pub const LAYOUT_MARKER_ATTR: &str = "data-formulary-layout";
/// Set on the synthetic wrapper.
pub const WRAPPER_MARKER_ATTR: &str = "data-formulary-wrapper";
/// Set on the documentation panel while it is wrapped.
pub const SIDE_MARKER_ATTR: &str = "data-formulary-side";
/// Set on each direct child of the target container before the engine first
/// writes to it. Holds the child's original `style` attribute, restored on reset.
pub const CHILD_STYLE_ATTR: &str = "data-formulary-style";
/// Set on side-panel descendants whose constraints were loosened. Holds the
/// element's original `style` attribute, restored on reset.
pub const FIXUP_MARKER_ATTR: &str = "data-formulary-fixup";

/// Every property the engine may set on a direct child of the target container.
/// Cleared on reset from children that carry no [`CHILD_STYLE_ATTR`] snapshot.
pub const CHILD_RESET_PROPERTIES: [&str; 13] = [
    "display",
    "flex",
    "overflow",
    "order",
    "border-left",
    "border-right",
    "border-top",
    "border-bottom",
    "flex-direction",
    "height",
    "width",
    "max-width",
    "max-height",
];

/// Overrides cleared on the target container itself.
pub const CONTAINER_RESET_PROPERTIES: [&str; 3] = ["display", "flex-direction", "height"];

/// The documentation-related slice of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocLayout {
    pub show: bool,
    pub position: DocumentationPosition,
    pub editor_share: u32,
    pub documentation_share: u32,
}

impl DocLayout {
    /// `position: none` behaves exactly like `show: false`.
    pub fn is_visible(&self) -> bool {
        self.show && self.position != DocumentationPosition::Hidden
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexDirection {
    Row,
    Column,
}

impl FlexDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub fn border_property(&self) -> &'static str {
        match self {
            Self::Left => "border-left",
            Self::Right => "border-right",
            Self::Top => "border-top",
            Self::Bottom => "border-bottom",
        }
    }
}

/// What to do with a target container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutPlan {
    /// Not enough structure to form an editor/documentation pair.
    Skip,
    /// Hide everything except the editor child.
    Hide { hidden: Vec<usize> },
    Wrap(WrapPlan),
}

/// A wrapped arrangement. Indices refer to the container's original children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapPlan {
    pub main: usize,
    pub side: usize,
    pub hidden: Vec<usize>,
    pub direction: FlexDirection,
    /// Documentation panel goes before the editor inside the wrapper.
    pub side_first: bool,
    /// Edge of the documentation panel that faces the editor.
    pub border: Edge,
    pub main_grow: u32,
    pub side_grow: u32,
}

/// `flex` shorthand with a zero basis, so panel sizes follow the grow weights alone.
pub fn flex_value(grow: u32) -> String {
    format!("{grow} 1 0")
}

pub fn divider_value() -> String {
    format!("1px solid {}", rgba_u32_to_css(DIVIDER_COLOR))
}

impl WrapPlan {
    pub fn wrapper_declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("display", "flex".to_string()),
            ("flex-direction", self.direction.as_str().to_string()),
            ("width", "100%".to_string()),
            ("height", "100%".to_string()),
            ("gap", "0".to_string()),
        ]
    }

    pub fn main_declarations(&self) -> Vec<(&'static str, String)> {
        vec![("flex", flex_value(self.main_grow))]
    }

    pub fn side_declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("height", "100%".to_string()),
            ("flex", flex_value(self.side_grow)),
            ("overflow", "auto".to_string()),
            (self.border.border_property(), divider_value()),
        ]
    }
}

/// Decide the arrangement for a container with `child_count` element children,
/// whose editor child sits at `main` (first child when unknown).
pub fn plan_layout(child_count: usize, main: Option<usize>, layout: &DocLayout) -> LayoutPlan {
    if child_count < 2 {
        return LayoutPlan::Skip;
    }
    let main = main.unwrap_or(0);
    if main >= child_count {
        return LayoutPlan::Skip;
    }

    if !layout.is_visible() {
        return LayoutPlan::Hide {
            hidden: (0..child_count).filter(|&i| i != main).collect(),
        };
    }

    let side = child_count - 1;
    if side == main {
        return LayoutPlan::Skip;
    }

    let (direction, side_first, border) = match layout.position {
        DocumentationPosition::Left => (FlexDirection::Row, true, Edge::Right),
        DocumentationPosition::Top => (FlexDirection::Column, true, Edge::Bottom),
        DocumentationPosition::Bottom => (FlexDirection::Column, false, Edge::Top),
        DocumentationPosition::Right | DocumentationPosition::Hidden => {
            (FlexDirection::Row, false, Edge::Left)
        }
    };

    LayoutPlan::Wrap(WrapPlan {
        main,
        side,
        hidden: (0..child_count).filter(|&i| i != main && i != side).collect(),
        direction,
        side_first,
        border,
        main_grow: layout.editor_share,
        side_grow: layout.documentation_share,
    })
}
