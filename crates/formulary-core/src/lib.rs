//! formulary-core: framework-free logic for the formula dialog re-skin.
//!
//! This crate provides:
//! - `Config` / `ConfigPatch` - the validated configuration model and presets
//! - `ConfigStore` / `ConfigService` - the persistence boundary
//! - `Palette` and font stacks - theme lookup tables
//! - CSS generation for the editor font and indent guide style blocks
//! - `plan_layout` - the pure decision behind every target container arrangement
//! - `HostContract` - selectors for the host page's markup
//!
//! Nothing here touches the DOM; `formulary-browser` executes what this crate decides.

pub mod color;
pub mod config;
pub mod css;
pub mod error;
pub mod geometry;
pub mod host;
pub mod indent;
pub mod layout;
pub mod store;

pub use color::{Palette, rgba_u32_to_css, rgba_u32_to_css_alpha};
pub use config::{
    Config, ConfigPatch, DocumentationPosition, EditorTheme, FontFamily, IndentGuideStyle,
    PRESET_NAMES, preset,
};
pub use css::{EDITOR_FONT_STYLE_ID, INDENT_GUIDE_STYLE_ID, editor_font_css, indent_guide_css};
pub use error::{ConfigError, StoreError};
pub use geometry::{backdrop_declarations, modal_declarations};
pub use host::HostContract;
pub use indent::{INDENT_LEVEL_ATTR, indent_level, indent_marker};
pub use layout::{DocLayout, Edge, FlexDirection, LayoutPlan, WrapPlan, plan_layout};
pub use smol_str::SmolStr;
pub use store::{ConfigService, ConfigStore, MemoryStore, resolve_stored};
