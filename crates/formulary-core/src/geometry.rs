//! Modal box geometry.

use crate::config::Config;

/// Inline properties sizing touches on the dialog. Reset clears all of them.
pub const MODAL_STYLE_PROPERTIES: [&str; 8] = [
    "width",
    "height",
    "max-width",
    "max-height",
    "position",
    "left",
    "top",
    "transform",
];

/// Set on a backdrop whose background was overridden, so reset only touches
/// backdrops it changed.
pub const BACKDROP_MARKER_ATTR: &str = "data-formulary-backdrop";

/// Inline properties touched on the dialog's backdrop.
pub const BACKDROP_STYLE_PROPERTIES: [&str; 1] = ["background-color"];

/// Declarations for the dialog element.
///
/// Size is applied as percentages of the viewport-sized overlay. When an
/// anchor is configured the dialog is positioned absolutely at the anchor and
/// translated back by the same percentage, so `50/50` centers it and `0/0`
/// pins it to the top-left corner.
pub fn modal_declarations(config: &Config) -> Vec<(&'static str, String)> {
    let width = format!("{}%", config.modal_width);
    let height = format!("{}%", config.modal_height);
    let mut declarations = vec![
        ("width", width.clone()),
        ("height", height.clone()),
        ("max-width", width),
        ("max-height", height),
    ];

    if config.modal_left.is_some() || config.modal_top.is_some() {
        let left = config.modal_left.unwrap_or(50.0);
        let top = config.modal_top.unwrap_or(50.0);
        declarations.push(("position", "absolute".to_string()));
        declarations.push(("left", format!("{left}%")));
        declarations.push(("top", format!("{top}%")));
        declarations.push(("transform", format!("translate(-{left}%, -{top}%)")));
    }
    declarations
}

/// Declarations for the backdrop behind the dialog.
pub fn backdrop_declarations(config: &Config) -> Vec<(&'static str, String)> {
    if config.transparent_background {
        vec![("background-color", "transparent".to_string())]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(decls: &'a [(&'static str, String)], property: &str) -> Option<&'a str> {
        decls
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn centered_by_default() {
        let decls = modal_declarations(&Config::default());
        assert_eq!(lookup(&decls, "width"), Some("80%"));
        assert_eq!(lookup(&decls, "max-height"), Some("80%"));
        assert_eq!(lookup(&decls, "left"), Some("50%"));
        assert_eq!(lookup(&decls, "transform"), Some("translate(-50%, -50%)"));
    }

    #[test]
    fn no_anchor_leaves_position_alone() {
        let config = Config {
            modal_left: None,
            modal_top: None,
            ..Default::default()
        };
        let decls = modal_declarations(&config);
        assert_eq!(decls.len(), 4);
        assert_eq!(lookup(&decls, "position"), None);
    }

    #[test]
    fn partial_anchor_centers_other_axis() {
        let config = Config {
            modal_left: Some(0.0),
            modal_top: None,
            ..Default::default()
        };
        let decls = modal_declarations(&config);
        assert_eq!(lookup(&decls, "left"), Some("0%"));
        assert_eq!(lookup(&decls, "top"), Some("50%"));
    }

    #[test]
    fn every_declaration_is_reset() {
        let decls = modal_declarations(&Config::default());
        for (property, _) in decls {
            assert!(MODAL_STYLE_PROPERTIES.contains(&property));
        }
    }

    #[test]
    fn transparent_backdrop() {
        let config = Config {
            transparent_background: true,
            ..Default::default()
        };
        assert_eq!(
            backdrop_declarations(&config),
            vec![("background-color", "transparent".to_string())]
        );
        assert!(backdrop_declarations(&Config::default()).is_empty());
    }
}
