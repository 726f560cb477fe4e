//! Global style blocks injected next to the host page's own styles.
//!
//! Each concern owns exactly one `<style>` element, identified by a fixed id,
//! so re-injecting replaces rather than accumulates.

use std::fmt::Write;

use crate::color::{INDENT_GUIDE_ALPHA, INDENT_GUIDE_COLORS, rgba_u32_to_css_alpha};
use crate::config::{Config, IndentGuideStyle};
use crate::host::HostContract;
use crate::indent::{INDENT_LEVEL_ATTR, INDENT_WIDTH, MAX_INDENT_LEVEL};

pub const EDITOR_FONT_STYLE_ID: &str = "formulary-editor-fonts";
pub const INDENT_GUIDE_STYLE_ID: &str = "formulary-indent-guides";

/// Font declarations shared by the style block and the inline styles.
pub fn font_declarations(config: &Config) -> [(&'static str, String); 3] {
    [
        ("font-family", config.editor_font_family.css_stack().to_string()),
        ("font-size", format!("{}px", config.editor_font_size)),
        ("line-height", config.editor_line_height.to_string()),
    ]
}

/// CSS for the editor font block, scoped under the editor region.
pub fn editor_font_css(config: &Config, host: &HostContract) -> String {
    let editor = host.editor.as_str();
    let selectors = [
        editor.to_string(),
        format!("{editor} {}", host.editor_content),
        format!("{editor} {}", host.editor_line),
        format!("{editor} {}", host.syntax_span),
    ]
    .join(",\n");

    let mut css = String::new();
    let _ = writeln!(css, "{selectors} {{");
    for (property, value) in font_declarations(config) {
        let _ = writeln!(css, "    {property}: {value} !important;");
    }
    css.push_str("}\n");
    css
}

fn guide_layer(color: u32, alpha: f32, style: IndentGuideStyle) -> String {
    let color = rgba_u32_to_css_alpha(color, alpha);
    match style {
        IndentGuideStyle::Solid => format!("linear-gradient({color}, {color})"),
        IndentGuideStyle::Dotted => {
            format!("repeating-linear-gradient(to bottom, {color} 0 2px, transparent 2px 4px)")
        }
        IndentGuideStyle::Dashed => {
            format!("repeating-linear-gradient(to bottom, {color} 0 6px, transparent 6px 10px)")
        }
    }
}

fn guide_rule(css: &mut String, selector: &str, level: u8, alpha: f32, style: IndentGuideStyle) {
    let levels = 0..level as usize;
    let layers: Vec<String> = levels
        .clone()
        .map(|i| guide_layer(INDENT_GUIDE_COLORS[i % INDENT_GUIDE_COLORS.len()], alpha, style))
        .collect();
    let positions: Vec<String> = levels.map(|i| format!("{}ch 0", i * INDENT_WIDTH)).collect();

    let _ = writeln!(css, "{selector}[{INDENT_LEVEL_ATTR}=\"{level}\"] {{");
    let _ = writeln!(css, "    background-image: {};", layers.join(", "));
    let _ = writeln!(css, "    background-size: 1px 100%;");
    let _ = writeln!(css, "    background-repeat: no-repeat;");
    let _ = writeln!(css, "    background-position: {};", positions.join(", "));
    css.push_str("}\n");
}

/// CSS for the indent guide block, or `None` when guides are disabled.
///
/// Level `n` draws `n` one-pixel guides, one per enclosing indent, each offset
/// by the indent width in monospace character units.
pub fn indent_guide_css(config: &Config, host: &HostContract) -> Option<String> {
    if !config.show_indent_guides {
        return None;
    }
    let line = format!("{} {}", host.editor, host.editor_line);
    let active = format!("{} {}", host.editor, host.active_line);

    let mut css = String::new();
    for level in 1..=MAX_INDENT_LEVEL {
        guide_rule(&mut css, &line, level, INDENT_GUIDE_ALPHA, config.indent_guide_style);
    }
    if config.highlight_active_indent {
        for level in 1..=MAX_INDENT_LEVEL {
            guide_rule(&mut css, &active, level, 1.0, config.indent_guide_style);
        }
    }
    Some(css)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontFamily;

    #[test]
    fn font_block_is_scoped_and_important() {
        let config = Config {
            editor_font_family: FontFamily::FiraCode,
            editor_font_size: 16.0,
            editor_line_height: 1.8,
            ..Default::default()
        };
        let css = editor_font_css(&config, &HostContract::default());
        assert!(css.starts_with(".cm-editor,\n.cm-editor .cm-content,"));
        assert!(css.contains("font-family: 'Fira Code', monospace !important;"));
        assert!(css.contains("font-size: 16px !important;"));
        assert!(css.contains("line-height: 1.8 !important;"));
    }

    #[test]
    fn guides_disabled_yield_no_block() {
        let config = Config {
            show_indent_guides: false,
            ..Default::default()
        };
        assert_eq!(indent_guide_css(&config, &HostContract::default()), None);
    }

    #[test]
    fn one_layer_per_level() {
        let config = Config {
            highlight_active_indent: false,
            ..Default::default()
        };
        let css = indent_guide_css(&config, &HostContract::default()).unwrap();
        assert_eq!(css.matches("data-indent-level=").count(), MAX_INDENT_LEVEL as usize);
        assert!(css.contains(".cm-editor .cm-line[data-indent-level=\"3\"] {"));
        assert!(css.contains("background-position: 0ch 0, 2ch 0, 4ch 0;"));
        assert!(!css.contains("cm-activeLine"));
    }

    #[test]
    fn active_line_guides_are_opaque() {
        let css = indent_guide_css(&Config::default(), &HostContract::default()).unwrap();
        assert_eq!(
            css.matches("data-indent-level=").count(),
            2 * MAX_INDENT_LEVEL as usize
        );
        assert!(css.contains(".cm-editor .cm-activeLine[data-indent-level=\"1\"] {"));
        assert!(css.contains("linear-gradient(rgba(224, 108, 117, 1), rgba(224, 108, 117, 1))"));
    }

    #[test]
    fn guide_style_changes_layer_shape() {
        let config = Config {
            indent_guide_style: IndentGuideStyle::Dotted,
            ..Default::default()
        };
        let css = indent_guide_css(&config, &HostContract::default()).unwrap();
        assert!(css.contains("repeating-linear-gradient(to bottom,"));
        assert!(css.contains("transparent 2px 4px"));
    }
}
