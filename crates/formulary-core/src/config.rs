//! Configuration model for the dialog re-skin.
//!
//! A [`Config`] is an immutable, fully validated value. Everything that arrives
//! from outside (storage, the settings surface, presets) is a [`ConfigPatch`]
//! that gets overlaid onto a base config with [`Config::merged`] and then
//! checked with [`Config::validate`].
//!
//! Field names serialize in `camelCase` and enum values in `kebab-case`, which
//! is the shape the settings surface and `chrome.storage` already use.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::layout::DocLayout;

pub const MODAL_SIZE_RANGE: (f64, f64) = (20.0, 98.0);
pub const MODAL_ANCHOR_RANGE: (f64, f64) = (0.0, 100.0);
pub const EDITOR_PROPORTION_RANGE: (u32, u32) = (30, 80);
pub const FONT_SIZE_RANGE: (f64, f64) = (10.0, 24.0);
pub const LINE_HEIGHT_RANGE: (f64, f64) = (1.0, 2.5);

/// Where the documentation panel sits relative to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentationPosition {
    Left,
    #[default]
    Right,
    Top,
    Bottom,
    /// Documentation panel hidden regardless of `showDocumentation`.
    #[serde(rename = "none")]
    Hidden,
}

impl DocumentationPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Hidden => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    #[serde(rename = "monospace")]
    Monospace,
    #[serde(rename = "fira-code")]
    FiraCode,
    #[serde(rename = "jetbrains-mono")]
    JetBrainsMono,
    #[serde(rename = "source-code-pro")]
    SourceCodePro,
    #[serde(rename = "opendyslexic")]
    OpenDyslexic,
}

impl FontFamily {
    /// CSS `font-family` value, always ending in a generic monospace fallback.
    pub fn css_stack(&self) -> &'static str {
        match self {
            Self::Monospace => "monospace",
            Self::FiraCode => "'Fira Code', monospace",
            Self::JetBrainsMono => "'JetBrains Mono', monospace",
            Self::SourceCodePro => "'Source Code Pro', monospace",
            Self::OpenDyslexic => "'OpenDyslexicMono', 'OpenDyslexic', monospace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditorTheme {
    #[default]
    Light,
    Dark,
    Sepia,
    HighContrast,
    Protanopia,
    Deuteranopia,
    Tritanopia,
}

impl EditorTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Sepia => "sepia",
            Self::HighContrast => "high-contrast",
            Self::Protanopia => "protanopia",
            Self::Deuteranopia => "deuteranopia",
            Self::Tritanopia => "tritanopia",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndentGuideStyle {
    #[default]
    Solid,
    Dotted,
    Dashed,
}

/// Full, validated configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub modal_width: f64,
    pub modal_height: f64,
    /// Horizontal anchor in percent. `None` leaves the host's positioning alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal_left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal_top: Option<f64>,
    pub transparent_background: bool,
    pub show_documentation: bool,
    pub documentation_position: DocumentationPosition,
    pub editor_proportion: u32,
    /// Mirror of `100 - editor_proportion`, refreshed by [`Config::normalized`].
    /// Never read as ground truth, use [`Config::split`].
    pub documentation_proportion: u32,
    pub editor_font_size: f64,
    pub editor_line_height: f64,
    pub editor_font_family: FontFamily,
    pub editor_theme: EditorTheme,
    pub show_indent_guides: bool,
    pub indent_guide_style: IndentGuideStyle,
    pub highlight_active_indent: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modal_width: 80.0,
            modal_height: 80.0,
            modal_left: Some(50.0),
            modal_top: Some(50.0),
            transparent_background: false,
            show_documentation: true,
            documentation_position: DocumentationPosition::Right,
            editor_proportion: 60,
            documentation_proportion: 40,
            editor_font_size: 14.0,
            editor_line_height: 1.5,
            editor_font_family: FontFamily::Monospace,
            editor_theme: EditorTheme::Light,
            show_indent_guides: true,
            indent_guide_style: IndentGuideStyle::Solid,
            highlight_active_indent: true,
        }
    }
}

/// Partial configuration. Presets, stored values and settings messages all
/// arrive in this shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal_left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent_background: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_documentation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_position: Option<DocumentationPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_proportion: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_font_family: Option<FontFamily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_theme: Option<EditorTheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_indent_guides: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent_guide_style: Option<IndentGuideStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_active_indent: Option<bool>,
}

impl ConfigPatch {
    /// Decode a patch from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<&Config> for ConfigPatch {
    fn from(config: &Config) -> Self {
        Self {
            modal_width: Some(config.modal_width),
            modal_height: Some(config.modal_height),
            modal_left: config.modal_left,
            modal_top: config.modal_top,
            transparent_background: Some(config.transparent_background),
            show_documentation: Some(config.show_documentation),
            documentation_position: Some(config.documentation_position),
            editor_proportion: Some(config.editor_proportion),
            editor_font_size: Some(config.editor_font_size),
            editor_line_height: Some(config.editor_line_height),
            editor_font_family: Some(config.editor_font_family),
            editor_theme: Some(config.editor_theme),
            show_indent_guides: Some(config.show_indent_guides),
            indent_guide_style: Some(config.indent_guide_style),
            highlight_active_indent: Some(config.highlight_active_indent),
        }
    }
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl Config {
    /// Overlay `patch` onto this config. The result is normalized but not validated.
    pub fn merged(&self, patch: &ConfigPatch) -> Config {
        let mut next = self.clone();
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field { next.$field = value; })*
            };
        }
        overlay!(
            modal_width,
            modal_height,
            transparent_background,
            show_documentation,
            documentation_position,
            editor_proportion,
            editor_font_size,
            editor_line_height,
            editor_font_family,
            editor_theme,
            show_indent_guides,
            indent_guide_style,
            highlight_active_indent,
        );
        if patch.modal_left.is_some() {
            next.modal_left = patch.modal_left;
        }
        if patch.modal_top.is_some() {
            next.modal_top = patch.modal_top;
        }
        next.normalized()
    }

    /// Recompute derived fields.
    pub fn normalized(mut self) -> Config {
        self.documentation_proportion = 100u32.saturating_sub(self.editor_proportion);
        self
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("modalWidth", self.modal_width, MODAL_SIZE_RANGE)?;
        check_range("modalHeight", self.modal_height, MODAL_SIZE_RANGE)?;
        if let Some(left) = self.modal_left {
            check_range("modalLeft", left, MODAL_ANCHOR_RANGE)?;
        }
        if let Some(top) = self.modal_top {
            check_range("modalTop", top, MODAL_ANCHOR_RANGE)?;
        }
        let (min, max) = EDITOR_PROPORTION_RANGE;
        check_range(
            "editorProportion",
            self.editor_proportion as f64,
            (min as f64, max as f64),
        )?;
        check_range("editorFontSize", self.editor_font_size, FONT_SIZE_RANGE)?;
        check_range("editorLineHeight", self.editor_line_height, LINE_HEIGHT_RANGE)?;
        Ok(())
    }

    /// Merge and validate in one step.
    pub fn try_merged(&self, patch: &ConfigPatch) -> Result<Config, ConfigError> {
        let next = self.merged(patch);
        next.validate()?;
        Ok(next)
    }

    /// Apply a named preset from the built-in table.
    pub fn with_preset(&self, name: &str) -> Result<Config, ConfigError> {
        let patch = preset(name).ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;
        self.try_merged(&patch)
    }

    /// Editor and documentation flex shares. Always sums to 100.
    pub fn split(&self) -> (u32, u32) {
        let editor = self.editor_proportion.min(100);
        (editor, 100 - editor)
    }

    /// The slice of the config the layout engine works from.
    pub fn doc_layout(&self) -> DocLayout {
        let (editor_share, documentation_share) = self.split();
        DocLayout {
            show: self.show_documentation,
            position: self.documentation_position,
            editor_share,
            documentation_share,
        }
    }
}

pub const PRESET_NAMES: [&str; 3] = ["default", "medium", "fullscreen"];

/// Look up a built-in geometry preset. Every preset re-centers the modal.
pub fn preset(name: &str) -> Option<ConfigPatch> {
    let (width, height) = match name {
        "default" => (60.0, 70.0),
        "medium" => (80.0, 80.0),
        "fullscreen" => (98.0, 98.0),
        _ => return None,
    };
    Some(ConfigPatch {
        modal_width: Some(width),
        modal_height: Some(height),
        modal_left: Some(50.0),
        modal_top: Some(50.0),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.split(), (60, 40));
        assert_eq!(config.documentation_proportion, 40);
    }

    #[test]
    fn merge_recomputes_documentation_proportion() {
        let patch = ConfigPatch {
            editor_proportion: Some(70),
            ..Default::default()
        };
        let config = Config::default().merged(&patch);
        assert_eq!(config.editor_proportion, 70);
        assert_eq!(config.documentation_proportion, 30);
    }

    #[test]
    fn stored_documentation_proportion_is_not_trusted() {
        let json = r#"{"editorProportion": 45, "documentationProportion": 10}"#;
        let patch = ConfigPatch::from_json(json).unwrap();
        let config = Config::default().merged(&patch);
        assert_eq!(config.split(), (45, 55));
        assert_eq!(config.documentation_proportion, 55);
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let cases = [
            ConfigPatch {
                modal_width: Some(99.0),
                ..Default::default()
            },
            ConfigPatch {
                modal_height: Some(19.5),
                ..Default::default()
            },
            ConfigPatch {
                modal_left: Some(-1.0),
                ..Default::default()
            },
            ConfigPatch {
                editor_proportion: Some(81),
                ..Default::default()
            },
            ConfigPatch {
                editor_font_size: Some(9.0),
                ..Default::default()
            },
            ConfigPatch {
                editor_line_height: Some(f64::NAN),
                ..Default::default()
            },
        ];
        for patch in cases {
            let err = Config::default().try_merged(&patch).unwrap_err();
            assert!(matches!(err, ConfigError::OutOfRange { .. }), "{patch:?}");
        }
    }

    #[test]
    fn rejects_unknown_enum_values() {
        assert!(ConfigPatch::from_json(r#"{"editorTheme": "neon"}"#).is_err());
        assert!(ConfigPatch::from_json(r#"{"documentationPosition": "center"}"#).is_err());
    }

    #[test]
    fn parses_kebab_case_enums() {
        let json = r#"{
            "documentationPosition": "none",
            "editorFontFamily": "jetbrains-mono",
            "editorTheme": "high-contrast",
            "indentGuideStyle": "dashed",
            "unrelatedField": 3
        }"#;
        let patch = ConfigPatch::from_json(json).unwrap();
        assert_eq!(patch.documentation_position, Some(DocumentationPosition::Hidden));
        assert_eq!(patch.editor_font_family, Some(FontFamily::JetBrainsMono));
        assert_eq!(patch.editor_theme, Some(EditorTheme::HighContrast));
        assert_eq!(patch.indent_guide_style, Some(IndentGuideStyle::Dashed));
    }

    #[test]
    fn config_round_trips_through_patch() {
        let config = Config {
            editor_theme: EditorTheme::Sepia,
            modal_left: None,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""editorTheme":"sepia""#));
        assert!(!json.contains("modalLeft"));
        let restored: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn presets_apply_geometry() {
        let config = Config::default().with_preset("fullscreen").unwrap();
        assert_eq!(config.modal_width, 98.0);
        assert_eq!(config.modal_height, 98.0);
        assert_eq!(config.modal_left, Some(50.0));
        for name in PRESET_NAMES {
            Config::default().with_preset(name).unwrap();
        }
        assert!(matches!(
            Config::default().with_preset("tiny"),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn font_stacks_end_in_monospace() {
        for family in [
            FontFamily::Monospace,
            FontFamily::FiraCode,
            FontFamily::JetBrainsMono,
            FontFamily::SourceCodePro,
            FontFamily::OpenDyslexic,
        ] {
            assert!(family.css_stack().ends_with("monospace"));
        }
    }
}
