//! Color tables for editor themes and indent guides.
//!
//! Colors are packed as `0xRRGGBBAA` and converted to CSS on demand.

/// Convert RGBA u32 (packed as 0xRRGGBBAA) to CSS rgba() string.
pub fn rgba_u32_to_css(color: u32) -> String {
    let r = (color >> 24) & 0xFF;
    let g = (color >> 16) & 0xFF;
    let b = (color >> 8) & 0xFF;
    let a = (color & 0xFF) as f32 / 255.0;
    format!("rgba({}, {}, {}, {})", r, g, b, a)
}

/// Convert RGBA u32 to CSS rgba() string with a custom alpha value.
pub fn rgba_u32_to_css_alpha(color: u32, alpha: f32) -> String {
    let r = (color >> 24) & 0xFF;
    let g = (color >> 16) & 0xFF;
    let b = (color >> 8) & 0xFF;
    format!("rgba({}, {}, {}, {})", r, g, b, alpha)
}

/// Background and foreground for one editor theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: u32,
    pub foreground: u32,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: 0xFFFFFFFF,
        foreground: 0x1F2328FF,
    };
    pub const DARK: Palette = Palette {
        background: 0x1E1E1EFF,
        foreground: 0xD4D4D4FF,
    };
    pub const SEPIA: Palette = Palette {
        background: 0xF4ECD8FF,
        foreground: 0x5B4636FF,
    };
    pub const HIGH_CONTRAST: Palette = Palette {
        background: 0x000000FF,
        foreground: 0xFFFFFFFF,
    };
    // Color-vision palettes avoid the confusable axis for each deficiency.
    pub const PROTANOPIA: Palette = Palette {
        background: 0xF5F7FFFF,
        foreground: 0x0B3D91FF,
    };
    pub const DEUTERANOPIA: Palette = Palette {
        background: 0xFFF8F0FF,
        foreground: 0x003F7FFF,
    };
    pub const TRITANOPIA: Palette = Palette {
        background: 0xFFF5F5FF,
        foreground: 0x8B0000FF,
    };

    /// Look up a palette by theme name. Unknown names resolve to [`Palette::LIGHT`].
    pub fn for_theme(name: &str) -> Palette {
        match name {
            "light" => Self::LIGHT,
            "dark" => Self::DARK,
            "sepia" => Self::SEPIA,
            "high-contrast" => Self::HIGH_CONTRAST,
            "protanopia" => Self::PROTANOPIA,
            "deuteranopia" => Self::DEUTERANOPIA,
            "tritanopia" => Self::TRITANOPIA,
            other => {
                tracing::debug!(theme = other, "unknown editor theme, using light");
                Self::LIGHT
            }
        }
    }

    pub fn background_css(&self) -> String {
        rgba_u32_to_css(self.background)
    }

    pub fn foreground_css(&self) -> String {
        rgba_u32_to_css(self.foreground)
    }
}

/// One guide color per indent level, cycling from the outermost level.
pub const INDENT_GUIDE_COLORS: [u32; 8] = [
    0xE06C75FF, 0xE5C07BFF, 0x98C379FF, 0x56B6C2FF, 0x61AFEFFF, 0xC678DDFF, 0xD19A66FF, 0xABB2BFFF,
];

/// Guide opacity for ordinary lines. The active line draws at full opacity.
pub const INDENT_GUIDE_ALPHA: f32 = 0.35;

/// Hairline separating the editor from the documentation panel.
pub const DIVIDER_COLOR: u32 = 0x80808059;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_to_css() {
        assert_eq!(rgba_u32_to_css(0xFF0000FF), "rgba(255, 0, 0, 1)");
        assert_eq!(rgba_u32_to_css(0x0000FF00), "rgba(0, 0, 255, 0)");
    }

    #[test]
    fn test_rgba_to_css_alpha() {
        assert_eq!(rgba_u32_to_css_alpha(0x61AFEFFF, 0.35), "rgba(97, 175, 239, 0.35)");
    }

    #[test]
    fn unknown_theme_falls_back_to_light() {
        assert_eq!(Palette::for_theme("nonexistent"), Palette::LIGHT);
        assert_eq!(Palette::for_theme(""), Palette::LIGHT);
    }

    #[test]
    fn every_theme_name_has_its_own_palette() {
        use crate::config::EditorTheme;

        let themes = [
            EditorTheme::Light,
            EditorTheme::Dark,
            EditorTheme::Sepia,
            EditorTheme::HighContrast,
            EditorTheme::Protanopia,
            EditorTheme::Deuteranopia,
            EditorTheme::Tritanopia,
        ];
        let palettes: Vec<Palette> = themes.iter().map(|t| Palette::for_theme(t.as_str())).collect();
        for (i, a) in palettes.iter().enumerate() {
            for b in &palettes[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(Palette::DARK.background_css(), "rgba(30, 30, 30, 1)");
    }
}
