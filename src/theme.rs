//! Theme system with dark and light palettes plus custom overrides.

use ratatui::style::Color;

use crate::config::ThemeColorsConfig;

/// Resolved colors for every surface the UI paints.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    // Tree panel
    pub tree_bg: Color,
    pub tree_fg: Color,
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,
    pub tree_folder_fg: Color,
    pub tree_leaf_fg: Color,
    pub tree_meta_fg: Color,

    // Detail panel
    pub detail_bg: Color,
    pub detail_fg: Color,
    pub detail_key_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders and overlays
    pub border_fg: Color,
    pub border_focused_fg: Color,
    pub overlay_bg: Color,
    pub overlay_border_fg: Color,

    // Semantic
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub loading_fg: Color,
}

impl ThemeColors {
    /// Catppuccin Mocha inspired dark palette.
    pub fn dark() -> Self {
        Self {
            tree_bg: Color::Rgb(30, 30, 46),
            tree_fg: Color::Rgb(205, 214, 244),
            tree_selected_bg: Color::Rgb(69, 71, 90),
            tree_selected_fg: Color::Rgb(245, 224, 220),
            tree_folder_fg: Color::Rgb(137, 180, 250),
            tree_leaf_fg: Color::Rgb(205, 214, 244),
            tree_meta_fg: Color::Rgb(108, 112, 134),

            detail_bg: Color::Rgb(30, 30, 46),
            detail_fg: Color::Rgb(205, 214, 244),
            detail_key_fg: Color::Rgb(250, 179, 135),

            status_bg: Color::Rgb(24, 24, 37),
            status_fg: Color::Rgb(166, 173, 200),

            border_fg: Color::Rgb(69, 71, 90),
            border_focused_fg: Color::Rgb(137, 180, 250),
            overlay_bg: Color::Rgb(24, 24, 37),
            overlay_border_fg: Color::Rgb(203, 166, 247),

            error_fg: Color::Rgb(243, 139, 168),
            warning_fg: Color::Rgb(249, 226, 175),
            success_fg: Color::Rgb(166, 227, 161),
            loading_fg: Color::Rgb(148, 226, 213),
        }
    }

    /// Catppuccin Latte inspired light palette.
    pub fn light() -> Self {
        Self {
            tree_bg: Color::Rgb(239, 241, 245),
            tree_fg: Color::Rgb(76, 79, 105),
            tree_selected_bg: Color::Rgb(188, 192, 204),
            tree_selected_fg: Color::Rgb(48, 52, 70),
            tree_folder_fg: Color::Rgb(30, 102, 245),
            tree_leaf_fg: Color::Rgb(76, 79, 105),
            tree_meta_fg: Color::Rgb(140, 143, 161),

            detail_bg: Color::Rgb(239, 241, 245),
            detail_fg: Color::Rgb(76, 79, 105),
            detail_key_fg: Color::Rgb(254, 100, 11),

            status_bg: Color::Rgb(220, 224, 232),
            status_fg: Color::Rgb(92, 95, 119),

            border_fg: Color::Rgb(172, 176, 190),
            border_focused_fg: Color::Rgb(30, 102, 245),
            overlay_bg: Color::Rgb(230, 233, 239),
            overlay_border_fg: Color::Rgb(136, 57, 239),

            error_fg: Color::Rgb(210, 15, 57),
            warning_fg: Color::Rgb(223, 142, 29),
            success_fg: Color::Rgb(64, 160, 43),
            loading_fg: Color::Rgb(23, 146, 153),
        }
    }

    /// Apply custom color overrides from the config file. Unparsable or
    /// missing entries keep the base palette's value.
    pub fn apply_custom(mut self, custom: &ThemeColorsConfig) -> Self {
        let apply = |target: &mut Color, value: &Option<String>| {
            if let Some(parsed) = value.as_deref().and_then(parse_hex_color) {
                *target = parsed;
            }
        };

        apply(&mut self.tree_bg, &custom.tree_bg);
        apply(&mut self.tree_fg, &custom.tree_fg);
        apply(&mut self.tree_selected_bg, &custom.tree_selected_bg);
        apply(&mut self.tree_selected_fg, &custom.tree_selected_fg);
        apply(&mut self.tree_folder_fg, &custom.tree_folder_fg);
        apply(&mut self.tree_leaf_fg, &custom.tree_leaf_fg);
        apply(&mut self.tree_meta_fg, &custom.tree_meta_fg);
        apply(&mut self.detail_bg, &custom.detail_bg);
        apply(&mut self.detail_fg, &custom.detail_fg);
        apply(&mut self.detail_key_fg, &custom.detail_key_fg);
        apply(&mut self.status_bg, &custom.status_bg);
        apply(&mut self.status_fg, &custom.status_fg);
        apply(&mut self.border_fg, &custom.border_fg);
        apply(&mut self.overlay_bg, &custom.overlay_bg);
        apply(&mut self.overlay_border_fg, &custom.overlay_border_fg);

        self
    }
}

/// Resolve the theme for a config scheme name.
///
/// "custom" starts from the dark palette and applies overrides; an unknown
/// scheme falls back to dark.
pub fn resolve_theme(scheme: &str, custom: Option<&ThemeColorsConfig>) -> ThemeColors {
    let base = match scheme {
        "light" => ThemeColors::light(),
        _ => ThemeColors::dark(),
    };
    match custom {
        Some(colors) if scheme == "custom" => base.apply_custom(colors),
        _ => base,
    }
}

/// Parse a `#rrggbb` hex color string.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
