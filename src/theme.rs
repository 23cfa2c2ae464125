//! Unified theme and color constants for the issues browser.
//!
//! All colors used by the tree panel and the detail view are sourced
//! from here to keep the two visually consistent.

use egui::Color32;

/// Background colors for different layers
pub mod bg {
    use super::*;

    /// Detail area background - darkest layer
    pub const DETAIL: Color32 = Color32::from_rgb(14, 17, 23);
}

/// Accent colors
pub mod accent {
    use super::*;

    /// Green for open issues/success states
    pub const GREEN: Color32 = Color32::from_rgb(34, 197, 94);

    /// Purple for closed issues
    pub const PURPLE: Color32 = Color32::from_rgb(168, 85, 247);

    /// Red for errors
    pub const RED: Color32 = Color32::from_rgb(239, 68, 68);

    /// Yellow for the current-issue highlight
    pub const YELLOW: Color32 = Color32::from_rgb(255, 220, 80);
}

/// Text colors at different emphasis levels
pub mod text {
    use super::*;

    /// Secondary text - medium contrast
    pub const SECONDARY: Color32 = Color32::from_rgb(180, 180, 190);

    /// Muted text - low contrast for less important info
    pub const MUTED: Color32 = Color32::from_rgb(120, 125, 135);
}

/// State colors for interactive elements
pub mod state {
    use super::*;

    /// Selected row highlight
    pub const SELECTED: Color32 = super::accent::YELLOW;

    /// Success indicator
    pub const SUCCESS: Color32 = super::accent::GREEN;

    /// Error indicator
    pub const ERROR: Color32 = super::accent::RED;
}

/// Two-tone icon color: one variant per host theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconPair {
    pub light: Color32,
    pub dark: Color32,
}

impl IconPair {
    /// Pick the variant for the active egui visuals.
    pub fn for_dark_mode(&self, dark: bool) -> Color32 {
        if dark {
            self.dark
        } else {
            self.light
        }
    }
}

/// Icon colors for tree rows
pub mod icon {
    use super::*;

    /// The issue glyph: darker green on light backgrounds, lighter on dark
    pub const ISSUE: IconPair = IconPair {
        light: Color32::from_rgb(22, 134, 62),
        dark: Color32::from_rgb(63, 185, 80),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_icon_has_distinct_theme_variants() {
        assert_ne!(icon::ISSUE.light, icon::ISSUE.dark);
        assert_eq!(icon::ISSUE.for_dark_mode(true), icon::ISSUE.dark);
        assert_eq!(icon::ISSUE.for_dark_mode(false), icon::ISSUE.light);
    }

    #[test]
    fn state_colors_match_issue_state_colors() {
        // Keep in sync with Issue::state_color in issues/models.rs
        assert_eq!(accent::GREEN, Color32::from_rgb(34, 197, 94));
        assert_eq!(accent::PURPLE, Color32::from_rgb(168, 85, 247));
    }
}
