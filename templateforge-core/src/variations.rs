//! Color Variations
//!
//! Always three, always in the order Dark Mode, Vibrant, Monochrome. Only
//! Dark Mode reads the base palette (it keeps the base accent); the other
//! two are fixed palettes.

use serde::{Deserialize, Serialize};

use crate::design::ColorPalette;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariationKind {
    #[serde(rename = "Dark Mode")]
    DarkMode,
    Vibrant,
    Monochrome,
}

impl VariationKind {
    /// Fixed output order.
    pub const ALL: [VariationKind; 3] = [VariationKind::DarkMode, VariationKind::Vibrant, VariationKind::Monochrome];

    pub fn name(self) -> &'static str {
        match self {
            VariationKind::DarkMode => "Dark Mode",
            VariationKind::Vibrant => "Vibrant",
            VariationKind::Monochrome => "Monochrome",
        }
    }

    pub fn palette(self, base: &ColorPalette) -> ColorPalette {
        match self {
            VariationKind::DarkMode => ColorPalette {
                primary: "#f8fafc".to_string(),
                secondary: "#e2e8f0".to_string(),
                accent: base.accent.clone(),
                background: "#0f172a".to_string(),
                text: "#cbd5e1".to_string(),
            },
            VariationKind::Vibrant => ColorPalette::from_hex("#e11d48", "#f59e0b", "#06b6d4", "#fef7f0", "#7c2d12"),
            VariationKind::Monochrome => {
                ColorPalette::from_hex("#1f2937", "#4b5563", "#9ca3af", "#ffffff", "#374151")
            }
        }
    }
}

/// A named alternate palette, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationPlan {
    pub kind: VariationKind,
    pub palette: ColorPalette,
}

/// Derive the three variation palettes from a base palette, in order.
pub fn plan_variations(base: &ColorPalette) -> Vec<VariationPlan> {
    VariationKind::ALL
        .iter()
        .map(|kind| VariationPlan { kind: *kind, palette: kind.palette(base) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::color_palette;

    #[test]
    fn test_names_and_order_are_fixed() {
        for scheme in ["warm", "cool", "neutral", "vibrant", "nonsense"] {
            let names: Vec<_> = plan_variations(&color_palette(scheme, &[]))
                .iter()
                .map(|p| p.kind.name())
                .collect();
            assert_eq!(names, vec!["Dark Mode", "Vibrant", "Monochrome"]);
        }
    }

    #[test]
    fn test_dark_mode_keeps_base_accent() {
        let base = color_palette("warm", &[]);
        let dark = VariationKind::DarkMode.palette(&base);
        assert_eq!(dark.accent, "#ff6b6b");
        assert_eq!(dark.background, "#0f172a");
        assert_eq!(dark.text, "#cbd5e1");
    }

    #[test]
    fn test_vibrant_and_monochrome_ignore_base() {
        let warm = color_palette("warm", &[]);
        let cool = color_palette("cool", &[]);
        for kind in [VariationKind::Vibrant, VariationKind::Monochrome] {
            assert_eq!(kind.palette(&warm), kind.palette(&cool));
        }
        assert_eq!(
            VariationKind::Monochrome.palette(&warm).values(),
            vec!["#1f2937", "#4b5563", "#9ca3af", "#ffffff", "#374151"]
        );
    }

    #[test]
    fn test_kind_serializes_as_display_name() {
        assert_eq!(serde_json::to_string(&VariationKind::DarkMode).unwrap(), r#""Dark Mode""#);
    }
}
