//! Design Strategy - Rules, Palettes, Typography
//!
//! Pure lookup tables keyed by tag. Every lookup is total: unknown tags
//! resolve to the documented fallback entry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::templates::{ColorScheme, DesignTone};

// --- Rules ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DesignRules {
    pub layout: &'static str,
    pub spacing: &'static str,
    pub shapes: &'static str,
    pub hierarchy: &'static str,
}

/// Layout tag of the minimalist rule set; suppresses accent geometry.
pub const CENTERED_BALANCED: &str = "centered-balanced";

impl DesignRules {
    pub fn is_centered_balanced(&self) -> bool {
        self.layout == CENTERED_BALANCED
    }
}

const RULES: &[(DesignTone, DesignRules)] = &[
    (
        DesignTone::Professional,
        DesignRules {
            layout: "grid-aligned",
            spacing: "generous-padding",
            shapes: "geometric-clean",
            hierarchy: "clear-structure",
        },
    ),
    (
        DesignTone::Creative,
        DesignRules {
            layout: "asymmetrical-dynamic",
            spacing: "varied-rhythm",
            shapes: "organic-artistic",
            hierarchy: "expressive-flow",
        },
    ),
    (
        DesignTone::Minimalist,
        DesignRules {
            layout: CENTERED_BALANCED,
            spacing: "maximum-whitespace",
            shapes: "essential-only",
            hierarchy: "subtle-elegant",
        },
    ),
    (
        DesignTone::Bold,
        DesignRules {
            layout: "impact-focused",
            spacing: "tight-energetic",
            shapes: "strong-geometric",
            hierarchy: "dramatic-contrast",
        },
    ),
    (
        DesignTone::Elegant,
        DesignRules {
            layout: "refined-balanced",
            spacing: "sophisticated-flow",
            shapes: "graceful-curves",
            hierarchy: "polished-structure",
        },
    ),
];

pub const FALLBACK_TONE: DesignTone = DesignTone::Professional;

fn lookup<K: PartialEq + Copy, V: Copy>(table: &[(K, V)], key: K) -> V {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(table[0].1, |(_, v)| *v)
}

/// Select the layout rule record for a design-tone tag.
pub fn design_rules(design_tone: &str) -> DesignRules {
    lookup(RULES, DesignTone::from_tag(design_tone).unwrap_or(FALLBACK_TONE))
}

// --- Palettes ---

/// Five-role palette of hex color strings. All roles are always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

impl ColorPalette {
    pub fn from_hex(primary: &str, secondary: &str, accent: &str, background: &str, text: &str) -> Self {
        Self {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            accent: accent.to_string(),
            background: background.to_string(),
            text: text.to_string(),
        }
    }

    /// Role values in primary, secondary, accent, background, text order.
    pub fn values(&self) -> Vec<String> {
        vec![
            self.primary.clone(),
            self.secondary.clone(),
            self.accent.clone(),
            self.background.clone(),
            self.text.clone(),
        ]
    }

    /// Parse every role, failing on the first invalid one.
    pub fn resolve(&self) -> Result<ResolvedPalette, ColorError> {
        Ok(ResolvedPalette {
            primary: Color::from_hex(&self.primary)?,
            secondary: Color::from_hex(&self.secondary)?,
            accent: Color::from_hex(&self.accent)?,
            background: Color::from_hex(&self.background)?,
            text: Color::from_hex(&self.text)?,
        })
    }
}

/// A palette whose roles have been parsed into drawable colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPalette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub background: Color,
    pub text: Color,
}

pub const BRAND_BACKGROUND: &str = "#ffffff";
pub const BRAND_TEXT: &str = "#1f2937";

const PRESET_PALETTES: &[(ColorScheme, [&str; 5])] = &[
    (ColorScheme::Warm, ["#dc2626", "#f59e0b", "#ff6b6b", "#fef7f0", "#7c2d12"]),
    (ColorScheme::Cool, ["#2563eb", "#0891b2", "#06b6d4", "#f0f9ff", "#1e3a8a"]),
    (ColorScheme::Neutral, ["#374151", "#6b7280", "#059669", "#ffffff", "#1f2937"]),
    (ColorScheme::Vibrant, ["#e11d48", "#7c3aed", "#f59e0b", "#fdf2f8", "#831843"]),
];

pub const FALLBACK_SCHEME: ColorScheme = ColorScheme::Neutral;

/// Build the palette for a color-scheme tag.
///
/// `brand` with at least one color maps the first three brand colors onto
/// primary/secondary/accent (missing or empty ones repeat the first) over a
/// fixed white background and dark text. Anything else is a preset lookup
/// that falls back to `neutral`.
pub fn color_palette(color_scheme: &str, brand_colors: &[String]) -> ColorPalette {
    let scheme = ColorScheme::from_tag(color_scheme);
    if scheme == Some(ColorScheme::Brand) {
        if let Some(first) = brand_colors.first() {
            let pick = |i: usize| {
                brand_colors
                    .get(i)
                    .filter(|c| !c.is_empty())
                    .unwrap_or(first)
                    .clone()
            };
            return ColorPalette {
                primary: first.clone(),
                secondary: pick(1),
                accent: pick(2),
                background: BRAND_BACKGROUND.to_string(),
                text: BRAND_TEXT.to_string(),
            };
        }
    }

    let preset = scheme
        .and_then(|s| PRESET_PALETTES.iter().find(|(k, _)| *k == s))
        .or_else(|| PRESET_PALETTES.iter().find(|(k, _)| *k == FALLBACK_SCHEME))
        .map(|(_, p)| *p)
        .unwrap_or(["#374151", "#6b7280", "#059669", "#ffffff", "#1f2937"]);
    let [p, s, a, b, t] = preset;
    ColorPalette::from_hex(p, s, a, b, t)
}

// --- Typography ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Typography {
    pub heading: &'static str,
    pub body: &'static str,
    pub accent: &'static str,
}

impl Typography {
    pub fn values(&self) -> Vec<String> {
        vec![self.heading.to_string(), self.body.to_string(), self.accent.to_string()]
    }
}

const INTER: &str = "Inter, system-ui, sans-serif";
const POPPINS: &str = "Poppins, system-ui, sans-serif";
const OPEN_SANS: &str = "Open Sans, system-ui, sans-serif";
const ROBOTO: &str = "Roboto, system-ui, sans-serif";
const MONTSERRAT: &str = "Montserrat, system-ui, sans-serif";
const PLAYFAIR: &str = "Playfair Display, serif";
const SOURCE_SANS: &str = "Source Sans Pro, system-ui, sans-serif";

const TYPOGRAPHY: &[(DesignTone, Typography)] = &[
    (DesignTone::Professional, Typography { heading: INTER, body: INTER, accent: INTER }),
    (DesignTone::Creative, Typography { heading: POPPINS, body: OPEN_SANS, accent: POPPINS }),
    (DesignTone::Minimalist, Typography { heading: ROBOTO, body: ROBOTO, accent: ROBOTO }),
    (DesignTone::Bold, Typography { heading: MONTSERRAT, body: MONTSERRAT, accent: MONTSERRAT }),
    (DesignTone::Elegant, Typography { heading: PLAYFAIR, body: SOURCE_SANS, accent: PLAYFAIR }),
];

/// Select the font triple for a design-tone tag.
pub fn typography(design_tone: &str) -> Typography {
    lookup(TYPOGRAPHY, DesignTone::from_tag(design_tone).unwrap_or(FALLBACK_TONE))
}

// --- Colors ---

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid hex color: {0:?}")]
    InvalidHex(String),
}

/// Opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb`, case-insensitive.
    pub fn from_hex(value: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex(value.to_string());
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Shift every channel by `255 * factor`, clamped to the byte range.
    pub fn adjust_brightness(self, factor: f32) -> Self {
        let shift = |c: u8| (c as f32 + 255.0 * factor).clamp(0.0, 255.0).round() as u8;
        Self::rgb(shift(self.r), shift(self.g), shift(self.b))
    }

    /// Linear interpolation towards `other`; `t` is clamped to `0..=1`.
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_single_color_fills_three_roles() {
        let palette = color_palette("brand", &["#111111".to_string()]);
        assert_eq!(
            palette,
            ColorPalette::from_hex("#111111", "#111111", "#111111", "#ffffff", "#1f2937")
        );
    }

    #[test]
    fn test_brand_uses_first_three_colors() {
        let colors: Vec<String> = ["#010101", "#020202", "#030303", "#040404"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let palette = color_palette("brand", &colors);
        assert_eq!(palette.primary, "#010101");
        assert_eq!(palette.secondary, "#020202");
        assert_eq!(palette.accent, "#030303");
        assert_eq!(palette.background, BRAND_BACKGROUND);
    }

    #[test]
    fn test_brand_empty_entries_repeat_first() {
        let colors = vec!["#0a0a0a".to_string(), String::new(), String::new()];
        let palette = color_palette("brand", &colors);
        assert_eq!(palette.secondary, "#0a0a0a");
        assert_eq!(palette.accent, "#0a0a0a");
    }

    #[test]
    fn test_brand_without_colors_is_neutral() {
        assert_eq!(color_palette("brand", &[]), color_palette("neutral", &[]));
    }

    #[test]
    fn test_cool_preset() {
        assert_eq!(
            color_palette("cool", &[]),
            ColorPalette::from_hex("#2563eb", "#0891b2", "#06b6d4", "#f0f9ff", "#1e3a8a")
        );
    }

    #[test]
    fn test_preset_ignores_brand_colors() {
        let colors = vec!["#123456".to_string()];
        assert_eq!(color_palette("warm", &colors).primary, "#dc2626");
    }

    #[test]
    fn test_unknown_scheme_is_neutral() {
        let neutral = ColorPalette::from_hex("#374151", "#6b7280", "#059669", "#ffffff", "#1f2937");
        assert_eq!(color_palette("pastel", &[]), neutral);
        assert_eq!(color_palette("", &[]), neutral);
    }

    #[test]
    fn test_rules_and_typography_fall_back_to_professional() {
        assert_eq!(design_rules("grunge"), design_rules("professional"));
        assert_eq!(typography("grunge"), typography("professional"));
        assert_eq!(design_rules("professional").layout, "grid-aligned");
    }

    #[test]
    fn test_only_minimalist_is_centered_balanced() {
        for tone in DesignTone::ALL {
            let centered = design_rules(tone.as_tag()).is_centered_balanced();
            assert_eq!(centered, *tone == DesignTone::Minimalist, "{tone}");
        }
    }

    #[test]
    fn test_elegant_typography() {
        let t = typography("elegant");
        assert_eq!(t.heading, "Playfair Display, serif");
        assert_eq!(t.body, "Source Sans Pro, system-ui, sans-serif");
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#0F172a").unwrap(), Color::rgb(0x0f, 0x17, 0x2a));
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::rgb(255, 255, 255));
        assert!(Color::from_hex("0f172a").is_err());
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_adjust_brightness_clamps() {
        let white = Color::rgb(255, 255, 255);
        // 255 * -0.1 = -25.5, rounds away from zero
        assert_eq!(white.adjust_brightness(-0.1).to_hex(), "#e6e6e6");
        assert_eq!(Color::rgb(10, 0, 0).adjust_brightness(-0.1), Color::rgb(0, 0, 0));
    }

    #[test]
    fn test_resolve_rejects_bad_brand_color() {
        let palette = color_palette("brand", &["blue".to_string()]);
        assert_eq!(palette.resolve(), Err(ColorError::InvalidHex("blue".to_string())));
    }
}
