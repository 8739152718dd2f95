//! Template Types - Inputs and Canvas Dimensions
//!
//! Tags arrive as plain strings. Known tags are modelled as enums; anything
//! else degrades to a documented fallback instead of failing.

use serde::{Deserialize, Serialize};

/// Semantic inputs for one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationInputs {
    pub template_name: String,
    pub target_audience: String,
    pub template_type: String,
    pub design_tone: String,
    pub color_scheme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_colors: Option<Vec<String>>,
}

impl GenerationInputs {
    pub fn new(
        template_name: impl Into<String>,
        target_audience: impl Into<String>,
        template_type: TemplateType,
        design_tone: DesignTone,
        color_scheme: ColorScheme,
    ) -> Self {
        Self {
            template_name: template_name.into(),
            target_audience: target_audience.into(),
            template_type: template_type.as_tag().to_string(),
            design_tone: design_tone.as_tag().to_string(),
            color_scheme: color_scheme.as_tag().to_string(),
            brand_colors: None,
        }
    }

    pub fn with_brand_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brand_colors = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    /// Brand colors as a slice; absent and empty are the same thing.
    pub fn brand_colors(&self) -> &[String] {
        self.brand_colors.as_deref().unwrap_or(&[])
    }
}

macro_rules! tag_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_tag(self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }

            /// Exact, case-sensitive match against the known tags.
            pub fn from_tag(tag: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_tag() == tag)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_tag())
            }
        }
    };
}

tag_enum!(
    /// The five archetypes a template can be rendered as.
    TemplateType {
        SocialPost => "social-post",
        InstagramStory => "instagram-story",
        Presentation => "presentation",
        Flyer => "flyer",
        BusinessCard => "business-card",
    }
);

tag_enum!(
    /// Qualitative style tag driving rules and typography.
    DesignTone {
        Professional => "professional",
        Creative => "creative",
        Minimalist => "minimalist",
        Bold => "bold",
        Elegant => "elegant",
    }
);

tag_enum!(
    /// Palette-selection tag.
    ColorScheme {
        Brand => "brand",
        Warm => "warm",
        Cool => "cool",
        Neutral => "neutral",
        Vibrant => "vibrant",
    }
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateDimensions {
    pub width: u32,
    pub height: u32,
}

impl TemplateDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `"<w>×<h>"`, the size label used on download records.
    pub fn label(&self) -> String {
        format!("{}×{}", self.width, self.height)
    }
}

/// Flyer and business card are letter and 3.5x2" at 72 DPI.
const DIMENSIONS: &[(TemplateType, TemplateDimensions)] = &[
    (TemplateType::SocialPost, TemplateDimensions::new(1080, 1080)),
    (TemplateType::InstagramStory, TemplateDimensions::new(1080, 1920)),
    (TemplateType::Presentation, TemplateDimensions::new(1920, 1080)),
    (TemplateType::Flyer, TemplateDimensions::new(612, 792)),
    (TemplateType::BusinessCard, TemplateDimensions::new(252, 144)),
];

pub const FALLBACK_TEMPLATE_TYPE: TemplateType = TemplateType::SocialPost;

/// Resolve canvas dimensions for a template-type tag.
///
/// Unknown tags fall back to the social-post square.
pub fn template_dimensions(template_type: &str) -> TemplateDimensions {
    let kind = TemplateType::from_tag(template_type).unwrap_or(FALLBACK_TEMPLATE_TYPE);
    DIMENSIONS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, d)| *d)
        .unwrap_or(TemplateDimensions::new(1080, 1080))
}
