//! Composition - per-archetype layouts
//!
//! Each archetype is a pure function of the scene: no randomness and no
//! clock reads, so identical scenes draw identical pixels.

use crate::design::{DesignRules, ResolvedPalette, Typography};
use crate::surface::{Font, LinearGradient, Rect, Surface, TextAlign};
use crate::templates::{DesignTone, GenerationInputs, TemplateDimensions, TemplateType};
use crate::text::{draw_wrapped, TextBlock};

/// Fixed attribution mark on social posts.
pub const ATTRIBUTION_MARK: &str = "Created by CoachPro AI";

/// Opacity of social-post accent geometry.
const ACCENT_ALPHA: f32 = 0.7;

/// Everything a layout needs to draw one template.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub dimensions: TemplateDimensions,
    pub rules: &'a DesignRules,
    pub palette: &'a ResolvedPalette,
    pub typography: &'a Typography,
    pub inputs: &'a GenerationInputs,
}

impl Scene<'_> {
    fn size(&self) -> (f32, f32) {
        (self.dimensions.width as f32, self.dimensions.height as f32)
    }
}

/// Layout for one template archetype.
pub trait Archetype: Send + Sync {
    fn template_type(&self) -> TemplateType;
    fn render(&self, surface: &mut dyn Surface, scene: &Scene<'_>);
}

pub struct SocialPost;
pub struct InstagramStory;
pub struct Presentation;
pub struct Flyer;
pub struct BusinessCard;

static ARCHETYPES: [&(dyn Archetype); 5] = [&SocialPost, &InstagramStory, &Presentation, &Flyer, &BusinessCard];

/// Layout registered for a template-type tag, if the tag is known.
pub fn archetype_for(template_type: &str) -> Option<&'static dyn Archetype> {
    let kind = TemplateType::from_tag(template_type)?;
    ARCHETYPES.iter().copied().find(|a| a.template_type() == kind)
}

/// Draw a full template: solid background, then the archetype layout.
///
/// An unrecognised template type leaves just the background.
pub fn render_template(surface: &mut dyn Surface, scene: &Scene<'_>) {
    let (width, height) = scene.size();
    surface.fill_rect(Rect::new(0.0, 0.0, width, height), scene.palette.background, 1.0);

    if let Some(archetype) = archetype_for(&scene.inputs.template_type) {
        archetype.render(surface, scene);
    }
}

impl Archetype for SocialPost {
    fn template_type(&self) -> TemplateType {
        TemplateType::SocialPost
    }

    fn render(&self, surface: &mut dyn Surface, scene: &Scene<'_>) {
        let (width, height) = scene.size();
        let padding = width * 0.08;
        let palette = scene.palette;

        surface.draw_gradient_background(&LinearGradient {
            start: (0.0, 0.0),
            end: (width, height),
            from: palette.background,
            to: palette.background.adjust_brightness(-0.1),
        });

        if !scene.rules.is_centered_balanced() {
            match DesignTone::from_tag(&scene.inputs.design_tone) {
                Some(DesignTone::Professional) => surface.fill_rect(
                    Rect::new(padding, padding, width - 2.0 * padding, height * 0.15),
                    palette.accent,
                    ACCENT_ALPHA,
                ),
                Some(DesignTone::Creative) => surface.fill_circle(
                    width * 0.8,
                    height * 0.2,
                    width * 0.15,
                    palette.accent,
                    ACCENT_ALPHA,
                ),
                _ => {}
            }
        }

        let title_y = if scene.rules.is_centered_balanced() { height * 0.4 } else { height * 0.5 };
        let heading = Font::bold(scene.typography.heading, width * 0.08);
        draw_wrapped(
            surface,
            &scene.inputs.template_name,
            &TextBlock {
                x: width / 2.0,
                y: title_y,
                max_width: width - 2.0 * padding,
                line_height: width * 0.1,
                font: &heading,
                align: TextAlign::Center,
                color: palette.primary,
            },
        );

        let body = Font::regular(scene.typography.body, width * 0.04);
        draw_wrapped(
            surface,
            &scene.inputs.target_audience,
            &TextBlock {
                x: width / 2.0,
                y: title_y + width * 0.15,
                max_width: width - 2.0 * padding,
                line_height: width * 0.05,
                font: &body,
                align: TextAlign::Center,
                color: palette.text,
            },
        );

        let mark = Font::regular(scene.typography.accent, width * 0.025);
        surface.draw_text(
            ATTRIBUTION_MARK,
            width - padding,
            height - padding,
            &mark,
            TextAlign::Right,
            palette.accent,
        );
    }
}

impl Archetype for InstagramStory {
    fn template_type(&self) -> TemplateType {
        TemplateType::InstagramStory
    }

    fn render(&self, surface: &mut dyn Surface, scene: &Scene<'_>) {
        let (width, height) = scene.size();
        let padding = width * 0.08;
        let palette = scene.palette;

        surface.draw_gradient_background(&LinearGradient {
            start: (0.0, 0.0),
            end: (0.0, height),
            from: palette.primary,
            to: palette.secondary,
        });

        // content panel
        surface.fill_rect(
            Rect::new(padding, height * 0.2, width - 2.0 * padding, height * 0.6),
            palette.background,
            1.0,
        );

        let heading = Font::bold(scene.typography.heading, width * 0.07);
        draw_wrapped(
            surface,
            &scene.inputs.template_name,
            &TextBlock {
                x: width / 2.0,
                y: height * 0.4,
                max_width: width - 2.0 * padding,
                line_height: width * 0.08,
                font: &heading,
                align: TextAlign::Center,
                color: palette.text,
            },
        );

        let body = Font::regular(scene.typography.body, width * 0.04);
        draw_wrapped(
            surface,
            &scene.inputs.target_audience,
            &TextBlock {
                x: width / 2.0,
                y: height * 0.6,
                max_width: width - 4.0 * padding,
                line_height: width * 0.05,
                font: &body,
                align: TextAlign::Center,
                color: palette.text,
            },
        );
    }
}

impl Archetype for Presentation {
    fn template_type(&self) -> TemplateType {
        TemplateType::Presentation
    }

    fn render(&self, surface: &mut dyn Surface, scene: &Scene<'_>) {
        let (width, height) = scene.size();
        let padding = width * 0.05;
        let palette = scene.palette;

        surface.fill_rect(Rect::new(0.0, 0.0, width, height), palette.background, 1.0);
        // header bar
        surface.fill_rect(Rect::new(0.0, 0.0, width, height * 0.12), palette.primary, 1.0);

        let heading = Font::bold(scene.typography.heading, height * 0.05);
        surface.draw_text(
            &scene.inputs.template_name,
            padding,
            height * 0.08,
            &heading,
            TextAlign::Left,
            palette.background,
        );

        let body = Font::regular(scene.typography.body, height * 0.03);
        draw_wrapped(
            surface,
            &scene.inputs.target_audience,
            &TextBlock {
                x: padding,
                y: height * 0.25,
                max_width: width - 2.0 * padding,
                line_height: height * 0.04,
                font: &body,
                align: TextAlign::Left,
                color: palette.text,
            },
        );

        surface.fill_rect(Rect::new(padding, height * 0.5, width * 0.4, height * 0.02), palette.accent, 1.0);
        surface.fill_rect(Rect::new(padding, height * 0.6, width * 0.3, height * 0.02), palette.accent, 1.0);
    }
}

impl Archetype for Flyer {
    fn template_type(&self) -> TemplateType {
        TemplateType::Flyer
    }

    fn render(&self, surface: &mut dyn Surface, scene: &Scene<'_>) {
        let (width, height) = scene.size();
        let padding = width * 0.08;
        let palette = scene.palette;

        surface.fill_rect(Rect::new(0.0, 0.0, width, height), palette.background, 1.0);
        surface.fill_rect(Rect::new(0.0, 0.0, width, height * 0.25), palette.primary, 1.0);

        let heading = Font::bold(scene.typography.heading, width * 0.06);
        draw_wrapped(
            surface,
            &scene.inputs.template_name,
            &TextBlock {
                x: width / 2.0,
                y: height * 0.15,
                max_width: width - 2.0 * padding,
                line_height: width * 0.07,
                font: &heading,
                align: TextAlign::Center,
                color: palette.background,
            },
        );

        let body = Font::regular(scene.typography.body, width * 0.035);
        draw_wrapped(
            surface,
            &scene.inputs.target_audience,
            &TextBlock {
                x: width / 2.0,
                y: height * 0.5,
                max_width: width - 2.0 * padding,
                line_height: width * 0.04,
                font: &body,
                align: TextAlign::Center,
                color: palette.text,
            },
        );
    }
}

impl Archetype for BusinessCard {
    fn template_type(&self) -> TemplateType {
        TemplateType::BusinessCard
    }

    fn render(&self, surface: &mut dyn Surface, scene: &Scene<'_>) {
        let (width, height) = scene.size();
        let padding = width * 0.08;
        let palette = scene.palette;

        surface.fill_rect(Rect::new(0.0, 0.0, width, height), palette.background, 1.0);
        // accent band
        surface.fill_rect(Rect::new(0.0, 0.0, width, height * 0.15), palette.accent, 1.0);

        let heading = Font::bold(scene.typography.heading, height * 0.12);
        surface.draw_text(
            &scene.inputs.template_name,
            padding,
            height * 0.4,
            &heading,
            TextAlign::Left,
            palette.primary,
        );

        let body = Font::regular(scene.typography.body, height * 0.08);
        draw_wrapped(
            surface,
            &scene.inputs.target_audience,
            &TextBlock {
                x: padding,
                y: height * 0.65,
                max_width: width - 2.0 * padding,
                line_height: height * 0.09,
                font: &body,
                align: TextAlign::Left,
                color: palette.text,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{color_palette, design_rules, typography, Color};
    use crate::surface::{DrawOp, RecordingSurface};
    use crate::templates::{template_dimensions, ColorScheme};

    fn record(inputs: &GenerationInputs) -> RecordingSurface {
        let dimensions = template_dimensions(&inputs.template_type);
        let rules = design_rules(&inputs.design_tone);
        let palette = color_palette(&inputs.color_scheme, inputs.brand_colors()).resolve().unwrap();
        let typography = typography(&inputs.design_tone);
        let scene = Scene { dimensions, rules: &rules, palette: &palette, typography: &typography, inputs };
        let mut surface = RecordingSurface::new(dimensions);
        render_template(&mut surface, &scene);
        surface
    }

    fn inputs(kind: TemplateType, tone: DesignTone) -> GenerationInputs {
        GenerationInputs::new("Launch Post", "founders", kind, tone, ColorScheme::Neutral)
    }

    #[test]
    fn test_every_type_has_an_archetype() {
        for kind in TemplateType::ALL {
            let archetype = archetype_for(kind.as_tag()).unwrap();
            assert_eq!(archetype.template_type(), *kind);
        }
        assert!(archetype_for("poster").is_none());
    }

    #[test]
    fn test_background_is_painted_first() {
        let surface = record(&inputs(TemplateType::Flyer, DesignTone::Bold));
        match &surface.ops()[0] {
            DrawOp::FillRect { rect, color, alpha } => {
                assert_eq!((rect.width, rect.height), (612.0, 792.0));
                assert_eq!(*color, Color::rgb(255, 255, 255));
                assert_eq!(*alpha, 1.0);
            }
            other => panic!("expected background fill, got {other:?}"),
        }
    }

    #[test]
    fn test_social_post_accent_by_tone() {
        let professional = record(&inputs(TemplateType::SocialPost, DesignTone::Professional));
        assert_eq!(professional.translucent_shapes(), 1);
        assert_eq!(professional.circles(), 0);

        let creative = record(&inputs(TemplateType::SocialPost, DesignTone::Creative));
        assert_eq!(creative.circles(), 1);

        let bold = record(&inputs(TemplateType::SocialPost, DesignTone::Bold));
        assert_eq!(bold.translucent_shapes(), 0);
    }

    #[test]
    fn test_minimalist_suppresses_accent_and_raises_title() {
        let surface = record(&inputs(TemplateType::SocialPost, DesignTone::Minimalist));
        assert_eq!(surface.translucent_shapes(), 0);
        assert_eq!(surface.circles(), 0);

        let lines = surface.text_lines();
        assert_eq!(lines[0], ("Launch Post ", 1080.0 * 0.4));
        assert_eq!(lines[1].1, 1080.0 * 0.4 + 1080.0 * 0.15);
        assert_eq!(lines.last().unwrap().0, ATTRIBUTION_MARK);
    }

    #[test]
    fn test_title_scales_with_canvas() {
        let post = record(&inputs(TemplateType::SocialPost, DesignTone::Bold));
        let card = record(&inputs(TemplateType::BusinessCard, DesignTone::Bold));
        let title_size = |s: &RecordingSurface| {
            s.ops()
                .iter()
                .find_map(|op| match op {
                    DrawOp::Text { font, .. } if font.bold => Some(font.size),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(title_size(&post), 1080.0 * 0.08);
        assert_eq!(title_size(&card), 144.0 * 0.12);
    }

    #[test]
    fn test_presentation_title_is_single_line() {
        let mut long = inputs(TemplateType::Presentation, DesignTone::Professional);
        long.template_name = "A very long presentation title that would certainly wrap".repeat(4);
        let surface = record(&long);
        let titles: Vec<_> = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Text { font, .. } if font.bold))
            .collect();
        assert_eq!(titles.len(), 1);
    }

    #[test]
    fn test_unknown_type_draws_background_only() {
        let mut unknown = inputs(TemplateType::SocialPost, DesignTone::Bold);
        unknown.template_type = "poster".to_string();
        let surface = record(&unknown);
        assert_eq!(surface.ops().len(), 1);
    }
}
