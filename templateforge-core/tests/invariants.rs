//! Contract Invariant Tests
//!
//! These tests verify the guarantees callers rely on.

use chrono::{TimeZone, Utc};

use templateforge_core::{
    compose::{render_template, Scene},
    design::{color_palette, design_rules, typography},
    export::{decode_data_url, filename_slug},
    hashing::content_hash,
    surface::RecordingSurface,
    templates::template_dimensions,
    text::wrap_text,
    variations::plan_variations,
    CancellationToken, ColorScheme, DesignTone, EngineConfig, FixedClock, GenerationError,
    GenerationInputs, SequentialIds, TemplateDimensions, TemplateEngine, TemplateType,
};

fn launch_post() -> GenerationInputs {
    GenerationInputs::new(
        "Launch Post",
        "founders",
        TemplateType::SocialPost,
        DesignTone::Minimalist,
        ColorScheme::Neutral,
    )
}

fn create_engine() -> TemplateEngine {
    TemplateEngine::new(EngineConfig::immediate())
        .with_id_source(SequentialIds::new("tpl"))
        .with_clock(FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()))
}

fn decoded_png(url: &str) -> image::RgbaImage {
    let (mime, bytes) = decode_data_url(url).unwrap();
    assert_eq!(mime, "image/png");
    image::load_from_memory(&bytes).unwrap().to_rgba8()
}

#[test]
fn invariant_dimensions_table() {
    let expected = [
        ("social-post", 1080, 1080),
        ("instagram-story", 1080, 1920),
        ("presentation", 1920, 1080),
        ("flyer", 612, 792),
        ("business-card", 252, 144),
        ("unknown-type", 1080, 1080),
    ];
    for (tag, w, h) in expected {
        assert_eq!(template_dimensions(tag), TemplateDimensions::new(w, h), "{tag}");
    }
}

#[test]
fn invariant_brand_palette_repeats_first_color() {
    let palette = color_palette("brand", &["#111111".to_string()]);
    assert_eq!(palette.values(), vec!["#111111", "#111111", "#111111", "#ffffff", "#1f2937"]);
}

#[test]
fn invariant_cool_palette_fixed() {
    let palette = color_palette("cool", &[]);
    assert_eq!(palette.values(), vec!["#2563eb", "#0891b2", "#06b6d4", "#f0f9ff", "#1e3a8a"]);
}

#[test]
fn invariant_variation_names_and_order() {
    for scheme in ["warm", "cool", "neutral", "vibrant", "nonsense"] {
        let names: Vec<_> = plan_variations(&color_palette(scheme, &[]))
            .iter()
            .map(|p| p.kind.name())
            .collect();
        assert_eq!(names, vec!["Dark Mode", "Vibrant", "Monochrome"]);
    }
}

#[test]
fn invariant_wrap_breaks_on_words() {
    let measure = |s: &str| s.len() as f32 * 10.0;
    let lines = wrap_text("aaaa bbbb cccc dddd", 100.0, 60.0, 30.0, measure);
    let ys: Vec<_> = lines.iter().map(|l| l.y).collect();
    assert_eq!(ys, vec![100.0, 130.0, 160.0, 190.0]);
    for line in &lines {
        assert!(measure(&line.text) <= 60.0);
    }

    let short = wrap_text("hi", 100.0, 60.0, 30.0, measure);
    assert_eq!(short.len(), 1);
    assert_eq!(short[0].y, 100.0);
}

#[test]
fn invariant_filename_slug() {
    assert_eq!(filename_slug("My Great Template"), "my-great-template");
}

#[test]
fn invariant_generation_idempotent() {
    let engine = create_engine();
    let cancel = CancellationToken::new();

    for &template_type in TemplateType::ALL {
        for tone in [DesignTone::Minimalist, DesignTone::Creative] {
            let inputs = GenerationInputs::new("Launch Post", "founders", template_type, tone, ColorScheme::Warm);
            let first = engine.generate_blocking(&inputs, &cancel).unwrap();
            let second = engine.generate_blocking(&inputs, &cancel).unwrap();
            let case = format!("{template_type}/{tone}");

            assert_ne!(first.id, second.id);
            assert_eq!(first.metadata.content_hash, second.metadata.content_hash, "{case}");
            assert_eq!(first.metadata.job_hash, second.metadata.job_hash, "{case}");
            assert_eq!(first.preview, second.preview, "{case}");
            assert_eq!(first.downloads.png.size, second.downloads.png.size, "{case}");
            assert_eq!(first.metadata.dimensions, second.metadata.dimensions, "{case}");
            for (a, b) in first.variations.iter().zip(&second.variations) {
                assert_eq!(a.preview, b.preview, "{case} {}", a.name);
            }
        }
    }
}

#[test]
fn invariant_content_hash_matches_preview_pixels() {
    let template = create_engine().generate_blocking(&launch_post(), &CancellationToken::new()).unwrap();
    let image = decoded_png(&template.preview);
    assert_eq!(
        content_hash(image.width(), image.height(), image.as_raw()),
        template.metadata.content_hash
    );
}

#[test]
fn invariant_launch_post_scenario() {
    let inputs = launch_post();
    let template = create_engine().generate_blocking(&inputs, &CancellationToken::new()).unwrap();

    assert_eq!(template.metadata.dimensions, TemplateDimensions::new(1080, 1080));
    assert_eq!(
        template.metadata.colors,
        vec!["#374151", "#6b7280", "#059669", "#ffffff", "#1f2937"]
    );
    assert!(template.metadata.fonts.iter().all(|f| f.starts_with("Roboto")));
    assert_eq!(template.variations.len(), 3);
    assert_eq!(template.downloads.png.size, "1080×1080");
    assert_eq!(template.downloads.png.filename, "launch-post.png");

    let image = decoded_png(&template.preview);
    assert_eq!((image.width(), image.height()), (1080, 1080));

    // Same scene on a recording surface: no accent geometry.
    let dimensions = template_dimensions(&inputs.template_type);
    let rules = design_rules(&inputs.design_tone);
    let palette = color_palette(&inputs.color_scheme, inputs.brand_colors()).resolve().unwrap();
    let fonts = typography(&inputs.design_tone);
    let mut surface = RecordingSurface::new(dimensions);
    render_template(
        &mut surface,
        &Scene { dimensions, rules: &rules, palette: &palette, typography: &fonts, inputs: &inputs },
    );
    assert_eq!(surface.translucent_shapes(), 0);
    assert_eq!(surface.circles(), 0);
}

#[test]
fn invariant_downloads_placeholders() {
    let template = create_engine().generate_blocking(&launch_post(), &CancellationToken::new()).unwrap();
    assert_eq!(template.downloads.pdf.url, template.downloads.png.url);
    assert_eq!(template.preview, template.downloads.png.url);
    assert!(template.editable_elements.texts.is_empty());
    assert!(template.editable_elements.shapes.is_empty());
}

#[test]
fn invariant_injected_clock_and_ids() {
    let template = create_engine().generate_blocking(&launch_post(), &CancellationToken::new()).unwrap();
    assert_eq!(template.metadata.generated_at, Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());
    assert_eq!(template.id, "tpl-1");
    let ids: Vec<_> = template.variations.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["tpl-2", "tpl-3", "tpl-4"]);
}

#[test]
fn invariant_unknown_tags_never_fail() {
    let mut inputs = launch_post();
    inputs.template_type = "poster".to_string();
    inputs.design_tone = "grunge".to_string();
    inputs.color_scheme = "sepia".to_string();

    let template = create_engine().generate_blocking(&inputs, &CancellationToken::new()).unwrap();
    assert_eq!(template.metadata.dimensions, TemplateDimensions::new(1080, 1080));
    assert_eq!(template.metadata.colors, color_palette("neutral", &[]).values());
    assert!(template.metadata.fonts.iter().all(|f| f.starts_with("Inter")));
    assert_eq!(template.metadata.template_type, "poster");
}

#[test]
fn invariant_failure_has_no_partial_result() {
    let mut inputs = launch_post().with_brand_colors(["#12345"]);
    inputs.color_scheme = "brand".to_string();
    let err = create_engine().generate_blocking(&inputs, &CancellationToken::new()).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidColor(_)));

    let engine = TemplateEngine::new(EngineConfig::immediate().with_max_surface_pixels(1080 * 1079));
    let err = engine.generate_blocking(&launch_post(), &CancellationToken::new()).unwrap_err();
    assert!(matches!(err, GenerationError::SurfaceAllocation(_)));
}

#[test]
fn invariant_cancelled_before_render() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = create_engine().generate_blocking(&launch_post(), &cancel).unwrap_err();
    assert!(matches!(err, GenerationError::Cancelled));
}

#[tokio::test]
async fn invariant_async_generation() {
    let template = create_engine()
        .generate_template(&launch_post(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(template.id, "tpl-1");
    assert_eq!(template.variations.len(), 3);
}

#[tokio::test]
async fn invariant_cancel_during_simulated_latency() {
    let engine = TemplateEngine::new(EngineConfig::default());
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let err = engine.generate_template(&launch_post(), &cancel).await.unwrap_err();
    assert!(matches!(err, GenerationError::Cancelled));
}
