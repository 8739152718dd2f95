//! Generation Pipeline - Single Entry Point
//!
//! inputs -> lookups -> base render -> variations -> downloads.
//! Any failure aborts the whole call; there are no partial templates.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use image::ImageError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, debug_span, warn};

use crate::compose::{render_template, Scene};
use crate::config::EngineConfig;
use crate::design::{color_palette, design_rules, typography, ColorError, ColorPalette, DesignRules, Typography};
use crate::export::{
    bundle_downloads, data_url, decode_data_url, disk_file_name, encode_png, filename_slug, Downloads,
};
use crate::hashing::{compute_job_hash, content_hash};
use crate::sources::{Clock, IdSource, SystemClock, UuidIds};
use crate::surface::{RasterSurface, SurfaceError};
use crate::templates::{template_dimensions, ColorScheme, DesignTone, GenerationInputs, TemplateDimensions, TemplateType};
use crate::variations::{plan_variations, VariationPlan};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Failed to generate template: {0}")]
    SurfaceAllocation(#[from] SurfaceError),

    #[error("Failed to generate template: {0}")]
    InvalidColor(#[from] ColorError),

    #[error("Failed to encode template artifacts: {0}")]
    EncodingError(#[from] ImageError),

    #[error("Failed to generate template: {0}")]
    WorkerError(String),

    #[error("Template generation was cancelled")]
    Cancelled,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTemplate {
    pub id: String,
    pub preview: String,
    pub metadata: TemplateMetadata,
    pub downloads: Downloads,
    pub variations: Vec<TemplateVariation>,
    pub editable_elements: EditableElements,
}

impl GeneratedTemplate {
    /// Decode every download and variation preview into `dir`.
    ///
    /// Variations land as `<slug>-<variation-slug>.png`. File names are
    /// passed through [`disk_file_name`], so every file is a direct child of
    /// `dir` whatever the template name holds. Returns the written paths in
    /// download order, then variation order.
    pub fn save_artifacts(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let slug = filename_slug(&self.metadata.name);

        let variation_files: Vec<(String, &str)> = self
            .variations
            .iter()
            .map(|v| (format!("{}-{}.png", slug, filename_slug(&v.name)), v.preview.as_str()))
            .collect();

        let downloads = self.downloads.artifacts();
        let files = downloads
            .iter()
            .copied()
            .chain(variation_files.iter().map(|(name, url)| (name.as_str(), *url)));

        let mut written = vec![];
        for (filename, url) in files {
            let (_, bytes) = decode_data_url(url).ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, format!("{filename} is not a data URL"))
            })?;
            let name = disk_file_name(filename);
            let mut components = Path::new(&name).components();
            if !matches!((components.next(), components.next()), (Some(Component::Normal(_)), None)) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{filename} is not a plain file name"),
                ));
            }
            let path = dir.join(name);
            fs::write(&path, bytes)?;
            written.push(path);
        }
        Ok(written)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub name: String,
    pub dimensions: TemplateDimensions,
    #[serde(rename = "type")]
    pub template_type: String,
    pub tone: String,
    pub colors: Vec<String>,
    pub fonts: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub engine_version: String,
    pub job_hash: String,
    pub content_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariation {
    pub id: String,
    pub name: String,
    pub preview: String,
    pub color_scheme: Vec<String>,
}

/// Reserved for in-place editing; `texts` and `shapes` are never populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditableElements {
    pub texts: Vec<TextElement>,
    pub shapes: Vec<ShapeElement>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: String,
    pub content: String,
    pub font_size: f32,
    pub font_family: String,
    pub color: String,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub color: String,
    pub position: Position,
    pub size: Size,
}

/// Resolved lookups shared by the base render and every variation.
struct Design<'a> {
    dimensions: TemplateDimensions,
    rules: DesignRules,
    typography: Typography,
    inputs: &'a GenerationInputs,
}

struct RenderedVariation {
    plan: VariationPlan,
    preview: String,
}

/// The generation engine - single entry point for template rendering
#[derive(Clone)]
pub struct TemplateEngine {
    config: EngineConfig,
    ids: Arc<dyn IdSource>,
    clock: Arc<dyn Clock>,
}

impl TemplateEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ids: Arc::new(UuidIds),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate a template after the configured simulated latency.
    ///
    /// Rendering runs on the blocking pool. Cancelling the token during the
    /// delay, or at any render boundary, yields `Cancelled`.
    pub async fn generate_template(
        &self,
        inputs: &GenerationInputs,
        cancel: &CancellationToken,
    ) -> Result<GeneratedTemplate, GenerationError> {
        let delay = self.config.simulated_latency.sample();
        if !delay.is_zero() {
            debug!(delay_ms = delay.as_millis() as u64, "Simulating generation latency");
            tokio::select! {
                _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }

        let engine = self.clone();
        let inputs = inputs.clone();
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || engine.generate_blocking(&inputs, &cancel))
            .await
            .map_err(|e| GenerationError::WorkerError(e.to_string()))?
    }

    /// Synchronous generation without the simulated latency.
    pub fn generate_blocking(
        &self,
        inputs: &GenerationInputs,
        cancel: &CancellationToken,
    ) -> Result<GeneratedTemplate, GenerationError> {
        let span = debug_span!(
            "generate_template",
            template_type = %inputs.template_type,
            tone = %inputs.design_tone,
            scheme = %inputs.color_scheme,
        );
        let _enter = span.enter();

        self.report_fallbacks(inputs);

        let design = Design {
            dimensions: template_dimensions(&inputs.template_type),
            rules: design_rules(&inputs.design_tone),
            typography: typography(&inputs.design_tone),
            inputs,
        };
        let palette = color_palette(&inputs.color_scheme, inputs.brand_colors());

        check_cancelled(cancel)?;
        let base = self.render(&design, &palette)?;
        debug!(width = design.dimensions.width, height = design.dimensions.height, "Rendered base template");

        check_cancelled(cancel)?;
        let variations = self.render_variations(&design, &palette, cancel)?;

        let downloads = bundle_downloads(base.image(), &inputs.template_name, self.config.jpeg_quality())?;
        debug!(filename = %downloads.png.filename, "Bundled downloads");

        let image = base.image();
        let metadata = TemplateMetadata {
            name: inputs.template_name.clone(),
            dimensions: design.dimensions,
            template_type: inputs.template_type.clone(),
            tone: inputs.design_tone.clone(),
            colors: palette.values(),
            fonts: design.typography.values(),
            generated_at: self.clock.now(),
            engine_version: ENGINE_VERSION.to_string(),
            job_hash: compute_job_hash(inputs, ENGINE_VERSION)?,
            content_hash: content_hash(image.width(), image.height(), image.as_raw()),
        };

        let id = self.ids.next_id();
        let variations = variations
            .into_iter()
            .map(|v| TemplateVariation {
                id: self.ids.next_id(),
                name: v.plan.kind.name().to_string(),
                preview: v.preview,
                color_scheme: v.plan.palette.values(),
            })
            .collect();

        Ok(GeneratedTemplate {
            id,
            preview: downloads.png.url.clone(),
            metadata,
            downloads,
            variations,
            editable_elements: EditableElements {
                texts: vec![],
                shapes: vec![],
                colors: palette.values(),
            },
        })
    }

    fn render(&self, design: &Design<'_>, palette: &ColorPalette) -> Result<RasterSurface, GenerationError> {
        let resolved = palette.resolve()?;
        let mut surface = RasterSurface::new(design.dimensions, self.config.max_surface_pixels)?;
        let scene = Scene {
            dimensions: design.dimensions,
            rules: &design.rules,
            palette: &resolved,
            typography: &design.typography,
            inputs: design.inputs,
        };
        render_template(&mut surface, &scene);
        Ok(surface)
    }

    /// Render the three variations; output order is fixed even when they
    /// are rendered in parallel.
    fn render_variations(
        &self,
        design: &Design<'_>,
        base: &ColorPalette,
        cancel: &CancellationToken,
    ) -> Result<Vec<RenderedVariation>, GenerationError> {
        let render_one = |plan: VariationPlan| -> Result<RenderedVariation, GenerationError> {
            check_cancelled(cancel)?;
            let surface = self.render(design, &plan.palette)?;
            let preview = data_url("image/png", &encode_png(surface.image())?);
            debug!(variation = plan.kind.name(), "Rendered variation");
            Ok(RenderedVariation { plan, preview })
        };

        let plans = plan_variations(base);
        if self.config.parallel_variations {
            plans.into_par_iter().map(render_one).collect()
        } else {
            plans.into_iter().map(render_one).collect()
        }
    }

    fn report_fallbacks(&self, inputs: &GenerationInputs) {
        let scheme = ColorScheme::from_tag(&inputs.color_scheme);
        let fallbacks = [
            ("templateType", &inputs.template_type, TemplateType::from_tag(&inputs.template_type).is_none()),
            ("designTone", &inputs.design_tone, DesignTone::from_tag(&inputs.design_tone).is_none()),
            ("colorScheme", &inputs.color_scheme, scheme.is_none()),
            (
                "brandColors",
                &inputs.color_scheme,
                scheme == Some(ColorScheme::Brand) && inputs.brand_colors().is_empty(),
            ),
        ];

        for (field, value, fell_back) in fallbacks {
            if !fell_back {
                continue;
            }
            if self.config.warn_on_fallback {
                warn!(field, value = %value, "Unrecognized input, using fallback");
            } else {
                debug!(field, value = %value, "Unrecognized input, using fallback");
            }
        }
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn check_cancelled(cancel: &CancellationToken) -> Result<(), GenerationError> {
    if cancel.is_cancelled() {
        Err(GenerationError::Cancelled)
    } else {
        Ok(())
    }
}
