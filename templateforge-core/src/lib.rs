//! TemplateForge Core - Template Rendering & Variation Engine
//!
//! Turns a handful of semantic inputs (name, audience, archetype, tone,
//! color scheme) into a rendered marketing template preview, three color
//! variations and a bundle of download artifacts.
//!
//! # Guarantees
//! 1. Unknown tags degrade to fallbacks, never to errors
//! 2. Equal inputs render equal pixels
//! 3. A failed or cancelled generation yields nothing partial
//! 4. Variations are always Dark Mode, Vibrant, Monochrome

pub mod templates;
pub mod design;
pub mod glyphs;
pub mod surface;
pub mod text;
pub mod compose;
pub mod variations;
pub mod export;
pub mod hashing;
pub mod sources;
pub mod config;
pub mod validation;
pub mod pipeline;

pub use templates::{ColorScheme, DesignTone, GenerationInputs, TemplateDimensions, TemplateType};
pub use design::{ColorPalette, DesignRules, Typography};
pub use config::{ConfigError, EngineConfig, LatencyConfig};
pub use validation::{FailureMode, InputValidator, ValidationResult, ValidationRule, ValidationViolation, ViolationSeverity};
pub use pipeline::{GeneratedTemplate, GenerationError, TemplateEngine, TemplateMetadata, TemplateVariation};
pub use sources::{Clock, FixedClock, IdSource, SequentialIds};

pub use tokio_util::sync::CancellationToken;

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
