//! Engine configuration, loadable from a JSON file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub simulated_latency: LatencyConfig,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default = "default_true")]
    pub parallel_variations: bool,
    #[serde(default)]
    pub warn_on_fallback: bool,
    #[serde(default = "default_max_surface_pixels")]
    pub max_surface_pixels: u64,
}

fn default_true() -> bool { true }
fn default_jpeg_quality() -> u8 { 90 }
fn default_max_surface_pixels() -> u64 { 4096 * 4096 }

/// Artificial delay awaited before every generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyConfig {
    #[serde(default = "default_base_ms")]
    pub base_ms: u64,
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

fn default_base_ms() -> u64 { 3000 }
fn default_jitter_ms() -> u64 { 2000 }

impl Default for LatencyConfig {
    fn default() -> Self {
        Self { base_ms: default_base_ms(), jitter_ms: default_jitter_ms() }
    }
}

impl LatencyConfig {
    pub const NONE: LatencyConfig = LatencyConfig { base_ms: 0, jitter_ms: 0 };

    /// Base delay plus a uniform draw from `0..jitter_ms`.
    pub fn sample(&self) -> Duration {
        let jitter = if self.jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..self.jitter_ms)
        };
        Duration::from_millis(self.base_ms + jitter)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            simulated_latency: LatencyConfig::default(),
            jpeg_quality: default_jpeg_quality(),
            parallel_variations: true,
            warn_on_fallback: false,
            max_surface_pixels: default_max_surface_pixels(),
        }
    }
}

impl EngineConfig {
    /// Defaults without the simulated latency.
    pub fn immediate() -> Self {
        Self { simulated_latency: LatencyConfig::NONE, ..Self::default() }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn with_parallel_variations(mut self, parallel: bool) -> Self {
        self.parallel_variations = parallel;
        self
    }

    pub fn with_warn_on_fallback(mut self, warn: bool) -> Self {
        self.warn_on_fallback = warn;
        self
    }

    pub fn with_max_surface_pixels(mut self, max: u64) -> Self {
        self.max_surface_pixels = max;
        self
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }
}
