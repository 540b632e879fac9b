//! Configuration types for FSM sketching.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file; every key is optional and falls back to the defaults below.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration.
//! - [`CatalogueConfig`] - Where the catalogue lives and which constant holds it.
//! - [`OutputConfig`] - Where `generate` writes its document.
//! - [`StyleConfig`] - State marker and label sizes.
//! - [`CurveConfig`] - Parameters of synthesized transition curves.
//!
//! # Example
//!
//! ```
//! # use fsm_sketch::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.catalogue().binding(), "examples");
//! assert!(config.validate().is_ok());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use fsm_sketch_catalogue::DEFAULT_BINDING;
use fsm_sketch_core::curve::{CurveSynthesizer, DEFAULT_BEND, DEFAULT_LOOP_RADIUS};

/// Default catalogue source file.
pub const DEFAULT_CATALOGUE_PATH: &str = "src/examples.ts";

/// Default destination of `generate`.
pub const DEFAULT_OUTPUT_PATH: &str = "fsm.svg";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    catalogue: CatalogueConfig,

    #[serde(default)]
    output: OutputConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    curve: CurveConfig,
}

impl AppConfig {
    pub fn catalogue(&self) -> &CatalogueConfig {
        &self.catalogue
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn curve(&self) -> &CurveConfig {
        &self.curve
    }

    /// Overrides the catalogue source file.
    pub fn with_catalogue_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalogue.path = path.into();
        self
    }

    /// Overrides the output file.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output.path = path.into();
        self
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending key.
    pub fn validate(&self) -> Result<(), String> {
        if self.catalogue.binding.trim().is_empty() {
            return Err("catalogue.binding must not be empty".to_string());
        }
        positive("style.state_radius", self.style.state_radius)?;
        positive("style.font_size", self.style.font_size)?;
        if !self.curve.bend.is_finite() {
            return Err(format!("curve.bend must be finite, got {}", self.curve.bend));
        }
        positive("curve.loop_radius", self.curve.loop_radius)?;
        Ok(())
    }
}

fn positive(key: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{key} must be a positive number, got {value}"))
    }
}

/// Location of the catalogue source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogueConfig {
    /// Source file holding the catalogue literal.
    path: PathBuf,

    /// Name of the exported constant.
    binding: String,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CATALOGUE_PATH),
            binding: DEFAULT_BINDING.to_string(),
        }
    }
}

impl CatalogueConfig {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn binding(&self) -> &str {
        &self.binding
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl OutputConfig {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Sizes of the elements drawn for each state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Radius of the state circle.
    state_radius: f64,

    /// Font size of the state label.
    font_size: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            state_radius: 2.0,
            font_size: 2.0,
        }
    }
}

impl StyleConfig {
    pub fn state_radius(&self) -> f64 {
        self.state_radius
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }
}

/// Parameters for transitions drawn without a stored path.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Fraction of the segment vector used to offset the control point.
    bend: f64,

    /// Radius of self-loop arcs.
    loop_radius: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            bend: DEFAULT_BEND,
            loop_radius: DEFAULT_LOOP_RADIUS,
        }
    }
}

impl CurveConfig {
    pub fn bend(&self) -> f64 {
        self.bend
    }

    pub fn loop_radius(&self) -> f64 {
        self.loop_radius
    }

    /// Returns a [`CurveSynthesizer`] using these parameters.
    pub fn synthesizer(&self) -> CurveSynthesizer {
        CurveSynthesizer::new(self.bend, self.loop_radius)
    }
}
