//! # Settings Module
//!
//! ## Purpose
//! Configuration value object for the chemistry: where the reaction table lives, which
//! reactions to perturb, how verbose to be, and the numerical floors used by the per-cell
//! evaluation. Nothing here is global; the value is handed explicitly to whatever needs it.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "chemistry_file": "chemistry_earth.csv",
//!   "perturb": ["R3", "R7"],
//!   "perturb_seed": 42,
//!   "verbose": 1,
//!   "solver": { "density_floor": 1e-20, "density_epsilon": 1e-20 },
//!   "field_floor": 1e-20
//! }
//! ```
//! Missing keys take their default values.

use crate::Kinetics::chemistry_errors::ChemistryError;
use crate::Kinetics::perturbation::PerturbSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Numerical guards of the implicit density update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// lower bound every updated density is clamped to
    pub density_floor: f64,
    /// lower bound of the old density when turning a loss rate into a loss frequency
    pub density_epsilon: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            density_floor: 1.0e-20,
            density_epsilon: 1.0e-20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChemistrySettings {
    /// path to the reaction table (CSV)
    pub chemistry_file: String,
    /// "all" or a list of 1-based data rows ("R12" or "12") whose rates are perturbed
    pub perturb: Vec<String>,
    /// fixed seed for the perturbation; without it every run draws different rates
    pub perturb_seed: Option<u64>,
    /// 0 - warnings only, 1 - info, 2 - debug, 3 and more - trace
    pub verbose: u8,
    pub solver: SolverSettings,
    /// lower bound of a denominator field value in temperature-dependent rates
    pub field_floor: f64,
}

impl Default for ChemistrySettings {
    fn default() -> Self {
        Self {
            chemistry_file: "chemistry_earth.csv".to_string(),
            perturb: Vec::new(),
            perturb_seed: None,
            verbose: 1,
            solver: SolverSettings::default(),
            field_floor: 1.0e-20,
        }
    }
}

impl ChemistrySettings {
    pub fn with_chemistry_file(chemistry_file: &str) -> Self {
        Self {
            chemistry_file: chemistry_file.to_string(),
            ..Default::default()
        }
    }

    /// Loads settings from a JSON file. A missing file gives the default settings,
    /// an unreadable or malformed one is an error.
    pub fn load_config(config_file: &str) -> Result<Self, ChemistryError> {
        if !Path::new(config_file).exists() {
            log::info!(
                "config file '{}' not found, using default chemistry settings",
                config_file
            );
            return Ok(Self::default());
        }
        let content = fs::read_to_string(config_file).map_err(|e| {
            ChemistryError::Config(format!("cannot read '{}': {}", config_file, e))
        })?;
        let settings: ChemistrySettings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn save_config(&self, config_file: &str) -> Result<(), ChemistryError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_file, content).map_err(|e| {
            ChemistryError::Config(format!("cannot write '{}': {}", config_file, e))
        })
    }

    /// parsed perturbation request, None when nothing is to be perturbed
    pub fn perturbation_spec(&self) -> Result<Option<PerturbSpec>, ChemistryError> {
        PerturbSpec::from_tokens(&self.perturb)
    }
}
