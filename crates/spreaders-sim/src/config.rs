//! Simulation parameters.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Parameters of an SIR realization.
///
/// ```toml
/// beta = 0.3
/// mu = 0.08
/// num_steps = 1
/// random_seed = 7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SirConfig {
    /// Probability that an infected vertex infects a susceptible neighbor
    /// in one tick.
    #[serde(default = "default_beta")]
    pub beta: f64,
    /// Probability that an infected vertex recovers in one tick.
    #[serde(default = "default_mu")]
    pub mu: f64,
    /// Record the state every `num_steps` ticks.
    #[serde(default = "default_num_steps")]
    pub num_steps: usize,
    /// Fixed seed: every run replays the same realization.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

const fn default_beta() -> f64 {
    0.3
}

const fn default_mu() -> f64 {
    0.08
}

const fn default_num_steps() -> usize {
    1
}

impl Default for SirConfig {
    fn default() -> Self {
        Self {
            beta: default_beta(),
            mu: default_mu(),
            num_steps: default_num_steps(),
            random_seed: None,
        }
    }
}

impl SirConfig {
    /// # Errors
    ///
    /// Rejects probabilities outside `[0, 1]` and a zero recording interval.
    pub fn validate(&self) -> Result<()> {
        ensure!((0.0..=1.0).contains(&self.beta), "beta must lie in [0, 1], got {}", self.beta);
        ensure!((0.0..=1.0).contains(&self.mu), "mu must lie in [0, 1], got {}", self.mu);
        ensure!(self.num_steps >= 1, "num_steps must be at least 1");
        Ok(())
    }

    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML or invalid parameters.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse SIR config")?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, or as [`SirConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Failed to load {}", path.display()))
    }
}
