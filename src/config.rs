//! Configuration for the constraint solver

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading solver configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Tuning knobs for the damped least-squares solver
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Convergence epsilon: applied to the cost, to the Jacobian entries,
    /// and to the per-step cost improvement
    pub epsilon: f64,

    /// Initial damping factor
    pub lambda_init: f64,

    /// Damping growth factor applied on a rejected step
    pub lambda_up: f64,

    /// Damping shrink factor applied on an accepted step
    pub lambda_down: f64,

    /// Hard bound on solver iterations; exceeding it is a stalled outcome
    pub max_iterations: usize,

    /// Print solver diagnostics to stderr
    pub trace: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-5,
            lambda_init: 10.0,
            lambda_up: 10.0,
            lambda_down: 10.0,
            max_iterations: 200,
            trace: false,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the convergence epsilon
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the iteration bound
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Enable or disable diagnostic tracing
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}
