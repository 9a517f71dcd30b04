//! Error type for simulation setup.
//!
//! Ticking a constructed [`Simulation`](crate::solver::Simulation) cannot fail;
//! everything that can go wrong is caught while loading the configuration or
//! building the worker pool.

use std::fmt;

/// Unified error type for simulation construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimulationError {
    /// A configuration value is out of its valid range.
    InvalidConfiguration {
        /// Description of the invalid value
        reason: String,
    },
    /// The configuration file could not be read.
    ConfigIo {
        /// Path that was being read
        path: String,
        /// Underlying I/O error message
        message: String,
    },
    /// The configuration text is not valid JSON for [`SimulationConfig`](crate::config::SimulationConfig).
    ConfigParse {
        /// Parser error message
        message: String,
    },
    /// The worker thread pool could not be created.
    WorkerPool {
        /// Message from the thread pool builder
        message: String,
    },
    /// Supplied particle buffer does not match the configured particle count.
    ParticleCountMismatch {
        /// Count required by the caller
        expected: usize,
        /// Count actually supplied
        actual: usize,
    },
}

impl SimulationError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { reason } => {
                write!(f, "invalid configuration: {reason}")
            }
            Self::ConfigIo { path, message } => {
                write!(f, "failed to read config file {path}: {message}")
            }
            Self::ConfigParse { message } => write!(f, "failed to parse config: {message}"),
            Self::WorkerPool { message } => write!(f, "failed to build worker pool: {message}"),
            Self::ParticleCountMismatch { expected, actual } => {
                write!(f, "expected {expected} particles, got {actual}")
            }
        }
    }
}

impl std::error::Error for SimulationError {}
