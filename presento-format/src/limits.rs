//! Projection limits and configuration

use crate::error::{PresentoError, Result};

/// Limits guarding recursive nested projection
#[derive(Debug, Clone)]
pub struct ProjectionLimits {
    /// Maximum nested presenter depth (default: 32, hard: 256)
    pub max_nesting_depth: usize,
}

impl Default for ProjectionLimits {
    fn default() -> Self {
        Self {
            max_nesting_depth: 32,
        }
    }
}

impl ProjectionLimits {
    /// Hard maximum limits that cannot be exceeded
    pub fn hard_maximums() -> Self {
        Self {
            max_nesting_depth: 256,
        }
    }

    /// Validate limits against hard maximums
    pub fn validate(&self) -> Result<()> {
        let hard = Self::hard_maximums();

        if self.max_nesting_depth > hard.max_nesting_depth {
            return Err(PresentoError::ConfigurationExceedsHardLimits {
                reason: format!(
                    "max_nesting_depth {} exceeds hard limit {}",
                    self.max_nesting_depth, hard.max_nesting_depth
                ),
            });
        }

        Ok(())
    }

    /// Check that a presenter may run at `depth`
    pub fn check_depth(&self, presenter: &str, depth: usize) -> Result<()> {
        if depth > self.max_nesting_depth {
            return Err(PresentoError::NestingDepthExceeded {
                presenter: presenter.to_string(),
                depth,
                max_depth: self.max_nesting_depth,
            });
        }
        Ok(())
    }
}
