//! Stage catalog configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::catalog::CatalogBounds;

/// Smallest catalog any configuration may allow.
pub const STAGE_FLOOR: usize = 3;

/// Largest catalog any configuration may allow.
pub const STAGE_CEILING: usize = 10;

/// Stage count bounds
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_min_stages")]
    pub min_stages: usize,

    #[serde(default = "default_max_stages")]
    pub max_stages: usize,

    /// Size of new journeys and of the fallback template
    #[serde(default = "default_stages")]
    pub default_stages: usize,
}

impl CatalogConfig {
    pub fn bounds(&self) -> CatalogBounds {
        CatalogBounds {
            min_stages: self.min_stages,
            max_stages: self.max_stages,
            default_stages: self.default_stages,
        }
    }

    /// Validate stage bounds
    pub fn validate(&self) -> Result<(), ValidationError> {
        let ordered = STAGE_FLOOR <= self.min_stages
            && self.min_stages <= self.default_stages
            && self.default_stages <= self.max_stages
            && self.max_stages <= STAGE_CEILING;
        if !ordered {
            return Err(ValidationError::InvalidStageBounds);
        }
        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            min_stages: default_min_stages(),
            max_stages: default_max_stages(),
            default_stages: default_stages(),
        }
    }
}

fn default_min_stages() -> usize {
    3
}

fn default_max_stages() -> usize {
    10
}

fn default_stages() -> usize {
    5
}
