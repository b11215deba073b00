//! Stage count bounds.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Allowed number of stages per catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogBounds {
    pub min_stages: usize,
    pub max_stages: usize,
    pub default_stages: usize,
}

impl Default for CatalogBounds {
    fn default() -> Self {
        Self {
            min_stages: 3,
            max_stages: 10,
            default_stages: 5,
        }
    }
}

impl CatalogBounds {
    /// Returns `count` if it lies within the bounds.
    pub fn check(&self, count: usize) -> Result<usize, ValidationError> {
        if count < self.min_stages || count > self.max_stages {
            return Err(ValidationError::out_of_range(
                "desired_count",
                self.min_stages as i32,
                self.max_stages as i32,
                i32::try_from(count).unwrap_or(i32::MAX),
            ));
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_accepts_inclusive_range() {
        let bounds = CatalogBounds::default();
        assert_eq!(bounds.check(3), Ok(3));
        assert_eq!(bounds.check(10), Ok(10));
    }

    #[test]
    fn check_rejects_out_of_range() {
        let bounds = CatalogBounds::default();
        assert_eq!(
            bounds.check(2),
            Err(ValidationError::out_of_range("desired_count", 3, 10, 2))
        );
        assert!(bounds.check(11).is_err());
    }
}
