//! Whole-number completion percentage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Share of a journey that is done, `0..=100`, always rounded down.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    pub const ZERO: Self = Self(0);
    pub const HUNDRED: Self = Self(100);

    /// `done` out of `total`. Zero for an empty total; `done` is capped at `total`.
    pub fn from_ratio(done: usize, total: usize) -> Self {
        match total {
            0 => Self::ZERO,
            _ => {
                let scaled = done.min(total) * 100 / total;
                Self(u8::try_from(scaled).unwrap_or(100))
            }
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_complete(&self) -> bool {
        *self == Self::HUNDRED
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
