//! StageStatus enum for the lock/current/completed lifecycle of a stage.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Position of a stage relative to the traveller.
///
/// Status is derived from the journey's current index rather than stored:
/// stages before the index are completed, the stage at the index is current,
/// and everything after it is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    #[default]
    Locked,
    Current,
    Completed,
}

impl StageStatus {
    /// Derives the status of the stage at `index` given the journey position.
    pub fn at(index: usize, current_index: usize) -> Self {
        use std::cmp::Ordering;
        match index.cmp(&current_index) {
            Ordering::Less => StageStatus::Completed,
            Ordering::Equal => StageStatus::Current,
            Ordering::Greater => StageStatus::Locked,
        }
    }

    /// Returns true if the stage can no longer be worked on.
    pub fn is_locked(&self) -> bool {
        matches!(self, StageStatus::Locked)
    }

    /// Returns true if the stage is finished.
    pub fn is_completed(&self) -> bool {
        matches!(self, StageStatus::Completed)
    }
}

impl StateMachine for StageStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use StageStatus::*;
        matches!((self, target), (Locked, Current) | (Current, Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use StageStatus::*;
        match self {
            Locked => vec![Current],
            Current => vec![Completed],
            Completed => vec![],
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StageStatus::Locked => "Locked",
            StageStatus::Current => "Current",
            StageStatus::Completed => "Completed",
        };
        write!(f, "{}", s)
    }
}
