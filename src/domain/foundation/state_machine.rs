//! Checked moves between lifecycle statuses such as
//! [`StageStatus`](super::StageStatus).

use super::ValidationError;

/// Status enums with a fixed set of legal moves.
///
/// Implementors list their transitions; `transition_to` and `is_terminal`
/// are derived from that list.
///
/// # Example
///
/// ```ignore
/// let next = StageStatus::Current.transition_to(StageStatus::Completed)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Whether `target` is one of the legal next statuses.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Every status reachable in one move.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Moves to `target`, or fails with `InvalidFormat` naming both states.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// No way out.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
        Amber,
        Off,
    }

    impl StateMachine for Light {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Light::Red => vec![Light::Green, Light::Off],
                Light::Green => vec![Light::Amber, Light::Off],
                Light::Amber => vec![Light::Red, Light::Off],
                Light::Off => vec![],
            }
        }
    }

    #[test]
    fn cycle_through_allowed_states() {
        let mut light = Light::Red;
        for next in [Light::Green, Light::Amber, Light::Red] {
            light = light.transition_to(next).unwrap();
        }
        assert_eq!(light, Light::Red);
    }

    #[test]
    fn skipping_a_state_is_rejected() {
        let err = Light::Red.transition_to(Light::Amber).unwrap_err();
        assert!(err.to_string().contains("Red"));
    }

    #[test]
    fn off_is_terminal() {
        assert!(Light::Off.is_terminal());
        assert!(!Light::Amber.is_terminal());
    }
}
