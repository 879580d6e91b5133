//! Card module - the review item value object
//!
//! A `ReviewCard` captures one learner/item pairing: scheduling parameters,
//! the learning-state machine position, and running performance counters.
//! The card is a plain value; persistence belongs to the caller.

mod review_card;

pub use review_card::ReviewCard;

use serde::{Deserialize, Serialize};

// ============================================================================
// LEARNING STATE
// ============================================================================

/// Position of an item in the acquisition lifecycle.
///
/// Transitions are decided exclusively by the scheduling engine; the closed
/// enum keeps every state/quality combination an explicit match arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LearningState {
    /// Never answered correctly; still on the first learning step
    #[default]
    New,
    /// Working through the short learning steps
    Learning,
    /// Graduated; intervals grow with the ease factor
    Review,
    /// Lapsed after graduating; recovering through short steps
    Relearning,
}

impl LearningState {
    /// Convert to the wire-format string
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningState::New => "NEW",
            LearningState::Learning => "LEARNING",
            LearningState::Review => "REVIEW",
            LearningState::Relearning => "RELEARNING",
        }
    }
}

impl std::fmt::Display for LearningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LearningState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NEW" => Ok(LearningState::New),
            "LEARNING" => Ok(LearningState::Learning),
            "REVIEW" => Ok(LearningState::Review),
            "RELEARNING" => Ok(LearningState::Relearning),
            _ => Err(format!("Unknown learning state: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learning_state_roundtrip() {
        for state in [
            LearningState::New,
            LearningState::Learning,
            LearningState::Review,
            LearningState::Relearning,
        ] {
            assert_eq!(state.as_str().parse::<LearningState>().unwrap(), state);
        }
    }

    #[test]
    fn test_learning_state_serde_is_screaming_snake() {
        let json = serde_json::to_string(&LearningState::Relearning).unwrap();
        assert_eq!(json, "\"RELEARNING\"");
        let parsed: LearningState = serde_json::from_str("\"REVIEW\"").unwrap();
        assert_eq!(parsed, LearningState::Review);
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        assert!("SUSPENDED".parse::<LearningState>().is_err());
    }
}
