//! Regeneration lifecycle status.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle of a stored regeneration record.
///
/// Aborting an open regeneration deletes the record, so there is no
/// "aborted" status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegenerationStatus {
    /// Tool is out of service (`stop` unset).
    Open,
    /// Tool is back in service (`stop` set).
    Completed,
}

impl StateMachine for RegenerationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (Self::Open, Self::Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Open => vec![Self::Completed],
            Self::Completed => vec![],
        }
    }
}
