//! The person (or the system itself) responsible for a change.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{UserId, ValidationError};

const SYSTEM_USER_ID: &str = "system";

/// Who performed a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    user_id: UserId,
    name: String,
}

impl Actor {
    /// Creates an actor, rejecting an empty display name.
    pub fn new(user_id: UserId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("actor_name"));
        }
        Ok(Self { user_id, name })
    }

    /// The explicit actor for entries the system records on its own behalf.
    pub fn system() -> Self {
        Self {
            user_id: UserId(SYSTEM_USER_ID.to_string()),
            name: "System".to_string(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_system(&self) -> bool {
        self.user_id.as_str() == SYSTEM_USER_ID
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.user_id)
    }
}
