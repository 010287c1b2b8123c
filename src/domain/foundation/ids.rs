//! Strongly-typed identifier value objects.
//!
//! Row identifiers are assigned by the store on insert and grow
//! monotonically, so they wrap a plain `i64`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Declares an `i64` newtype identifier with the usual conversions.
macro_rules! store_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a store-assigned identifier.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw identifier.
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|e| ValidationError::invalid_format($field, e.to_string()))
            }
        }
    };
}

store_id!(
    /// Unique identifier for a tool.
    ToolId,
    "tool_id"
);

store_id!(
    /// Unique identifier for a cumulative cycle reading.
    ReadingId,
    "reading_id"
);

store_id!(
    /// Unique identifier for a regeneration record.
    RegenerationId,
    "regeneration_id"
);

store_id!(
    /// Unique identifier for a metal sheet.
    MetalSheetId,
    "metal_sheet_id"
);

store_id!(
    /// Unique identifier for a trouble report.
    TroubleReportId,
    "trouble_report_id"
);

/// User identifier (typically the auth provider's subject).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub(super) String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_id_parses_from_string() {
        let id: ToolId = "42".parse().unwrap();
        assert_eq!(id.as_i64(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn reading_id_rejects_garbage() {
        let result = "abc".parse::<ReadingId>();
        assert!(matches!(
            result,
            Err(ValidationError::InvalidFormat { ref field, .. }) if field == "reading_id"
        ));
    }

    #[test]
    fn ids_order_by_value() {
        assert!(RegenerationId::new(1) < RegenerationId::new(2));
    }

    #[test]
    fn id_serializes_transparently() {
        let json = serde_json::to_string(&MetalSheetId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn user_id_rejects_empty() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
    }

    #[test]
    fn user_id_preserves_value() {
        let id = UserId::new("tg-100200").unwrap();
        assert_eq!(id.as_str(), "tg-100200");
    }
}
