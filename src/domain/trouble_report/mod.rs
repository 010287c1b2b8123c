//! Trouble reports: free-text incident notes kept with their edit history.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{TroubleReportId, ValidationError};
use crate::domain::history::{Audited, Draft};

/// Maximum length for a trouble report title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Mutable state of a trouble report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TroubleReportData {
    title: String,
    content: String,
}

impl TroubleReportData {
    /// Creates report data; both fields are trimmed and must be non-empty.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Result<Self, ValidationError> {
        let title = title.into().trim().to_string();
        let content = content.into().trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(ValidationError::invalid_format(
                "title",
                format!("longer than {} characters", MAX_TITLE_LENGTH),
            ));
        }
        if content.is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        Ok(Self { title, content })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A trouble report with its modification history.
pub type TroubleReport = Audited<TroubleReportId, TroubleReportData>;

/// A trouble report that has not been stored yet.
pub type NewTroubleReport = Draft<TroubleReportData>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_fields() {
        let data = TroubleReportData::new("  Press 3 jam ", " Feeder stuck ").unwrap();
        assert_eq!(data.title(), "Press 3 jam");
        assert_eq!(data.content(), "Feeder stuck");
    }

    #[test]
    fn rejects_empty_fields() {
        assert!(TroubleReportData::new("", "x").is_err());
        assert!(TroubleReportData::new("x", "   ").is_err());
    }

    #[test]
    fn rejects_long_title() {
        let title = "t".repeat(MAX_TITLE_LENGTH + 1);
        assert!(TroubleReportData::new(title, "x").is_err());
    }
}
