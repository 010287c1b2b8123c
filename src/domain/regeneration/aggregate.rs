//! Regeneration records.
//!
//! A regeneration takes a tool out of service for maintenance. Once it is
//! completed the tool's cycle baseline starts again from zero.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    Actor, DomainError, ErrorCode, ReadingId, RegenerationId, StateMachine, Timestamp, ToolId,
};

use super::RegenerationStatus;

/// Maximum length for a regeneration reason.
pub const MAX_REASON_LENGTH: usize = 1000;

/// Input for starting a regeneration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegeneration {
    tool_id: ToolId,
    reason: Option<String>,
    performed_by: Option<Actor>,
    baseline_reading: Option<ReadingId>,
    start: Timestamp,
}

impl NewRegeneration {
    /// Creates the input; a blank reason is treated as no reason.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the reason is too long
    pub fn new(
        tool_id: ToolId,
        reason: Option<String>,
        performed_by: Option<Actor>,
        start: Timestamp,
    ) -> Result<Self, DomainError> {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if let Some(r) = &reason {
            if r.chars().count() > MAX_REASON_LENGTH {
                return Err(DomainError::validation(
                    "reason",
                    format!("Reason exceeds {} characters", MAX_REASON_LENGTH),
                ));
            }
        }
        Ok(Self {
            tool_id,
            reason,
            performed_by,
            baseline_reading: None,
            start,
        })
    }

    /// Sets the newest reading at the time the regeneration starts.
    pub fn with_baseline(mut self, reading: Option<ReadingId>) -> Self {
        self.baseline_reading = reading;
        self
    }

    pub fn tool_id(&self) -> ToolId {
        self.tool_id
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn performed_by(&self) -> Option<&Actor> {
        self.performed_by.as_ref()
    }

    pub fn baseline_reading(&self) -> Option<ReadingId> {
        self.baseline_reading
    }

    pub fn start(&self) -> &Timestamp {
        &self.start
    }

    /// Attaches the store-assigned id; the result is open.
    pub fn into_regeneration(self, id: RegenerationId) -> Regeneration {
        Regeneration {
            id,
            tool_id: self.tool_id,
            reason: self.reason,
            performed_by: self.performed_by,
            baseline_reading: self.baseline_reading,
            start: self.start,
            stop: None,
        }
    }
}

/// A stored regeneration, open while `stop` is unset.
///
/// # Invariants
///
/// - at most one open regeneration exists per tool (enforced by the store)
/// - `stop`, once set, is not before `start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regeneration {
    id: RegenerationId,
    tool_id: ToolId,
    reason: Option<String>,
    performed_by: Option<Actor>,
    baseline_reading: Option<ReadingId>,
    start: Timestamp,
    stop: Option<Timestamp>,
}

impl Regeneration {
    /// Reconstitute a regeneration from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: RegenerationId,
        tool_id: ToolId,
        reason: Option<String>,
        performed_by: Option<Actor>,
        baseline_reading: Option<ReadingId>,
        start: Timestamp,
        stop: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            tool_id,
            reason,
            performed_by,
            baseline_reading,
            start,
            stop,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> RegenerationId {
        self.id
    }

    pub fn tool_id(&self) -> ToolId {
        self.tool_id
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn performed_by(&self) -> Option<&Actor> {
        self.performed_by.as_ref()
    }

    /// Newest reading recorded before the regeneration started.
    pub fn baseline_reading(&self) -> Option<ReadingId> {
        self.baseline_reading
    }

    pub fn start(&self) -> &Timestamp {
        &self.start
    }

    pub fn stop(&self) -> Option<&Timestamp> {
        self.stop.as_ref()
    }

    pub fn status(&self) -> RegenerationStatus {
        if self.stop.is_some() {
            RegenerationStatus::Completed
        } else {
            RegenerationStatus::Open
        }
    }

    pub fn is_open(&self) -> bool {
        self.status() == RegenerationStatus::Open
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Completes the regeneration at `at`.
    ///
    /// A clock reading before `start` is raised to `start`.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if already completed
    pub fn complete(&mut self, at: Timestamp) -> Result<(), DomainError> {
        self.status()
            .transition_to(RegenerationStatus::Completed)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;
        self.stop = Some(at.max(self.start));
        Ok(())
    }

    /// Checks that the record may be deleted as an abort.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the regeneration is completed
    pub fn ensure_abortable(&self) -> Result<(), DomainError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Regeneration {} is completed and cannot be aborted", self.id),
            ))
        }
    }

    /// True when this regeneration completed in `(after, until]`.
    pub fn completed_within(&self, after: &Timestamp, until: &Timestamp) -> bool {
        match &self.stop {
            Some(stop) => stop > after && stop <= until,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(secs)
    }

    fn open_regeneration(start: i64) -> Regeneration {
        NewRegeneration::new(ToolId::new(5), Some("worn".to_string()), None, ts(start))
            .unwrap()
            .into_regeneration(RegenerationId::new(1))
    }

    #[test]
    fn blank_reason_becomes_none() {
        let new = NewRegeneration::new(ToolId::new(1), Some("   ".to_string()), None, ts(0)).unwrap();
        assert_eq!(new.reason(), None);
    }

    #[test]
    fn overly_long_reason_is_rejected() {
        let reason = "x".repeat(MAX_REASON_LENGTH + 1);
        let result = NewRegeneration::new(ToolId::new(1), Some(reason), None, ts(0));
        assert_eq!(result.unwrap_err().code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn new_regeneration_is_open() {
        let regeneration = open_regeneration(100);
        assert!(regeneration.is_open());
        assert_eq!(regeneration.stop(), None);
        assert_eq!(regeneration.reason(), Some("worn"));
    }

    #[test]
    fn complete_sets_stop() {
        let mut regeneration = open_regeneration(100);
        regeneration.complete(ts(200)).unwrap();
        assert_eq!(regeneration.status(), RegenerationStatus::Completed);
        assert_eq!(regeneration.stop(), Some(&ts(200)));
    }

    #[test]
    fn complete_never_stops_before_start() {
        let mut regeneration = open_regeneration(100);
        regeneration.complete(ts(50)).unwrap();
        assert_eq!(regeneration.stop(), Some(&ts(100)));
    }

    #[test]
    fn complete_twice_fails() {
        let mut regeneration = open_regeneration(100);
        regeneration.complete(ts(200)).unwrap();
        let err = regeneration.complete(ts(300)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn only_open_regenerations_are_abortable() {
        let mut regeneration = open_regeneration(100);
        assert!(regeneration.ensure_abortable().is_ok());
        regeneration.complete(ts(200)).unwrap();
        assert!(regeneration.ensure_abortable().is_err());
    }

    #[test]
    fn completed_within_is_inclusive_on_upper_bound() {
        let mut regeneration = open_regeneration(100);
        regeneration.complete(ts(200)).unwrap();

        assert!(regeneration.completed_within(&ts(150), &ts(200)));
        assert!(regeneration.completed_within(&ts(150), &ts(250)));
        assert!(!regeneration.completed_within(&ts(200), &ts(250)));
        assert!(!regeneration.completed_within(&ts(100), &ts(199)));
    }

    #[test]
    fn open_regeneration_is_never_within() {
        let regeneration = open_regeneration(100);
        assert!(!regeneration.completed_within(&ts(0), &ts(1_000)));
    }
}
