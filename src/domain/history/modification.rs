//! Append-only modification history.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::{Actor, DomainError, ErrorCode, Timestamp, ValidationError};

/// One attributed snapshot of an entity's mutable data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mod<T> {
    actor: Actor,
    timestamp: Timestamp,
    snapshot: T,
}

impl<T> Mod<T> {
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn snapshot(&self) -> &T {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> T {
        self.snapshot
    }
}

/// Ordered, append-only list of [`Mod`] entries.
///
/// # Invariants
///
/// - Timestamps are unique and strictly increasing.
/// - Entries are never removed or reordered.
/// - `current()` is always the last entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ModHistory<T> {
    entries: Vec<Mod<T>>,
}

impl<T> ModHistory<T> {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Rebuilds a history from persisted entries, checking their order.
    pub fn from_entries(entries: Vec<Mod<T>>) -> Result<Self, ValidationError> {
        if let Some(pair) = entries
            .windows(2)
            .find(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(ValidationError::invalid_format(
                "mods",
                format!(
                    "timestamps not strictly increasing: {:?} then {:?}",
                    pair[0].timestamp.as_datetime(),
                    pair[1].timestamp.as_datetime()
                ),
            ));
        }
        Ok(Self { entries })
    }

    /// Appends a snapshot attributed to `actor`, stamped with the current time.
    ///
    /// Without an actor nothing is recorded and `false` is returned.
    pub fn add(&mut self, actor: Option<&Actor>, snapshot: T) -> bool {
        self.add_at(actor, snapshot, Timestamp::now())
    }

    /// Like [`ModHistory::add`] with an explicit clock reading.
    ///
    /// A reading at or before the newest entry is moved to one microsecond
    /// after it.
    pub fn add_at(&mut self, actor: Option<&Actor>, snapshot: T, at: Timestamp) -> bool {
        let Some(actor) = actor else {
            return false;
        };

        let timestamp = match self.entries.last() {
            Some(last) if at <= last.timestamp => last.timestamp.plus_micros(1),
            _ => at,
        };

        self.entries.push(Mod {
            actor: actor.clone(),
            timestamp,
            snapshot,
        });
        true
    }

    /// Returns the newest entry, if any.
    pub fn current(&self) -> Option<&Mod<T>> {
        self.entries.last()
    }

    /// Iterates entries newest-first.
    pub fn reversed(&self) -> impl Iterator<Item = &Mod<T>> + '_ {
        self.entries.iter().rev()
    }

    /// Iterates entries oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &Mod<T>> + '_ {
        self.entries.iter()
    }

    /// Looks up the entry recorded at exactly `timestamp`.
    pub fn get(&self, timestamp: &Timestamp) -> Result<&Mod<T>, DomainError> {
        self.entries
            .binary_search_by(|entry| entry.timestamp.cmp(timestamp))
            .map(|idx| &self.entries[idx])
            .map_err(|_| {
                DomainError::new(
                    ErrorCode::HistoryEntryNotFound,
                    format!("No modification at {}", timestamp.as_datetime().to_rfc3339()),
                )
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for ModHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ModHistory<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<Mod<T>>::deserialize(deserializer)?;
        Self::from_entries(entries).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use proptest::prelude::*;

    fn anna() -> Actor {
        Actor::new(UserId::new("u-anna").unwrap(), "Anna").unwrap()
    }

    fn ben() -> Actor {
        Actor::new(UserId::new("u-ben").unwrap(), "Ben").unwrap()
    }

    #[test]
    fn new_history_has_no_current_entry() {
        let history: ModHistory<String> = ModHistory::new();
        assert!(history.current().is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn add_without_actor_is_a_no_op() {
        let mut history = ModHistory::new();
        assert!(!history.add(None, "ignored".to_string()));
        assert!(history.is_empty());
    }

    #[test]
    fn add_records_actor_and_snapshot() {
        let mut history = ModHistory::new();
        assert!(history.add(Some(&anna()), 1));
        assert!(history.add(Some(&ben()), 2));

        let current = history.current().unwrap();
        assert_eq!(*current.snapshot(), 2);
        assert_eq!(current.actor().name(), "Ben");
    }

    #[test]
    fn same_clock_reading_is_bumped_forward() {
        let at = Timestamp::from_unix_secs(1_700_000_000);
        let mut history = ModHistory::new();
        history.add_at(Some(&anna()), "a", at);
        history.add_at(Some(&ben()), "b", at);
        history.add_at(Some(&anna()), "c", at.plus_secs(-10));

        let stamps: Vec<_> = history.iter().map(|m| *m.timestamp()).collect();
        assert_eq!(stamps, vec![at, at.plus_micros(1), at.plus_micros(2)]);
    }

    #[test]
    fn reversed_is_newest_first_and_leaves_order_alone() {
        let mut history = ModHistory::new();
        for n in 0..3 {
            history.add(Some(&anna()), n);
        }

        let newest_first: Vec<_> = history.reversed().map(|m| *m.snapshot()).collect();
        assert_eq!(newest_first, vec![2, 1, 0]);
        let oldest_first: Vec<_> = history.iter().map(|m| *m.snapshot()).collect();
        assert_eq!(oldest_first, vec![0, 1, 2]);
    }

    #[test]
    fn get_finds_exact_timestamp() {
        let at = Timestamp::from_unix_secs(1_700_000_000);
        let mut history = ModHistory::new();
        history.add_at(Some(&anna()), "first", at);
        history.add_at(Some(&ben()), "second", at.plus_secs(5));

        assert_eq!(*history.get(&at.plus_secs(5)).unwrap().snapshot(), "second");
    }

    #[test]
    fn get_unknown_timestamp_is_not_found() {
        let mut history = ModHistory::new();
        history.add_at(Some(&anna()), 1, Timestamp::from_unix_secs(100));

        let err = history.get(&Timestamp::from_unix_secs(101)).unwrap_err();
        assert_eq!(err.code, ErrorCode::HistoryEntryNotFound);
    }

    #[test]
    fn serde_round_trip_keeps_entries() {
        let mut history = ModHistory::new();
        history.add(Some(&anna()), "x".to_string());
        history.add(Some(&ben()), "y".to_string());

        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        let back: ModHistory<String> = serde_json::from_value(json).unwrap();
        assert_eq!(back, history);
    }

    #[test]
    fn deserialization_rejects_out_of_order_entries() {
        let json = serde_json::json!([
            {"actor": {"user_id": "u", "name": "U"}, "timestamp": "2024-01-02T00:00:00Z", "snapshot": 1},
            {"actor": {"user_id": "u", "name": "U"}, "timestamp": "2024-01-01T00:00:00Z", "snapshot": 2}
        ]);
        assert!(serde_json::from_value::<ModHistory<i32>>(json).is_err());
    }

    proptest! {
        #[test]
        fn n_adds_give_n_strictly_increasing_entries(
            snapshots in prop::collection::vec(any::<i64>(), 1..40),
            offsets in prop::collection::vec(-5i64..5, 40),
        ) {
            let base = Timestamp::from_unix_secs(1_700_000_000);
            let mut history = ModHistory::new();
            for (i, snapshot) in snapshots.iter().enumerate() {
                history.add_at(Some(&anna()), *snapshot, base.plus_secs(offsets[i]));
            }

            prop_assert_eq!(history.len(), snapshots.len());
            let stamps: Vec<_> = history.iter().map(|m| *m.timestamp()).collect();
            prop_assert!(stamps.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(history.current().map(|m| *m.snapshot()), snapshots.last().copied());
        }
    }
}
