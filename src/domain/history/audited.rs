//! Entities that carry their own modification history.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Actor, DomainError};

use super::ModHistory;

/// Data plus history of an entity that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft<D> {
    data: D,
    mods: ModHistory<D>,
}

impl<D: Clone> Draft<D> {
    /// Starts an entity; the first history entry is recorded if `actor` is known.
    pub fn new(data: D, actor: Option<&Actor>) -> Self {
        let mut mods = ModHistory::new();
        mods.add(actor, data.clone());
        Self { data, mods }
    }
}

impl<D> Draft<D> {
    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn mods(&self) -> &ModHistory<D> {
        &self.mods
    }

    /// Attaches the store-assigned id.
    pub fn into_entity<I>(self, id: I) -> Audited<I, D> {
        Audited {
            id,
            data: self.data,
            mods: self.mods,
        }
    }
}

/// A stored entity: id, current data, and the history of that data.
///
/// # Invariants
///
/// - when the history is non-empty, its newest snapshot equals `data`
///   for every change made through [`Audited::modify`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audited<I, D> {
    id: I,
    data: D,
    mods: ModHistory<D>,
}

impl<I: Copy, D> Audited<I, D> {
    pub fn id(&self) -> I {
        self.id
    }
}

impl<I, D> Audited<I, D> {
    /// Reconstitute an entity from persistence (no validation).
    pub fn reconstitute(id: I, data: D, mods: ModHistory<D>) -> Self {
        Self { id, data, mods }
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn mods(&self) -> &ModHistory<D> {
        &self.mods
    }
}

impl<I, D: Clone> Audited<I, D> {
    /// Replaces the data and records the change.
    pub fn replace(&mut self, data: D, actor: Option<&Actor>) {
        self.mods.add(actor, data.clone());
        self.data = data;
    }

    /// Edits a copy of the data; on success it becomes current and is recorded.
    ///
    /// # Errors
    ///
    /// Whatever `edit` returns; the entity is left untouched in that case.
    pub fn modify<F>(&mut self, actor: Option<&Actor>, edit: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut D) -> Result<(), DomainError>,
    {
        let mut next = self.data.clone();
        edit(&mut next)?;
        self.replace(next, actor);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCode, UserId};

    fn anna() -> Actor {
        Actor::new(UserId::new("u-anna").unwrap(), "Anna").unwrap()
    }

    #[test]
    fn draft_records_first_entry_with_actor() {
        let draft = Draft::new("v1".to_string(), Some(&anna()));
        assert_eq!(draft.mods().len(), 1);
        assert_eq!(draft.mods().current().unwrap().snapshot(), "v1");
    }

    #[test]
    fn draft_without_actor_has_empty_history() {
        let draft = Draft::new(1, None);
        assert!(draft.mods().is_empty());
    }

    #[test]
    fn modify_appends_snapshot() {
        let mut entity = Draft::new(1, Some(&anna())).into_entity(10_i64);
        entity
            .modify(Some(&anna()), |n| {
                *n += 1;
                Ok(())
            })
            .unwrap();

        assert_eq!(*entity.data(), 2);
        assert_eq!(entity.mods().len(), 2);
        assert_eq!(*entity.mods().current().unwrap().snapshot(), 2);
    }

    #[test]
    fn failed_modify_changes_nothing() {
        let mut entity = Draft::new(1, Some(&anna())).into_entity(10_i64);
        let result = entity.modify(Some(&anna()), |n| {
            *n = 99;
            Err(DomainError::validation("n", "nope"))
        });

        assert_eq!(result.unwrap_err().code, ErrorCode::ValidationFailed);
        assert_eq!(*entity.data(), 1);
        assert_eq!(entity.mods().len(), 1);
    }

    #[test]
    fn replace_without_actor_updates_data_only() {
        let mut entity = Draft::new(1, Some(&anna())).into_entity(10_i64);
        entity.replace(5, None);
        assert_eq!(*entity.data(), 5);
        assert_eq!(entity.mods().len(), 1);
    }
}
