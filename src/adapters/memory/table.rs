//! Generic in-memory table for audited entities.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::history::{Audited, Draft};

#[derive(Debug)]
struct Rows<I, D> {
    next_id: i64,
    rows: BTreeMap<I, Audited<I, D>>,
}

/// Rows keyed by a store-assigned id, with a monotonically growing sequence.
#[derive(Debug)]
pub(crate) struct AuditedTable<I, D> {
    inner: Arc<RwLock<Rows<I, D>>>,
}

impl<I, D> Clone for AuditedTable<I, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I, D> AuditedTable<I, D>
where
    I: Copy + Ord + From<i64>,
    D: Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Rows {
                next_id: 1,
                rows: BTreeMap::new(),
            })),
        }
    }

    /// Inserts unless `reject` finds a conflicting row.
    pub(crate) async fn insert_unless<F>(
        &self,
        draft: &Draft<D>,
        reject: F,
    ) -> Result<Audited<I, D>, DomainError>
    where
        F: Fn(&Audited<I, D>) -> Option<DomainError>,
    {
        let mut guard = self.inner.write().await;
        if let Some(err) = guard.rows.values().find_map(&reject) {
            return Err(err);
        }

        let id = I::from(guard.next_id);
        guard.next_id += 1;
        let entity = draft.clone().into_entity(id);
        guard.rows.insert(id, entity.clone());
        Ok(entity)
    }

    /// Replaces an existing row unless `reject` finds a conflicting one.
    ///
    /// Returns `false` if the row doesn't exist.
    pub(crate) async fn update_unless<F>(
        &self,
        entity: &Audited<I, D>,
        reject: F,
    ) -> Result<bool, DomainError>
    where
        F: Fn(&Audited<I, D>) -> Option<DomainError>,
    {
        let mut guard = self.inner.write().await;
        if !guard.rows.contains_key(&entity.id()) {
            return Ok(false);
        }
        if let Some(err) = guard
            .rows
            .values()
            .filter(|row| row.id() != entity.id())
            .find_map(&reject)
        {
            return Err(err);
        }
        guard.rows.insert(entity.id(), entity.clone());
        Ok(true)
    }

    pub(crate) async fn get(&self, id: I) -> Option<Audited<I, D>> {
        self.inner.read().await.rows.get(&id).cloned()
    }

    /// Rows matching `keep`, ascending by id.
    pub(crate) async fn filter<F>(&self, keep: F) -> Vec<Audited<I, D>>
    where
        F: Fn(&Audited<I, D>) -> bool,
    {
        self.inner
            .read()
            .await
            .rows
            .values()
            .filter(|row| keep(*row))
            .cloned()
            .collect()
    }

    /// Returns `false` if the row doesn't exist.
    pub(crate) async fn remove(&self, id: I) -> bool {
        self.inner.write().await.rows.remove(&id).is_some()
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCode, TroubleReportId};

    type Table = AuditedTable<TroubleReportId, String>;

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let table = Table::new();
        let a = table.insert_unless(&Draft::new("a".into(), None), |_| None).await.unwrap();
        let b = table.insert_unless(&Draft::new("b".into(), None), |_| None).await.unwrap();

        assert_eq!(a.id(), TroubleReportId::new(1));
        assert_eq!(b.id(), TroubleReportId::new(2));
        assert_eq!(table.len().await, 2);
    }

    #[tokio::test]
    async fn insert_rejects_conflicts() {
        let table = Table::new();
        table.insert_unless(&Draft::new("a".into(), None), |_| None).await.unwrap();

        let result = table
            .insert_unless(&Draft::new("a".into(), None), |row| {
                (row.data() == "a").then(|| DomainError::new(ErrorCode::DuplicateTool, "dup"))
            })
            .await;
        assert_eq!(result.unwrap_err().code, ErrorCode::DuplicateTool);
        assert_eq!(table.len().await, 1);
    }

    #[tokio::test]
    async fn update_ignores_the_row_itself() {
        let table = Table::new();
        let mut row = table.insert_unless(&Draft::new("a".into(), None), |_| None).await.unwrap();
        row.replace("a".into(), None);

        let updated = table
            .update_unless(&row, |other| {
                (other.data() == "a").then(|| DomainError::new(ErrorCode::DuplicateTool, "dup"))
            })
            .await
            .unwrap();
        assert!(updated);
    }

    #[tokio::test]
    async fn update_missing_row_returns_false() {
        let table = Table::new();
        let row = Draft::new("a".to_string(), None).into_entity(TroubleReportId::new(9));
        assert!(!table.update_unless(&row, |_| None).await.unwrap());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_remove() {
        let table = Table::new();
        let a = table.insert_unless(&Draft::new("a".into(), None), |_| None).await.unwrap();
        assert!(table.remove(a.id()).await);
        let b = table.insert_unless(&Draft::new("b".into(), None), |_| None).await.unwrap();
        assert_eq!(b.id(), TroubleReportId::new(2));
    }
}
