//! Accounting façade - the operation contract exposed to callers.
//!
//! Composes the [`CycleLedger`] and the [`RegenerationTracker`]. Partial
//! counts returned here never span a completed regeneration.

use std::collections::{BTreeSet, HashSet};

use futures::future::try_join_all;
use futures::try_join;
use tracing::instrument;

use crate::domain::accounting::{partial_for_reading, total_since, with_partials, Cutoff};
use crate::domain::cycles::{CycleReading, NewCycleReading, ReadingWithPartial};
use crate::domain::foundation::{Actor, PressNumber, ReadingId, ToolId};
use crate::domain::regeneration::Regeneration;

use super::{AccountingError, CycleLedger, RegenerationTracker};

/// A tool's readings and regenerations, as loaded for one computation.
struct ToolHistory {
    readings: Vec<CycleReading>,
    regenerations: Vec<Regeneration>,
}

/// Entry point for cycle accounting.
#[derive(Clone)]
pub struct AccountingService {
    ledger: CycleLedger,
    tracker: RegenerationTracker,
}

impl AccountingService {
    pub fn new(ledger: CycleLedger, tracker: RegenerationTracker) -> Self {
        Self { ledger, tracker }
    }

    pub fn ledger(&self) -> &CycleLedger {
        &self.ledger
    }

    pub fn tracker(&self) -> &RegenerationTracker {
        &self.tracker
    }

    async fn tool_history(&self, tool_id: ToolId) -> Result<ToolHistory, AccountingError> {
        let (readings, regenerations) = try_join!(
            self.ledger.readings_for_tool(tool_id),
            self.tracker.list(tool_id)
        )?;
        Ok(ToolHistory {
            readings,
            regenerations,
        })
    }

    /// Regeneration-aware partials for every reading of the given tools.
    async fn partials_for_tools(
        &self,
        tools: BTreeSet<ToolId>,
    ) -> Result<Vec<ReadingWithPartial>, AccountingError> {
        let histories = try_join_all(tools.into_iter().map(|id| self.tool_history(id))).await?;

        let mut result = Vec::new();
        for history in histories {
            result.extend(with_partials(
                history.readings,
                &history.regenerations,
                self.ledger.policy(),
            ));
        }
        result.sort_by(|a, b| b.reading.cmp_position(&a.reading));
        Ok(result)
    }

    /// Stores a reading.
    ///
    /// # Errors
    ///
    /// - `Storage` if the store rejects the insert
    #[instrument(skip(self, reading), fields(tool_id = %reading.tool_id()))]
    pub async fn record_cycle(&self, reading: NewCycleReading) -> Result<CycleReading, AccountingError> {
        self.ledger.record(reading).await
    }

    /// Removes a reading; the partial of the reading after it re-derives.
    #[instrument(skip(self))]
    pub async fn delete_cycle(&self, id: ReadingId) -> Result<(), AccountingError> {
        self.ledger.delete(id).await
    }

    /// Readings of one tool, newest first, with regeneration-aware partials.
    #[instrument(skip(self))]
    pub async fn list_cycles_for_tool(
        &self,
        tool_id: ToolId,
    ) -> Result<Vec<ReadingWithPartial>, AccountingError> {
        let history = self.tool_history(tool_id).await?;
        Ok(with_partials(
            history.readings,
            &history.regenerations,
            self.ledger.policy(),
        ))
    }

    /// Every reading, newest first, with regeneration-aware partials.
    #[instrument(skip(self))]
    pub async fn list_all_cycles(&self) -> Result<Vec<ReadingWithPartial>, AccountingError> {
        let tools = self
            .ledger
            .list_all()
            .await?
            .iter()
            .map(|r| r.tool_id())
            .collect();
        self.partials_for_tools(tools).await
    }

    /// Readings taken on a press, newest first.
    ///
    /// Each partial is still computed against its tool's whole timeline, so
    /// a tool moved between presses keeps correct intervals.
    #[instrument(skip(self))]
    pub async fn list_cycles_for_press(
        &self,
        press: PressNumber,
    ) -> Result<Vec<ReadingWithPartial>, AccountingError> {
        let on_press = self.ledger.readings_for_press(press).await?;
        let ids: HashSet<ReadingId> = on_press.iter().map(|r| r.id()).collect();
        let tools = on_press.iter().map(|r| r.tool_id()).collect();

        let mut readings = self.partials_for_tools(tools).await?;
        readings.retain(|r| ids.contains(&r.reading.id()));
        Ok(readings)
    }

    /// Sum of the press view's partials.
    #[instrument(skip(self))]
    pub async fn total_cycles_for_press(&self, press: PressNumber) -> Result<i64, AccountingError> {
        let readings = self.list_cycles_for_press(press).await?;
        Ok(readings.iter().map(|r| r.partial_count).sum())
    }

    /// Cycles accumulated since the tool's last regeneration.
    ///
    /// Sums partials of readings after the last regeneration's baseline
    /// reading, or of every reading if the tool was never regenerated.
    #[instrument(skip(self))]
    pub async fn total_cycles_since(&self, tool_id: ToolId) -> Result<i64, AccountingError> {
        let history = self.tool_history(tool_id).await?;
        // list_by_tool is newest first, so the head is the highest id.
        let cutoff = Cutoff::for_regeneration(history.regenerations.first(), &history.readings);
        let readings = with_partials(
            history.readings,
            &history.regenerations,
            self.ledger.policy(),
        );
        Ok(total_since(&readings, &cutoff))
    }

    /// Partial count of one reading, reset by any regeneration completed
    /// since the reading before it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no reading has this id
    #[instrument(skip(self))]
    pub async fn get_partial_cycles(&self, id: ReadingId) -> Result<i64, AccountingError> {
        let reading = self.ledger.get(id).await?;
        let history = self.tool_history(reading.tool_id()).await?;
        Ok(partial_for_reading(
            &reading,
            &history.readings,
            &history.regenerations,
            self.ledger.policy(),
        ))
    }

    /// # Errors
    ///
    /// - `Conflict` if the tool already has an open regeneration
    #[instrument(skip(self, actor))]
    pub async fn start_regeneration(
        &self,
        tool_id: ToolId,
        reason: Option<String>,
        actor: Option<Actor>,
    ) -> Result<Regeneration, AccountingError> {
        self.tracker.start(tool_id, reason, actor).await
    }

    /// # Errors
    ///
    /// - `NotFound` if the tool has no open regeneration
    #[instrument(skip(self))]
    pub async fn stop_regeneration(&self, tool_id: ToolId) -> Result<Regeneration, AccountingError> {
        self.tracker.stop(tool_id).await
    }

    /// # Errors
    ///
    /// - `NotFound` if the tool has no open regeneration
    #[instrument(skip(self))]
    pub async fn abort_regeneration(&self, tool_id: ToolId) -> Result<(), AccountingError> {
        self.tracker.abort(tool_id).await
    }

    #[instrument(skip(self))]
    pub async fn last_regeneration(&self, tool_id: ToolId) -> Result<Regeneration, AccountingError> {
        self.tracker.last_regeneration(tool_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryCycleReadingRepository, InMemoryRegenerationRepository};
    use crate::application::TableLocks;
    use crate::domain::cycles::PartialPolicy;
    use crate::domain::foundation::Timestamp;
    use std::sync::Arc;

    fn service() -> AccountingService {
        let locks = TableLocks::new();
        let ledger = CycleLedger::new(
            Arc::new(InMemoryCycleReadingRepository::new()),
            locks.clone(),
            PartialPolicy::default(),
        );
        let tracker = RegenerationTracker::new(
            Arc::new(InMemoryRegenerationRepository::new()),
            ledger.clone(),
            locks,
        );
        AccountingService::new(ledger, tracker)
    }

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(secs)
    }

    fn reading(tool: i64, count: i64, stop: i64) -> NewCycleReading {
        NewCycleReading::new(ToolId::new(tool), count, ts(stop - 60), ts(stop)).unwrap()
    }

    #[tokio::test]
    async fn total_without_regeneration_sums_everything() {
        let service = service();
        service.record_cycle(reading(3, 100, 1000)).await.unwrap();
        service.record_cycle(reading(3, 180, 2000)).await.unwrap();

        assert_eq!(service.total_cycles_since(ToolId::new(3)).await.unwrap(), 180);
    }

    #[tokio::test]
    async fn open_regeneration_counts_nothing_yet() {
        let service = service();
        service.record_cycle(reading(3, 100, 1000)).await.unwrap();
        service.tracker().start_at(ToolId::new(3), None, None, ts(1500)).await.unwrap();

        assert_eq!(service.total_cycles_since(ToolId::new(3)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn partial_after_completed_regeneration_resets() {
        let service = service();
        let tool = ToolId::new(3);
        service.record_cycle(reading(3, 500_000, 1000)).await.unwrap();
        service.tracker().start_at(tool, None, None, ts(1500)).await.unwrap();
        service.tracker().stop_at(tool, ts(1800)).await.unwrap();
        let after = service.record_cycle(reading(3, 1_000, 3000)).await.unwrap();

        assert_eq!(service.get_partial_cycles(after.id()).await.unwrap(), 1_000);
        assert_eq!(service.total_cycles_since(tool).await.unwrap(), 1_000);
    }

    #[tokio::test]
    async fn regeneration_stop_equal_to_reading_stop_resets() {
        let service = service();
        let tool = ToolId::new(3);
        service.record_cycle(reading(3, 400, 1000)).await.unwrap();
        service.tracker().start_at(tool, None, None, ts(1500)).await.unwrap();
        service.tracker().stop_at(tool, ts(3000)).await.unwrap();
        let after = service.record_cycle(reading(3, 50, 3000)).await.unwrap();

        assert_eq!(service.get_partial_cycles(after.id()).await.unwrap(), 50);
    }

    #[tokio::test]
    async fn press_view_uses_whole_tool_timeline() {
        let service = service();
        let press = PressNumber::new(1).unwrap();
        service.record_cycle(reading(3, 100, 1000)).await.unwrap();
        service
            .record_cycle(reading(3, 160, 2000).on_press(press))
            .await
            .unwrap();
        service
            .record_cycle(reading(4, 40, 2500).on_press(press))
            .await
            .unwrap();

        let listed = service.list_cycles_for_press(press).await.unwrap();
        let partials: Vec<i64> = listed.iter().map(|r| r.partial_count).collect();
        assert_eq!(partials, vec![40, 60]);
        assert_eq!(service.total_cycles_for_press(press).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn list_all_covers_every_tool() {
        let service = service();
        service.record_cycle(reading(3, 100, 1000)).await.unwrap();
        service.record_cycle(reading(4, 70, 1500)).await.unwrap();
        service.record_cycle(reading(3, 150, 2000)).await.unwrap();

        let all = service.list_all_cycles().await.unwrap();
        let partials: Vec<i64> = all.iter().map(|r| r.partial_count).collect();
        assert_eq!(partials, vec![50, 70, 100]);
    }

    #[tokio::test]
    async fn get_partial_of_unknown_reading_is_not_found() {
        let err = service().get_partial_cycles(ReadingId::new(9)).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
