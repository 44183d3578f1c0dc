//! Reactive query driver
//!
//! Each call to [`ReactiveQuery::load_from`] starts a new load generation.
//! Engine construction and the single query run on the blocking pool; the
//! completion only holds a `Weak` handle to the executor core, so a
//! completion that outlives its executor, or that belongs to a superseded
//! generation, is dropped without touching any state.
//!
//! All loading and query failures are absorbed here. Consumers only ever
//! see `Failed` (no result) or `Queried` (possibly empty result).

use crate::engine::{EngineError, QueryEngine, ResultSet};
use crate::executor::{ExecutorState, QueryOutcome};
use crate::snapshot::BinarySnapshot;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owns the engine for the current load generation
struct EngineSlot {
    generation: u64,
    engine: Option<QueryEngine>,
}

struct Core {
    query: String,
    slot: Mutex<EngineSlot>,
    state_tx: watch::Sender<ExecutorState>,
}

impl Core {
    fn slot(&self) -> MutexGuard<'_, EngineSlot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, state: ExecutorState) {
        tracing::debug!(state = state.name(), generation = ?state.generation(), "Executor state");
        self.state_tx.send_replace(state);
    }
}

/// Loads snapshots and runs the fixed query once per engine instance
pub struct ReactiveQuery {
    core: Arc<Core>,
}

impl ReactiveQuery {
    /// Create an executor for a fixed query; starts `Uninitialized`
    pub fn new(query: impl Into<String>) -> Self {
        let (state_tx, _) = watch::channel(ExecutorState::Uninitialized);
        Self {
            core: Arc::new(Core {
                query: query.into(),
                slot: Mutex::new(EngineSlot {
                    generation: 0,
                    engine: None,
                }),
                state_tx,
            }),
        }
    }

    pub fn query(&self) -> &str {
        &self.core.query
    }

    /// Current state
    pub fn state(&self) -> ExecutorState {
        self.core.state_tx.borrow().clone()
    }

    /// Receive every state transition
    pub fn subscribe(&self) -> watch::Receiver<ExecutorState> {
        self.core.state_tx.subscribe()
    }

    /// Result of the current generation, if the query has run
    pub fn outcome(&self) -> Option<QueryOutcome> {
        self.core.state_tx.borrow().outcome().cloned()
    }

    /// Generation of the most recent load (0 before the first load)
    pub fn generation(&self) -> u64 {
        self.core.slot().generation
    }

    /// Whether an engine instance is currently held
    pub fn has_engine(&self) -> bool {
        self.core.slot().engine.is_some()
    }

    /// Wait until the current load attempt is `Queried` or `Failed`
    ///
    /// A load that never completes never settles.
    pub async fn settled(&self) -> ExecutorState {
        let mut rx = self.subscribe();
        let settled = rx.wait_for(ExecutorState::is_settled).await.map(|s| s.clone());
        settled.unwrap_or_else(|_| self.state())
    }

    /// Load snapshot bytes that are already available
    ///
    /// Must be called from within a Tokio runtime.
    pub fn load(&self, snapshot: Option<BinarySnapshot>) -> JoinHandle<()> {
        self.load_from(async move { snapshot })
    }

    /// Load a snapshot that becomes available when `source` resolves
    ///
    /// The previous engine and result are discarded immediately and the
    /// executor moves to `Loading`. Must be called from within a Tokio
    /// runtime.
    pub fn load_from<F>(&self, source: F) -> JoinHandle<()>
    where
        F: Future<Output = Option<BinarySnapshot>> + Send + 'static,
    {
        let generation = {
            let mut slot = self.core.slot();
            slot.generation += 1;
            slot.engine = None;
            self.core.publish(ExecutorState::Loading {
                generation: slot.generation,
            });
            slot.generation
        };

        let weak = Arc::downgrade(&self.core);

        tokio::spawn(async move {
            let snapshot = source.await;

            if !is_current(&weak, generation) {
                tracing::debug!(generation, "Snapshot arrived for a stale load, discarding");
                return;
            }

            let completed =
                tokio::task::spawn_blocking(move || complete_load(weak, generation, snapshot))
                    .await;

            if let Err(e) = completed {
                tracing::error!(generation, error = %e, "Snapshot load task failed");
            }
        })
    }
}

impl std::fmt::Debug for ReactiveQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveQuery")
            .field("query", &self.core.query)
            .field("state", &self.state().name())
            .finish()
    }
}

fn is_current(weak: &Weak<Core>, generation: u64) -> bool {
    weak.upgrade()
        .map(|core| core.slot().generation == generation)
        .unwrap_or(false)
}

/// Construct the engine, then run the fixed query exactly once
///
/// Runs on the blocking pool.
fn complete_load(weak: Weak<Core>, generation: u64, snapshot: Option<BinarySnapshot>) {
    let loaded = QueryEngine::load(snapshot.as_ref());

    let Some(core) = weak.upgrade() else {
        tracing::debug!(generation, "Executor dropped while loading, discarding engine");
        return;
    };

    let mut slot = core.slot();
    if slot.generation != generation {
        tracing::debug!(generation, current = slot.generation, "Load superseded, discarding engine");
        return;
    }

    let engine = match loaded {
        Ok(Some(engine)) => engine,
        Ok(None) => {
            tracing::warn!(generation, "Snapshot unavailable, chart will be empty");
            core.publish(ExecutorState::Failed {
                generation,
                reason: EngineError::SnapshotUnavailable.to_string(),
            });
            return;
        }
        Err(e) => {
            tracing::error!(generation, error = %e, "Failed to initialize query engine");
            core.publish(ExecutorState::Failed {
                generation,
                reason: e.to_string(),
            });
            return;
        }
    };

    let engine = slot.engine.insert(engine);
    core.publish(ExecutorState::Ready { generation });

    let result = match engine
        .execute(&core.query)
        .and_then(|r| r.validate_price_projection().map(|_| r))
    {
        Ok(result) => {
            tracing::info!(generation, rows = result.row_count(), "Snapshot queried");
            result
        }
        Err(e) => {
            tracing::error!(generation, error = %e, query = %core.query, "Snapshot query failed, using empty result");
            ResultSet::default()
        }
    };

    core.publish(ExecutorState::Queried(QueryOutcome {
        generation,
        result: Arc::new(result),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Value, DEFAULT_QUERY};
    use crate::snapshot::SnapshotBuilder;
    use tokio::sync::oneshot;

    fn scenario_snapshot() -> BinarySnapshot {
        SnapshotBuilder::new()
            .row(1609459200, 29000.0)
            .row(1640995200, 47000.0)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_load_and_query() {
        let executor = ReactiveQuery::new(DEFAULT_QUERY);
        assert!(matches!(executor.state(), ExecutorState::Uninitialized));

        executor.load(Some(scenario_snapshot()));
        let state = executor.settled().await;

        let outcome = state.outcome().unwrap();
        assert_eq!(outcome.generation, 1);
        assert_eq!(outcome.result.row_count(), 2);
        assert_eq!(outcome.result.rows[0][0], Value::Integer(1609459200));
        assert!(executor.has_engine());
    }

    #[tokio::test]
    async fn test_engine_held_once_ready() {
        let executor = ReactiveQuery::new(DEFAULT_QUERY);
        let mut rx = executor.subscribe();
        executor.load(Some(scenario_snapshot()));

        let state = rx
            .wait_for(|s| matches!(s, ExecutorState::Ready { .. } | ExecutorState::Queried(_)))
            .await
            .map(|s| s.clone())
            .unwrap();
        assert_eq!(state.generation(), Some(1));
        assert!(executor.has_engine());
    }

    #[tokio::test]
    async fn test_no_result_while_loading() {
        let executor = ReactiveQuery::new(DEFAULT_QUERY);
        let (tx, rx) = oneshot::channel::<Option<BinarySnapshot>>();

        let handle = executor.load_from(async move { rx.await.ok().flatten() });
        tokio::task::yield_now().await;

        assert!(matches!(executor.state(), ExecutorState::Loading { generation: 1 }));
        assert!(executor.outcome().is_none());
        assert!(!executor.has_engine());

        tx.send(Some(scenario_snapshot())).unwrap();
        handle.await.unwrap();

        assert_eq!(executor.outcome().unwrap().result.row_count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_snapshot_fails() {
        let executor = ReactiveQuery::new(DEFAULT_QUERY);
        executor.load(Some(BinarySnapshot::from(vec![0xAB; 4096])));

        let state = executor.settled().await;
        assert!(matches!(state, ExecutorState::Failed { generation: 1, .. }));
        assert!(state.outcome().is_none());
        assert!(!executor.has_engine());
    }

    #[tokio::test]
    async fn test_missing_snapshot_fails() {
        let executor = ReactiveQuery::new(DEFAULT_QUERY);
        executor.load(None);

        let state = executor.settled().await;
        assert_eq!(state.failure(), Some("Snapshot unavailable"));
    }

    #[tokio::test]
    async fn test_schema_mismatch_yields_empty_result() {
        let executor = ReactiveQuery::new(DEFAULT_QUERY);
        let snapshot = SnapshotBuilder::new().with_table("other").row(1, 2.0).build().unwrap();
        executor.load(Some(snapshot));

        let state = executor.settled().await;
        assert!(state.outcome().unwrap().result.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_timestamp_yields_empty_result() {
        let executor = ReactiveQuery::new(DEFAULT_QUERY);
        let snapshot = SnapshotBuilder::new()
            .row(1609459200, 29000.0)
            .row(i64::MAX, 47000.0)
            .build()
            .unwrap();
        executor.load(Some(snapshot));

        let state = executor.settled().await;
        assert!(state.outcome().unwrap().result.is_empty());
    }

    #[tokio::test]
    async fn test_reload_replaces_engine_and_result() {
        let executor = ReactiveQuery::new(DEFAULT_QUERY);
        executor.load(Some(scenario_snapshot())).await.unwrap();
        assert_eq!(executor.outcome().unwrap().generation, 1);

        let second = SnapshotBuilder::new().row(1700000000, 35000.0).build().unwrap();
        executor.load(Some(second)).await.unwrap();

        let outcome = executor.outcome().unwrap();
        assert_eq!(outcome.generation, 2);
        assert_eq!(outcome.result.row_count(), 1);
    }

    #[tokio::test]
    async fn test_superseded_load_is_discarded() {
        let executor = ReactiveQuery::new(DEFAULT_QUERY);
        let (tx, rx) = oneshot::channel::<Option<BinarySnapshot>>();
        let stale = executor.load_from(async move { rx.await.ok().flatten() });

        let fresh = SnapshotBuilder::new().row(1700000000, 35000.0).build().unwrap();
        executor.load(Some(fresh)).await.unwrap();

        tx.send(Some(scenario_snapshot())).unwrap();
        stale.await.unwrap();

        let outcome = executor.outcome().unwrap();
        assert_eq!(outcome.generation, 2);
        assert_eq!(outcome.result.row_count(), 1);
    }

    #[tokio::test]
    async fn test_completion_after_teardown_is_dropped() {
        let executor = ReactiveQuery::new(DEFAULT_QUERY);
        let rx_state = executor.subscribe();
        let (tx, rx) = oneshot::channel::<Option<BinarySnapshot>>();
        let handle = executor.load_from(async move { rx.await.ok().flatten() });

        drop(executor);
        tx.send(Some(scenario_snapshot())).unwrap();
        handle.await.unwrap();

        assert!(matches!(*rx_state.borrow(), ExecutorState::Loading { generation: 1 }));
    }
}
