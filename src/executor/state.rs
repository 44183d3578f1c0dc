//! Executor states

use crate::engine::ResultSet;
use std::sync::Arc;

/// Result of the fixed query for one engine instance
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Load generation that produced this result (engine identity)
    pub generation: u64,
    pub result: Arc<ResultSet>,
}

/// Observable state of the executor
#[derive(Debug, Clone, Default)]
pub enum ExecutorState {
    /// No snapshot has been offered yet
    #[default]
    Uninitialized,
    /// Engine construction in progress
    Loading { generation: u64 },
    /// Engine constructed, fixed query not yet run
    Ready { generation: u64 },
    /// Fixed query ran; `result` is what consumers read
    Queried(QueryOutcome),
    /// Snapshot missing or unreadable for this load attempt
    Failed { generation: u64, reason: String },
}

impl ExecutorState {
    pub fn name(&self) -> &'static str {
        match self {
            ExecutorState::Uninitialized => "uninitialized",
            ExecutorState::Loading { .. } => "loading",
            ExecutorState::Ready { .. } => "ready",
            ExecutorState::Queried(_) => "queried",
            ExecutorState::Failed { .. } => "failed",
        }
    }

    pub fn generation(&self) -> Option<u64> {
        match self {
            ExecutorState::Uninitialized => None,
            ExecutorState::Loading { generation }
            | ExecutorState::Ready { generation }
            | ExecutorState::Failed { generation, .. } => Some(*generation),
            ExecutorState::Queried(outcome) => Some(outcome.generation),
        }
    }

    /// The visible result; `None` in every state except `Queried`
    pub fn outcome(&self) -> Option<&QueryOutcome> {
        match self {
            ExecutorState::Queried(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            ExecutorState::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// The current load attempt has finished, one way or the other
    pub fn is_settled(&self) -> bool {
        matches!(self, ExecutorState::Queried(_) | ExecutorState::Failed { .. })
    }
}
