//! Reactive Query Executor
//!
//! Bridges the asynchronous arrival of snapshot bytes to the synchronous
//! query API and keeps exactly one result visible to consumers:
//!
//! ```text
//! Uninitialized → Loading → Ready → Queried
//!                    └────→ Failed
//! (a new load from any state → Loading, previous engine dropped)
//! ```
//!
//! - **state**: `ExecutorState` and `QueryOutcome`
//! - **reactive**: `ReactiveQuery`, the state machine driver

pub mod reactive;
pub mod state;

pub use reactive::ReactiveQuery;
pub use state::{ExecutorState, QueryOutcome};
