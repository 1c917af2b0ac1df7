//! Test case domain - Authoring surface, attempts and the case lifecycle

mod attempt;
mod context;
mod entity;
mod lifecycle;

pub use attempt::{AttemptRecord, Outcome};
pub use context::{CaseContext, SharedState, TestContext};
pub use entity::{CaseInfo, RetryMode, RetryPolicy, TestCase};
pub use lifecycle::{CaseResult, CaseRunner, LifecycleState};
