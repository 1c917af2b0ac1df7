//! Domain layer - Test case lifecycle, checks, sequencing and collaborators

pub mod check;
pub mod error;
pub mod interaction;
pub mod namespace;
pub mod sequence;
pub mod template;
pub mod test_case;

pub use check::{CheckError, CheckKind, CheckRecorder, CheckResult, CheckValue};
pub use error::DomainError;
pub use interaction::{
    InteractionError, InteractionPort, InteractionTransport, PostSequenceFilter,
    PostSequenceMessage, PostSequenceQueue,
};
pub use namespace::{ConfigNamespace, NamespaceError, NamespaceSource, PLUGIN_PREFIX};
pub use sequence::{
    AbortPolicy, ReportSink, Sequence, SequenceAbort, SequenceBuilder, SequenceCatalog, SequenceResult,
    SequenceSummary, Sequencer, SequencerConfig,
};
pub use template::{render_template, render_templates, TemplateArgs, TemplateError, UNRESOLVED};
pub use test_case::{
    AttemptRecord, CaseContext, CaseInfo, CaseResult, CaseRunner, LifecycleState, Outcome,
    RetryMode, RetryPolicy, SharedState, TestCase, TestContext,
};
