//! Sequence domain - Ordered runs of test cases and their aggregate outcome

mod abort;
mod entity;
mod result;
mod sequencer;
mod sink;

pub use abort::{AbortPolicy, SequenceAbort};
pub use entity::{Sequence, SequenceBuilder, SequenceCatalog};
pub use result::{SequenceResult, SequenceSummary};
pub use sequencer::{Sequencer, SequencerConfig};
pub use sink::ReportSink;
