//! Check domain - Structured assertion outcomes recorded during an attempt

mod recorder;
mod result;
mod value;

pub use recorder::{CheckError, CheckRecorder};
pub use result::{CheckKind, CheckResult};
pub use value::CheckValue;
