//! Bundled demonstration sequences
//!
//! `passes` (also the default) ends in PASS, `fails` in FAIL and `errors` in
//! ERROR. `station` reports values from the configuration namespace.

mod cases;

pub use cases::*;

use crate::domain::{SequenceCatalog, TestCase};

pub fn passes() -> Vec<Box<dyn TestCase>> {
    vec![
        Box::new(PostSequenceInfo),
        Box::new(CheckPostSequenceInfo),
        Box::new(ReturnTrue),
        Box::new(RedButton),
        Box::new(GetUserInput::new()),
        Box::new(MultiplePassedTestResults),
        Box::new(ReturnTrue),
        Box::new(ParameterisedTest::new(50, 500)),
        Box::new(ReturnTrue),
        Box::new(ParameterisedTest::new(10, 5)),
        Box::new(PassEverySecondAttempt),
        Box::new(PassEverySecondAttemptThrowOthers),
        Box::new(MultipleLineInstruction),
        Box::new(CheckPostSequenceInfo),
    ]
}

pub fn fails() -> Vec<Box<dyn TestCase>> {
    vec![
        Box::new(PostSequenceInfo),
        Box::new(CheckPostSequenceInfo),
        Box::new(ReturnFalse),
        Box::new(ParameterisedTest::new(50, 500)),
        Box::new(ParameterisedTest::new(10, 5)),
        Box::new(MultipleLineInstruction),
        Box::new(CheckPostSequenceInfo),
    ]
}

pub fn errors() -> Vec<Box<dyn TestCase>> {
    vec![
        Box::new(PostSequenceInfo),
        Box::new(CheckPostSequenceInfo),
        Box::new(RaiseValueError),
        Box::new(RaiseValueErrorInComparison),
        Box::new(ParameterisedTest::new(10, 5)),
        Box::new(MultipleLineInstruction),
        Box::new(CheckPostSequenceInfo),
    ]
}

pub fn station() -> Vec<Box<dyn TestCase>> {
    vec![Box::new(StationInfo), Box::new(ReturnTrue)]
}

pub fn catalog() -> SequenceCatalog {
    SequenceCatalog::new()
        .register("passes", passes)
        .register("fails", fails)
        .register("errors", errors)
        .register("station", station)
        .with_default("passes")
}
