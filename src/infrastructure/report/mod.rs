//! Report sinks

mod json_writer;

pub use json_writer::JsonReportWriter;
