//! Namespace sources backed by files

mod file_source;

pub use file_source::FileSource;
