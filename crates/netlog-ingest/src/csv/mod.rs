//! CSV reading for log exports.

mod reader;

pub use reader::{MISSING_MARKERS, RawLog, read_raw_log};
