//! Action log backends. The in-memory ring lives in `core::action_log`.

pub mod jsonl;

pub use jsonl::JsonLinesActionLog;
