//! Per-room message history
//!
//! Every room keeps a bounded, ordered buffer of the most recent messages so
//! that a joining client can catch up before live traffic resumes. History
//! is volatile: it lives for the process lifetime and is never persisted.

pub mod buffer;
pub mod store;

pub use buffer::{HistoryBuffer, DEFAULT_HISTORY_CAPACITY};
pub use store::HistoryStore;
