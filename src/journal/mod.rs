//! Benchmark journal reading.
//!
//! A journal is the text dump written by the instrumented daemon: one
//! `mp_id thread_id seconds nanoseconds` line per measuring point hit, with a
//! `#`-prefixed header naming the measuring points.

pub mod parse;
pub mod record;

pub use parse::{Journal, JournalError, read_input, read_journal, read_journal_file};
pub use record::EventRecord;
