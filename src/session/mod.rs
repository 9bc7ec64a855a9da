//! Session setup latency from free-text daemon logs.
//!
//! A smaller sibling of the journal correlation: sessions are keyed by their
//! textual id and timed from the clock stamp on the "session created" and
//! "session initiated" lines.

pub mod correlate;
pub mod parse;

pub use correlate::correlate_sessions;
pub use parse::parse_session_log;
