//! Benchmark definitions and the start/stop correlation engine.

pub mod correlate;
pub mod definition;

pub use correlate::{PendingTable, SampleSet, correlate, correlate_pair, elapsed};
pub use definition::{BenchmarkDefinition, load_definitions};
