/// A single measuring point hit from the benchmark journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    pub measuring_point: u32,
    pub thread_id: u64,
    /// `seconds * 1_000_000_000 + nanoseconds` of the wall clock at the hit.
    pub timestamp_ns: u64,
}

impl EventRecord {
    pub fn new(measuring_point: u32, thread_id: u64, timestamp_ns: u64) -> Self {
        Self {
            measuring_point,
            thread_id,
            timestamp_ns,
        }
    }
}
