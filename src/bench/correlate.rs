//! Start/stop correlation of journal events.
//!
//! Each benchmark definition keeps its own pending table keyed by thread id,
//! so a measuring point can be the start of one benchmark and the stop (or
//! start) of another within the same pass.

use crate::bench::definition::BenchmarkDefinition;
use crate::journal::EventRecord;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::hash::Hash;
use thiserror::Error;

/// Elapsed nanoseconds per successful match, in match order.
pub type SampleSet = Vec<i64>;

/// Correlation result keyed by benchmark label, in definition order.
pub type Samples = IndexMap<String, SampleSet>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelateError {
    /// Start and stop are both valid timestamps but too far apart for a sample.
    #[error(
        "{label}: elapsed time on thread {thread_id} from {start} ns to {stop} ns does not fit in 64 bits"
    )]
    ElapsedOverflow {
        label: String,
        thread_id: u64,
        start: u64,
        stop: u64,
    },
}

/// Outstanding start timestamps, one per key.
///
/// A second start for a key replaces the first (last start wins): restarted
/// or truncated runs leave dangling starts behind and those must not poison
/// the next measurement.
#[derive(Debug, Clone)]
pub struct PendingTable<K> {
    starts: HashMap<K, u64>,
}

impl<K: Eq + Hash> PendingTable<K> {
    pub fn new() -> Self {
        Self {
            starts: HashMap::new(),
        }
    }

    pub fn start(&mut self, key: K, timestamp: u64) {
        self.starts.insert(key, timestamp);
    }

    /// Remove and return the pending start for `key`.
    pub fn stop(&mut self, key: &K) -> Option<u64> {
        self.starts.remove(key)
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

impl<K: Eq + Hash> Default for PendingTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Signed `stop - start`, or `None` if it does not fit in an `i64`.
pub fn elapsed(start: u64, stop: u64) -> Option<i64> {
    i64::try_from(i128::from(stop) - i128::from(start)).ok()
}

/// Correlate `events` against every definition in one pass.
///
/// Starts left open at the end are dropped: an unfinished session is normal
/// in a truncated journal.
pub fn correlate<'a, I>(
    events: I,
    definitions: &[BenchmarkDefinition],
) -> Result<Samples, CorrelateError>
where
    I: IntoIterator<Item = &'a EventRecord>,
{
    let mut pending: Vec<PendingTable<u64>> =
        definitions.iter().map(|_| PendingTable::new()).collect();
    let mut sets: Vec<SampleSet> = definitions.iter().map(|_| SampleSet::new()).collect();

    for event in events {
        for ((def, table), set) in definitions.iter().zip(&mut pending).zip(&mut sets) {
            if event.measuring_point == def.start {
                table.start(event.thread_id, event.timestamp_ns);
            } else if event.measuring_point == def.stop {
                if let Some(start) = table.stop(&event.thread_id) {
                    let sample = elapsed(start, event.timestamp_ns).ok_or_else(|| {
                        CorrelateError::ElapsedOverflow {
                            label: def.label.clone(),
                            thread_id: event.thread_id,
                            start,
                            stop: event.timestamp_ns,
                        }
                    })?;
                    set.push(sample);
                }
            }
        }
    }

    for (def, table) in definitions.iter().zip(&pending) {
        if !table.is_empty() {
            log::debug!(
                "{}: {} start(s) never stopped",
                def.label,
                table.len()
            );
        }
    }

    Ok(definitions
        .iter()
        .map(|d| d.label.clone())
        .zip(sets)
        .collect())
}

/// Correlate a single start/stop pair.
pub fn correlate_pair<'a, I>(events: I, start: u32, stop: u32) -> Result<SampleSet, CorrelateError>
where
    I: IntoIterator<Item = &'a EventRecord>,
{
    let def = BenchmarkDefinition::new(start, stop, BenchmarkDefinition::default_label(start, stop));
    Ok(correlate(events, std::slice::from_ref(&def))?
        .swap_remove(&def.label)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::definition::default_definitions;
    use crate::journal::read_journal;
    use pretty_assertions::assert_eq;

    fn ev(mp: u32, thread: u64, secs: u64, ns: u64) -> EventRecord {
        EventRecord::new(mp, thread, secs * 1_000_000_000 + ns)
    }

    #[test]
    fn matches_per_thread_in_stop_order() {
        let events = [ev(1, 7, 0, 0), ev(1, 9, 0, 0), ev(2, 7, 0, 500), ev(2, 9, 1, 0)];
        assert_eq!(correlate_pair(&events, 1, 2).unwrap(), vec![500, 1_000_000_000]);
    }

    #[test]
    fn second_start_overwrites_first() {
        let events = [ev(1, 7, 0, 100), ev(1, 7, 0, 300), ev(2, 7, 0, 1000), ev(2, 7, 0, 2000)];
        assert_eq!(correlate_pair(&events, 1, 2).unwrap(), vec![700]);
    }

    #[test]
    fn stop_without_start_is_ignored() {
        let events = [ev(1, 7, 0, 0), ev(2, 8, 0, 50), ev(2, 7, 0, 90)];
        assert_eq!(correlate_pair(&events, 1, 2).unwrap(), vec![90]);
    }

    #[test]
    fn open_starts_are_discarded() {
        let events = [ev(1, 7, 0, 0), ev(1, 8, 0, 10), ev(2, 7, 0, 20)];
        assert_eq!(correlate_pair(&events, 1, 2).unwrap(), vec![20]);
    }

    #[test]
    fn never_cooccurring_points_give_empty_set() {
        let events = [ev(1, 7, 0, 0), ev(2, 7, 0, 10)];
        assert_eq!(correlate_pair(&events, 5, 6).unwrap(), SampleSet::new());
    }

    #[test]
    fn overlapping_definitions_keep_separate_state() {
        // Mapping 3->4 and Gesamt 3->14 both consume point 3.
        let events = [
            ev(3, 1, 0, 0),
            ev(4, 1, 0, 10),
            ev(13, 1, 0, 20),
            ev(14, 1, 0, 50),
            ev(3, 2, 1, 0),
            ev(14, 2, 1, 400),
        ];
        let samples = correlate(&events, &default_definitions()).unwrap();

        let labels: Vec<&str> = samples.keys().map(String::as_str).collect();
        assert_eq!(
            labels,
            vec![
                "Mapping",
                "Deserialisierung",
                "Session-Manager",
                "Protokoll-Automat",
                "Serialisierung",
                "Gesamt"
            ]
        );
        assert_eq!(samples["Mapping"], vec![10]);
        assert_eq!(samples["Protokoll-Automat"], vec![30]);
        assert_eq!(samples["Gesamt"], vec![50, 400]);
        assert!(samples["Serialisierung"].is_empty());
    }

    #[test]
    fn stop_of_one_definition_can_start_another() {
        let defs = [
            BenchmarkDefinition::new(1, 2, "first"),
            BenchmarkDefinition::new(2, 3, "second"),
        ];
        let events = [ev(1, 1, 0, 0), ev(2, 1, 0, 5), ev(3, 1, 0, 12)];
        let samples = correlate(&events, &defs).unwrap();
        assert_eq!(samples["first"], vec![5]);
        assert_eq!(samples["second"], vec![7]);
    }

    #[test]
    fn sample_count_bounded_by_starts_and_stops() {
        let events = [
            ev(1, 1, 0, 0),
            ev(2, 1, 0, 1),
            ev(2, 1, 0, 2),
            ev(2, 2, 0, 3),
            ev(1, 3, 0, 4),
            ev(1, 3, 0, 5),
            ev(2, 3, 0, 9),
        ];
        let samples = correlate_pair(&events, 1, 2).unwrap();
        let starts = events.iter().filter(|e| e.measuring_point == 1).count();
        let stops = events.iter().filter(|e| e.measuring_point == 2).count();
        assert!(samples.len() <= starts && samples.len() <= stops);
        assert_eq!(samples, vec![1, 4]);
    }

    #[test]
    fn clock_step_backwards_yields_negative_sample() {
        let events = [ev(1, 1, 5, 0), ev(2, 1, 4, 999_999_000)];
        assert_eq!(correlate_pair(&events, 1, 2).unwrap(), vec![-1000]);
    }

    #[test]
    fn pending_table_last_start_wins() {
        let mut table = PendingTable::new();
        table.start("a", 10);
        table.start("a", 30);
        table.start("b", 5);
        assert_eq!(table.len(), 2);
        assert_eq!(table.stop(&"a"), Some(30));
        assert_eq!(table.stop(&"a"), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn record_shaped_comments_do_not_touch_pending_starts() {
        let journal = read_journal("1 7 0 100\n#1 7 0 300\n#2 7 0 400\n2 7 0 1000\n").unwrap();
        assert_eq!(journal.events.len(), 2);
        assert_eq!(correlate_pair(&journal.events, 1, 2).unwrap(), vec![900]);
    }

    #[test]
    fn elapsed_beyond_i64_is_an_error() {
        let journal = read_journal("1 7 0 0\n2 7 10000000000 0\n").unwrap();
        let err = correlate_pair(&journal.events, 1, 2).unwrap_err();
        assert_eq!(
            err,
            CorrelateError::ElapsedOverflow {
                label: "#1-#2".to_string(),
                thread_id: 7,
                start: 0,
                stop: 10_000_000_000_000_000_000,
            }
        );
    }

    #[test]
    fn elapsed_checks_both_directions() {
        assert_eq!(elapsed(10, 25), Some(15));
        assert_eq!(elapsed(25, 10), Some(-15));
        assert_eq!(elapsed(0, u64::MAX), None);
        assert_eq!(elapsed(u64::MAX, 0), None);
        assert_eq!(elapsed(0, i64::MAX as u64), Some(i64::MAX));
    }
}
