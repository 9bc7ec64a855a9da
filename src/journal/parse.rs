use crate::journal::record::EventRecord;
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use thiserror::Error;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Why a single journal line could not be turned into an [`EventRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected 4 fields (mp_id thread_id seconds nanoseconds), found {0}")]
    FieldCount(usize),

    #[error("{field} is not an unsigned integer: {token:?}")]
    BadInteger { field: &'static str, token: String },

    #[error("timestamp {seconds}s {nanos}ns does not fit in 64 bits")]
    Overflow { seconds: u64, nanos: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JournalError {
    /// A record line is broken. Fatal: the journal writer never emits these.
    #[error("malformed journal record at line {line}")]
    Malformed {
        line: usize,
        #[source]
        reason: RecordError,
    },
}

/// A fully read journal: declared measuring point names plus all events in
/// file order.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    pub points: BTreeMap<u32, String>,
    pub events: Vec<EventRecord>,
}

impl Journal {
    /// Display name for a measuring point, falling back to `#id`.
    pub fn point_name(&self, id: u32) -> String {
        self.points
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("#{}", id))
    }
}

/// Lazy record iterator returned by [`records`].
pub struct Records<I> {
    lines: std::iter::Enumerate<I>,
}

/// Turn journal lines into event records, in input order.
///
/// Lines starting with `#` are skipped; every other line, blank ones
/// included, must be a record. The first malformed line yields an error;
/// callers are expected to stop there.
pub fn records<I, S>(lines: I) -> Records<I::IntoIter>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Records {
        lines: lines.into_iter().enumerate(),
    }
}

impl<I, S> Iterator for Records<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<EventRecord, JournalError>;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, line) in self.lines.by_ref() {
            let line = line.as_ref();
            if line.starts_with('#') {
                continue;
            }
            return Some(
                parse_record(line).map_err(|reason| JournalError::Malformed {
                    line: idx + 1,
                    reason,
                }),
            );
        }
        None
    }
}

/// Parse one `mp_id thread_id seconds nanoseconds` line.
pub fn parse_record(line: &str) -> Result<EventRecord, RecordError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [mp, thread, secs, nanos] = fields.as_slice() else {
        return Err(RecordError::FieldCount(fields.len()));
    };

    let measuring_point: u32 = parse_field(mp, "mp_id")?;
    let thread_id: u64 = parse_field(thread, "thread_id")?;
    let seconds: u64 = parse_field(secs, "seconds")?;
    let nanos: u64 = parse_field(nanos, "nanoseconds")?;

    let timestamp_ns = seconds
        .checked_mul(NANOS_PER_SEC)
        .and_then(|ns| ns.checked_add(nanos))
        .ok_or(RecordError::Overflow { seconds, nanos })?;

    Ok(EventRecord::new(measuring_point, thread_id, timestamp_ns))
}

fn parse_field<T: std::str::FromStr>(token: &str, field: &'static str) -> Result<T, RecordError> {
    token.parse().map_err(|_| RecordError::BadInteger {
        field,
        token: token.to_string(),
    })
}

/// Collect measuring point names from the journal header.
///
/// The writer documents every point as `# \t<id> <NAME>`; other comment lines
/// (creation date, format description) are ignored.
pub fn header_points<I, S>(lines: I) -> BTreeMap<u32, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = BTreeMap::new();
    for line in lines {
        let Some(rest) = line.as_ref().strip_prefix('#') else {
            continue;
        };
        let mut tokens = rest.split_whitespace();
        let (Some(id), Some(name), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            continue;
        };
        if let Ok(id) = id.parse::<u32>() {
            out.insert(id, name.to_string());
        }
    }
    out
}

/// Read a whole journal from text.
pub fn read_journal(text: &str) -> Result<Journal, JournalError> {
    let events = records(text.lines()).collect::<Result<Vec<_>, _>>()?;
    Ok(Journal {
        points: header_points(text.lines()),
        events,
    })
}

/// Read a journal from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_journal_file(path: Option<&str>) -> crate::Result<Journal> {
    let text = read_input(path)?;
    let journal = read_journal(&text)
        .with_context(|| format!("parse journal {}", path.unwrap_or("<stdin>")))?;

    log::info!(
        "read {} journal records ({} named measuring points)",
        journal.events.len(),
        journal.points.len()
    );
    Ok(journal)
}

/// Read an input file or stdin into memory.
pub fn read_input(path: Option<&str>) -> crate::Result<String> {
    match path {
        None | Some("-") => {
            let mut text = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut text)
                .context("read stdin")?;
            Ok(text)
        }
        Some(p) => fs::read_to_string(p).with_context(|| format!("read input file {}", p)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const JOURNAL: &str = "\
# Benchmark Journal, created Tue Nov  7 10:00:00 2006
# Format: <measuring point ID> <Thread ID> <seconds> <nano seconds>
# Measuring points:
# \t0 INVALID_ID
# \t1 PRE_VLSP_SETUP
# \t2 POST_VLSP_SETUP
1 7 10 0
# comment in the middle
2 7 10 500
";

    #[test]
    fn reads_records_and_skips_comments() {
        let journal = read_journal(JOURNAL).unwrap();
        assert_eq!(
            journal.events,
            vec![
                EventRecord::new(1, 7, 10_000_000_000),
                EventRecord::new(2, 7, 10_000_000_500),
            ]
        );
    }

    #[test]
    fn collects_header_point_names() {
        let journal = read_journal(JOURNAL).unwrap();
        assert_eq!(journal.points.len(), 3);
        assert_eq!(journal.point_name(1), "PRE_VLSP_SETUP");
        assert_eq!(journal.point_name(42), "#42");
    }

    #[test]
    fn thread_ids_use_full_pthread_width() {
        let rec = parse_record("3 140234567890123 1 2").unwrap();
        assert_eq!(rec.thread_id, 140_234_567_890_123);
        assert_eq!(rec.timestamp_ns, 1_000_000_002);
    }

    #[test]
    fn wrong_field_count_is_fatal() {
        let err = read_journal("1 2 3\n").unwrap_err();
        assert_eq!(
            err,
            JournalError::Malformed {
                line: 1,
                reason: RecordError::FieldCount(3)
            }
        );

        assert_eq!(parse_record("1 2 3 4 5"), Err(RecordError::FieldCount(5)));
    }

    #[test]
    fn non_integer_field_reports_line_number() {
        let err = read_journal("# header\n1 2 3 4\n1 x 3 4\n").unwrap_err();
        match err {
            JournalError::Malformed { line, reason } => {
                assert_eq!(line, 3);
                assert_eq!(
                    reason,
                    RecordError::BadInteger {
                        field: "thread_id",
                        token: "x".to_string()
                    }
                );
            }
        }
    }

    #[test]
    fn negative_values_are_malformed() {
        assert!(matches!(
            parse_record("1 2 -3 4"),
            Err(RecordError::BadInteger {
                field: "seconds",
                ..
            })
        ));
    }

    #[test]
    fn timestamp_overflow_is_malformed() {
        let line = format!("1 1 {} 0", u64::MAX);
        assert!(matches!(
            parse_record(&line),
            Err(RecordError::Overflow { .. })
        ));
    }

    #[test]
    fn records_is_lazy_and_stops_at_caller() {
        let mut it = records(["1 1 0 1", "garbage", "2 1 0 2"]);
        assert_eq!(it.next(), Some(Ok(EventRecord::new(1, 1, 1))));
        assert!(matches!(it.next(), Some(Err(JournalError::Malformed { line: 2, .. }))));
        assert_eq!(it.next(), Some(Ok(EventRecord::new(2, 1, 2))));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn blank_line_is_malformed() {
        let err = read_journal("1 7 0 0\n\n2 7 0 500\n").unwrap_err();
        assert_eq!(
            err,
            JournalError::Malformed {
                line: 2,
                reason: RecordError::FieldCount(0)
            }
        );
        assert!(read_journal("1 7 0 0\n   \n").is_err());
    }

    #[test]
    fn malformed_message_names_line_and_keeps_reason_as_source() {
        let err = read_journal("1 2 3\n").unwrap_err();
        assert_eq!(err.to_string(), "malformed journal record at line 1");
        let source = std::error::Error::source(&err).map(|e| e.to_string());
        assert_eq!(
            source.as_deref(),
            Some("expected 4 fields (mp_id thread_id seconds nanoseconds), found 3")
        );
    }

    #[test]
    fn indented_hash_is_not_a_comment() {
        assert!(read_journal("  # not a comment\n").is_err());
    }
}
