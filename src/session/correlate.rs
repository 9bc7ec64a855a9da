use crate::bench::{PendingTable, SampleSet, elapsed};
use crate::session::parse::{SessionEvent, SessionEventKind};
use anyhow::anyhow;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const NANOS_PER_MS: i64 = 1_000_000;

/// Pair each session's creation with its initiation.
///
/// Samples are in nanoseconds (at millisecond resolution) so they render
/// like journal samples. An initiation that reads earlier on the clock than
/// its creation happened after midnight.
pub fn correlate_sessions(events: &[SessionEvent]) -> crate::Result<SampleSet> {
    let mut pending: PendingTable<&str> = PendingTable::new();
    let mut out = SampleSet::new();

    for event in events {
        match event.kind {
            SessionEventKind::Created => pending.start(&event.session, event.timestamp_ms),
            SessionEventKind::Initiated => {
                if let Some(start) = pending.stop(&event.session.as_str()) {
                    let mut ms = elapsed(start, event.timestamp_ms).ok_or_else(|| {
                        anyhow!(
                            "session {}: clock stamps {} ms and {} ms are too far apart",
                            event.session,
                            start,
                            event.timestamp_ms
                        )
                    })?;
                    if ms < 0 {
                        ms += DAY_MS;
                    }
                    out.push(ms * NANOS_PER_MS);
                }
            }
        }
    }

    if !pending.is_empty() {
        log::debug!("{} session(s) created but never initiated", pending.len());
    }
    Ok(out)
}
