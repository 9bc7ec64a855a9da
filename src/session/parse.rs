use regex::Regex;
use thiserror::Error;

/// Which of the two recognized log lines an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEventKind {
    Created,
    Initiated,
}

/// A session lifecycle line from a free-text daemon log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub kind: SessionEventKind,
    pub session: String,
    /// Milliseconds since midnight.
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("malformed session log line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

// Capture:
// 1-4) HH, MM, SS, fraction of the first clock time on the line; the hour
//      may follow any non-digit, so ISO-8601 `dateTtime` stamps match too
// 5) created | initiated
// 6) session id: rest of line
const SESSION_LINE_RE: &str =
    r"^.*?(?:^|\D)(\d{1,2}):(\d{2}):(\d{2})\.(\d+).*?(?i:\bsession\s+(created|initiated)):?\s+(\S.*?)\s*$";

/// Extract session created/initiated events from log text, in line order.
///
/// Lines that match neither shape are ignored; a matching line with an
/// impossible clock time is an error.
pub fn parse_session_log(text: &str) -> crate::Result<Vec<SessionEvent>> {
    let re = Regex::new(SESSION_LINE_RE)?;

    let mut out = Vec::new();
    let mut skipped = 0usize;
    for (lineno, line) in text.lines().enumerate() {
        let lno = lineno + 1;
        let Some(caps) = re.captures(line) else {
            skipped += 1;
            continue;
        };

        let malformed = |reason: String| SessionError::Malformed { line: lno, reason };

        let field = |idx: usize| caps.get(idx).map(|m| m.as_str()).unwrap_or_default();
        let timestamp_ms = clock_to_ms(field(1), field(2), field(3), field(4)).map_err(malformed)?;

        let kind = if field(5).eq_ignore_ascii_case("created") {
            SessionEventKind::Created
        } else {
            SessionEventKind::Initiated
        };

        out.push(SessionEvent {
            kind,
            session: field(6).to_string(),
            timestamp_ms,
        });
    }

    log::debug!(
        "session log: {} lifecycle lines, {} other lines",
        out.len(),
        skipped
    );
    Ok(out)
}

/// Convert `HH:MM:SS.fraction` parts to milliseconds since midnight.
///
/// The fraction is a decimal fraction of a second truncated to milliseconds.
fn clock_to_ms(hh: &str, mm: &str, ss: &str, frac: &str) -> Result<u64, String> {
    let number = |s: &str, what: &str| {
        s.parse::<u64>()
            .map_err(|_| format!("bad {} field {:?}", what, s))
    };

    let hours = number(hh, "hour")?;
    let minutes = number(mm, "minute")?;
    let seconds = number(ss, "second")?;
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(format!("clock time out of range: {}:{}:{}", hh, mm, ss));
    }

    let mut millis: String = frac.chars().take(3).collect();
    while millis.len() < 3 {
        millis.push('0');
    }
    let millis = number(&millis, "fraction")?;

    Ok(((hours * 60 + minutes) * 60 + seconds) * 1000 + millis)
}
