//! Logging session: the driving loop.
//!
//! A session resumes today's buffer from disk, then reads records from the
//! input until it ends. Each well-formed record is stamped, added to the
//! buffer and the whole buffer is written to the day file. Malformed records
//! and failed writes are logged and counted; neither stops the session.
//!
//! The loop ends when the input is exhausted or reports an error. Neither is
//! treated as a failure of the session itself; [`RunSummary::ended`] tells
//! which one happened.

use crate::accumulator::{ingest_line, load_today_buffer, persist, IngestOutcome};
use crate::data::DailyStore;
use crate::instrument::LineReader;
use crate::measurement::DailyBuffer;
use chrono::{DateTime, Local};
use std::io::BufRead;
use tracing::{debug, info, warn};

/// Source of capture timestamps.
pub trait Clock {
    /// Current local time.
    fn now(&self) -> DateTime<Local>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Local>,
{
    fn now(&self) -> DateTime<Local> {
        self()
    }
}

/// How the input stream finished.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StreamEnd {
    /// End of input.
    #[default]
    Eof,
    /// The input reported an error; the message is kept for reporting.
    Error(String),
}

/// Counters for one session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Records read from the input, blank ones included.
    pub lines_read: usize,
    /// Blank records ignored.
    pub blank: usize,
    /// Readings added to the buffer.
    pub appended: usize,
    /// Records discarded because they did not parse.
    pub skipped: usize,
    /// Day changes seen while running.
    pub rollovers: usize,
    /// Writes of the day file that failed.
    pub persist_failures: usize,
    /// How the input finished.
    pub ended: StreamEnd,
}

/// Resume today's buffer from `store` and log everything read from `reader`.
pub fn run_session<R, C>(reader: R, store: &DailyStore, clock: &C) -> RunSummary
where
    R: BufRead,
    C: Clock + ?Sized,
{
    let (buffer, _) = load_today_buffer(store, clock.now());
    let (_, summary) = drive(buffer, reader, store, clock);
    summary
}

/// Feed every record of `reader` through the accumulator, starting from `buffer`.
///
/// Returns the buffer as it stands when the input ends.
pub fn drive<R, C>(
    mut buffer: DailyBuffer,
    reader: R,
    store: &DailyStore,
    clock: &C,
) -> (DailyBuffer, RunSummary)
where
    R: BufRead,
    C: Clock + ?Sized,
{
    let mut lines = LineReader::new(reader);
    let mut summary = RunSummary::default();

    loop {
        let raw = match lines.next_line() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                summary.ended = StreamEnd::Eof;
                break;
            }
            Err(e) => {
                warn!(error = %e, "Input stream failed, stopping");
                summary.ended = StreamEnd::Error(e.to_string());
                break;
            }
        };
        summary.lines_read += 1;

        if raw.iter().all(u8::is_ascii_whitespace) {
            debug!("Ignoring blank line");
            summary.blank += 1;
            continue;
        }

        let now = clock.now();
        let (next, outcome) = ingest_line(buffer, &raw, now);
        buffer = next;
        match outcome {
            Ok(IngestOutcome::Appended) => summary.appended += 1,
            Ok(IngestOutcome::RolledOver) => {
                summary.appended += 1;
                summary.rollovers += 1;
            }
            Err(_) => {
                summary.skipped += 1;
                continue;
            }
        }

        if persist(store, &buffer, now).is_err() {
            summary.persist_failures += 1;
        }
    }

    info!(
        lines = summary.lines_read,
        appended = summary.appended,
        skipped = summary.skipped,
        rollovers = summary.rollovers,
        persist_failures = summary.persist_failures,
        buffered = buffer.len(),
        "Input ended"
    );
    (buffer, summary)
}
