//! Append-only JSONL audit trail of a tally.
//!
//! Every [`TallyEvent`] becomes one line: the event's own fields plus a
//! `seq` number and an `at` timestamp. Runs append to the same file, and
//! each run starts with a `tally_started` line, so one file can hold the
//! history of a thread across re-tallies.

use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tally_application::ports::tally_logger::{TallyEvent, TallyEventLogger};
use tracing::debug;

#[derive(Serialize)]
struct Record<'a> {
    seq: u64,
    at: String,
    #[serde(flatten)]
    event: &'a TallyEvent,
}

struct Sink {
    out: LineWriter<File>,
    seq: u64,
}

/// [`TallyEventLogger`] that appends to a JSONL file.
pub struct JsonlTallyLogger {
    sink: Mutex<Sink>,
    path: PathBuf,
}

impl JsonlTallyLogger {
    /// Open `path` for appending, creating it and its directory as needed.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            sink: Mutex::new(Sink {
                out: LineWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TallyEventLogger for JsonlTallyLogger {
    fn log(&self, event: TallyEvent) {
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        sink.seq += 1;
        let record = Record {
            seq: sink.seq,
            at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            event: &event,
        };
        let written = serde_json::to_writer(&mut sink.out, &record)
            .map_err(io::Error::from)
            .and_then(|()| sink.out.write_all(b"\n"));
        if let Err(e) = written {
            debug!("Dropped {} event: {}", event.event_type(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_domain::{Origin, Post, PostOutcome, SkipReason, TallyStats};

    fn read_records(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("tally.jsonl");
        let logger = JsonlTallyLogger::open(&path).unwrap();
        assert_eq!(logger.path(), path);

        let post = Post::new(Origin::new("Alice", 7, 2).with_thread("quest-12"), "[x] Wall");
        logger.log(TallyEvent::tally_started("dump.json", 1));
        logger.log(TallyEvent::for_outcome(
            &post,
            PostOutcome::Counted { blocks: 1 },
            false,
        ));
        logger.log(TallyEvent::for_outcome(
            &post,
            PostOutcome::Skipped(SkipReason::Filtered),
            false,
        ));

        let records = read_records(&path);
        assert_eq!(records.len(), 3);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record["seq"], i as u64 + 1);
            assert!(record["at"].as_str().unwrap().ends_with('Z'));
        }
        assert_eq!(records[0]["type"], "tally_started");
        assert_eq!(records[0]["source"], "dump.json");
        assert_eq!(records[1]["type"], "post_processed");
        assert_eq!(records[1]["author"], "Alice");
        assert_eq!(records[1]["thread"], "quest-12");
        assert_eq!(records[2]["reason"], "filtered");
    }

    #[test]
    fn test_reopening_appends_a_new_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.jsonl");

        for _ in 0..2 {
            let logger = JsonlTallyLogger::open(&path).unwrap();
            logger.log(TallyEvent::tally_started("dump.json", 0));
            logger.log(TallyEvent::tally_completed(&TallyStats::default()));
        }

        let records = read_records(&path);
        let types: Vec<_> = records.iter().map(|r| r["type"].as_str().unwrap()).collect();
        assert_eq!(
            types,
            [
                "tally_started",
                "tally_completed",
                "tally_started",
                "tally_completed"
            ]
        );
        assert_eq!(records[2]["seq"], 1);
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        assert!(JsonlTallyLogger::open(blocker.join("tally.jsonl")).is_err());
    }
}
