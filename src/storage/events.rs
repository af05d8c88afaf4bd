//! Event log: an append-only history of work order lifecycle events.
//!
//! Each event is one JSON line in `events.jsonl`. A missing file is an
//! empty log.

use std::{fs, io};

// Traits must be in scope for `.lines()` on `BufReader` and `.write_all()` on `File`.
use io::{BufRead, Write};

use tracing::warn;

use crate::model::Event;

use super::{Result, Store};

const EVENTS_FILE: &str = "events.jsonl";

impl Store {
    /// Appends an event to the log.
    pub fn append_event(&self, event: &Event) -> Result<()> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.root.join(EVENTS_FILE))?;
        let mut line = serde_json::to_string(event)?;
        line.push('\n');
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Loads the last `limit` events, oldest first.
    ///
    /// Lines that don't parse are skipped with a warning.
    pub fn recent_events(&self, limit: usize) -> Result<Vec<Event>> {
        let file = match fs::File::open(self.root.join(EVENTS_FILE)) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let reader = io::BufReader::new(file);
        let mut events = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(event) => events.push(event),
                Err(e) => warn!(line = n + 1, error = %e, "skipping malformed event"),
            }
        }
        let skip = events.len().saturating_sub(limit);
        Ok(events.split_off(skip))
    }
}
