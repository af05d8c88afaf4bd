//! Local persistence for work orders.
//!
//! Everything lives in one data directory:
//!
//! ```text
//! <root>/
//!   workorders.json   # The full collection, rewritten on every mutation
//!   events.jsonl      # Append-only lifecycle events
//! ```
//!
//! The store owns the in-memory collection and is the only writer of
//! `workorders.json`. Mutations are applied to a copy, saved, and only then
//! committed to memory, so a failed save leaves both memory and disk as they
//! were.

mod events;

use std::{
    collections::HashSet,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use jiff::Timestamp;
use tracing::{debug, info, warn};

use crate::model::{Event, WorkOrder};

const ORDERS_FILE: &str = "workorders.json";

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("work order data in {} is corrupt: {reason}", path.display())]
    CorruptData { path: PathBuf, reason: String },

    #[error("work order #{0} not found")]
    NotFound(u64),

    #[error("work order #{0} is already finished")]
    AlreadyFinished(u64),

    #[error("invalid work order: {0}")]
    Invalid(&'static str),

    #[error("failed to save {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StoreError>;

/// File-backed store for the work-order collection.
pub struct Store {
    root: PathBuf,
    orders: Vec<WorkOrder>,
}

impl Store {
    /// Opens the store rooted at the given directory, loading any existing
    /// work orders.
    ///
    /// The directory is created if it doesn't exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let orders = load(&root.join(ORDERS_FILE))?;
        Ok(Self { root, orders })
    }

    /// Returns the default data directory: `~/.spokely/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".spokely"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All work orders in insertion order.
    pub fn orders(&self) -> &[WorkOrder] {
        &self.orders
    }

    pub fn get(&self, id: u64) -> Option<&WorkOrder> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Creates a new open work order and persists it.
    pub fn add(
        &mut self,
        description: &str,
        customer: Option<String>,
        total: Option<f64>,
    ) -> Result<WorkOrder> {
        let description = description.trim();
        if description.is_empty() {
            return Err(StoreError::Invalid("description cannot be empty"));
        }
        if total.is_some_and(|t| !t.is_finite() || t < 0.0) {
            return Err(StoreError::Invalid("total must be a non-negative number"));
        }
        let customer = customer
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let order = WorkOrder::open(self.next_id()?, description, customer, total);
        let mut orders = self.orders.clone();
        orders.push(order.clone());
        self.commit(orders)?;

        info!(id = order.id, "work order created");
        self.record(&Event::created(&order));
        Ok(order)
    }

    /// Marks an open work order as finished and persists the change.
    ///
    /// Finishing an already-finished order is rejected with
    /// [`StoreError::AlreadyFinished`]; nothing is written.
    pub fn finish(&mut self, id: u64) -> Result<WorkOrder> {
        let mut orders = self.orders.clone();
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound(id))?;
        if !order.mark_finished(Timestamp::now()) {
            return Err(StoreError::AlreadyFinished(id));
        }
        let order = order.clone();
        self.commit(orders)?;

        info!(id, "work order finished");
        self.record(&Event::finished(&order));
        Ok(order)
    }

    fn next_id(&self) -> Result<u64> {
        self.orders
            .iter()
            .map(|o| o.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(StoreError::Invalid("work order ids exhausted"))
    }

    fn commit(&mut self, orders: Vec<WorkOrder>) -> Result<()> {
        save(&self.orders_path(), &orders)?;
        self.orders = orders;
        Ok(())
    }

    /// Appends to the event log. The mutation it describes is already on
    /// disk, so a failure here is only logged.
    fn record(&self, event: &Event) {
        if let Err(e) = self.append_event(event) {
            warn!(error = %e, work_order_id = event.work_order_id, "failed to record event");
        }
    }

    fn orders_path(&self) -> PathBuf {
        self.root.join(ORDERS_FILE)
    }
}

/// Reads the full collection from `path`.
///
/// A missing or blank file is an empty collection. Anything that doesn't
/// parse, or that repeats an id, is [`StoreError::CorruptData`].
pub fn load(path: &Path) -> Result<Vec<WorkOrder>> {
    let json = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no work order file, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let orders: Vec<WorkOrder> =
        serde_json::from_str(&json).map_err(|e| StoreError::CorruptData {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut seen = HashSet::new();
    if let Some(dup) = orders.iter().find(|o| !seen.insert(o.id)) {
        return Err(StoreError::CorruptData {
            path: path.to_path_buf(),
            reason: format!("duplicate work order id {}", dup.id),
        });
    }

    debug!(path = %path.display(), count = orders.len(), "loaded work orders");
    Ok(orders)
}

/// Replaces the file at `path` with exactly `orders`.
///
/// Writes a sibling temp file and renames it into place, so the previous
/// contents survive a failed write.
pub fn save(path: &Path, orders: &[WorkOrder]) -> Result<()> {
    let json = serde_json::to_string_pretty(orders)?;
    let tmp = path.with_extension("json.tmp");
    let persistence = |source| StoreError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    write_synced(&tmp, json.as_bytes()).map_err(persistence)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(persistence(e));
    }

    debug!(path = %path.display(), count = orders.len(), "saved work orders");
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
