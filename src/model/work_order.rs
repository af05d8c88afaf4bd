//! Work order types: the unit of requested work.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A unit of requested work with a description and a completion status.
///
/// Optional fields are skipped when absent so files written by the earlier
/// prototype (which had no timestamps) load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: u64,

    /// Free-form text supplied by the operator.
    /// The prototype called this field `item`.
    #[serde(alias = "item")]
    pub description: String,

    /// Who gets the "order finished" text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    /// Quoted price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,

    pub status: WorkOrderStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    /// Set exactly when `status` flips to [`WorkOrderStatus::Finished`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<Timestamp>,
}

impl WorkOrder {
    /// A freshly created, open work order.
    pub fn open(
        id: u64,
        description: impl Into<String>,
        customer: Option<String>,
        total: Option<f64>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            customer,
            total,
            status: WorkOrderStatus::Open,
            created_at: Some(Timestamp::now()),
            finished_at: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == WorkOrderStatus::Finished
    }

    /// Flip to finished. Returns `false` (and changes nothing) if the order
    /// was already finished.
    pub fn mark_finished(&mut self, at: Timestamp) -> bool {
        if self.is_finished() {
            return false;
        }
        self.status = WorkOrderStatus::Finished;
        self.finished_at = Some(at);
        true
    }
}

/// Where a work order stands. Moves from open to finished exactly once.
///
/// Always written as `"open"` or `"finished"`. Reading is lenient because
/// the prototype stored whatever status text the operator typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum WorkOrderStatus {
    /// Work is outstanding.
    Open,

    /// Work is done and the customer has been told.
    Finished,
}

/// `finished`, `complete` and `completed` in any case are finished;
/// every other status (`in progress`, `waiting on parts`, ...) is open.
impl From<String> for WorkOrderStatus {
    fn from(status: String) -> Self {
        match status.trim().to_lowercase().as_str() {
            "finished" | "complete" | "completed" => Self::Finished,
            _ => Self::Open,
        }
    }
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Finished => write!(f, "finished"),
        }
    }
}
