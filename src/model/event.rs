//! Lifecycle events recorded in the event log.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::WorkOrder;

/// One line of `events.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: Timestamp,
    pub work_order_id: u64,
    pub kind: EventKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Created,
    Finished,
}

impl Event {
    pub fn created(order: &WorkOrder) -> Self {
        Self {
            timestamp: order.created_at.unwrap_or_else(Timestamp::now),
            work_order_id: order.id,
            kind: EventKind::Created,
            message: order.description.clone(),
        }
    }

    pub fn finished(order: &WorkOrder) -> Self {
        let recipient = order.customer.as_deref().unwrap_or("customer");
        Self {
            timestamp: order.finished_at.unwrap_or_else(Timestamp::now),
            work_order_id: order.id,
            kind: EventKind::Finished,
            message: format!("SMS would be sent to {recipient}"),
        }
    }
}
