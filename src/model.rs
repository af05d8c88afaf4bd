//! Core data model for Spokely.
//!
//! Work orders are the only entity the operator edits; events are the
//! append-only history the store keeps alongside them.

mod event;
mod work_order;

pub use event::{Event, EventKind};
pub use work_order::{WorkOrder, WorkOrderStatus};
