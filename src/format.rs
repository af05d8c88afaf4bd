//! Output formatting shared by the menu and the CLI.

use crate::model::{Event, EventKind, WorkOrder};

/// One line per work order: id, status, description, then whatever
/// optional details are known.
pub fn format_order(order: &WorkOrder) -> String {
    let mut line = format!("#{}  [{}]  {}", order.id, order.status, order.description);
    if let Some(customer) = &order.customer {
        line.push_str(&format!("  (customer: {customer})"));
    }
    if let Some(total) = order.total {
        line.push_str(&format!("  ${total:.2}"));
    }
    line
}

pub fn format_event(event: &Event) -> String {
    let kind = match event.kind {
        EventKind::Created => "created",
        EventKind::Finished => "finished",
    };
    format!(
        "{}  #{}  {kind}: {}",
        event.timestamp.strftime("%Y-%m-%d %H:%M:%S"),
        event.work_order_id,
        event.message
    )
}
