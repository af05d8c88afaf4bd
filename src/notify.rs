//! Customer notification when a work order is finished.
//!
//! There is no delivery: the console notifier prints the text that would
//! have been sent.

use std::io::{self, Write};

use tracing::warn;

use crate::model::WorkOrder;

/// Told about every work order the moment it is finished.
pub trait Notifier {
    fn order_finished(&mut self, order: &WorkOrder);
}

/// Prints a placeholder SMS to the given writer (stdout in the binary).
pub struct ConsoleNotifier<W = io::Stdout> {
    out: W,
}

impl ConsoleNotifier {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn order_finished(&mut self, order: &WorkOrder) {
        if let Err(e) = writeln!(self.out, "{}", sms_text(order)) {
            warn!(error = %e, id = order.id, "failed to print notification");
        }
    }
}

/// The text of the simulated SMS.
pub fn sms_text(order: &WorkOrder) -> String {
    let recipient = order.customer.as_deref().unwrap_or("customer");
    format!(
        "[SMS simulated] Text sent to {recipient} for work order #{} ({})",
        order.id, order.description
    )
}

/// Remembers which orders it was told about.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub finished: Vec<u64>,
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn order_finished(&mut self, order: &WorkOrder) {
        self.finished.push(order.id);
    }
}
