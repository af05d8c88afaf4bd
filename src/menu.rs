//! Interactive menu: the operator-facing command loop.
//!
//! Each iteration prints the menu, reads a choice, and routes it to the
//! store. Bad input is reported and re-prompted; only option 4 (or the end
//! of input) leaves the loop. All business rules live in [`Store`].

use std::{
    fmt,
    io::{self, BufRead, Write},
};

use tracing::debug;

use crate::format::format_order;
use crate::notify::Notifier;
use crate::storage::{Store, StoreError};

const MENU: &str = "\n--- Main Menu ---\n\
    1. Add work order\n\
    2. List work orders\n\
    3. Mark work order as finished\n\
    4. Exit";

/// Operator input that could not be understood.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("invalid choice {0:?}. Please enter 1, 2, 3, or 4.")]
    Choice(String),

    #[error("invalid work order id {0:?}")]
    Id(String),

    #[error("invalid total {0:?}. Enter a non-negative amount or leave it blank.")]
    Total(String),

    #[error("description cannot be empty")]
    EmptyDescription,

    #[error("input is not valid UTF-8")]
    NotUtf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Add,
    List,
    Finish,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Exited,
}

fn parse_choice(input: &str) -> Result<Choice, InputError> {
    match input {
        "1" => Ok(Choice::Add),
        "2" => Ok(Choice::List),
        "3" => Ok(Choice::Finish),
        "4" => Ok(Choice::Exit),
        other => Err(InputError::Choice(other.to_string())),
    }
}

fn parse_id(input: &str) -> Result<u64, InputError> {
    input
        .parse()
        .map_err(|_| InputError::Id(input.to_string()))
}

/// Blank means "no total".
fn parse_total(input: &str) -> Result<Option<f64>, InputError> {
    if input.is_empty() {
        return Ok(None);
    }
    let amount = input.strip_prefix('$').unwrap_or(input);
    match amount.parse::<f64>() {
        Ok(t) if t.is_finite() && t >= 0.0 => Ok(Some(t)),
        _ => Err(InputError::Total(input.to_string())),
    }
}

/// Runs the menu until the operator exits or input ends.
///
/// I/O errors on the terminal itself end the loop; everything else is
/// reported to the operator and the loop continues.
pub fn run(
    store: &mut Store,
    notifier: &mut impl Notifier,
    input: impl BufRead,
    out: impl Write,
) -> io::Result<()> {
    let mut session = Session {
        store,
        notifier,
        input,
        out,
    };
    session.run()
}

struct Session<'a, N, R, W> {
    store: &'a mut Store,
    notifier: &'a mut N,
    input: R,
    out: W,
}

impl<N: Notifier, R: BufRead, W: Write> Session<'_, N, R, W> {
    fn run(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(60))?;
        writeln!(self.out, "SPOKELY - Work Order Tracking System")?;
        writeln!(self.out, "{}", "=".repeat(60))?;

        let mut state = State::Running;
        while state == State::Running {
            writeln!(self.out, "{MENU}")?;
            state = match self.prompt("\nEnter your choice (1-4): ")? {
                None => State::Exited,
                Some(line) => match parse_choice(&line) {
                    Ok(Choice::Add) => self.add()?,
                    Ok(Choice::List) => self.list()?,
                    Ok(Choice::Finish) => self.finish()?,
                    Ok(Choice::Exit) => State::Exited,
                    Err(e) => {
                        self.report(&e)?;
                        State::Running
                    }
                },
            };
        }

        writeln!(self.out, "\nThank you for using Spokely. Goodbye!")?;
        self.out.flush()
    }

    fn add(&mut self) -> io::Result<State> {
        writeln!(self.out, "\n--- Add Work Order ---")?;

        let Some(description) = self.prompt("Enter description: ")? else {
            return Ok(State::Exited);
        };
        if description.is_empty() {
            self.report(&InputError::EmptyDescription)?;
            return Ok(State::Running);
        }
        let Some(customer) = self.prompt("Enter customer name (Enter to skip): ")? else {
            return Ok(State::Exited);
        };
        let Some(total) = self.prompt("Enter total price $ (Enter to skip): ")? else {
            return Ok(State::Exited);
        };
        let total = match parse_total(&total) {
            Ok(t) => t,
            Err(e) => {
                self.report(&e)?;
                return Ok(State::Running);
            }
        };

        match self.store.add(&description, Some(customer), total) {
            Ok(order) => writeln!(self.out, "Work order #{} created.", order.id)?,
            Err(e) => self.report(&e)?,
        }
        Ok(State::Running)
    }

    fn list(&mut self) -> io::Result<State> {
        writeln!(self.out, "\n--- Work Orders ---")?;

        let orders = self.store.orders();
        if orders.is_empty() {
            writeln!(self.out, "No work orders found.")?;
        }
        for order in orders {
            writeln!(self.out, "{}", format_order(order))?;
        }
        Ok(State::Running)
    }

    fn finish(&mut self) -> io::Result<State> {
        writeln!(self.out, "\n--- Mark Work Order as Finished ---")?;

        let Some(input) = self.prompt("Enter work order ID: ")? else {
            return Ok(State::Exited);
        };
        let id = match parse_id(&input) {
            Ok(id) => id,
            Err(e) => {
                self.report(&e)?;
                return Ok(State::Running);
            }
        };

        match self.store.finish(id) {
            Ok(order) => {
                self.out.flush()?;
                self.notifier.order_finished(&order);
                writeln!(self.out, "Work order #{id} marked as finished.")?;
            }
            Err(StoreError::NotFound(_)) => {
                writeln!(self.out, "No such work order: #{id}.")?;
            }
            Err(StoreError::AlreadyFinished(_)) => {
                let since = self
                    .store
                    .get(id)
                    .and_then(|o| o.finished_at)
                    .map(|at| format!(" (since {})", at.strftime("%Y-%m-%d %H:%M")))
                    .unwrap_or_default();
                writeln!(
                    self.out,
                    "Work order #{id} is already finished{since}. No notification sent."
                )?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(State::Running)
    }

    /// Prints `text` and reads one trimmed line. `None` at end of input.
    ///
    /// A line that isn't UTF-8 is reported and the same prompt is asked again.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        loop {
            write!(self.out, "{text}")?;
            self.out.flush()?;

            let mut buf = Vec::new();
            if self.input.read_until(b'\n', &mut buf)? == 0 {
                debug!("input closed");
                return Ok(None);
            }
            match String::from_utf8(buf) {
                Ok(line) => return Ok(Some(line.trim().to_string())),
                Err(_) => self.report(&InputError::NotUtf8)?,
            }
        }
    }

    fn report(&mut self, error: &dyn fmt::Display) -> io::Result<()> {
        writeln!(self.out, "Error: {error}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::model::WorkOrderStatus;
    use crate::notify::RecordingNotifier;

    struct Harness {
        _dir: TempDir,
        store: Store,
        notifier: RecordingNotifier,
    }

    impl Harness {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let store = Store::open(dir.path().join("data")).unwrap();
            Self {
                _dir: dir,
                store,
                notifier: RecordingNotifier::default(),
            }
        }

        /// Feeds `script` to the menu and returns everything it printed.
        fn session(&mut self, script: &str) -> String {
            let mut out = Vec::new();
            run(
                &mut self.store,
                &mut self.notifier,
                script.as_bytes(),
                &mut out,
            )
            .unwrap();
            String::from_utf8(out).unwrap()
        }
    }

    #[test]
    fn parse_choice_accepts_menu_numbers() {
        assert_eq!(parse_choice("1"), Ok(Choice::Add));
        assert_eq!(parse_choice("4"), Ok(Choice::Exit));
        assert_eq!(parse_choice("5"), Err(InputError::Choice("5".into())));
        assert_eq!(parse_choice("add"), Err(InputError::Choice("add".into())));
    }

    #[test]
    fn parse_total_variants() {
        assert_eq!(parse_total(""), Ok(None));
        assert_eq!(parse_total("12.50"), Ok(Some(12.5)));
        assert_eq!(parse_total("$3"), Ok(Some(3.0)));
        assert!(parse_total("-1").is_err());
        assert!(parse_total("abc").is_err());
        assert!(parse_total("inf").is_err());
    }

    #[test]
    fn parse_id_rejects_non_numeric() {
        assert_eq!(parse_id("12"), Ok(12));
        assert_eq!(parse_id("-1"), Err(InputError::Id("-1".into())));
        assert_eq!(parse_id("one"), Err(InputError::Id("one".into())));
    }

    #[test]
    fn add_then_list() {
        let mut h = Harness::new();

        let out = h.session("1\nReplace filter\n\n\n2\n4\n");

        assert!(out.contains("Work order #1 created."));
        assert!(out.contains("#1  [open]  Replace filter"));
        assert!(out.contains("Goodbye"));
        assert_eq!(h.store.orders().len(), 1);
    }

    #[test]
    fn add_with_customer_and_total() {
        let mut h = Harness::new();

        h.session("1\nTune-up\nDana\n45\n4\n");

        let order = h.store.get(1).unwrap();
        assert_eq!(order.customer.as_deref(), Some("Dana"));
        assert_eq!(order.total, Some(45.0));
    }

    #[test]
    fn finish_notifies_once() {
        let mut h = Harness::new();

        let out = h.session("1\nFix leak\n\n\n1\nPaint wall\n\n\n3\n1\n3\n1\n2\n4\n");

        assert_eq!(h.notifier.finished, vec![1]);
        assert!(out.contains("Work order #1 marked as finished."));
        assert!(out.contains("Work order #1 is already finished (since "));
        assert!(out.contains("#1  [finished]  Fix leak"));
        assert!(out.contains("#2  [open]  Paint wall"));
    }

    #[test]
    fn finish_unknown_id_reports_not_found() {
        let mut h = Harness::new();
        h.store.add("Fix leak", None, None).unwrap();
        h.store.add("Paint wall", None, None).unwrap();
        h.store.finish(1).unwrap();
        let before = h.store.orders().to_vec();

        let out = h.session("3\n5\n4\n");

        assert!(out.contains("No such work order: #5."));
        assert_eq!(h.store.orders(), before.as_slice());
        assert!(h.notifier.finished.is_empty());
    }

    #[test]
    fn bad_input_is_reported_and_loop_continues() {
        let mut h = Harness::new();

        let out = h.session("9\n\n3\nabc\n1\n\n1\nOil change\n\nfree\n2\n4\n");

        assert!(out.contains("Error: invalid choice \"9\""));
        assert!(out.contains("Error: invalid choice \"\""));
        assert!(out.contains("Error: invalid work order id \"abc\""));
        assert!(out.contains("Error: description cannot be empty"));
        assert!(out.contains("Error: invalid total \"free\""));
        assert!(out.contains("No work orders found."));
        assert!(h.store.orders().is_empty());
    }

    #[test]
    fn non_utf8_line_is_reported_and_loop_continues() {
        let mut h = Harness::new();
        let mut out = Vec::new();

        run(
            &mut h.store,
            &mut h.notifier,
            &b"\xff\xfe\n2\n1\n\xff\nPump seal\n\n\n4\n"[..],
            &mut out,
        )
        .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(out.matches("Error: input is not valid UTF-8").count(), 2);
        assert!(out.contains("No work orders found."));
        assert!(out.contains("Work order #1 created."));
        assert!(out.contains("Goodbye"));
        assert_eq!(h.store.get(1).unwrap().description, "Pump seal");
    }

    #[test]
    fn end_of_input_exits() {
        let mut h = Harness::new();

        let out = h.session("1\nHalf typed");

        // The description arrives without a newline, then input ends while
        // prompting for the customer: nothing is created.
        assert!(out.contains("Goodbye"));
        assert!(h.store.orders().is_empty());
    }

    #[test]
    fn empty_input_exits_immediately() {
        let mut h = Harness::new();

        let out = h.session("");

        assert!(out.contains("Main Menu"));
        assert!(out.contains("Goodbye"));
    }

    #[test]
    fn state_persists_between_sessions() {
        let mut h = Harness::new();
        h.session("1\nFix leak\n\n\n1\nPaint wall\n\n\n3\n1\n4\n");

        let mut reopened = Store::open(h.store.root()).unwrap();
        let mut notifier = RecordingNotifier::default();
        let mut out = Vec::new();
        run(&mut reopened, &mut notifier, "2\n4\n".as_bytes(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("#1  [finished]  Fix leak"));
        assert!(out.contains("#2  [open]  Paint wall"));
        assert_eq!(reopened.get(1).unwrap().status, WorkOrderStatus::Finished);
    }
}
