//! Command handlers for the finbot CLI.
//!
//! `add_expense`, `transfer` and `balance` are the entry points a chat transport calls, one per
//! intent. Each takes the store handle and the period explicitly and returns the reply text in an
//! `Out`, or an `Error` whose `reply()` is the text to send instead.

mod add;
mod auth;
mod balance;
mod init;
mod message;
mod period;
mod transfer;

use crate::api::CellStore;
use crate::error::{ErrorType, IntoResult};
use crate::layout::FieldColumnMap;
use crate::ledger;
use crate::model::{BalanceSnapshot, Field, Period, RequestKind};
use crate::Result;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info, warn};

pub use add::add_expense;
pub use auth::{auth, auth_verify};
pub use balance::{balance, BalanceReport};
pub use init::init;
pub use message::{handle_message, BALANCE_COMMAND};
pub use period::period;
pub use transfer::transfer;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data about what happened.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// The reply text for the user.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to stdout and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        println!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// What was written by `add_expense` or `transfer`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Receipt {
    pub kind: RequestKind,
    pub sheet: String,
    pub row: u32,
    pub balance: BalanceSnapshot,
}

/// Locates the next free row for `map`, writes `values` plus today's date there, and reads the
/// balance back. Only the locate and write steps can fail: once the row is written a failed
/// balance read is logged and reported as unknown values.
async fn record(
    store: &mut dyn CellStore,
    period: &Period,
    kind: RequestKind,
    map: &FieldColumnMap,
    mut values: Vec<(Field, String)>,
) -> Result<Receipt> {
    let sheet = period.label();
    values.push((Field::Date, period.date_cell()));

    let row = ledger::find_insertion_row(store, sheet, map.anchor())
        .await
        .pub_result(ErrorType::Store)?;
    ledger::write_row(store, sheet, row, map, &values)
        .await
        .pub_result(ErrorType::Store)?;
    info!("Recorded {kind} in row {row} of '{sheet}'");

    let balance = match ledger::read_snapshot(store, sheet).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("The row was written but the balance could not be read: {e:#}");
            BalanceSnapshot::unknown()
        }
    };

    Ok(Receipt {
        kind,
        sheet: sheet.to_string(),
        row,
        balance,
    })
}

/// The two balance lines that end every successful reply.
fn balance_lines(snapshot: &BalanceSnapshot) -> String {
    format!(
        "💰 Общий баланс: {}\n💰 Можно потратить сегодня: {}",
        snapshot.total, snapshot.daily_limit
    )
}
