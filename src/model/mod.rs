//! Types that represent the core data model, such as `AddExpense`, `Period` and `CellRef`.
mod amount;
mod balance;
mod cell;
mod period;
mod request;

pub use amount::{Amount, AmountError};
pub use balance::{BalanceBreakdown, BalanceRow, BalanceSnapshot, PLACEHOLDER};
pub use cell::{qualify, whole_column, CellRange, CellRef, Column};
pub use period::Period;
pub use request::{AddExpense, Field, RequestKind, Transfer};
