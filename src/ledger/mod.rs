//! The sheet-level operations built on top of a `CellStore`: finding the next free row, writing a
//! row, and reading the balance back.

mod balance;
mod locator;
mod writer;

pub use balance::{format_breakdown, read_breakdown, read_snapshot};
pub use locator::find_insertion_row;
pub use writer::write_row;
