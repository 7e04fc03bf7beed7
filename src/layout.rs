//! Where things live in a monthly sheet.
//!
//! Every monthly sheet is a copy of the same template, so these addresses are fixed. Expenses and
//! transfers occupy disjoint column blocks of the same sheet and never overwrite each other.

use crate::model::{CellRange, CellRef, Column, Field};

/// Which column each field of a request is written to. The first entry is the anchor column that
/// the row locator counts to find the next free row.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FieldColumnMap {
    columns: &'static [(Field, Column)],
}

impl FieldColumnMap {
    const fn new(columns: &'static [(Field, Column)]) -> Self {
        Self { columns }
    }

    /// The column used to decide how many rows are already filled.
    pub fn anchor(&self) -> Column {
        // Both maps are non-empty constants.
        self.columns[0].1
    }

    /// The `(field, column)` pairs in column order.
    pub fn columns(&self) -> &'static [(Field, Column)] {
        self.columns
    }

    /// The column that `field` is written to, if it is part of this map.
    pub fn column(&self, field: Field) -> Option<Column> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, c)| *c)
    }
}

/// Expense rows: `N` date, `O` description, `Q` amount, `R` category, `S` wallet. Column `P` holds
/// a formula in the template and is left alone.
pub const ADD_EXPENSE_COLUMNS: FieldColumnMap = FieldColumnMap::new(ADD_EXPENSE_FIELDS);

const ADD_EXPENSE_FIELDS: &[(Field, Column)] = &[
    (Field::Date, Column::letter(b'N')),
    (Field::Description, Column::letter(b'O')),
    (Field::Amount, Column::letter(b'Q')),
    (Field::Category, Column::letter(b'R')),
    (Field::Wallet, Column::letter(b'S')),
];

/// Transfer rows: `U` date, `V` from, `W` to, `X` amount, `Y` description.
pub const TRANSFER_COLUMNS: FieldColumnMap = FieldColumnMap::new(TRANSFER_FIELDS);

const TRANSFER_FIELDS: &[(Field, Column)] = &[
    (Field::Date, Column::letter(b'U')),
    (Field::From, Column::letter(b'V')),
    (Field::To, Column::letter(b'W')),
    (Field::Amount, Column::letter(b'X')),
    (Field::Description, Column::letter(b'Y')),
];

/// The aggregate balance.
pub const TOTAL_BALANCE_CELL: CellRef = CellRef::new(Column::letter(b'C'), 26);

/// How much can still be spent today.
pub const DAILY_LIMIT_CELL: CellRef = CellRef::new(Column::letter(b'C'), 28);

/// The `label | amount` table shown by the balance query.
pub fn breakdown_range() -> CellRange {
    CellRange::new(
        CellRef::new(Column::letter(b'A'), 2),
        CellRef::new(Column::letter(b'B'), 23),
    )
}
