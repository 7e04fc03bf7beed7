//! Implements the `CellStore` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without using Google Sheets.

use crate::api::CellStore;
use crate::error::Res;
use crate::layout::{ADD_EXPENSE_COLUMNS, TRANSFER_COLUMNS};
use crate::model::{qualify, whole_column, CellRange, CellRef, Column, Field};
use anyhow::{bail, Context};
use std::collections::HashMap;
use std::io::Cursor;
use tracing::trace;

/// An implementation of the `CellStore` trait that does not use Google sheets. Each sheet is a grid
/// of rows, and cells that were never written read back as empty.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    sheets: HashMap<String, Vec<Vec<String>>>,
    fail_reads: bool,
    fail_writes: bool,
    write_requests: usize,
}

impl MemoryStore {
    /// An empty store with no sheets.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding a single copy of the monthly template named `sheet`.
    pub fn seeded(sheet: &str) -> Res<Self> {
        let mut store = Self::new();
        store.add_sheet(sheet, load_csv(TEMPLATE_DATA)?);
        for (field, column) in ADD_EXPENSE_COLUMNS
            .columns()
            .iter()
            .chain(TRANSFER_COLUMNS.columns())
        {
            store.set_cell(sheet, CellRef::new(*column, 1), header(*field));
        }
        Ok(store)
    }

    /// Adds or replaces `sheet`. The map key is the sheet name and `rows` are its cells, row 1
    /// first.
    pub fn add_sheet(&mut self, sheet: impl Into<String>, rows: Vec<Vec<String>>) {
        self.sheets.insert(sheet.into(), rows);
    }

    /// The value of a single cell, `None` if the sheet does not exist or the cell is empty.
    pub fn cell(&self, sheet: &str, cell: CellRef) -> Option<&str> {
        let rows = self.sheets.get(sheet)?;
        let value = get(rows, row_index(cell)?, cell.column().index());
        (!value.is_empty()).then_some(value)
    }

    /// Sets a single cell, creating the sheet if needed. There is no row 0, so such a cell is
    /// ignored.
    pub fn set_cell(&mut self, sheet: &str, cell: CellRef, value: impl Into<String>) {
        let Some(row) = row_index(cell) else {
            trace!("Ignoring {cell}, rows start at 1");
            return;
        };
        let rows = self.sheets.entry(sheet.to_string()).or_default();
        set(rows, row, cell.column().index(), value.into());
    }

    /// Makes every subsequent read fail, as if the spreadsheet were unreachable.
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Makes every subsequent write fail.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// How many write requests have been accepted.
    pub fn write_requests(&self) -> usize {
        self.write_requests
    }

    fn sheet(&self, sheet: &str, reference: impl std::fmt::Display) -> Res<&Vec<Vec<String>>> {
        if self.fail_reads {
            bail!("Reads are disabled for this store");
        }
        self.sheets
            .get(sheet)
            .with_context(|| format!("Unable to parse range: {}", qualify(sheet, reference)))
    }
}

#[async_trait::async_trait]
impl CellStore for MemoryStore {
    async fn read_column(&mut self, sheet: &str, column: Column) -> Res<Vec<String>> {
        trace!("read_column {column} of {sheet}");
        let rows = self.sheet(sheet, whole_column(column))?;
        let mut values: Vec<String> = (0..rows.len())
            .map(|r| get(rows, r, column.index()).to_string())
            .collect();
        while values.last().is_some_and(|v| v.is_empty()) {
            values.pop();
        }
        Ok(values)
    }

    async fn read_range(&mut self, sheet: &str, range: CellRange) -> Res<Vec<Vec<String>>> {
        trace!("read_range {range} of {sheet}");
        let rows = self.sheet(sheet, range)?;
        let (start, end) = (range.start(), range.end());
        let mut values: Vec<Vec<String>> = (start.row()..=end.row())
            .map(|row| {
                let mut cells: Vec<String> = (start.column().index()..=end.column().index())
                    .map(|c| match (row as usize).checked_sub(1) {
                        Some(row) => get(rows, row, c).to_string(),
                        None => String::new(),
                    })
                    .collect();
                while cells.last().is_some_and(|v| v.is_empty()) {
                    cells.pop();
                }
                cells
            })
            .collect();
        while values.last().is_some_and(|row| row.is_empty()) {
            values.pop();
        }
        Ok(values)
    }

    async fn read_cells(&mut self, sheet: &str, cells: &[CellRef]) -> Res<Vec<Option<String>>> {
        trace!("read_cells {cells:?} of {sheet}");
        let rows = self.sheet(sheet, cells.first().map(|c| c.to_string()).unwrap_or_default())?;
        Ok(cells
            .iter()
            .map(|cell| match row_index(*cell) {
                Some(row) => get(rows, row, cell.column().index()),
                None => "",
            })
            .map(|value| (!value.is_empty()).then(|| value.to_string()))
            .collect())
    }

    async fn write_cells(&mut self, sheet: &str, cells: &[(CellRef, String)]) -> Res<()> {
        trace!("write_cells {} cell(s) of {sheet}", cells.len());
        if self.fail_writes {
            bail!("Writes are disabled for this store");
        }
        let rows = self
            .sheets
            .get_mut(sheet)
            .with_context(|| format!("Unable to parse range: {}", qualify(sheet, "A1")))?;
        if let Some((cell, _)) = cells.iter().find(|(cell, _)| row_index(*cell).is_none()) {
            bail!("Unable to parse range: {}", qualify(sheet, cell));
        }
        for (cell, value) in cells {
            if let Some(row) = row_index(*cell) {
                set(rows, row, cell.column().index(), value.clone());
            }
        }
        self.write_requests += 1;
        Ok(())
    }
}

/// The zero-based index of the row of `cell`, `None` for row 0.
fn row_index(cell: CellRef) -> Option<usize> {
    (cell.row() as usize).checked_sub(1)
}

fn get(rows: &[Vec<String>], row: usize, col: usize) -> &str {
    rows.get(row)
        .and_then(|cells| cells.get(col))
        .map(String::as_str)
        .unwrap_or_default()
}

fn set(rows: &mut Vec<Vec<String>>, row: usize, col: usize, value: String) {
    if rows.len() <= row {
        rows.resize_with(row + 1, Vec::new);
    }
    let cells = &mut rows[row];
    if cells.len() <= col {
        cells.resize_with(col + 1, String::new);
    }
    cells[col] = value;
}

/// Column headers of the seeded template.
fn header(field: Field) -> &'static str {
    match field {
        Field::Date => "Дата",
        Field::Description => "Описание",
        Field::Amount => "Сумма",
        Field::Category => "Категория",
        Field::Wallet => "Кошелек",
        Field::Path => "Путь",
        Field::From => "Откуда",
        Field::To => "Куда",
    }
}

/// Loads data from a CSV-formatted string.
fn load_csv(csv_data: &str) -> Res<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false) // Ensure headers are treated as part of the data
        .flexible(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result.context("Unable to parse seed CSV")?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

/// Seed data for columns A:C of the monthly template: the balance breakdown in A2:B23, the total
/// balance in C26 and the daily limit in C28.
const TEMPLATE_DATA: &str = r##"Счет,Остаток,
Наличные,8 000,
Карта,31 500,
Накопления,120 000,
Продукты,12 000,
Транспорт,3 500,
Кафе,4 000,
,,
,,
,,
,,
,,
,,
,,
,,
,,
,,
,,
,,
,,
,,
,,
,,
,,
,,
Общий баланс,,159 500
,,
Можно потратить сегодня,,1 200
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{breakdown_range, DAILY_LIMIT_CELL, TOTAL_BALANCE_CELL};

    const SHEET: &str = "Март'26";

    fn cell(s: &str) -> CellRef {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_seeded_template() {
        let mut store = MemoryStore::seeded(SHEET).unwrap();
        assert_eq!(store.cell(SHEET, TOTAL_BALANCE_CELL), Some("159 500"));
        assert_eq!(store.cell(SHEET, DAILY_LIMIT_CELL), Some("1 200"));
        assert_eq!(store.cell(SHEET, cell("N1")), Some("Дата"));
        assert_eq!(store.cell(SHEET, cell("V1")), Some("Откуда"));

        let breakdown = store.read_range(SHEET, breakdown_range()).await.unwrap();
        assert_eq!(breakdown.len(), 6);
        assert_eq!(breakdown[0], vec!["Наличные", "8 000"]);
    }

    #[tokio::test]
    async fn test_read_column_trims_trailing_blanks() {
        let mut store = MemoryStore::new();
        store.set_cell(SHEET, cell("N1"), "a");
        store.set_cell(SHEET, cell("N3"), "c");
        store.set_cell(SHEET, cell("A10"), "elsewhere");
        let column = store.read_column(SHEET, Column::letter(b'N')).await.unwrap();
        assert_eq!(column, vec!["a", "", "c"]);
    }

    #[tokio::test]
    async fn test_read_missing_sheet_is_error() {
        let mut store = MemoryStore::new();
        let err = store
            .read_column("Нет", Column::letter(b'N'))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'Нет'!N:N"));
    }

    #[tokio::test]
    async fn test_read_cells_in_request_order() {
        let mut store = MemoryStore::new();
        store.set_cell(SHEET, cell("C28"), "5");
        let values = store
            .read_cells(SHEET, &[cell("C26"), cell("C28")])
            .await
            .unwrap();
        assert_eq!(values, vec![None, Some("5".to_string())]);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let mut store = MemoryStore::new();
        store.add_sheet(SHEET, Vec::new());
        store
            .write_cells(
                SHEET,
                &[(cell("O4"), "x".to_string()), (cell("B2"), "y".to_string())],
            )
            .await
            .unwrap();
        assert_eq!(store.cell(SHEET, cell("O4")), Some("x"));
        assert_eq!(store.cell(SHEET, cell("B2")), Some("y"));
        assert_eq!(store.write_requests(), 1);
    }

    #[tokio::test]
    async fn test_row_zero_is_not_a_cell() {
        let mut store = MemoryStore::seeded(SHEET).unwrap();
        let row_zero = CellRef::new(Column::letter(b'N'), 0);
        let err = store
            .write_cells(
                SHEET,
                &[(cell("N2"), "x".to_string()), (row_zero, "y".to_string())],
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("N0"));
        assert_eq!(store.write_requests(), 0);
        assert_eq!(store.cell(SHEET, cell("N2")), None);

        assert_eq!(store.cell(SHEET, row_zero), None);
        let values = store.read_cells(SHEET, &[row_zero]).await.unwrap();
        assert_eq!(values, vec![None]);
        store.set_cell(SHEET, row_zero, "z");
        assert_eq!(store.cell(SHEET, cell("N1")), Some("Дата"));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let mut store = MemoryStore::seeded(SHEET).unwrap();
        store.fail_reads(true);
        assert!(store.read_column(SHEET, Column::letter(b'N')).await.is_err());
        store.fail_reads(false);
        store.fail_writes(true);
        assert!(store
            .write_cells(SHEET, &[(cell("N2"), "x".to_string())])
            .await
            .is_err());
        assert_eq!(store.write_requests(), 0);
        assert_eq!(store.cell(SHEET, cell("N2")), None);
    }
}
