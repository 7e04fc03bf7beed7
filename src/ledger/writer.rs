use crate::api::CellStore;
use crate::error::Res;
use crate::layout::FieldColumnMap;
use crate::model::{CellRef, Field};
use anyhow::{bail, Context};
use tracing::debug;

/// Writes one record to `row` of `sheet`. Every field in `map` is taken from `values` and all of
/// them are sent in a single store request, so the row is either written as a whole or the whole
/// request fails.
///
/// Fields in `values` that are not part of `map` are ignored. A field of `map` without a value is
/// an error and nothing is written. Rows are one-based, so `row` 0 is an error too.
pub async fn write_row(
    store: &mut dyn CellStore,
    sheet: &str,
    row: u32,
    map: &FieldColumnMap,
    values: &[(Field, String)],
) -> Res<()> {
    if row == 0 {
        bail!("Rows start at 1, unable to write row 0 of '{sheet}'");
    }
    let mut cells = Vec::with_capacity(map.columns().len());
    for (field, column) in map.columns() {
        let Some((_, value)) = values.iter().find(|(f, _)| f == field) else {
            bail!("No value was given for the {field} field");
        };
        cells.push((CellRef::new(*column, row), value.clone()));
    }

    debug!("Writing {} cell(s) to row {row} of '{sheet}'", cells.len());
    store
        .write_cells(sheet, &cells)
        .await
        .with_context(|| format!("Unable to write row {row} of '{sheet}'"))
}
