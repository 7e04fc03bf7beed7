use crate::api::CellStore;
use crate::error::Res;
use crate::model::Column;
use anyhow::Context;
use tracing::debug;

/// Returns the row that the next record of `sheet` should be written to: one past the rows already
/// present in the `anchor` column. An empty column yields row 1.
///
/// Store failures are returned as errors. Treating an unreadable column as empty would write over
/// row 1 of a sheet that already has data.
///
/// Two requests that locate a row before either writes will pick the same row; the later write
/// wins.
pub async fn find_insertion_row(
    store: &mut dyn CellStore,
    sheet: &str,
    anchor: Column,
) -> Res<u32> {
    let values = store
        .read_column(sheet, anchor)
        .await
        .with_context(|| format!("Unable to read column {anchor} of '{sheet}'"))?;
    let occupied = u32::try_from(values.len()).context("Too many rows in the sheet")?;
    let row = occupied + 1;
    debug!("Column {anchor} of '{sheet}' has {occupied} row(s), inserting at row {row}");
    Ok(row)
}
