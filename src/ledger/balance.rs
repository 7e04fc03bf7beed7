use crate::api::CellStore;
use crate::error::Res;
use crate::layout::{breakdown_range, DAILY_LIMIT_CELL, TOTAL_BALANCE_CELL};
use crate::model::{BalanceBreakdown, BalanceRow, BalanceSnapshot};
use anyhow::Context;

/// Reads the total balance and today's spending limit of `sheet`. Blank cells become the
/// placeholder; a failed read is an error.
pub async fn read_snapshot(store: &mut dyn CellStore, sheet: &str) -> Res<BalanceSnapshot> {
    let mut values = store
        .read_cells(sheet, &[TOTAL_BALANCE_CELL, DAILY_LIMIT_CELL])
        .await
        .with_context(|| format!("Unable to read the balance of '{sheet}'"))?
        .into_iter();
    Ok(BalanceSnapshot::from_cells(
        values.next().flatten(),
        values.next().flatten(),
    ))
}

/// Reads the per-account balance rows of `sheet` in sheet order.
pub async fn read_breakdown(store: &mut dyn CellStore, sheet: &str) -> Res<BalanceBreakdown> {
    let range = breakdown_range();
    let rows = store
        .read_range(sheet, range)
        .await
        .with_context(|| format!("Unable to read {range} of '{sheet}'"))?;
    Ok(BalanceBreakdown::from_rows(rows))
}

/// Lays `rows` out as two aligned columns: labels padded on the right to the widest label, amounts
/// padded on the left to the widest amount, separated by one space. Widths are counted in
/// characters.
pub fn format_breakdown(rows: &[BalanceRow]) -> Vec<String> {
    let label_width = rows
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or_default();
    let amount_width = rows
        .iter()
        .map(|r| r.amount.chars().count())
        .max()
        .unwrap_or_default();
    rows.iter()
        .map(|r| {
            format!(
                "{:<label_width$} {:>amount_width$}",
                r.label, r.amount
            )
        })
        .collect()
}
