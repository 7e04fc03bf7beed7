use crate::api::CellStore;
use crate::commands::{balance_lines, record, Out, Receipt};
use crate::error::{ErrorType, IntoResult};
use crate::layout::TRANSFER_COLUMNS;
use crate::model::{Period, RequestKind};
use crate::parse::parse_transfer;
use crate::Result;

/// Handles a transfer message such as `Дебет > Кредит, 1000, оплата кредита`.
///
/// Transfers are written to their own block of columns, so they never land in an expense row.
///
/// # Errors
/// - `ErrorType::Validation` if the message is malformed.
/// - `ErrorType::Store` if the next row cannot be found or the row cannot be written.
pub async fn transfer(
    store: &mut dyn CellStore,
    period: &Period,
    text: &str,
) -> Result<Out<Receipt>> {
    let transfer = parse_transfer(text).pub_result(ErrorType::Validation)?;
    let receipt = record(
        store,
        period,
        RequestKind::Transfer,
        &TRANSFER_COLUMNS,
        transfer.values(),
    )
    .await?;
    let message = format!(
        "✅ Перевод добавлен в лист {}!\n\n{}",
        receipt.sheet,
        balance_lines(&receipt.balance)
    );
    Ok(Out::new(message, receipt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryStore;
    use crate::error::Res;
    use crate::model::{CellRange, CellRef, Column, PLACEHOLDER};
    use chrono::NaiveDate;

    fn period() -> Period {
        Period::from_date(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap())
    }

    fn cell(s: &str) -> CellRef {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_transfer() {
        let period = period();
        let sheet = period.label().to_string();
        let mut store = MemoryStore::seeded(&sheet).unwrap();
        let out = transfer(&mut store, &period, "Дебет>Кредит,1000.5,оплата, кредита")
            .await
            .unwrap();
        assert!(out
            .message()
            .starts_with("✅ Перевод добавлен в лист Январь'26!"));
        assert_eq!(out.structure().unwrap().row, 2);

        assert_eq!(store.cell(&sheet, cell("U2")), Some("2026-01-02"));
        assert_eq!(store.cell(&sheet, cell("V2")), Some("Дебет"));
        assert_eq!(store.cell(&sheet, cell("W2")), Some("Кредит"));
        assert_eq!(store.cell(&sheet, cell("X2")), Some("1000,5"));
        assert_eq!(store.cell(&sheet, cell("Y2")), Some("оплата, кредита"));
        // Nothing lands in the expense block.
        assert_eq!(store.cell(&sheet, cell("N2")), None);
    }

    #[tokio::test]
    async fn test_transfers_and_expenses_count_rows_separately() {
        let period = period();
        let mut store = MemoryStore::seeded(period.label()).unwrap();
        crate::commands::add_expense(&mut store, &period, "a, 1, c, w")
            .await
            .unwrap();
        crate::commands::add_expense(&mut store, &period, "b, 1, c, w")
            .await
            .unwrap();
        let out = transfer(&mut store, &period, "A > B, 5").await.unwrap();
        assert_eq!(out.structure().unwrap().row, 2);
    }

    #[tokio::test]
    async fn test_transfer_without_arrow() {
        let period = period();
        let mut store = MemoryStore::seeded(period.label()).unwrap();
        let err = transfer(&mut store, &period, "Дебет Кредит, 1000")
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert!(err.reply().contains("откуда > куда"));
        assert_eq!(store.write_requests(), 0);
    }

    /// Accepts reads and writes of rows but cannot read single cells.
    struct NoBalance(MemoryStore);

    #[async_trait::async_trait]
    impl CellStore for NoBalance {
        async fn read_column(&mut self, sheet: &str, column: Column) -> Res<Vec<String>> {
            self.0.read_column(sheet, column).await
        }

        async fn read_range(&mut self, sheet: &str, range: CellRange) -> Res<Vec<Vec<String>>> {
            self.0.read_range(sheet, range).await
        }

        async fn read_cells(&mut self, _: &str, _: &[CellRef]) -> Res<Vec<Option<String>>> {
            anyhow::bail!("quota exceeded")
        }

        async fn write_cells(&mut self, sheet: &str, cells: &[(CellRef, String)]) -> Res<()> {
            self.0.write_cells(sheet, cells).await
        }
    }

    #[tokio::test]
    async fn test_balance_read_failure_after_write_degrades() {
        let period = period();
        let mut store = NoBalance(MemoryStore::seeded(period.label()).unwrap());
        let out = transfer(&mut store, &period, "A > B, 5, x").await.unwrap();
        let balance = &out.structure().unwrap().balance;
        assert_eq!(balance.total, PLACEHOLDER);
        assert_eq!(balance.daily_limit, PLACEHOLDER);
        assert_eq!(store.0.cell(period.label(), cell("V2")), Some("A"));
    }
}
