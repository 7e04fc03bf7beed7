use crate::api::CellStore;
use crate::commands::{balance_lines, record, Out, Receipt};
use crate::error::{ErrorType, IntoResult};
use crate::layout::ADD_EXPENSE_COLUMNS;
use crate::model::{Period, RequestKind};
use crate::parse::parse_add;
use crate::Result;

/// Handles an expense message such as `Продукты, 1500, Еда, Наличные`.
///
/// The message is validated before the store is touched. On success the reply names the sheet
/// and carries the balance read back after the write.
///
/// # Errors
/// - `ErrorType::Validation` if the message is malformed. Its reply explains which field is wrong.
/// - `ErrorType::Store` if the next row cannot be found or the row cannot be written.
pub async fn add_expense(
    store: &mut dyn CellStore,
    period: &Period,
    text: &str,
) -> Result<Out<Receipt>> {
    let expense = parse_add(text).pub_result(ErrorType::Validation)?;
    let receipt = record(
        store,
        period,
        RequestKind::AddExpense,
        &ADD_EXPENSE_COLUMNS,
        expense.values(),
    )
    .await?;
    let message = format!(
        "✅ Данные добавлены в лист {}!\n\n{}",
        receipt.sheet,
        balance_lines(&receipt.balance)
    );
    Ok(Out::new(message, receipt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryStore;
    use crate::model::{CellRef, PLACEHOLDER};
    use chrono::NaiveDate;

    fn period() -> Period {
        Period::from_date(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
    }

    fn cell(s: &str) -> CellRef {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_add_expense() {
        let period = period();
        let mut store = MemoryStore::seeded(period.label()).unwrap();
        let out = add_expense(&mut store, &period, "Продукты, 1500.50, Еда, Наличные")
            .await
            .unwrap();
        assert_eq!(
            out.message(),
            "✅ Данные добавлены в лист Март'26!\n\n\
            💰 Общий баланс: 159 500\n\
            💰 Можно потратить сегодня: 1 200"
        );
        let receipt = out.structure().unwrap();
        assert_eq!(receipt.row, 2);
        assert_eq!(receipt.kind, RequestKind::AddExpense);

        let sheet = period.label();
        assert_eq!(store.cell(sheet, cell("N2")), Some("2026-03-14"));
        assert_eq!(store.cell(sheet, cell("O2")), Some("Продукты"));
        assert_eq!(store.cell(sheet, cell("Q2")), Some("1500,50"));
        assert_eq!(store.cell(sheet, cell("R2")), Some("Еда"));
        assert_eq!(store.cell(sheet, cell("S2")), Some("Наличные"));
    }

    #[tokio::test]
    async fn test_add_expense_appends() {
        let period = period();
        let mut store = MemoryStore::seeded(period.label()).unwrap();
        for (i, text) in ["a, 1, c, w", "b, 2, c, w", "c, 3, c, w"].iter().enumerate() {
            let out = add_expense(&mut store, &period, text).await.unwrap();
            assert_eq!(out.structure().unwrap().row, i as u32 + 2);
        }
        assert_eq!(store.cell(period.label(), cell("O4")), Some("c"));
    }

    #[tokio::test]
    async fn test_invalid_message_never_touches_store() {
        let period = period();
        let mut store = MemoryStore::seeded(period.label()).unwrap();
        store.fail_reads(true);
        let err = add_expense(&mut store, &period, "Продукты, , Еда, Наличные")
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert!(err.reply().contains("Сумма не может быть пустой"));
        assert_eq!(store.write_requests(), 0);
    }

    #[tokio::test]
    async fn test_locate_failure_is_store_error() {
        let period = period();
        let mut store = MemoryStore::seeded(period.label()).unwrap();
        store.fail_reads(true);
        let err = add_expense(&mut store, &period, "a, 1, c, w")
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Store);
        assert!(err.reply().starts_with("❌ Произошла ошибка при работе с таблицей."));
        assert_eq!(store.write_requests(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_is_store_error() {
        let period = period();
        let mut store = MemoryStore::seeded(period.label()).unwrap();
        store.fail_writes(true);
        let err = add_expense(&mut store, &period, "a, 1, c, w")
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Store);
    }

    #[tokio::test]
    async fn test_missing_sheet_is_store_error() {
        let period = period();
        let mut store = MemoryStore::seeded("Февраль'26").unwrap();
        let err = add_expense(&mut store, &period, "a, 1, c, w")
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Store);
        assert!(err.reply().contains("Март'26"));
    }

    #[tokio::test]
    async fn test_blank_balance_uses_placeholder() {
        let period = period();
        let mut store = MemoryStore::seeded(period.label()).unwrap();
        store.set_cell(period.label(), cell("C28"), "");
        let out = add_expense(&mut store, &period, "a, 1, c, w").await.unwrap();
        assert_eq!(out.structure().unwrap().balance.daily_limit, PLACEHOLDER);
        assert!(out.message().ends_with("Можно потратить сегодня: —"));
    }
}
