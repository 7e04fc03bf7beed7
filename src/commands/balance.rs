use crate::api::CellStore;
use crate::commands::{balance_lines, Out};
use crate::error::{ErrorType, IntoResult};
use crate::ledger;
use crate::model::{BalanceBreakdown, BalanceSnapshot, Period};
use crate::Result;
use serde::Serialize;

/// Everything shown in reply to a balance query.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct BalanceReport {
    pub sheet: String,
    pub breakdown: BalanceBreakdown,
    pub balance: BalanceSnapshot,
}

/// Handles a balance query: the per-account breakdown as an aligned table in a code block, followed
/// by the total balance and today's limit. An empty breakdown leaves out the code block.
///
/// Nothing is written here, so unlike `add_expense` a failed read is reported as an error.
pub async fn balance(store: &mut dyn CellStore, period: &Period) -> Result<Out<BalanceReport>> {
    let sheet = period.label();
    let breakdown = ledger::read_breakdown(store, sheet)
        .await
        .pub_result(ErrorType::Store)?;
    let snapshot = ledger::read_snapshot(store, sheet)
        .await
        .pub_result(ErrorType::Store)?;

    let mut message = String::new();
    if !breakdown.is_empty() {
        let lines = ledger::format_breakdown(breakdown.rows());
        message.push_str(&format!("```\n{}\n```\n\n", lines.join("\n")));
    }
    message.push_str(&balance_lines(&snapshot));

    let report = BalanceReport {
        sheet: sheet.to_string(),
        breakdown,
        balance: snapshot,
    };
    Ok(Out::new(message, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryStore;
    use chrono::NaiveDate;

    fn period() -> Period {
        Period::from_date(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap())
    }

    #[tokio::test]
    async fn test_balance() {
        let period = period();
        let mut store = MemoryStore::seeded(period.label()).unwrap();
        let out = balance(&mut store, &period).await.unwrap();
        let expected = "```\n\
            Наличные     8 000\n\
            Карта       31 500\n\
            Накопления 120 000\n\
            Продукты    12 000\n\
            Транспорт    3 500\n\
            Кафе         4 000\n\
            ```\n\n\
            💰 Общий баланс: 159 500\n\
            💰 Можно потратить сегодня: 1 200";
        assert_eq!(out.message(), expected);
        let report = out.structure().unwrap();
        assert_eq!(report.sheet, "Декабрь'25");
        assert_eq!(report.breakdown.rows().len(), 6);
        assert_eq!(store.write_requests(), 0);
    }

    #[tokio::test]
    async fn test_balance_of_empty_sheet() {
        let period = period();
        let mut store = MemoryStore::new();
        store.add_sheet(period.label(), Vec::new());
        let out = balance(&mut store, &period).await.unwrap();
        assert_eq!(
            out.message(),
            "💰 Общий баланс: —\n💰 Можно потратить сегодня: —"
        );
    }

    #[tokio::test]
    async fn test_balance_read_failure() {
        let period = period();
        let mut store = MemoryStore::seeded(period.label()).unwrap();
        store.fail_reads(true);
        let err = balance(&mut store, &period).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Store);
    }
}
