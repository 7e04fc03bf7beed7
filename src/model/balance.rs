//! Balance values read back from the sheet.

use serde::{Deserialize, Serialize};

/// Shown in place of a balance value that the sheet did not return.
pub const PLACEHOLDER: &str = "—";

/// The aggregate balance and the amount that can still be spent today. Both are opaque display
/// strings: the sheet computes them and may return anything, including error markers.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub total: String,
    pub daily_limit: String,
}

impl BalanceSnapshot {
    /// Builds a snapshot from optional cell values, substituting the placeholder for missing or
    /// blank ones.
    pub fn from_cells(total: Option<String>, daily_limit: Option<String>) -> Self {
        Self {
            total: or_placeholder(total),
            daily_limit: or_placeholder(daily_limit),
        }
    }

    /// A snapshot with nothing in it.
    pub fn unknown() -> Self {
        Self::from_cells(None, None)
    }
}

fn or_placeholder(value: Option<String>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => PLACEHOLDER.to_string(),
    }
}

/// One `label: amount` line of the balance breakdown.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BalanceRow {
    pub label: String,
    pub amount: String,
}

/// The balance breakdown in the order the sheet returned it. The order is significant, it is the
/// display order.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BalanceBreakdown(Vec<BalanceRow>);

impl BalanceBreakdown {
    /// Builds the breakdown from raw rows. Missing cells become empty strings and anything past the
    /// second column is ignored.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self(
            rows.into_iter()
                .map(|row| {
                    let mut cells = row.into_iter();
                    BalanceRow {
                        label: cells.next().unwrap_or_default(),
                        amount: cells.next().unwrap_or_default(),
                    }
                })
                .collect(),
        )
    }

    pub fn rows(&self) -> &[BalanceRow] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_placeholders() {
        let snapshot = BalanceSnapshot::from_cells(Some("12 500,00".into()), Some("  ".into()));
        assert_eq!(snapshot.total, "12 500,00");
        assert_eq!(snapshot.daily_limit, PLACEHOLDER);
        assert_eq!(BalanceSnapshot::unknown().total, PLACEHOLDER);
    }

    #[test]
    fn test_snapshot_keeps_error_markers() {
        let snapshot = BalanceSnapshot::from_cells(Some("#REF!".into()), None);
        assert_eq!(snapshot.total, "#REF!");
        assert_eq!(snapshot.daily_limit, PLACEHOLDER);
    }

    #[test]
    fn test_breakdown_from_ragged_rows() {
        let breakdown = BalanceBreakdown::from_rows(vec![
            vec!["Еда".into(), "150".into()],
            vec!["Заметка".into()],
            vec![],
            vec!["Аренда".into(), "2000".into(), "extra".into()],
        ]);
        let rows = breakdown.rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].amount, "");
        assert_eq!(rows[2], BalanceRow::default());
        assert_eq!(rows[3].label, "Аренда");
        assert_eq!(rows[3].amount, "2000");
    }
}
