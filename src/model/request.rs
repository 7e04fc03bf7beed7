//! Structured requests produced by the message parser.

use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// The two kinds of messages that write a row.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    AddExpense,
    Transfer,
}

serde_plain::derive_display_from_serialize!(RequestKind);
serde_plain::derive_fromstr_from_deserialize!(RequestKind);

/// A logical field of a request. Used both to name the field that failed validation and to map
/// request values onto sheet columns.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// The date a row was recorded. Never typed by the user.
    Date,
    Description,
    Amount,
    Category,
    Wallet,
    /// The `from > to` part of a transfer message.
    Path,
    From,
    To,
}

serde_plain::derive_display_from_serialize!(Field);
serde_plain::derive_fromstr_from_deserialize!(Field);

/// An expense: `description, amount, category, wallet`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AddExpense {
    pub description: String,
    pub amount: Amount,
    pub category: String,
    pub wallet: String,
}

impl AddExpense {
    /// The user-supplied values keyed by field, in the order they appear in the message.
    pub fn values(&self) -> Vec<(Field, String)> {
        vec![
            (Field::Description, self.description.clone()),
            (Field::Amount, self.amount.to_string()),
            (Field::Category, self.category.clone()),
            (Field::Wallet, self.wallet.clone()),
        ]
    }
}

/// A transfer between two accounts: `from > to, amount, description`. The description may be
/// empty.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: Amount,
    pub description: String,
}

impl Transfer {
    /// The user-supplied values keyed by field, in the order they appear in the message.
    pub fn values(&self) -> Vec<(Field, String)> {
        vec![
            (Field::From, self.from.clone()),
            (Field::To, self.to.clone()),
            (Field::Amount, self.amount.to_string()),
            (Field::Description, self.description.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_add_expense_values_use_sheet_amount_format() {
        let expense = AddExpense {
            description: "Кофе".to_string(),
            amount: Amount::from_str("3.5").unwrap(),
            category: "Еда".to_string(),
            wallet: "Карта".to_string(),
        };
        let values = expense.values();
        assert_eq!(values[1], (Field::Amount, "3,5".to_string()));
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn test_field_display() {
        assert_eq!(Field::Wallet.to_string(), "wallet");
        assert_eq!("from".parse::<Field>().unwrap(), Field::From);
        assert_eq!(RequestKind::AddExpense.to_string(), "add_expense");
    }
}
