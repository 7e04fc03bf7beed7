//! Turns a raw chat message into an `AddExpense` or a `Transfer`.
//!
//! Fields are checked in the order they appear in the message and parsing stops at the first
//! failure, so the error always names the earliest bad field.

use crate::model::{AddExpense, Amount, Field, RequestKind, Transfer};
use std::str::FromStr;
use tracing::debug;

const ADD_EXPENSE_USAGE: &str = "описание, сумма, категория, кошелек";
const ADD_EXPENSE_EXAMPLE: &str = "Продукты, 1500, Еда, Наличные";
const TRANSFER_USAGE: &str = "откуда > куда, сумма, описание";
const TRANSFER_EXAMPLE: &str = "Дебет > Кредит, 1000, оплата кредита";

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Reason {
    Empty,
    NotNumeric,
    /// A transfer path without exactly one `>`.
    MalformedPath,
}

/// A user-facing diagnosis of a malformed message. `Display` renders the complete reply: the failed
/// field, the expected format and an example line for the kind of request.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error(
    "❌ Некорректный формат сообщения.\n\n\
    Ошибка: {problem}\n\
    Необходимый формат: {usage}\n\
    Пример: {example}"
)]
pub struct ParseError {
    kind: RequestKind,
    field: Field,
    reason: Reason,
    problem: &'static str,
    usage: &'static str,
    example: &'static str,
}

impl ParseError {
    fn new(kind: RequestKind, field: Field, reason: Reason) -> Self {
        let (usage, example) = match kind {
            RequestKind::AddExpense => (ADD_EXPENSE_USAGE, ADD_EXPENSE_EXAMPLE),
            RequestKind::Transfer => (TRANSFER_USAGE, TRANSFER_EXAMPLE),
        };
        Self {
            kind,
            field,
            reason,
            problem: problem(field, reason),
            usage,
            example,
        }
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// The first field that failed.
    pub fn field(&self) -> Field {
        self.field
    }

    pub fn reason(&self) -> Reason {
        self.reason
    }

    /// The one-line description of what is wrong, without the usage hint.
    pub fn problem(&self) -> &'static str {
        self.problem
    }
}

fn problem(field: Field, reason: Reason) -> &'static str {
    match (field, reason) {
        (Field::Amount, Reason::NotNumeric) => "Сумма должна быть числом",
        (Field::Path, Reason::MalformedPath) => "Путь должен иметь вид «откуда > куда»",
        (Field::Description, _) => "Описание не может быть пустым",
        (Field::Amount, _) => "Сумма не может быть пустой",
        (Field::Category, _) => "Категория не может быть пустой",
        (Field::Wallet, _) => "Кошелек не может быть пустым",
        (Field::Path, _) => "Путь не может быть пустым",
        (Field::From, _) => "Откуда не может быть пустым",
        (Field::To, _) => "Куда не может быть пустым",
        (Field::Date, _) => "Дата не может быть пустой",
    }
}

/// Parses `description, amount, category, wallet`.
///
/// Missing parts are treated as empty and anything after the fourth comma-separated part is
/// ignored. The amount may use either `.` or `,` as its decimal separator.
pub fn parse_add(text: &str) -> Result<AddExpense, ParseError> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() > 4 {
        debug!("Ignoring {} extra part(s) in an expense message", parts.len() - 4);
    }
    let part = |i: usize| parts.get(i).copied().unwrap_or_default();
    let fail = |field, reason| ParseError::new(RequestKind::AddExpense, field, reason);

    let description = non_empty(part(0)).ok_or_else(|| fail(Field::Description, Reason::Empty))?;
    let amount = amount(part(1)).map_err(|reason| fail(Field::Amount, reason))?;
    let category = non_empty(part(2)).ok_or_else(|| fail(Field::Category, Reason::Empty))?;
    let wallet = non_empty(part(3)).ok_or_else(|| fail(Field::Wallet, Reason::Empty))?;

    Ok(AddExpense {
        description: description.to_string(),
        amount,
        category: category.to_string(),
        wallet: wallet.to_string(),
    })
}

/// Parses `from > to, amount, description`.
///
/// Everything after the second comma is the description, which may be empty or missing.
pub fn parse_transfer(text: &str) -> Result<Transfer, ParseError> {
    let parts: Vec<&str> = text.splitn(3, ',').map(str::trim).collect();
    let part = |i: usize| parts.get(i).copied().unwrap_or_default();
    let fail = |field, reason| ParseError::new(RequestKind::Transfer, field, reason);

    let path = non_empty(part(0)).ok_or_else(|| fail(Field::Path, Reason::Empty))?;
    let amount = amount(part(1)).map_err(|reason| fail(Field::Amount, reason))?;

    let ends: Vec<&str> = path.split('>').map(str::trim).collect();
    let [from, to] = ends.as_slice() else {
        return Err(fail(Field::Path, Reason::MalformedPath));
    };
    let from = non_empty(from).ok_or_else(|| fail(Field::From, Reason::Empty))?;
    let to = non_empty(to).ok_or_else(|| fail(Field::To, Reason::Empty))?;

    Ok(Transfer {
        from: from.to_string(),
        to: to.to_string(),
        amount,
        description: part(2).to_string(),
    })
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

fn amount(s: &str) -> Result<Amount, Reason> {
    let s = non_empty(s).ok_or(Reason::Empty)?;
    Amount::from_str(s).map_err(|_| Reason::NotNumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let expense = parse_add("Продукты, 1500, Еда, Наличные").unwrap();
        assert_eq!(expense.description, "Продукты");
        assert_eq!(expense.amount.to_string(), "1500");
        assert_eq!(expense.category, "Еда");
        assert_eq!(expense.wallet, "Наличные");
    }

    #[test]
    fn test_parse_add_dot_amount_becomes_comma() {
        let expense = parse_add("Кофе, 3.50, Еда, Карта").unwrap();
        assert_eq!(expense.amount.to_string(), "3,50");
    }

    #[test]
    fn test_parse_add_trims_and_ignores_extra_parts() {
        let expense = parse_add("  Такси ,250,Транспорт ,  Карта , лишнее").unwrap();
        assert_eq!(expense.description, "Такси");
        assert_eq!(expense.category, "Транспорт");
        assert_eq!(expense.wallet, "Карта");
    }

    #[test]
    fn test_parse_add_reports_first_missing_field() {
        let cases = [
            ("", Field::Description),
            (" , 100, Еда, Карта", Field::Description),
            ("Кофе", Field::Amount),
            ("Кофе, , , ", Field::Amount),
            ("Кофе, 100", Field::Category),
            ("Кофе, 100, , Карта", Field::Category),
            ("Кофе, 100, Еда", Field::Wallet),
            ("Кофе, 100, Еда,   ", Field::Wallet),
        ];
        for (input, field) in cases {
            let err = parse_add(input).unwrap_err();
            assert_eq!(err.field(), field, "input: {input:?}");
            assert_eq!(err.reason(), Reason::Empty, "input: {input:?}");
            assert_eq!(err.kind(), RequestKind::AddExpense);
        }
    }

    #[test]
    fn test_parse_add_amount_not_numeric() {
        let err = parse_add("Кофе, много, Еда, Карта").unwrap_err();
        assert_eq!(err.field(), Field::Amount);
        assert_eq!(err.reason(), Reason::NotNumeric);
        assert_eq!(err.problem(), "Сумма должна быть числом");
    }

    #[test]
    fn test_parse_add_amount_is_stored_as_typed() {
        let err = parse_add("Кофе, 1_000, Еда, Карта").unwrap_err();
        assert_eq!(err.reason(), Reason::NotNumeric);
        let err = parse_add("Кофе, 0.123456789012345678901234567891, Еда, Карта").unwrap_err();
        assert_eq!(err.reason(), Reason::NotNumeric);
    }

    #[test]
    fn test_parse_add_error_text() {
        let err = parse_add("Кофе, 100, , Карта").unwrap_err();
        assert_eq!(
            err.to_string(),
            "❌ Некорректный формат сообщения.\n\n\
            Ошибка: Категория не может быть пустой\n\
            Необходимый формат: описание, сумма, категория, кошелек\n\
            Пример: Продукты, 1500, Еда, Наличные"
        );
    }

    #[test]
    fn test_parse_transfer() {
        let transfer = parse_transfer("A > B, 100, desc").unwrap();
        assert_eq!(transfer.from, "A");
        assert_eq!(transfer.to, "B");
        assert_eq!(transfer.amount.to_string(), "100");
        assert_eq!(transfer.description, "desc");
    }

    #[test]
    fn test_parse_transfer_without_spaces_is_identical() {
        assert_eq!(
            parse_transfer("A>B,100,desc").unwrap(),
            parse_transfer("A > B, 100, desc").unwrap()
        );
    }

    #[test]
    fn test_parse_transfer_description_is_optional() {
        let transfer = parse_transfer("Дебет > Кредит, 1000").unwrap();
        assert_eq!(transfer.description, "");
        let transfer = parse_transfer("Дебет > Кредит, 1000,   ").unwrap();
        assert_eq!(transfer.description, "");
    }

    #[test]
    fn test_parse_transfer_description_keeps_commas() {
        let transfer = parse_transfer("Дебет > Кредит, 1000.5, за март, апрель").unwrap();
        assert_eq!(transfer.amount.to_string(), "1000,5");
        assert_eq!(transfer.description, "за март, апрель");
    }

    #[test]
    fn test_parse_transfer_missing_separator_cites_path() {
        let err = parse_transfer("Дебет Кредит, 1000, оплата").unwrap_err();
        assert_eq!(err.field(), Field::Path);
        assert_eq!(err.reason(), Reason::MalformedPath);

        let err = parse_transfer("A > B > C, 1000").unwrap_err();
        assert_eq!(err.field(), Field::Path);
    }

    #[test]
    fn test_parse_transfer_reports_first_missing_field() {
        let cases = [
            ("", Field::Path),
            (" , 100", Field::Path),
            ("A > B", Field::Amount),
            ("A > B, ", Field::Amount),
            ("> B, 100", Field::From),
            ("A >, 100", Field::To),
            (">, 100", Field::From),
        ];
        for (input, field) in cases {
            let err = parse_transfer(input).unwrap_err();
            assert_eq!(err.field(), field, "input: {input:?}");
            assert_eq!(err.kind(), RequestKind::Transfer);
        }
    }

    #[test]
    fn test_parse_transfer_amount_not_numeric() {
        let err = parse_transfer("A > B, много").unwrap_err();
        assert_eq!(err.field(), Field::Amount);
        assert_eq!(err.reason(), Reason::NotNumeric);
        assert_eq!(err.kind(), RequestKind::Transfer);

        let err = parse_transfer("A > B, 1_000").unwrap_err();
        assert_eq!(err.reason(), Reason::NotNumeric);
    }

    #[test]
    fn test_parse_transfer_checks_amount_before_path_shape() {
        let err = parse_transfer("A B, x").unwrap_err();
        assert_eq!(err.field(), Field::Amount);
        assert_eq!(err.reason(), Reason::NotNumeric);

        let err = parse_transfer("A B, 100").unwrap_err();
        assert_eq!(err.field(), Field::Path);
    }

    #[test]
    fn test_parse_transfer_error_text() {
        let err = parse_transfer("A >, 100").unwrap_err();
        assert_eq!(
            err.to_string(),
            "❌ Некорректный формат сообщения.\n\n\
            Ошибка: Куда не может быть пустым\n\
            Необходимый формат: откуда > куда, сумма, описание\n\
            Пример: Дебет > Кредит, 1000, оплата кредита"
        );
    }
}
