use crate::api::CellStore;
use crate::commands::{add_expense, balance, transfer, Out};
use crate::model::Period;
use crate::Result;

/// The message text that asks for the balance instead of recording something.
pub const BALANCE_COMMAND: &str = "Баланс";

/// Routes a raw chat message to the handler for its intent and returns only the reply text.
///
/// - `Баланс` is a balance query.
/// - Anything containing `>` is a transfer.
/// - Everything else is an expense.
pub async fn handle_message(
    store: &mut dyn CellStore,
    period: &Period,
    text: &str,
) -> Result<Out<()>> {
    let text = text.trim();
    let message = if text == BALANCE_COMMAND {
        balance(store, period).await?.message().to_string()
    } else if text.contains('>') {
        transfer(store, period, text).await?.message().to_string()
    } else {
        add_expense(store, period, text).await?.message().to_string()
    };
    Ok(message.into())
}
