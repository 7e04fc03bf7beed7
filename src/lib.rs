mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
mod layout;
pub mod ledger;
pub mod model;
pub mod parse;
mod utils;

pub use api::{CellStore, MemoryStore, Mode};
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use layout::{
    breakdown_range, FieldColumnMap, ADD_EXPENSE_COLUMNS, DAILY_LIMIT_CELL, TOTAL_BALANCE_CELL,
    TRANSFER_COLUMNS,
};

use crate::error::IntoResult;
use std::path::Path;
use tracing::debug;

/// Opens the cell store for `mode`. In `Mode::Google` this loads the config from `finbot_home` and
/// the stored OAuth token; in `Mode::Test` nothing is read from disk and a `MemoryStore` holding one
/// seeded sheet named `sheet` is returned.
pub async fn store(finbot_home: &Path, mode: Mode, sheet: &str) -> Result<Box<dyn CellStore>> {
    debug!("Creating a {mode} cell store");
    match mode {
        Mode::Google => {
            let config = Config::load(finbot_home)
                .await
                .pub_result(ErrorType::Config)?;
            api::google_store(config).await.pub_result(ErrorType::Auth)
        }
        Mode::Test => {
            let store = MemoryStore::seeded(sheet).pub_result(ErrorType::Internal)?;
            Ok(Box::new(store))
        }
    }
}
