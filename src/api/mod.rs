//! The spreadsheet behind the bot, abstracted as a store of cells addressed by sheet name and A1
//! reference.
//!
//! `GoogleStore` talks to Google Sheets. `MemoryStore` keeps the cells in memory and is used by
//! tests and by the offline test mode.

mod files;
mod google;
mod memory;
mod oauth;

use crate::error::Res;
use crate::model::{CellRange, CellRef, Column};
use crate::Config;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use memory::MemoryStore;
pub(crate) use oauth::TokenProvider;

/// OAuth scopes required for reading and writing cell values.
const OAUTH_SCOPES: &[&str] = &["https://www.googleapis.com/auth/spreadsheets"];

/// When this environment variable is set and non-empty, `Mode::from_env` returns `Mode::Test`.
const TEST_MODE_ENV: &str = "FINBOT_IN_TEST_MODE";

/// The cell-level operations the bot needs from a spreadsheet.
///
/// Values are written "as entered": the spreadsheet may reinterpret text as numbers or dates
/// according to its own locale. Every method is a single request to the store, and none of them
/// retry on failure.
#[async_trait::async_trait]
pub trait CellStore: Send {
    /// Reads every cell of `column` from the top of `sheet`, one entry per row. Trailing empty
    /// cells are not returned; empty cells above the last filled one are returned as `""`.
    async fn read_column(&mut self, sheet: &str, column: Column) -> Res<Vec<String>>;

    /// Reads a rectangular `range` of `sheet` as rows of cells. Trailing empty rows and trailing
    /// empty cells within a row may be omitted.
    async fn read_range(&mut self, sheet: &str, range: CellRange) -> Res<Vec<Vec<String>>>;

    /// Reads individual cells in one request, returning one entry per requested cell in request
    /// order. Empty cells are `None`.
    async fn read_cells(&mut self, sheet: &str, cells: &[CellRef]) -> Res<Vec<Option<String>>>;

    /// Writes all `cells` of `sheet` in one request. Either the whole request is accepted or an
    /// error is returned for all of it.
    async fn write_cells(&mut self, sheet: &str, cells: &[(CellRef, String)]) -> Res<()>;
}

/// Whether to talk to Google Sheets or to an in-memory stand-in.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Google,
    Test,
}

serde_plain::derive_display_from_serialize!(Mode);
serde_plain::derive_fromstr_from_deserialize!(Mode);

impl Mode {
    /// `Mode::Test` if `FINBOT_IN_TEST_MODE` is set to a non-empty value, else `Mode::Google`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Google,
        }
    }
}

/// Creates a `CellStore` backed by the spreadsheet of `config`, using the stored OAuth token.
pub(crate) async fn google_store(config: Config) -> Res<Box<dyn CellStore>> {
    debug!("Opening spreadsheet {}", config.spreadsheet_id());
    let token_provider =
        TokenProvider::load(config.client_secret_path(), config.token_path()).await?;
    let store = google::GoogleStore::new(config, token_provider).await?;
    Ok(Box::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Google.to_string(), "google");
        assert_eq!("test".parse::<Mode>().unwrap(), Mode::Test);
        assert_eq!(Mode::default(), Mode::Google);
    }
}
