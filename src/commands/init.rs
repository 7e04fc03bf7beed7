use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory and:
/// - Creates an initial `config.json` file using `url`
/// - Moves `secret_file` into `.secrets/client_secret.json`
///
/// # Arguments
/// - `finbot_home` - The directory that will be the home directory, e.g. `$HOME/finbot`
/// - `secret_file` - The downloaded OAuth 2.0 client credentials JSON needed to start the Google
///   OAuth workflow.
/// - `url` - The URL of the budget spreadsheet, e.g.
///   https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
///
/// # Errors
/// - Returns an error if the URL is not a Google Sheets URL or any file operation fails.
pub async fn init(finbot_home: &Path, secret_file: &Path, url: &str) -> Result<Out<()>> {
    let config = Config::create(finbot_home, secret_file, url)
        .await
        .context("Unable to create the home directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Created {}. Run 'finbot auth' next to authorize access to the sheet.",
        config.config_path().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let secret = dir.path().join("client.json");
        utils::write(&secret, "{}").await.unwrap();
        let home = dir.path().join("home");

        let out = init(&home, &secret, "https://docs.google.com/spreadsheets/d/abc/edit")
            .await
            .unwrap();
        assert!(out.message().contains("config.json"));
        assert!(home.join(".secrets").join("client_secret.json").is_file());
    }

    #[tokio::test]
    async fn test_init_bad_url() {
        let dir = TempDir::new().unwrap();
        let secret = dir.path().join("client.json");
        utils::write(&secret, "{}").await.unwrap();
        let err = init(&dir.path().join("home"), &secret, "not a url")
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }
}
