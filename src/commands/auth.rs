//! Authentication command handlers for the OAuth flow.
//!
//! - `finbot auth` runs the consent flow
//! - `finbot auth --verify` checks and refreshes the stored token

use crate::api::TokenProvider;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Handles `finbot auth`. This is the only command that asks the user to open a browser.
///
/// Prints a consent URL, waits for Google to redirect back to the local callback, and saves the
/// resulting tokens to the token file with the required scopes.
pub async fn auth(finbot_home: &Path) -> Result<Out<()>> {
    let config = Config::load(finbot_home)
        .await
        .pub_result(ErrorType::Config)?;
    TokenProvider::initialize(config.client_secret_path(), config.token_path())
        .await
        .pub_result(ErrorType::Auth)?;
    Ok(format!("Saved the OAuth token to {}", config.token_path().display()).into())
}

/// Handles `finbot auth --verify`. Never opens a browser.
///
/// Loads the stored token and refreshes it. If the token is missing, has the wrong scopes or
/// cannot be refreshed, the error tells the user to run `finbot auth`.
pub async fn auth_verify(finbot_home: &Path) -> Result<Out<()>> {
    let config = Config::load(finbot_home)
        .await
        .pub_result(ErrorType::Config)?;
    let mut token_provider = TokenProvider::load(config.client_secret_path(), config.token_path())
        .await
        .context(
            "Unable to use the existing tokens found in the token JSON file. \n\n\
            You should run 'finbot auth' (without the --verify flag).",
        )
        .pub_result(ErrorType::Auth)?;
    token_provider
        .refresh()
        .await
        .context("Unable to refresh the token")
        .pub_result(ErrorType::Auth)?;
    Ok("Your OAuth token is valid!".into())
}
