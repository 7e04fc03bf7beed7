//! Configuration file handling for finbot.
//!
//! The configuration file is stored at `$FINBOT_HOME/config.json` and contains the Google Sheet URL
//! and, optionally, where the OAuth files live.

use crate::error::Res;
use crate::utils;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "finbot";
const CONFIG_VERSION: u8 = 1;
const SECRETS: &str = ".secrets";
const CLIENT_SECRET_JSON: &str = "client_secret.json";
const TOKEN_JSON: &str = "token.json";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$FINBOT_HOME` and from there it loads `$FINBOT_HOME/config.json`. It provides
/// paths to other items that are either configurable or are expected in a certain location within
/// the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    spreadsheet_id: String,
}

impl Config {
    /// Creates the home directory, its secrets subdirectory and:
    /// - Creates an initial `config.json` file using `sheet_url`
    /// - Moves `secret_file` into its default location in the home directory
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the home directory, e.g. `$HOME/finbot`
    /// - `secret_file` - The downloaded OAuth 2.0 client credentials JSON. This will be moved from
    ///   the `secret_file` path to `.secrets/client_secret.json`.
    /// - `sheet_url` - The URL of the budget spreadsheet, e.g.
    ///   https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    ///
    /// # Errors
    /// - Returns an error if the URL has no spreadsheet ID or if any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>, secret_file: &Path, sheet_url: &str) -> Res<Self> {
        let spreadsheet_id = extract_spreadsheet_id(sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?
            .to_string();

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the finbot home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets = root.join(SECRETS);
        utils::make_dir(&secrets).await?;
        utils::rename(secret_file, secrets.join(CLIENT_SECRET_JSON)).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            sheet_url: sheet_url.to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            secrets,
            config_path,
            config_file,
            spreadsheet_id,
        })
    }

    /// This will
    /// - validate that `finbot_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the secrets directory exists
    /// - return the loaded configuration object
    pub async fn load(finbot_home: impl Into<PathBuf>) -> Res<Self> {
        let maybe_relative = finbot_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The finbot home directory is missing, run 'finbot init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let spreadsheet_id = extract_spreadsheet_id(&config_file.sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?
            .to_string();
        if spreadsheet_id.is_empty() {
            bail!("No sheet_url is set in '{}'", config_path.display())
        }

        let config = Self {
            secrets: root.join(SECRETS),
            root,
            config_path,
            config_file,
            spreadsheet_id,
        };
        if !config.secrets.is_dir() {
            bail!(
                "The secrets directory is missing '{}'",
                config.secrets.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn sheet_url(&self) -> &str {
        &self.config_file.sheet_url
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Returns the stored `client_secret_path` if it is absolute, otherwise resolves the relative path.
    pub fn client_secret_path(&self) -> PathBuf {
        self.resolve(self.config_file.client_secret_path())
    }

    /// Returns the stored `token_path` if it is absolute, otherwise resolves the relative path.
    pub fn token_path(&self) -> PathBuf {
        self.resolve(self.config_file.token_path())
    }

    fn resolve(&self, p: PathBuf) -> PathBuf {
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "finbot",
///   "config_version": 1,
///   "sheet_url": "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL",
///   "client_secret_path": ".secrets/client_secret.json",
///   "token_path": ".secrets/token.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Should always be "finbot"
    app_name: String,

    config_version: u8,

    /// URL of the budget spreadsheet
    sheet_url: String,

    /// Relative to the home directory, or absolute.
    /// Defaults to $FINBOT_HOME/.secrets/client_secret.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_secret_path: Option<PathBuf>,

    /// Relative to the home directory, or absolute.
    /// Defaults to $FINBOT_HOME/.secrets/token.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_path: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sheet_url: String::new(),
            client_secret_path: None,
            token_path: None,
        }
    }
}

impl ConfigFile {
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data)
            .await
            .context("Unable to write config file")
    }

    fn client_secret_path(&self) -> PathBuf {
        self.client_secret_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(CLIENT_SECRET_JSON))
    }

    fn token_path(&self) -> PathBuf {
        self.token_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(TOKEN_JSON))
    }
}

/// Extracts the spreadsheet ID from a URL like
/// `https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/edit`. An empty URL yields an empty ID.
fn extract_spreadsheet_id(url: &str) -> Res<&str> {
    if url.is_empty() {
        return Ok(url);
    }

    let mut parts = url.split('/');
    while let Some(part) = parts.next() {
        if part == "d" {
            if let Some(id_part) = parts.next() {
                let id = id_part
                    .split(['?', '#'])
                    .next()
                    .unwrap_or(id_part);
                if !id.is_empty() {
                    return Ok(id);
                }
            }
        }
    }
    bail!(
        "Invalid Google Sheets URL format. Expected: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID"
    )
}
