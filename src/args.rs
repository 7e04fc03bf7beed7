//! These structs provide the CLI interface for finbot.

use crate::model::Period;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// finbot: records expenses and transfers from short text messages into a Google sheet.
///
/// The sheet has one tab per month, named like `Март'26`. Each message is appended as a new row of
/// that tab and the reply shows the balance the sheet computes from it.
///
/// You will need to set up a Google Sheets API OAuth client for this. Run `finbot init` and then
/// `finbot auth` once. Set FINBOT_IN_TEST_MODE=1 to run against an in-memory sheet instead.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and initialize the configuration files.
    ///
    /// This is the first command you should run. You need the URL of your budget sheet and the
    /// OAuth client credentials JSON downloaded from the Google Cloud Console.
    Init(InitArgs),
    /// Authenticate with Google Sheets via OAuth.
    Auth(AuthArgs),
    /// Record an expense: "description, amount, category, wallet".
    Add(RecordArgs),
    /// Record a transfer: "from > to, amount, description".
    Transfer(RecordArgs),
    /// Show the balance of the month.
    Balance(PeriodArgs),
    /// Handle a chat message the way the bot would: "Баланс", a transfer or an expense.
    Message(RecordArgs),
    /// Print the name of the sheet that requests are written to.
    Period(PeriodArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where finbot configuration and credentials are held. Defaults to ~/finbot
    #[arg(long, env = "FINBOT_HOME", default_value_t = default_finbot_home())]
    finbot_home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn finbot_home(&self) -> &DisplayPath {
        &self.finbot_home
    }
}

/// (Not shown): Args for the `finbot init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL of your budget sheet. It looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    #[arg(long)]
    sheet_url: String,

    /// The path to your downloaded OAuth client credentials. This file will be moved to the
    /// secrets directory in the home directory.
    #[arg(long)]
    client_secret: PathBuf,
}

impl InitArgs {
    pub fn sheet_url(&self) -> &str {
        &self.sheet_url
    }

    pub fn client_secret(&self) -> &Path {
        &self.client_secret
    }
}

/// (Not shown): Args for the `finbot auth` command.
#[derive(Debug, Parser, Clone)]
pub struct AuthArgs {
    /// Verify and refresh authentication.
    #[arg(long)]
    verify: bool,
}

impl AuthArgs {
    pub fn verify(&self) -> bool {
        self.verify
    }
}

/// (Not shown): Selects the month a command works on.
#[derive(Debug, Parser, Clone, Default)]
pub struct PeriodArgs {
    /// The sheet to use instead of the current month's, e.g. "Март'26".
    #[arg(long)]
    period: Option<String>,

    /// The date to record and to derive the sheet from, as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl PeriodArgs {
    pub fn period(&self) -> Option<&str> {
        self.period.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// The period these arguments select: `--date` or today, in the sheet named by `--period` or
    /// else the sheet of that date's month.
    pub fn to_period(&self) -> Period {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        match self.period() {
            Some(label) => Period::with_label(date, label),
            None => Period::from_date(date),
        }
    }
}

/// (Not shown): Args for the commands that take a message.
#[derive(Debug, Parser, Clone)]
pub struct RecordArgs {
    /// The message text, quoted.
    text: String,

    #[clap(flatten)]
    period: PeriodArgs,
}

impl RecordArgs {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn period(&self) -> &PeriodArgs {
        &self.period
    }
}

fn default_finbot_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("finbot"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --finbot-home or FINBOT_HOME instead of relying on the default \
                home directory.",
            );
            PathBuf::from("finbot")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let args = Args::try_parse_from([
            "finbot",
            "--finbot-home",
            "/tmp/fb",
            "add",
            "Кофе, 3.5, Еда, Карта",
            "--period",
            "Март'26",
        ])
        .unwrap();
        assert_eq!(args.common().finbot_home().path(), Path::new("/tmp/fb"));
        let Command::Add(record) = args.command() else {
            panic!("expected add, got {:?}", args.command());
        };
        assert_eq!(record.text(), "Кофе, 3.5, Еда, Карта");
        assert_eq!(record.period().period(), Some("Март'26"));
        assert_eq!(record.period().date(), None);
    }

    #[test]
    fn test_parse_balance_with_date() {
        let args =
            Args::try_parse_from(["finbot", "--log-level", "debug", "balance", "--date", "2026-02-03"])
                .unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        let Command::Balance(period) = args.command() else {
            panic!("expected balance");
        };
        assert_eq!(period.date(), NaiveDate::from_ymd_opt(2026, 2, 3));
    }

    #[test]
    fn test_to_period() {
        let date = NaiveDate::from_ymd_opt(2026, 4, 1);
        let period = PeriodArgs { period: None, date }.to_period();
        assert_eq!(period.label(), "Апрель'26");

        let period = PeriodArgs {
            period: Some("Март'26".to_string()),
            date,
        }
        .to_period();
        assert_eq!(period.label(), "Март'26");
        assert_eq!(period.date_cell(), "2026-04-01");
    }

    #[test]
    fn test_parse_auth_verify() {
        let args = Args::try_parse_from(["finbot", "auth", "--verify"]).unwrap();
        let Command::Auth(auth) = args.command() else {
            panic!("expected auth");
        };
        assert!(auth.verify());
    }
}
