use clap::Parser;
use finbot::args::{Args, Command, RecordArgs};
use finbot::{commands, CellStore, Mode, Result};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            println!("{}", e.reply());
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().finbot_home().path();

    // This allows for running the program without hitting the Google APIs. When
    // FINBOT_IN_TEST_MODE is set and non-zero in length, then the mode will be Mode::Test,
    // otherwise it will be Mode::Google.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => {
            commands::init(home, init_args.client_secret(), init_args.sheet_url())
                .await?
                .print()
        }

        Command::Auth(auth_args) => {
            if auth_args.verify() {
                commands::auth_verify(home).await?.print()
            } else {
                commands::auth(home).await?.print()
            }
        }

        Command::Add(record) => {
            let (period, mut store) = open(home, mode, record).await?;
            commands::add_expense(store.as_mut(), &period, record.text())
                .await?
                .print()
        }

        Command::Transfer(record) => {
            let (period, mut store) = open(home, mode, record).await?;
            commands::transfer(store.as_mut(), &period, record.text())
                .await?
                .print()
        }

        Command::Message(record) => {
            let (period, mut store) = open(home, mode, record).await?;
            commands::handle_message(store.as_mut(), &period, record.text())
                .await?
                .print()
        }

        Command::Balance(period_args) => {
            let period = period_args.to_period();
            let mut store = finbot::store(home, mode, period.label()).await?;
            commands::balance(store.as_mut(), &period).await?.print()
        }

        Command::Period(period_args) => commands::period(&period_args.to_period()).print(),
    };
    Ok(())
}

/// Resolves the period of a message command and opens the store it is recorded in.
async fn open(
    home: &Path,
    mode: Mode,
    record: &RecordArgs,
) -> Result<(finbot::model::Period, Box<dyn CellStore>)> {
    let period = record.period().to_period();
    let store = finbot::store(home, mode, period.label()).await?;
    Ok((period, store))
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
