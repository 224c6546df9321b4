use clap::Parser;
use expense_tracker::args::{Args, Command};
use expense_tracker::{commands, Config, Result, Session};
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
            error!("Exiting with {} error: {e}", e.error_type());
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().expense_home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Add(add_args) => {
            let mut session = Session::open(&Config::load(home).await?).await?;
            commands::add(&mut session, add_args.clone())
                .await?
                .print()
        }

        Command::Update(update_args) => {
            let mut session = Session::open(&Config::load(home).await?).await?;
            commands::update(&mut session, update_args.clone())
                .await?
                .print()
        }

        Command::Delete(delete_args) => {
            let mut session = Session::open(&Config::load(home).await?).await?;
            commands::delete(&mut session, delete_args.clone())
                .await?
                .print()
        }

        Command::List(list_args) => {
            // A CLI invocation is its own session, so the filter comes from the arguments
            let mut session = Session::open(&Config::load(home).await?).await?;
            commands::set_filter(&mut session, list_args.clone()).await?;
            commands::list(&session).await?.print()
        }

        Command::Mcp => commands::mcp(Config::load(home).await?).await?.print(),
    };
    Ok(())
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
                "expense_tracker={level},{}={level}",
                env!("CARGO_BIN_NAME")
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
