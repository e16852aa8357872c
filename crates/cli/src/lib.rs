pub mod bootstrap;
pub mod commands;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use concierge_core::config::{AppConfig, LoadOptions};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use commands::ask::AskOptions;
use commands::ticket::TicketArgs;
use commands::tickets::TicketFilterArgs;

#[derive(Debug, Parser)]
#[command(
    name = "concierge",
    about = "Concierge customer-service router CLI",
    long_about = "Route customer-service queries across the customer-data and support providers, \
                  and manage the backing SQLite store.",
    after_help = "Examples:\n  concierge migrate\n  \
                  concierge ask --seed \"Get customer information for ID 5\"\n  \
                  concierge tickets --priority high --seed\n  \
                  concierge scenarios --trace"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic support dataset (idempotent) and verify it")]
    Seed,
    #[command(about = "Answer one free-text customer-service query")]
    Ask {
        query: String,
        #[arg(long, help = "Include the coordination trace in the output")]
        trace: bool,
        #[arg(long, help = "Seed the support dataset before answering")]
        seed: bool,
    },
    #[command(about = "Run the reference conversations against a freshly seeded store")]
    Scenarios {
        #[arg(long, help = "Include each scenario's coordination trace")]
        trace: bool,
    },
    #[command(about = "Open a support ticket for a customer")]
    Ticket {
        #[arg(long)]
        customer: i64,
        #[arg(long)]
        issue: String,
        #[arg(long, help = "low | medium | high (defaults to the issue's urgency)")]
        priority: Option<String>,
        #[arg(long, help = "Seed the support dataset first")]
        seed: bool,
    },
    #[command(about = "List tickets across customers by priority and/or status")]
    Tickets {
        #[arg(long, help = "low | medium | high")]
        priority: Option<String>,
        #[arg(long, help = "open | in_progress | resolved")]
        status: Option<String>,
        #[arg(long, help = "Seed the support dataset first")]
        seed: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    if let Err(error) = init_logging() {
        eprintln!("logging disabled: {error:#}");
    }

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Ask { query, trace, seed } => {
            commands::ask::run(&query, AskOptions { trace, seed })
        }
        Command::Scenarios { trace } => commands::scenarios::run(trace),
        Command::Ticket { customer, issue, priority, seed } => {
            commands::ticket::run(TicketArgs { customer_id: customer, issue, priority, seed })
        }
        Command::Tickets { priority, status, seed } => {
            commands::tickets::run(TicketFilterArgs { priority, status, seed })
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only the command's JSON line.
/// A broken config falls back to defaults here; the command reports it.
fn init_logging() -> anyhow::Result<()> {
    use concierge_core::config::LogFormat::*;

    let config = AppConfig::load(LoadOptions::default()).unwrap_or_default();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .map_err(|error| anyhow!("invalid log filter: {error}"))?;
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    }
    .map_err(|error| anyhow!(error))
}
