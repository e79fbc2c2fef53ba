use crate::commands::{
    run_checkout, run_fares, run_jobs, run_office, CheckoutArgs, FareArgs, JobArgs, OfficeArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use kwaground::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "kwaground",
    about = "Search casual jobs and matatu fares across Kenyan counties, or run the HTTP service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Search the job board
    Jobs(JobArgs),
    /// Show a county's fare table
    Fares(FareArgs),
    /// Find the county office closest to a position
    Office(OfficeArgs),
    /// Walk a posting plan through checkout and the M-Pesa confirmation flow
    Checkout(CheckoutArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Jobs(args) => run_jobs(args),
        Command::Fares(args) => run_fares(args),
        Command::Office(args) => run_office(args).await,
        Command::Checkout(args) => run_checkout(args).await,
    }
}
