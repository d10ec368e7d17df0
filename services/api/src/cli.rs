use crate::commands::{
    run_check, run_rating, run_transitions, CheckArgs, RatingArgs, TransitionsArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use inspection_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Inspection Desk",
    about = "Serve and inspect vendor lifecycle and condition rating rules",
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
    /// Print the transition table for a work order, estimate, or invoice
    Transitions(TransitionsArgs),
    /// Check whether a role may move an entity between two statuses
    Check(CheckArgs),
    /// Aggregate finding priorities into a section condition rating
    Rating(RatingArgs),
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
        Command::Transitions(args) => run_transitions(args),
        Command::Check(args) => run_check(args),
        Command::Rating(args) => run_rating(args),
    }
}
