use crate::runner::{run_allocate, AllocateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use faculty_allocation::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Faculty Allocation",
    about = "Allocate students to faculty project slots by CGPA and ranked preferences",
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
    /// Allocate a roster CSV and write the output tables
    Allocate(AllocateArgs),
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
        Command::Allocate(args) => run_allocate(args),
    }
}
