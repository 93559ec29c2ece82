use crate::lookup::{run_lookup, LookupCommand};
use crate::server;
use clap::{Args, Parser, Subcommand};
use permit_view::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Permit Register Projector",
    about = "Serve or query citizen views of the building-permit register",
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
    /// Run a single lookup against the configured register and print JSON
    Lookup {
        /// Register snapshot to read instead of APP_BACKEND_SNAPSHOT
        #[arg(long, global = true)]
        snapshot: Option<PathBuf>,
        #[command(subcommand)]
        command: LookupCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Register snapshot to serve instead of APP_BACKEND_SNAPSHOT
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Lookup { snapshot, command } => run_lookup(snapshot, command),
    }
}
