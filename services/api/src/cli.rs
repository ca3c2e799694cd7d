use crate::ask::{run_ask, run_launch, AskArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use cheapshark_skill::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "CheapShark Deals Skill",
    about = "Host the CheapShark deals voice skill or query it from the command line",
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
    /// Send one intent through the skill and print what it would say
    Ask(AskArgs),
    /// Print the skill's launch response
    Launch,
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
        Command::Ask(args) => run_ask(args).await,
        Command::Launch => run_launch().await,
    }
}
