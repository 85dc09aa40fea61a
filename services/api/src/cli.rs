use crate::demo::{run_demo, run_match, DemoArgs, MatchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scheme_finder::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Scheme Finder",
    about = "Match citizen profiles to welfare schemes and run the conversational intake service",
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
    /// Match a profile JSON file against the scheme catalogue
    Match(MatchArgs),
    /// Replay a scripted chat conversation through the intake service
    Demo(DemoArgs),
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
        Command::Match(args) => run_match(args),
        Command::Demo(args) => run_demo(args),
    }
}
