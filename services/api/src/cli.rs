use crate::offline::{run_schema, run_score, SchemaArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use gsb_index::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "GSB Index",
    about = "Score sustainability questionnaires and compare them with sector benchmarks",
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
    /// Score an answers file and print the report as JSON
    Score(ScoreArgs),
    /// Validate and print a scoring schema
    Schema(SchemaArgs),
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
        Command::Score(args) => run_score(args).await,
        Command::Schema(args) => run_schema(args),
    }
}
