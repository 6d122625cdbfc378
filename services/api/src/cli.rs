use crate::demo::{run_demo, run_receipts, run_report, DemoArgs, ReceiptArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ems::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Employee Management Reports",
    about = "Serve employee records and export HR reports from the command line",
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
    /// Export one report section as CSV or PDF
    Report(ReportArgs),
    /// Export every salary receipt for a month as one PDF
    Receipts(ReceiptArgs),
    /// Print a dashboard and report walkthrough to stdout
    Demo(DemoArgs),
}

/// Record source overrides shared by every command.
#[derive(Args, Debug, Default)]
pub(crate) struct SourceArgs {
    /// Record source to read from (`fixture` or `http`)
    #[arg(long)]
    pub(crate) data_source: Option<String>,
    /// Base URL of the JSON backend when reading over HTTP
    #[arg(long)]
    pub(crate) base_url: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args).await,
        Command::Receipts(args) => run_receipts(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
