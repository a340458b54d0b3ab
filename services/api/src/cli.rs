use crate::demo::{run_demo, run_stats, DemoArgs, StatsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use clearance::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Clearance Service",
    about = "Run and demonstrate the university clearance tracker from the command line",
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
    /// Run a scripted end-to-end walkthrough of the clearance workflow
    Demo(DemoArgs),
    /// Print the aggregate clearance statistics for the seeded roster
    Stats(StatsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Preload the demo roster before serving
    #[arg(long)]
    pub(crate) seed: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Stats(args) => run_stats(args),
    }
}
