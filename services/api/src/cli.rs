use clap::{Args, Parser, Subcommand};

use pkl_core::error::AppError;

use crate::demo::{run_demo, run_schedule, DemoArgs, ScheduleArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "PKL Workflow Service",
    about = "Run and demonstrate the internship (PKL) lifecycle workflow service",
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
    /// Preview the placement period a decision date would produce
    Schedule(ScheduleArgs),
    /// Run an end-to-end CLI demo covering the whole internship lifecycle
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
    /// Seed one demo position, application, and document set at startup
    #[arg(long)]
    pub(crate) seed_demo_data: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Schedule(args) => run_schedule(args),
        Command::Demo(args) => run_demo(args),
    }
}
