use crate::report::{
    run_heatmap, run_risk, run_scores, run_summary, run_trend, DataArgs, HeatmapArgs, RiskArgs,
    ScoresArgs, SummaryArgs, TrendArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ehs_core::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ehs-portal",
    about = "Serve and print EHS safety scores, trends, and risk classification",
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
    /// Print the ranked safety leaderboard
    Scores(ScoresArgs),
    /// Print the portfolio or single-project score trend
    Trend(TrendArgs),
    /// Print monthly incident counts per project for a year
    Heatmap(HeatmapArgs),
    /// Print active projects by risk tier
    Risk(RiskArgs),
    /// Print the management summary for a year or month
    Summary(SummaryArgs),
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
    pub(crate) data: DataArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Scores(args) => run_scores(args),
        Command::Trend(args) => run_trend(args),
        Command::Heatmap(args) => run_heatmap(args),
        Command::Risk(args) => run_risk(args),
        Command::Summary(args) => run_summary(args),
    }
}
