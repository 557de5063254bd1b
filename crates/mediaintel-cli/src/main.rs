use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use mediaintel_core::{ChartKind, MediaType, Platform, Sentiment};
use tracing_subscriber::EnvFilter;

mod analyze;
mod inspect;
mod session;

#[derive(Debug, Parser)]
#[command(name = "mediaintel")]
#[command(about = "Campaign media intelligence: normalize, slice, chart, and report")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show how a file normalizes: column mapping, rejected rows, and filter values
    Inspect {
        /// CSV/TSV or spreadsheet export
        file: PathBuf,
    },
    /// Build the five charts, their insights, and a markdown report
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
pub(crate) struct AnalyzeArgs {
    /// CSV/TSV or spreadsheet export
    pub file: PathBuf,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Restrict to a platform (repeatable)
    #[arg(long = "platform")]
    pub platforms: Vec<Platform>,

    /// Restrict to a sentiment (repeatable)
    #[arg(long = "sentiment")]
    pub sentiments: Vec<Sentiment>,

    /// Restrict to a media type (repeatable)
    #[arg(long = "media-type")]
    pub media_types: Vec<MediaType>,

    /// Restrict to a location, case-insensitive (repeatable)
    #[arg(long = "location")]
    pub locations: Vec<String>,

    /// Compare against the equally long window before --from/--to
    #[arg(long)]
    pub compare_prior: bool,

    /// Write the markdown report here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write the chart datasets and insights as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Attach a rendered chart image handle, e.g. platform_share=charts/p.png (repeatable)
    #[arg(long = "image", value_parser = parse_image)]
    pub images: Vec<(ChartKind, String)>,

    /// Skip AI enrichment even if a provider is configured
    #[arg(long)]
    pub no_ai: bool,
}

fn parse_image(raw: &str) -> Result<(ChartKind, String), String> {
    let (kind, handle) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KIND=HANDLE, got '{raw}'"))?;
    let kind = kind.parse::<ChartKind>().map_err(|e| e.to_string())?;
    let handle = handle.trim();
    if handle.is_empty() {
        return Err(format!("empty image handle for {kind}"));
    }
    Ok((kind, handle.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = mediaintel_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Inspect { file } => {
            let session = session::Session::open(&file, config, false)?;
            inspect::run_inspect(&session);
        }
        Commands::Analyze(args) => {
            let session = session::Session::open(&args.file, config, !args.no_ai)?;
            analyze::run_analyze(&session, &args).await?;
        }
    }

    Ok(())
}
