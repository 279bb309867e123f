use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use powermap::{
    api::{render_summary, AnalysisBuilder},
    config::{AnalysisConfig, CONFIG_ENV_VAR},
    utils::init_logger,
};

#[derive(Parser)]
#[command(name = "powermap")]
#[command(about = "Map who owns a neighborhood from assessor CSV exports")]
pub struct Cli {
    /// Analysis config (YAML). Falls back to $POWERMAP_CONFIG, then defaults.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory that preset dataset locations are relative to
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a CSV file or a named dataset
    Analyze {
        /// Path to an assessor CSV export
        #[arg(short, long, conflicts_with = "dataset", required_unless_present = "dataset")]
        file: Option<PathBuf>,
        /// Preset dataset id (see `datasets`)
        #[arg(short, long)]
        dataset: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// List preset datasets
    Datasets,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger()?;

    let cli = Cli::parse();

    let mut builder = match &cli.config {
        Some(path) => AnalysisBuilder::new().with_config_file(path),
        None => AnalysisBuilder::new().with_config(
            AnalysisConfig::load().with_context(|| format!("loading config from ${}", CONFIG_ENV_VAR))?,
        ),
    };
    if let Some(dir) = &cli.data_dir {
        builder = builder.with_data_dir(dir);
    }
    let analyzer = builder.build()?;

    match cli.command {
        Commands::Analyze { file, dataset, format } => {
            let report = match (file, dataset) {
                (Some(path), _) => analyzer
                    .analyze_file(&path)
                    .await
                    .with_context(|| format!("analyzing {}", path.display()))?,
                (None, Some(id)) => analyzer
                    .analyze_dataset(&id)
                    .await
                    .with_context(|| format!("analyzing dataset '{}'", id))?,
                (None, None) => anyhow::bail!("either --file or --dataset is required"),
            };

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => print!("{}", render_summary(&report)),
            }
        }
        Commands::Datasets => {
            for preset in analyzer.datasets() {
                println!("{:<12} {:<24} {}", preset.id, preset.name, preset.location);
            }
        }
    }

    Ok(())
}
