//! CLI subcommand handlers.

use crate::{Commands, ConfigAction, RunArgs};
use datasplit_core::config::{WORKSPACE_CONFIG_FILE, config_exists};
use datasplit_core::{
    DataIngestion, DatasplitConfig, IngestionConfig, IngestionReport, load_config,
};
use std::path::Path;

/// Handle a CLI subcommand.
pub async fn handle_command(
    command: Commands,
    workspace: &Path,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => handle_run(args, workspace, config_path).await,
        Commands::Config { action } => handle_config(action, workspace, config_path),
    }
}

async fn handle_run(
    args: RunArgs,
    workspace: &Path,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    let mut config = load_config(Some(workspace), config_path)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?
        .data_ingestion;

    if config_path.is_none() && !config_exists(workspace) {
        tracing::warn!(
            workspace = %workspace.display(),
            "No config file found; using defaults and environment"
        );
    }

    apply_run_overrides(&mut config, &args, workspace);

    let ingestion = DataIngestion::new(config)?;
    tracing::debug!(
        url = %ingestion.url(),
        raw_dir = %ingestion.config().raw_dir().display(),
        seed = ?ingestion.config().seed,
        "Resolved ingestion settings"
    );
    let report = ingestion.run().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

/// Apply `run` flags on top of the loaded config and anchor a relative
/// artifact dir at the workspace.
fn apply_run_overrides(config: &mut IngestionConfig, args: &RunArgs, workspace: &Path) {
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(dir) = &args.artifact_dir {
        config.artifact_dir = dir.clone();
    }
    if config.artifact_dir.is_relative() {
        config.artifact_dir = workspace.join(&config.artifact_dir);
    }
}

fn print_summary(report: &IngestionReport) {
    println!("Ingested {} rows from {}", report.total_rows, report.url);
    for summary in &report.splits {
        println!(
            "  {:<10} {:>8} rows  {}",
            summary.split.to_string(),
            summary.rows,
            summary.path.display()
        );
    }
}

fn handle_config(
    action: ConfigAction,
    workspace: &Path,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(Some(workspace), config_path)
                .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
        ConfigAction::Init => {
            let path = init_config(workspace)?;
            println!("Created default configuration at: {}", path.display());
            Ok(())
        }
    }
}

/// Write a default config into `workspace`, refusing to overwrite an existing one.
fn init_config(workspace: &Path) -> anyhow::Result<std::path::PathBuf> {
    std::fs::create_dir_all(workspace)?;
    let path = workspace.join(WORKSPACE_CONFIG_FILE);
    if path.exists() {
        anyhow::bail!("Configuration file already exists at: {}", path.display());
    }
    let toml_str = toml::to_string_pretty(&DatasplitConfig::default())?;
    std::fs::write(&path, toml_str)?;
    Ok(path)
}
