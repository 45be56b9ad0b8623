//! ig-export - Export Instagram posts as Hugo content files
//!
//! Pages through the Graph API media listing for one account and writes
//! `{output}/{YYYY-MM-DD}-{id}.md` for every post.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use libigexport::config::Config;
use libigexport::logging::{self, LogFormat, LoggingConfig};
use libigexport::service::{run_export, ExportOptions};
use libigexport::source::graph::GraphClient;
use libigexport::ExportError;
use secrecy::SecretString;
use tracing::{error, warn};

#[derive(Parser)]
#[command(name = "ig-export")]
#[command(about = "Export Instagram posts as Hugo content files", long_about = None)]
#[command(version)]
struct Cli {
    /// Instagram Graph API access token
    #[arg(long, env = "IG_EXPORT_TOKEN", hide_env_values = true)]
    token: String,

    /// Instagram user ID whose media to export
    #[arg(long, env = "IG_EXPORT_USER")]
    user: String,

    /// Output directory (default: output.dir from config, else content/instagram)
    #[arg(short, long)]
    output: Option<String>,

    /// Log raw API responses and per-post details
    #[arg(long)]
    debug: bool,

    /// Log format: text or json
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Path to config file
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let format = cli.log_format.unwrap_or_else(logging::format_from_env);
    LoggingConfig::new(format, logging::level_from_env(), cli.debug).init();

    if let Err(e) = run(cli).await {
        error!("Export failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<ExportError>()
            .map(ExportError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.user.trim().is_empty() {
        return Err(ExportError::InvalidInput("--user must not be empty".to_string()).into());
    }
    if cli.token.trim().is_empty() {
        return Err(ExportError::InvalidInput("--token must not be empty".to_string()).into());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from_path(&expand(path)),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let out_dir = cli
        .output
        .as_deref()
        .map(expand)
        .unwrap_or_else(|| config.output.dir_path());

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let client = GraphClient::new(&config.api).context("Failed to create API client")?;
    let token = SecretString::from(cli.token);
    let seed_url = client.seed_url(cli.user.trim(), &token)?;

    let options = ExportOptions::new(&out_dir, config.api.page_delay());
    let summary = run_export(&client, seed_url, &options).await;

    if let Some(e) = &summary.stopped_by {
        warn!(error = %e, "Export stopped early; files written so far are kept");
    }

    println!("{} posts processed to {}", summary.written, out_dir.display());
    Ok(())
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}
