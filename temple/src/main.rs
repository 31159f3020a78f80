//! Temple - hierarchical template registry
//!
//! CLI entry point for listing, rendering and watching template trees.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{info, warn};

use temple::cli::{Cli, Command, OutputFormat, get_log_path};
use temple::config::TempleConfig;
use temple::registry::Temple;
use temple::reloader::Reloader;

fn setup_logging(verbose: bool) -> Result<()> {
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to the log file, keeping stdout for rendered output
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let mut config = TempleConfig::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(root) = cli.root {
        config.root = root;
    }

    info!(root = %config.root.display(), marker = %config.layout.marker, "Temple loaded config");

    let temple = Temple::from_config(&config)
        .context(format!("Failed to build templates from {}", config.root.display()))?;

    match cli.command {
        Command::List { format } => cmd_list(&temple, format),
        Command::Files => cmd_files(&temple),
        Command::Render { name, data } => cmd_render(&temple, &name, data.as_deref()),
        Command::Watch => cmd_watch(temple, &config).await,
    }
}

/// List templates with their entry fragments
fn cmd_list(temple: &Temple, format: OutputFormat) -> Result<()> {
    let set = temple.snapshot();

    match format {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = set
                .names()
                .iter()
                .filter_map(|name| set.get(name).map(|tpl| (name, tpl)))
                .map(|(name, tpl)| {
                    serde_json::json!({
                        "name": name,
                        "entry": tpl.entry_name(),
                        "fragments": tpl.fragment_names(),
                        "files": tpl.files(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            if set.is_empty() {
                println!("No templates found under {}", temple.root().display());
                return Ok(());
            }
            for name in set.names() {
                if let Some(tpl) = set.get(&name) {
                    let entry = if tpl.entry_name().is_empty() { "-" } else { tpl.entry_name() };
                    println!("{:<40} entry={:<16} fragments={}", name, entry, tpl.fragment_names().len());
                }
            }
        }
    }

    Ok(())
}

/// Print every distinct contributing file
fn cmd_files(temple: &Temple) -> Result<()> {
    let files: BTreeSet<PathBuf> = temple.files().into_iter().collect();
    for file in files {
        println!("{}", file.display());
    }
    Ok(())
}

/// Render one template to stdout
fn cmd_render(temple: &Temple, name: &str, data: Option<&Path>) -> Result<()> {
    let template = temple
        .get(name)
        .ok_or_else(|| eyre::eyre!("Unknown template: {}", name))?;

    let value = match data {
        Some(path) => load_data(path)?,
        None => serde_json::Value::Object(Default::default()),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    template
        .execute(&mut out, &value)
        .context(format!("Failed to render {}", name))?;
    out.flush()?;
    Ok(())
}

/// Read render data from a JSON or YAML file
fn load_data(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path).context(format!("Failed to read data file {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yml") | Some("yaml")
    );
    let value = if is_yaml {
        serde_yaml::from_str(&content).context("Failed to parse YAML data")?
    } else {
        serde_json::from_str(&content).context("Failed to parse JSON data")?
    };
    Ok(value)
}

/// Watch template files until interrupted
async fn cmd_watch(temple: Temple, config: &TempleConfig) -> Result<()> {
    let temple = Arc::new(temple);
    let mut reloader = Reloader::spawn(Arc::clone(&temple), &config.reloader).context("Failed to start reloader")?;

    println!(
        "Watching {} files under {} (Ctrl+C to stop)",
        reloader.watched().len(),
        temple.root().display()
    );
    info!("Watching templates. Press Ctrl+C to stop, SIGHUP to reload and resync.");

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sighup = signal(SignalKind::hangup())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    info!("SIGHUP received - reloading templates");
                    let target = Arc::clone(&temple);
                    match tokio::task::spawn_blocking(move || target.reload()).await? {
                        Ok(()) => match reloader.resync() {
                            Ok(report) => info!(added = report.added.len(), removed = report.removed.len(), "Watch set resynced"),
                            Err(e) => tracing::error!(error = %e, "Failed to resync watch set"),
                        },
                        Err(e) => tracing::error!(error = %e, "Failed to reload templates"),
                    }
                }
                _ = sigint.recv() => {
                    warn!("SIGINT received");
                    break;
                }
                _ = sigterm.recv() => {
                    warn!("SIGTERM received");
                    break;
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
    }

    reloader.close().await;
    info!("Watcher shut down");
    Ok(())
}
