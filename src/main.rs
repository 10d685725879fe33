//! live-ini
//!
//! Watches an INI file and resolves scoped lookups against it.
//!
//! ```text
//! live-ini watch ./Config.ini --scope C172 --key EngineFireColor
//! live-ini get ./Config.ini C172 EngineFireColor
//! live-ini dump ./Config.ini
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;

use live_ini::config::{load_settings, ConfigChanged, ConfigStore, StoreSettings};
use live_ini::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "live-ini")]
#[command(about = "Hot-reloading scoped INI configuration", long_about = None)]
struct Cli {
    /// Store settings (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Serve Prometheus metrics on this address.
    #[arg(long)]
    metrics_addr: Option<SocketAddr>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch a file and report every reload
    Watch {
        path: PathBuf,
        /// Scope to resolve after each reload
        #[arg(long, requires = "key")]
        scope: Option<String>,
        /// Keys to resolve after each reload
        #[arg(long)]
        key: Vec<String>,
    },
    /// Resolve one key once
    Get {
        path: PathBuf,
        scope: String,
        key: String,
    },
    /// Print the parsed sections
    Dump { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    logging::init_logging(logging::DEFAULT_DIRECTIVE);

    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => StoreSettings::default(),
    };

    if let Some(addr) = cli.metrics_addr {
        metrics::init_metrics(addr)?;
    }

    match cli.command {
        Commands::Watch { path, scope, key } => {
            watch(settings, &path, scope.as_deref(), &key).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Get { path, scope, key } => {
            let store = ConfigStore::new(settings);
            store.reload_from(&path)?;
            match store.get_config(&scope, &key) {
                Some(value) => {
                    println!("{}", value);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("{}: not found for scope {}", key, scope);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Dump { path } => {
            let store = ConfigStore::new(settings);
            store.reload_from(&path)?;
            let snapshot = store.snapshot();
            for name in snapshot.section_names() {
                println!("[{}]", name);
                if let Some(section) = snapshot.section(name) {
                    let mut entries: Vec<_> = section.iter().collect();
                    entries.sort_unstable();
                    for (key, value) in entries {
                        println!("{} = {}", key, value);
                    }
                }
                println!();
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn watch(
    settings: StoreSettings,
    path: &Path,
    scope: Option<&str>,
    keys: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let store = ConfigStore::new(settings);
    let mut changes = store.subscribe();
    store.start_monitoring(path)?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
            change = changes.recv() => match change {
                Ok(ConfigChanged { generation }) => {
                    println!("generation {}", generation);
                    if let Some(scope) = scope {
                        for key in keys {
                            match store.resolve(scope, key) {
                                Some(resolved) => println!("  {} = {} ({:?})", key, resolved.value, resolved.source),
                                None => println!("  {} not found", key),
                            }
                        }
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Change notifications dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    store.stop();
    Ok(())
}
