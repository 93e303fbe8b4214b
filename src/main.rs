//! Middleware gate command-line tool.
//!
//! ```text
//! manifest (TOML/JSON)
//!     → validate: structural errors + matcher diagnostics
//!     → check:    eligible middleware for one (method, url)
//!     → serve:    HTTP adapter reporting eligibility per request
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use middleware_gate::config::{load_config, ConfigError, LoadedConfig};
use middleware_gate::config::watcher::ConfigWatcher;
use middleware_gate::http::{spawn_registry_reloader, GateServer};
use middleware_gate::matching::{IncomingRequest, MiddlewareRegistry};
use middleware_gate::observability::init_logging;

#[derive(Parser)]
#[command(name = "middleware-gate")]
#[command(about = "Decide which middleware run for a request", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a manifest and print matcher diagnostics
    Validate {
        manifest: PathBuf,
    },
    /// Print the middleware that would run for one request
    Check {
        manifest: PathBuf,
        #[arg(short, long, default_value = "GET")]
        method: String,
        /// Absolute request URL
        #[arg(short, long)]
        url: String,
    },
    /// Serve eligibility reports over HTTP
    Serve {
        manifest: PathBuf,
        /// Overrides server.bind_address from the manifest
        #[arg(short, long)]
        bind: Option<String>,
        /// Reload the manifest when it changes
        #[arg(short, long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { manifest } => {
            let loaded = match load(&manifest) {
                Ok(loaded) => loaded,
                Err(e) => {
                    eprintln!("{}", e);
                    return Ok(ExitCode::FAILURE);
                }
            };
            for diagnostic in &loaded.diagnostics {
                println!("warning: {}", diagnostic);
            }
            println!(
                "{} middleware, {} diagnostic(s)",
                loaded.config.middleware.len(),
                loaded.diagnostics.len()
            );
        }
        Commands::Check { manifest, method, url } => {
            let loaded = load(&manifest)?;
            let registry = MiddlewareRegistry::from_config(&loaded.config);
            let request = IncomingRequest::new(method, &url)?;
            for name in registry.eligible(&request) {
                println!("{}", name);
            }
        }
        Commands::Serve { manifest, bind, watch } => {
            let mut loaded = load(&manifest)?;
            if let Some(bind) = bind {
                loaded.config.server.bind_address = bind;
            }

            let listener = TcpListener::bind(&loaded.config.server.bind_address).await?;
            let server = GateServer::new(loaded.config);

            // Held for the lifetime of the server; dropping it stops the watch.
            let _watcher = if watch {
                let (watcher, updates) = ConfigWatcher::new(&manifest);
                spawn_registry_reloader(server.registry(), updates);
                Some(watcher.run()?)
            } else {
                None
            };

            server.run(listener).await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load the manifest and install logging from its observability section.
fn load(manifest: &Path) -> Result<LoadedConfig, ConfigError> {
    let loaded = load_config(manifest)?;
    init_logging(&loaded.config.observability);
    tracing::info!(
        manifest = %manifest.display(),
        middleware = loaded.config.middleware.len(),
        diagnostics = loaded.diagnostics.len(),
        "Manifest loaded"
    );
    Ok(loaded)
}
