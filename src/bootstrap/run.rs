//! Top-level run loop: resolve, wire, start, serve the terminal, shut down.

use std::io;
use std::sync::Arc;

use anyhow::Context;
use sc_app::usecases::ConnectOrigin;
use sc_app::{AppSettings, SyncClipApp};
use sc_infra::fs::logs_dir;
use sc_infra::SystemClock;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::config::resolve_config;
use super::tracing::init_tracing_subscriber;
use super::wiring::wire_dependencies;
use crate::cli::Cli;
use crate::frontend::{Repl, TerminalNotifier};

pub async fn run_app(cli: Cli) -> anyhow::Result<()> {
    let resolved = resolve_config(&cli)?;
    init_tracing_subscriber(&logs_dir(&resolved.data_dir))?;
    info!(
        config = ?resolved.source,
        data_dir = %resolved.data_dir.display(),
        "Starting SyncClip"
    );

    let notifier = Arc::new(TerminalNotifier::stdout());
    let deps = wire_dependencies(&resolved, notifier).context("Failed to wire dependencies")?;
    let app = SyncClipApp::new(deps, AppSettings::from_config(&resolved.config));

    let cancel = CancellationToken::new();
    let handles = app.start(cancel.clone()).await?;

    for link in &cli.connect {
        if let Err(err) = app.connect(link, ConnectOrigin::Startup).await {
            warn!(link = %link, error = %err, "Startup connection failed");
            println!("error: {err:#}");
        }
    }

    println!(
        "SyncClip on {} ({}). Type 'help' for commands.",
        app.device().device_name,
        app.device().device_id
    );

    let mut repl = Repl::new(&app, Arc::new(SystemClock), io::stdout());
    tokio::select! {
        result = repl.run(BufReader::new(tokio::io::stdin())) => {
            if let Err(err) = result {
                error!(error = %err, "Terminal input failed");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
        }
    }

    info!("Shutting down");
    cancel.cancel();
    for handle in handles {
        if let Err(err) = handle.await {
            warn!(error = %err, "Background task ended abnormally");
        }
    }
    Ok(())
}
