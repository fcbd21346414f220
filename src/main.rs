use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use newsdesk::api::{AppState, create_router};
use newsdesk::config::{Config, parse_bind_addr};
use newsdesk::news_api::NewsClient;
use newsdesk::render::PageTemplate;

/// How long in-flight requests get to finish once a shutdown signal arrives.
const SHUTDOWN_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(name = "newsdesk", about = "Search front-end for a news API")]
struct Args {
    /// Address to listen on (overrides BIND_ADDR)
    #[arg(long)]
    bind: Option<String>,

    /// Directory served under /assets (overrides ASSETS_DIR)
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// HTML page template (overrides TEMPLATE_PATH)
    #[arg(long)]
    template: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(bind) = args.bind {
        config.bind_addr = parse_bind_addr(&bind)?;
    }
    if let Some(assets_dir) = args.assets_dir {
        config.assets_dir = assets_dir;
    }
    if let Some(template) = args.template {
        config.template_path = Some(template);
    }
    tracing::debug!(?config, "configuration loaded");

    let template = match &config.template_path {
        Some(path) => PageTemplate::load(path)
            .with_context(|| format!("failed to load template {}", path.display()))?,
        None => PageTemplate::default(),
    };

    let state = Arc::new(AppState {
        news: NewsClient::new(&config),
        template,
    });
    let app = create_router(state, &config.assets_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "starting server");

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            tracing::info!("shutdown signal received, draining requests");
            shutdown.cancel();
        }
    });

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown.clone().cancelled_owned());
    let drain_deadline = async {
        shutdown.cancelled().await;
        tokio::time::sleep(SHUTDOWN_DRAIN_TIMEOUT).await;
    };

    tokio::select! {
        res = async { server.await } => res?,
        _ = drain_deadline => {
            tracing::warn!(
                timeout_secs = SHUTDOWN_DRAIN_TIMEOUT.as_secs(),
                "in-flight requests did not finish in time, exiting anyway"
            );
        }
    }

    tracing::info!("shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
