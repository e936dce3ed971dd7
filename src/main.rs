mod cache;
mod config;
mod handlers;
mod models;
mod router;
mod topology;

use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache::TopologyCache;
use config::Config;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub cache: Arc<dyn TopologyCache>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clos_fabric=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let cfg = Config::load();
    tracing::info!("Starting ClosFabric Server");
    tracing::info!("Listen: {}", cfg.listen_addr);
    tracing::info!(
        "Limits: max_servers={} max_switches={}",
        cfg.max_servers,
        cfg.max_switches
    );
    tracing::info!(
        "Paths: parallel={} labels={:?}",
        cfg.parallel_paths,
        cfg.label_style
    );

    // Initialize response cache
    let cache = cache::from_capacity(cfg.cache_capacity);
    if cfg.cache_capacity == 0 {
        tracing::info!("Topology cache disabled");
    } else {
        tracing::info!("Topology cache initialized (capacity={})", cfg.cache_capacity);
    }

    // Create app state
    let state = Arc::new(AppState {
        config: cfg.clone(),
        cache,
    });

    // Build router
    let app = router::build(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("ClosFabric listening on {}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("ClosFabric shutting down");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM, whichever arrives first
async fn shutdown_signal() {
    #[cfg(unix)]
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(|e| tracing::error!("SIGTERM handler unavailable: {}", e))
        .ok();

    let terminate = async {
        #[cfg(unix)]
        if let Some(sig) = sigterm.as_mut() {
            sig.recv().await;
            return "SIGTERM";
        }
        std::future::pending::<&str>().await
    };

    let received = tokio::select! {
        res = signal::ctrl_c() => match res {
            Ok(()) => "Ctrl+C",
            Err(e) => {
                tracing::error!("Ctrl+C handler unavailable: {}", e);
                return std::future::pending().await;
            }
        },
        name = terminate => name,
    };
    tracing::info!("Received {}, draining connections", received);
}
