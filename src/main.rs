use anyhow::{Context, Result};
use clap::Parser;
use live_translate::{bootstrap, create_router, AppState, Config};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Speech translation session service")]
struct Args {
    /// Config file (extension optional)
    #[arg(long, default_value = "config/live-translate")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config).context("Failed to load config")?;

    info!("Live Translate v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    let controller = bootstrap::build_controller(&cfg).await?;
    let (session, controller_task) = controller.spawn();

    let app = create_router(AppState::new(session.clone()));
    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP intent API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down");
        })
        .await
        .context("HTTP server failed")?;

    if session.shutdown().await.is_ok() {
        if let Err(e) = controller_task.await {
            error!("Session controller panicked: {}", e);
        }
    }

    Ok(())
}
