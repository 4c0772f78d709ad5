//! Web server for building PPTX decks from marker scripts.

use anyhow::{Context, Result};
use clap::Parser;
use deck_net::{HttpImageFetcher, ImageHost};
use deck_server::{router, AppState, Config};

fn main() -> Result<()> {
    let config = Config::parse();

    // Initialize logging
    if config.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    // The blocking client owns its own runtime and has to be built outside tokio.
    let fetcher = HttpImageFetcher::new(config.fetch_timeout())
        .context("Failed to create image fetcher")?;
    let host = ImageHost::new(
        config.upload_endpoint.clone(),
        config.upload_key.clone(),
        config.fetch_timeout(),
    )
    .context("Failed to create image host client")?;

    if !host.is_configured() {
        log::warn!("No upload key configured; /upload will refuse requests");
    }

    let state = AppState::new(fetcher, host);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(serve(&config, state.clone()))?;

    // Last handle to the fetcher is released here, outside the runtime.
    drop(runtime);
    drop(state);
    Ok(())
}

async fn serve(config: &Config, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state, config.max_upload_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
