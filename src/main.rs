use anyhow::Context;
use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use flowkit::{
    api,
    config::Config,
    logging::{self, LogSettings},
    processing::ChunkingService,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serve the Flowkit document-chunking API.
#[derive(Debug, Parser)]
#[command(name = "flowkit", version, about)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Interface to bind, overriding the configuration.
    #[arg(long)]
    host: Option<String>,
    /// Port to bind, overriding the configuration.
    #[arg(long)]
    port: Option<u16>,
    /// Runtime worker threads, overriding the configuration.
    #[arg(long)]
    workers: Option<usize>,
    /// Log file path, overriding `FLOWKIT_LOG_FILE`.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let mut log_settings = LogSettings::from_env();
    if let Some(path) = cli.log_file {
        log_settings.file = Some(path);
    }
    let _log_guard = logging::init_tracing(&log_settings).context("Failed to initialise logging")?;

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(workers) = cli.workers {
        anyhow::ensure!(workers > 0, "--workers must be greater than 0");
        config.workers = workers;
    }

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()
        .context("Failed to build the Tokio runtime")?
        .block_on(serve(config))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = resolve_addr(&config.host, config.port).await?;
    let tls = config.tls.clone();
    let workers = config.workers;
    let app = api::create_router(config, Arc::new(ChunkingService::new()));

    match tls {
        Some(tls) => {
            let rustls = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                .await
                .with_context(|| {
                    format!(
                        "Failed to load TLS material from {} and {}",
                        tls.cert_path.display(),
                        tls.key_path.display()
                    )
                })?;
            tracing::info!(%addr, workers, "Listening on https://{addr}");
            axum_server::bind_rustls(addr, rustls)
                .serve(app.into_make_service())
                .await
                .context("HTTPS server terminated")?;
        }
        None => {
            let listener = TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?;
            tracing::info!(%addr, workers, "Listening on http://{addr}");
            axum::serve(listener, app)
                .await
                .context("HTTP server terminated")?;
        }
    }
    Ok(())
}

async fn resolve_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("Failed to resolve {host}:{port}"))?
        .next()
        .with_context(|| format!("No address found for {host}:{port}"))
}
