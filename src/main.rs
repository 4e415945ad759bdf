use anyhow::{Context, Result};
use clap::Parser;
use interview_copilot::{build_state, create_router, create_router_with_frontend, Config};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "interview-copilot", version, about = "Live interview transcription and answer backend")]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/interview-copilot")]
    config: String,

    /// Override service.http.bind
    #[arg(long)]
    bind: Option<String>,

    /// Override service.http.port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(bind) = args.bind {
        cfg.service.http.bind = bind;
    }
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("Interview Copilot v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    let state = build_state(&cfg)?;
    let router = match cfg.static_dir() {
        Some(dir) if dir.is_dir() => {
            info!("Serving frontend from {}", dir.display());
            create_router_with_frontend(state, &dir)
        }
        Some(dir) => {
            warn!("Frontend directory {} not found, serving API only", dir.display());
            create_router(state)
        }
        None => create_router(state),
    };

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
    }
}
