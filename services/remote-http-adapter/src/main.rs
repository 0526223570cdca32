use std::net::SocketAddr;
use std::path::PathBuf;

use ipc_fabric::{derive_backend_endpoint, Publisher, Subscriber};
use remote_http_adapter::state::AppState;
use remote_http_adapter::{build_router, telemetry};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "remote http adapter starting");

    let project_root = std::env::var("PROJECT_ROOT").unwrap_or_else(|_| ".".to_owned());
    let base_path = std::env::var("ROBOT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/etc/robot/config.toml"));
    let override_path = std::env::var("ROBOT_CONFIG_OVERRIDE").ok().map(PathBuf::from);

    let cfg = match config_resolver::load(&base_path, override_path.as_deref(), &project_root) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("FATAL: config resolution failed: {e}");
            std::process::exit(1);
        }
    };

    let outbound = match Publisher::connect(&cfg.ipc.upstream).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("FATAL: cannot connect upstream publisher: {e}");
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(outbound, cfg.http.clone(), cfg.telemetry.history_len);

    let backend_endpoint = derive_backend_endpoint(&cfg.ipc.upstream);
    let mut upstream_sub = match Subscriber::connect(&backend_endpoint).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("FATAL: cannot connect to upstream broker backend: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = upstream_sub.subscribe("").await {
        eprintln!("FATAL: cannot subscribe telemetry upstream consumer: {e}");
        std::process::exit(1);
    }
    tokio::spawn(telemetry::run_upstream_consumer(upstream_sub, app_state.telemetry.clone()));

    let mut downstream_sub = match Subscriber::connect(&cfg.ipc.downstream).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("FATAL: cannot connect telemetry downstream consumer: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = downstream_sub.subscribe("").await {
        eprintln!("FATAL: cannot subscribe telemetry downstream consumer: {e}");
        std::process::exit(1);
    }
    tokio::spawn(telemetry::run_downstream_consumer(downstream_sub, app_state.telemetry.clone()));

    let router = build_router(app_state);

    let bind_addr = format!("{}:{}", cfg.http.bind, cfg.http.port);
    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("FATAL: cannot bind HTTP listener on {bind_addr}: {e}");
            std::process::exit(1);
        }
    };

    info!(addr = %bind_addr, "remote http adapter listening");
    if let Err(e) = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    {
        error!(error = %e, "http server exited with error");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("shutdown signal received");
}
