mod engine;
mod outstanding;
mod watchdog;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ipc_fabric::{Publisher, Subscriber, UpstreamBroker, derive_backend_endpoint};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use engine::Engine;

/// Upper bound on a single receive-loop iteration, per §4.6/§5: the
/// orchestrator must never block longer than this so timeout checks keep
/// running even with no inbound traffic.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "orchestrator starting");

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

    let backend_endpoint = derive_backend_endpoint(&cfg.ipc.upstream);

    let broker = Arc::new(UpstreamBroker::new());
    let _broker_task = {
        let broker = broker.clone();
        let frontend = cfg.ipc.upstream.clone();
        let backend = backend_endpoint.clone();
        tokio::spawn(async move {
            if let Err(e) = broker.run(&frontend, &backend).await {
                error!(error = %e, "upstream broker exited");
            }
        })
    };

    let downstream = match Publisher::bind(&cfg.ipc.downstream).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("FATAL: cannot bind downstream channel: {e}");
            std::process::exit(1);
        }
    };

    let mut upstream = match Subscriber::connect(&backend_endpoint).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("FATAL: cannot connect to upstream broker backend: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = upstream.subscribe("").await {
        eprintln!("FATAL: cannot subscribe upstream: {e}");
        std::process::exit(1);
    }

    let mut engine = Engine::new(cfg, downstream);

    info!("orchestrator entering main loop");
    loop {
        match upstream.recv(POLL_INTERVAL).await {
            Ok(Some((topic, payload))) => {
                engine.handle_upstream(&topic, &payload).await;
            }
            Ok(None) => {
                // Poll timeout — fall through to watchdog checks below.
            }
            Err(e) => {
                error!(error = %e, "upstream receive error, sleeping before retry");
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
        engine.run_watchdog().await;
    }
}
