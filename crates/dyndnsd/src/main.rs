// # dyndnsd - dynamic DNS HTTP endpoint
//
// Responsibilities:
// 1. Read configuration from environment variables
// 2. Initialize tracing and the runtime
// 3. Wire the backend factory and address source into the router
// 4. Serve until SIGTERM/SIGINT
//
// Provider credentials are per-request URL parameters; nothing secret is
// read from the environment.
//
// ## Example
//
// ```bash
// export PORT=5616
// export LOG_LEVEL=info
// dyndnsd
// # curl 'http://localhost:5616/?token=...&zone=example.com'
// ```

use anyhow::Result;
use dyndnsd::config::{AddressSourceKind, Config};
use dyndnsd::{app, AppState};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

/// Exit codes following systemd conventions
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return DaemonExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return DaemonExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        if let Err(e) = serve(config).await {
            error!("Server error: {e}");
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    })
    .into()
}

/// Wire the seams and serve HTTP until a shutdown signal arrives
async fn serve(config: Config) -> Result<()> {
    let address_source: Arc<dyn dyndns_core::traits::AddressSource> = match config.address_source {
        AddressSourceKind::Iface => Arc::new(dyndns_ip_iface::IfaceAddressSource::new(
            config.address_iface.clone(),
        )),
        AddressSourceKind::Echo => Arc::new(dyndns_ip_echo::EchoAddressSource::new()?),
    };

    let state = AppState::new(
        Arc::new(dyndns_provider_cloudflare::CloudflareFactory),
        address_source,
    );

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve when SIGTERM or SIGINT arrives
#[cfg(unix)]
async fn shutdown_signal() {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to setup SIGTERM handler: {e}");
            return;
        }
    };
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to setup SIGINT handler: {e}");
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => info!("SIGTERM received"),
        _ = sigint.recv() => info!("SIGINT received"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to wait for CTRL-C: {e}");
    }
}
