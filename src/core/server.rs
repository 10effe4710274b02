// Application server configuration and setup

use std::time::Duration;
use axum::{
    Router,
    middleware::from_fn,
    error_handling::HandleErrorLayer,
};
use tower::{ServiceBuilder, timeout::TimeoutLayer};
use tokio::{signal, net::TcpListener};
use listenfd::ListenFd;
use anyhow::Result;

use crate::config::{environment::EnvironmentVariables, state::AppState};
use crate::utils::{
    error_handler::handle_global_error,
    response_handler::response_logger,
};

/// Wraps a service's routes with the shared middleware stack and state
pub fn create_app(routes: Router<AppState>, state: AppState) -> Router {
    let env: &EnvironmentVariables = &state.environment;
    let timeout: Duration = Duration::from_secs(env.default_timeout_seconds);

    routes
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(response_logger))
                .layer(HandleErrorLayer::new(handle_global_error))
                .layer(TimeoutLayer::new(timeout))
        )
        .with_state(state)
}

/// Takes a socket from the process manager if one was passed, otherwise binds
pub async fn setup_listener(env: &EnvironmentVariables) -> Result<TcpListener> {
    let mut listenfd: ListenFd = ListenFd::from_env();

    let listener: TcpListener = match listenfd.take_tcp_listener(0)? {
        Some(std_listener) => {
            std_listener.set_nonblocking(true)?;
            TcpListener::from_std(std_listener)?
        }
        None => {
            let addr: String = format!("{}:{}", env.host, env.port);
            TcpListener::bind(&addr).await?
        }
    };

    Ok(listener)
}

/// Handles graceful shutdown signals (Ctrl+C and TERM)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Terminate signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate: std::future::Pending<()> = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Shutting down via Ctrl+C"),
        _ = terminate => tracing::info!("Shutting down via TERM signal"),
    }
}

/// Entry point shared by both binaries
pub async fn run(service: &'static str, routes: Router<AppState>) -> Result<()> {
    crate::core::logging::init_tracing();

    let state: AppState = AppState::from_process()?;
    tracing::info!(
        service,
        environment = %state.environment.environment,
        "starting"
    );

    let listener: TcpListener = setup_listener(&state.environment).await?;
    let app: Router = create_app(routes, state);

    tracing::info!("Server listening on: {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
