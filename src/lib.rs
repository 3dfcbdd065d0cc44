pub mod cli;
pub mod client;
pub mod gate;
pub mod jwt;
pub mod pages;
pub mod routes;
pub mod session;

use axum::{Router, middleware, response::Redirect, routing::get};
use gate::{GateConfig, edge_gate};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Route table and redirect targets of the edge gate
    pub gate: GateConfig,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let gate = Arc::new(config.gate.clone());
    let root = gate.routes.root().to_string();

    Router::new()
        .route("/", get(Redirect::temporary(&root)))
        .route(&gate.login_path, get(pages::login_page))
        .route(&gate.not_found_path, get(pages::not_found_page))
        .route(&root, get(pages::dashboard_page))
        .route(&format!("{}/", root), get(pages::dashboard_page))
        .route(&format!("{}/{{*path}}", root), get(pages::dashboard_page))
        .fallback(pages::fallback)
        .layer(middleware::from_fn_with_state(gate, edge_gate))
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}

/// Start the server on the given port in a background task. Use port 0 to let the OS choose a random port.
/// Returns the actual address the server is listening on.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> Result<(tokio::task::JoinHandle<()>, SocketAddr), std::io::Error> {
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    let local_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = run_server(config, listener).await {
            tracing::error!(error = %e, "Server error");
        }
    });

    Ok((handle, local_addr))
}
