// Server module - router assembly and port selection, used by main.rs and tests

use axum::Router;
use axum::extract::DefaultBodyLimit;
use std::net::{SocketAddr, TcpListener};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::infrastructure::AppState;

/// Largest accepted request body (poster uploads)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Build the full application router: pages, picker fragments, health check
/// and the media directory served at `/media`.
pub fn build_router(state: AppState) -> Router {
    let media = ServeDir::new(state.media_root.clone());

    api::router(state)
        .nest_service("/media", media)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
}

/// Find an available port starting from the preferred port on a specific IP
pub fn find_available_port_on_ip(preferred_port: u16, ip: &str) -> Option<u16> {
    // Try preferred port first
    if TcpListener::bind((ip, preferred_port)).is_ok() {
        return Some(preferred_port);
    }

    // Scan next 100 ports
    ((preferred_port.saturating_add(1))..(preferred_port.saturating_add(100)))
        .find(|&port| TcpListener::bind((ip, port)).is_ok())
}

/// Find an available port starting from the preferred port (0.0.0.0)
pub fn find_available_port(preferred_port: u16) -> Option<u16> {
    find_available_port_on_ip(preferred_port, "0.0.0.0")
}

/// Bind the listener on the first free port at or after `preferred_port`.
pub async fn bind(preferred_port: u16) -> Result<(tokio::net::TcpListener, u16), String> {
    let port = find_available_port(preferred_port).ok_or_else(|| {
        format!(
            "No available port between {} and {}",
            preferred_port,
            preferred_port.saturating_add(99)
        )
    })?;
    if port != preferred_port {
        tracing::warn!("Port {} is busy, using {} instead", preferred_port, port);
    }
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;
    Ok((listener, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_port_is_skipped() {
        let held = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let busy = held.local_addr().unwrap().port();
        let found = find_available_port_on_ip(busy, "127.0.0.1").unwrap();
        assert_ne!(found, busy);
    }
}
