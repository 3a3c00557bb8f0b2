//! Loopback HTTP access to generated previews.
//!
//! Terminals without inline graphics can still inspect a frame: the help
//! overlay shows a URL served from here. Only previews registered by the
//! currently open catalog are reachable; any other path is a 404.

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use url::Url;

/// Paths the server may read. Swapped wholesale when a catalog opens or
/// closes.
pub type PreviewRegistry = Arc<RwLock<HashSet<PathBuf>>>;

#[derive(Clone)]
struct ApiState {
    registry: PreviewRegistry,
    started: Instant,
}

pub struct PreviewServer {
    pub addr: SocketAddr,
    pub registry: PreviewRegistry,
}

/// Bind an ephemeral loopback port and serve in the background.
pub async fn start() -> Result<PreviewServer> {
    let registry: PreviewRegistry = Arc::new(RwLock::new(HashSet::new()));
    let state = ApiState {
        registry: registry.clone(),
        started: Instant::now(),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("Failed to bind preview listener")?;
    let addr = listener
        .local_addr()
        .context("Failed to read preview listener address")?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, build_router(state)).await {
            tracing::error!(error = %e, "Preview server stopped");
        }
    });
    tracing::info!(addr = %addr, "Preview server listening");
    Ok(PreviewServer { addr, registry })
}

fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/preview", get(preview_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<ApiState>) -> Response {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.started.elapsed().as_secs(),
    }))
    .into_response()
}

#[derive(Deserialize)]
struct PreviewParams {
    path: PathBuf,
}

async fn preview_handler(
    State(state): State<ApiState>,
    Query(params): Query<PreviewParams>,
) -> Response {
    if !state.registry.read().await.contains(&params.path) {
        return (StatusCode::NOT_FOUND, "unknown preview").into_response();
    }
    match tokio::fs::read(&params.path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response(),
        Err(e) => {
            tracing::warn!(path = %params.path.display(), error = %e, "Failed to read preview");
            (StatusCode::NOT_FOUND, "preview unavailable").into_response()
        }
    }
}

/// Replace the reachable set with the previews of a newly opened catalog.
pub async fn publish_previews<I>(registry: &PreviewRegistry, paths: I)
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut guard = registry.write().await;
    guard.clear();
    guard.extend(paths);
}

pub fn preview_url(addr: SocketAddr, path: &Path) -> Option<Url> {
    let mut url = Url::parse(&format!("http://{addr}/preview")).ok()?;
    url.query_pairs_mut()
        .append_pair("path", &path.to_string_lossy());
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn http_get(addr: SocketAddr, target: &str) -> (String, Vec<u8>) {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {target} HTTP/1.0\r\nHost: localhost\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        let split = raw.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        let head = String::from_utf8_lossy(&raw[..split]).to_string();
        (head, raw[split + 4..].to_vec())
    }

    fn request_target(addr: SocketAddr, path: &Path) -> String {
        let url = preview_url(addr, path).unwrap();
        format!("{}?{}", url.path(), url.query().unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint_reports_version() {
        let server = start().await.unwrap();
        let (head, body) = http_get(server.addr, "/").await;
        assert!(head.starts_with("HTTP/1.0 200"), "{head}");
        assert!(String::from_utf8_lossy(&body).contains(env!("CARGO_PKG_VERSION")));
    }

    #[tokio::test]
    async fn test_registered_previews_are_served() {
        let dir = tempdir().unwrap();
        let preview = dir.path().join("IMG_0001.jpg");
        fs::write(&preview, b"jpeg bytes").unwrap();

        let server = start().await.unwrap();
        publish_previews(&server.registry, [preview.clone()]).await;

        let (head, body) = http_get(server.addr, &request_target(server.addr, &preview)).await;
        assert!(head.starts_with("HTTP/1.0 200"), "{head}");
        assert!(head.contains("image/jpeg"));
        assert_eq!(body, b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_unregistered_paths_are_rejected() {
        let server = start().await.unwrap();
        let (head, _) = http_get(
            server.addr,
            &request_target(server.addr, Path::new("/etc/passwd")),
        )
        .await;
        assert!(head.starts_with("HTTP/1.0 404"), "{head}");
    }

    #[tokio::test]
    async fn test_registry_swap_revokes_old_paths() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("old.jpg");
        let new = dir.path().join("new.jpg");
        fs::write(&old, b"old").unwrap();
        fs::write(&new, b"new").unwrap();

        let server = start().await.unwrap();
        publish_previews(&server.registry, [old.clone()]).await;
        publish_previews(&server.registry, [new.clone()]).await;

        let (head, _) = http_get(server.addr, &request_target(server.addr, &old)).await;
        assert!(head.starts_with("HTTP/1.0 404"), "{head}");
        let (head, body) = http_get(server.addr, &request_target(server.addr, &new)).await;
        assert!(head.starts_with("HTTP/1.0 200"), "{head}");
        assert_eq!(body, b"new");
    }

    #[tokio::test]
    async fn test_preview_url_encodes_awkward_paths() {
        let addr: SocketAddr = "127.0.0.1:4242".parse().unwrap();
        let path = Path::new("/photos/summer trip/_cull/IMG 01.jpg");
        let url = preview_url(addr, path).unwrap();

        assert!(!url.as_str().contains(' '));
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "path");
        assert_eq!(value, path.to_string_lossy());
    }
}
