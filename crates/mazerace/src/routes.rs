//! HTTP surface: maze queries, the reset trigger and the WebSocket upgrade.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use mazerace_protocol::{Codec, MazeGrid, MazeInfo, ResetAck};
use mazerace_transport::WebSocketConnection;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::server::ServerState;
use crate::session::run_session;

/// Builds the router. Every route allows any origin.
pub(crate) fn router<C: Codec>(
    state: Arc<ServerState<C>>,
    static_dir: Option<&Path>,
) -> Router {
    let app = Router::new()
        .route("/maze", get(maze::<C>))
        .route("/info", get(info::<C>))
        .route("/reset", get(reset::<C>).post(reset::<C>))
        .route("/ws", get(ws::<C>))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "serving static files");
            app.fallback_service(ServeDir::new(dir))
        }
        None => app,
    };

    app.layer(CorsLayer::permissive())
}

async fn maze<C: Codec>(State(state): State<Arc<ServerState<C>>>) -> Json<MazeGrid> {
    Json(state.maze_grid().await)
}

async fn info<C: Codec>(State(state): State<Arc<ServerState<C>>>) -> Json<MazeInfo> {
    Json(state.maze_info().await)
}

async fn reset<C: Codec>(State(state): State<Arc<ServerState<C>>>) -> Json<ResetAck> {
    state.reset().await;
    Json(ResetAck { ok: true })
}

async fn ws<C: Codec>(
    ws: WebSocketUpgrade,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<ServerState<C>>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        run_session(WebSocketConnection::new(socket, remote_addr), state)
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use http_body_util::BodyExt;
    use mazerace_game::{GameState, MazeDimensions};
    use mazerace_protocol::JsonCodec;
    use tower::ServiceExt;

    use super::*;

    fn test_state() -> Arc<ServerState<JsonCodec>> {
        let dims = MazeDimensions::new(21, 13).unwrap();
        Arc::new(ServerState::new(GameState::new(dims), JsonCodec, 8))
    }

    async fn call(
        state: &Arc<ServerState<JsonCodec>>,
        method: Method,
        uri: &str,
    ) -> (StatusCode, header::HeaderMap, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ORIGIN, "http://elsewhere.example")
            .body(Body::empty())
            .unwrap();
        let response = router(Arc::clone(state), None)
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, headers, json)
    }

    #[tokio::test]
    async fn test_info_route() {
        let state = test_state();
        let (status, headers, json) = call(&state, Method::GET, "/info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!({"goalX": 19, "goalY": 11, "width": 21, "height": 13})
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_maze_route_returns_row_major_codes() {
        let state = test_state();
        let (status, _, json) = call(&state, Method::GET, "/maze").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 13);
        assert!(rows.iter().all(|r| r.as_array().unwrap().len() == 21));
        assert_eq!(rows[1][1], 0);
        assert_eq!(rows[0][0], 1);
    }

    #[tokio::test]
    async fn test_reset_route_acknowledges_and_starts_new_round() {
        let state = test_state();
        let before = state.maze_grid().await;
        let (status, _, json) = call(&state, Method::POST, "/reset").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({"ok": true}));

        let (_, _, json) = call(&state, Method::GET, "/reset").await;
        assert_eq!(json, serde_json::json!({"ok": true}));
        assert_eq!(state.shared.lock().await.game.round().number(), 3);

        let after = state.maze_grid().await;
        assert_eq!(after.len(), before.len());
        assert_eq!(after[0].len(), before[0].len());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404_without_static_dir() {
        let state = test_state();
        let (status, _, _) = call(&state, Method::GET, "/index.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
