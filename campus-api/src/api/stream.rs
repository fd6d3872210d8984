//! Dashboard push channel endpoint

use axum::extract::State;
use axum::response::IntoResponse;

use crate::AppState;

/// GET /api/v1/stream
///
/// Long-lived SSE connection delivering JSON-encoded change events. The
/// server holds no per-client cursor; reconnect-on-drop is the client's
/// responsibility.
pub async fn stream(State(state): State<AppState>) -> impl IntoResponse {
    state.broadcaster.handle_sse_connection()
}
