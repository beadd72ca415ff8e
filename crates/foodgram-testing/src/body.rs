//! Response body helpers.

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

/// Collect a response body and parse it as JSON.
///
/// Panics on an unreadable body or invalid JSON.
pub async fn json_body(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is JSON")
}
