//! Health
//!
//! Liveness probe with version info.

use axum::Json;
use serde_json::Value;

pub async fn execute() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "engine": recall_core::VERSION,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_ok() {
        let response = execute().await;
        assert_eq!(response["status"], "ok");
        assert!(response["version"].is_string());
    }
}
