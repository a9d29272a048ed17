// src/campaign_client.rs
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

use crate::error::TransportError;

/// Boundary to the generation backend. Every failure comes back as a value.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// POST `params` as query pairs and decode the JSON reply
    async fn call(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
        timeout: Duration,
    ) -> Result<Value, TransportError>;

    /// GET raw bytes from a media URL
    async fn fetch_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, TransportError>;
}

#[derive(Debug, Clone)]
pub struct CampaignClient {
    client: Client,
}

impl CampaignClient {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for CampaignClient {
    fn default() -> Self {
        Self::new()
    }
}

fn describe(endpoint: &str, timeout: Duration, e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::new(format!(
            "request to {} timed out after {}s",
            endpoint,
            timeout.as_secs()
        ))
    } else {
        TransportError::new(format!("request to {} failed: {}", endpoint, e))
    }
}

#[async_trait]
impl RemoteClient for CampaignClient {
    async fn call(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        info!("📡 POST {} ({} params, timeout {}s)", endpoint, params.len(), timeout.as_secs());

        let response = self.client
            .post(endpoint)
            .query(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| describe(endpoint, timeout, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| describe(endpoint, timeout, e))?;

        if !status.is_success() {
            error!("Backend error from {}: {} {}", endpoint, status, body);
            return Err(TransportError::new(format!(
                "{} returned {}: {}",
                endpoint, status, body
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Malformed response from {}: {}", endpoint, e);
            TransportError::new(format!("malformed response from {}: {}", endpoint, e))
        })
    }

    async fn fetch_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        info!("⬇️ Fetching {}", url);

        let response = self.client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| describe(url, timeout, e))?;

        if !response.status().is_success() {
            return Err(TransportError::new(format!(
                "Failed to download {}: {}",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| describe(url, timeout, e))?;
        info!("✅ Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::{get, post}, Json, Router};
    use std::collections::HashMap;

    async fn spawn_backend() -> String {
        let app = Router::new()
            .route(
                "/echo",
                post(|Query(params): Query<HashMap<String, String>>| async move { Json(params) }),
            )
            .route(
                "/fail",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "scene synthesis crashed") }),
            )
            .route("/garbage", post(|| async { "<html>not json</html>" }))
            .route(
                "/slow",
                post(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "{}"
                }),
            )
            .route("/video.mp4", get(|| async { vec![0u8, 1, 2, 3] }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_params_are_sent_as_query_pairs() {
        let base = spawn_backend().await;
        let client = CampaignClient::new();
        let value = client
            .call(
                &format!("{}/echo", base),
                &[("business_type", "nail salon".to_string()), ("num_scenes", "3".to_string())],
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert_eq!(value["business_type"], "nail salon");
        assert_eq!(value["num_scenes"], "3");
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_transport_error() {
        let base = spawn_backend().await;
        let err = CampaignClient::new()
            .call(&format!("{}/fail", base), &[], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(err.message.contains("500"));
        assert!(err.message.contains("scene synthesis crashed"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_transport_error() {
        let base = spawn_backend().await;
        let err = CampaignClient::new()
            .call(&format!("{}/garbage", base), &[], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(err.message.starts_with("malformed response"));
    }

    #[tokio::test]
    async fn test_timeout_becomes_a_transport_error() {
        let base = spawn_backend().await;
        let err = CampaignClient::new()
            .call(&format!("{}/slow", base), &[], Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(err.message.contains("timed out"), "unexpected message: {}", err.message);
    }

    #[tokio::test]
    async fn test_fetch_bytes() {
        let base = spawn_backend().await;
        let client = CampaignClient::new();
        let bytes = client
            .fetch_bytes(&format!("{}/video.mp4", base), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(bytes, vec![0u8, 1, 2, 3]);

        assert!(client
            .fetch_bytes(&format!("{}/missing.mp4", base), Duration::from_secs(5))
            .await
            .is_err());
    }
}
