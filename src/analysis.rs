//! Minimal client for the remote text-analysis service.
//!
//! One call: `POST <origin>/analyze` with `{"text": ...}`. The HTTP status is not
//! consulted; the body is parsed as JSON whatever the status, because the service
//! reports its own failures as `{"error": ...}` on 4xx/5xx responses.
//!
//! The client is built without a timeout: a request is bounded only by the
//! transport's own limits.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Url;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::AnalysisRequest;

#[derive(Debug, Error)]
pub enum TransportError {
  #[error("request to analysis service failed: {0}")]
  Request(#[from] reqwest::Error),
  #[error("analysis service returned a non-JSON body: {0}")]
  InvalidJson(#[from] serde_json::Error),
  #[error("invalid analysis service URL '{url}': {reason}")]
  InvalidUrl { url: String, reason: String },
}

/// The fetch capability the popup needs. `AnalysisClient` is the real one.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
  /// Send one analysis request and return the parsed JSON body.
  async fn post_analyze(&self, req: &AnalysisRequest) -> Result<Value, TransportError>;

  /// Root URL of the service (scheme, host and port; no path).
  fn site_url(&self) -> String;
}

#[derive(Clone, Debug)]
pub struct AnalysisClient {
  client: reqwest::Client,
  origin: String,
}

impl AnalysisClient {
  /// Build a client for the service at `base_url`. Only the origin of the URL is kept.
  pub fn new(base_url: &str) -> Result<Self, TransportError> {
    let url = Url::parse(base_url).map_err(|e| TransportError::InvalidUrl {
      url: base_url.to_string(),
      reason: e.to_string(),
    })?;
    let origin = url.origin();
    if !origin.is_tuple() {
      return Err(TransportError::InvalidUrl {
        url: base_url.to_string(),
        reason: "URL has no host".into(),
      });
    }
    let client = reqwest::Client::builder().build()?;
    Ok(Self { client, origin: origin.ascii_serialization() })
  }

  pub fn analyze_url(&self) -> String {
    format!("{}/analyze", self.origin)
  }
}

#[async_trait]
impl AnalysisTransport for AnalysisClient {
  #[instrument(level = "info", skip(self, req), fields(text_len = req.text.len()))]
  async fn post_analyze(&self, req: &AnalysisRequest) -> Result<Value, TransportError> {
    let res = self
      .client
      .post(self.analyze_url())
      .header(USER_AGENT, "newslens-companion/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(req)
      .send()
      .await?;

    let status = res.status();
    let body = res.text().await?;
    debug!(target: "popup", %status, body_len = body.len(), "Analysis service responded");
    Ok(serde_json::from_str(&body)?)
  }

  fn site_url(&self) -> String {
    self.origin.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use wiremock::matchers::{body_json, header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn req(text: &str) -> AnalysisRequest {
    AnalysisRequest { text: text.into() }
  }

  #[test]
  fn urls_are_derived_from_the_origin() {
    let c = AnalysisClient::new("http://127.0.0.1:5000").expect("client");
    assert_eq!(c.site_url(), "http://127.0.0.1:5000");
    assert_eq!(c.analyze_url(), "http://127.0.0.1:5000/analyze");

    let c = AnalysisClient::new("http://localhost:8080/some/path/").expect("client");
    assert_eq!(c.site_url(), "http://localhost:8080");
  }

  #[test]
  fn rejects_unusable_base_urls() {
    assert!(matches!(AnalysisClient::new("not a url"), Err(TransportError::InvalidUrl { .. })));
    assert!(matches!(AnalysisClient::new("data:text/plain,hi"), Err(TransportError::InvalidUrl { .. })));
  }

  #[tokio::test]
  async fn posts_json_body_and_returns_parsed_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/analyze"))
      .and(header("content-type", "application/json"))
      .and(body_json(json!({"text": "breaking news"})))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"label": "REAL", "confidence": 0.9})))
      .expect(1)
      .mount(&server)
      .await;

    let client = AnalysisClient::new(&server.uri()).expect("client");
    let body = client.post_analyze(&req("breaking news")).await.expect("payload");
    assert_eq!(body, json!({"label": "REAL", "confidence": 0.9}));
  }

  #[tokio::test]
  async fn error_status_bodies_are_still_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/analyze"))
      .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "No text provided"})))
      .mount(&server)
      .await;

    let client = AnalysisClient::new(&server.uri()).expect("client");
    let body = client.post_analyze(&req("x")).await.expect("payload");
    assert_eq!(body["error"], "No text provided");
  }

  #[tokio::test]
  async fn html_body_is_an_invalid_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(500).set_body_string("<html>Internal Server Error</html>"))
      .mount(&server)
      .await;

    let client = AnalysisClient::new(&server.uri()).expect("client");
    let err = client.post_analyze(&req("x")).await.unwrap_err();
    assert!(matches!(err, TransportError::InvalidJson(_)));
  }

  #[tokio::test]
  async fn refused_connection_is_a_request_error() {
    // Port 1 is reserved and nothing listens there in test environments.
    let client = AnalysisClient::new("http://127.0.0.1:1").expect("client");
    let err = client.post_analyze(&req("x")).await.unwrap_err();
    assert!(matches!(err, TransportError::Request(_)));
  }
}
