//! Merge request gateway
//!
//! Counts open merge requests for the configured project on a GitLab host.

use crate::error::ErrorCode;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Header GitLab uses for personal / project access tokens
const TOKEN_HEADER: &str = "private-token";
/// Total row count GitLab reports for paginated collections
const TOTAL_HEADER: &str = "x-total";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("code host rejected the access token (HTTP {0})")]
    Unauthorized(u16),

    #[error("code host answered HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("invalid code host URL '{0}'")]
    InvalidUrl(String),
}

impl GatewayError {
    pub fn code(&self) -> u16 {
        match self {
            GatewayError::Http(err) if err.is_timeout() => ErrorCode::GATEWAY_TIMEOUT,
            GatewayError::Http(_) | GatewayError::InvalidUrl(_) => ErrorCode::GATEWAY_GENERIC,
            GatewayError::Unauthorized(_) => ErrorCode::GATEWAY_UNAUTHORIZED,
            GatewayError::Status { .. } | GatewayError::Decode(_) => {
                ErrorCode::GATEWAY_BAD_RESPONSE
            }
        }
    }
}

/// Source of the open merge request count gating production releases
#[async_trait]
pub trait MergeRequestGateway: Send + Sync {
    async fn open_merge_requests(&self) -> Result<usize, GatewayError>;
}

/// GitLab REST v4 implementation
pub struct GitLabGateway {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl GitLabGateway {
    pub fn new(
        host_base: &str,
        project_id: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: merge_requests_endpoint(host_base, project_id)?,
            token,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// `{base}/api/v4/projects/{id}/merge_requests?state=opened`, with the id
/// percent-encoded so `group/name` paths work as project ids
pub fn merge_requests_endpoint(host_base: &str, project_id: &str) -> Result<Url, GatewayError> {
    let mut url =
        Url::parse(host_base).map_err(|_| GatewayError::InvalidUrl(host_base.to_string()))?;

    url.path_segments_mut()
        .map_err(|_| GatewayError::InvalidUrl(host_base.to_string()))?
        .pop_if_empty()
        .extend(["api", "v4", "projects", project_id, "merge_requests"]);
    url.query_pairs_mut().append_pair("state", "opened");

    Ok(url)
}

fn parse_total_header(value: Option<&reqwest::header::HeaderValue>) -> Option<usize> {
    value?.to_str().ok()?.trim().parse().ok()
}

#[async_trait]
impl MergeRequestGateway for GitLabGateway {
    async fn open_merge_requests(&self) -> Result<usize, GatewayError> {
        tracing::debug!("Querying open merge requests: {}", self.endpoint);

        let mut request = self.client.get(self.endpoint.clone());
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GatewayError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        if let Some(total) = parse_total_header(response.headers().get(TOTAL_HEADER)) {
            tracing::debug!("Open merge requests (X-Total): {}", total);
            return Ok(total);
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        match body {
            serde_json::Value::Array(items) => {
                tracing::debug!("Open merge requests: {}", items.len());
                Ok(items.len())
            }
            other => Err(GatewayError::Decode(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_for_numeric_project() {
        let url = merge_requests_endpoint("https://gitlab.example.com", "42").unwrap();
        assert_eq!(
            url.as_str(),
            "https://gitlab.example.com/api/v4/projects/42/merge_requests?state=opened"
        );
    }

    #[test]
    fn test_endpoint_encodes_path_project_id() {
        let url = merge_requests_endpoint("https://gitlab.example.com:8443/", "team/web-app").unwrap();
        assert_eq!(
            url.as_str(),
            "https://gitlab.example.com:8443/api/v4/projects/team%2Fweb-app/merge_requests?state=opened"
        );
    }

    #[test]
    fn test_endpoint_rejects_invalid_base() {
        assert!(matches!(
            merge_requests_endpoint("not a url", "42"),
            Err(GatewayError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(GatewayError::Unauthorized(401).code(), ErrorCode::GATEWAY_UNAUTHORIZED);
        assert_eq!(
            GatewayError::Decode("x".to_string()).code(),
            ErrorCode::GATEWAY_BAD_RESPONSE
        );
        assert_eq!(
            GatewayError::InvalidUrl("x".to_string()).code(),
            ErrorCode::GATEWAY_GENERIC
        );
    }

    #[test]
    fn test_parse_total_header() {
        let value = reqwest::header::HeaderValue::from_static("7");
        assert_eq!(parse_total_header(Some(&value)), Some(7));
        let junk = reqwest::header::HeaderValue::from_static("many");
        assert_eq!(parse_total_header(Some(&junk)), None);
        assert_eq!(parse_total_header(None), None);
    }
}
