//! Discogs API client: OAuth 1.0a signing, the three-legged handshake, and
//! resilient fetches against the rate-limited REST surface.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    config::{self, DiscogsConfig},
    error::{ApiError, ApiResult},
    retry::{RetryPolicy, with_retry},
    types::Credentials,
};

pub mod collection;
pub mod oauth;

pub use collection::CollectionQuery;
pub use oauth::RequestToken;

pub struct DiscogsClient {
    pub(crate) http: Client,
    pub(crate) config: DiscogsConfig,
    pub(crate) retry: RetryPolicy,
}

impl DiscogsClient {
    pub fn new(config: DiscogsConfig) -> Self {
        Self::with_retry_policy(config, RetryPolicy::default())
    }

    pub fn with_retry_policy(config: DiscogsConfig, retry: RetryPolicy) -> Self {
        let http = Client::builder()
            .user_agent(config::USER_AGENT)
            .build()
            .expect("valid Discogs HTTP client");
        Self {
            http,
            config,
            retry,
        }
    }

    /// Issues a signed GET against `path`, retrying transient failures with
    /// the client's backoff policy.
    ///
    /// Every attempt rebuilds the OAuth parameter set, so nonce, timestamp,
    /// and signature are fresh each time a request leaves the process.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
        credentials: &Credentials,
    ) -> ApiResult<T> {
        with_retry(&self.retry, |_| self.fetch_once(path, params, credentials)).await
    }

    async fn fetch_once<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
        credentials: &Credentials,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.config.api_url, path);
        let oauth = oauth::signed_query(
            "GET",
            &url,
            params,
            &self.config,
            Some((
                credentials.access_token.as_str(),
                credentials.access_token_secret.as_str(),
            )),
        );
        let mut query = params.to_vec();
        query.extend(oauth);

        let response = self
            .http
            .get(&url)
            .query(&query)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(ApiError::Network)?;

        Self::parse_response(response).await
    }

    /// Classifies a Discogs response.
    ///
    /// 401 is fatal. 429 and 5xx are transient and left to the retry loop.
    /// Anything else unexpected carries the service's `message` field when
    /// one can be read. A 2xx body that fails to parse is a protocol error,
    /// not a retry candidate.
    async fn parse_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await.map_err(ApiError::Network)?;
            return serde_json::from_str(&body).map_err(|e| ApiError::Protocol {
                status: status.as_u16(),
                message: e.to_string(),
            });
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Auth);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimit);
        }
        if status.is_server_error() {
            return Err(ApiError::Server {
                status: status.as_u16(),
            });
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "unknown error".to_string());
        Err(ApiError::Protocol {
            status: status.as_u16(),
            message,
        })
    }
}
