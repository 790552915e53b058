//! Last.fm API client: keyed-digest request signing, session creation, and
//! scrobble submission.
//!
//! Last.fm's signing scheme differs from OAuth 1.0a: parameters are sorted,
//! keys and values concatenated, the shared secret appended, and the MD5 of
//! the whole string sent as `api_sig`. `format` and `callback` are excluded
//! from the signed string but still transmitted.

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::{
    config::{self, LastfmConfig},
    error::{ApiError, ApiResult},
    retry::{RetryPolicy, with_retry},
    utils,
};

pub mod auth;
pub mod scrobble;

pub use scrobble::MAX_TRACKS_PER_REQUEST;

pub struct LastfmClient {
    pub(crate) http: Client,
    pub(crate) config: LastfmConfig,
    pub(crate) retry: RetryPolicy,
}

impl LastfmClient {
    pub fn new(config: LastfmConfig) -> Self {
        Self::with_retry_policy(config, RetryPolicy::default())
    }

    pub fn with_retry_policy(config: LastfmConfig, retry: RetryPolicy) -> Self {
        let http = Client::builder()
            .user_agent(config::USER_AGENT)
            .build()
            .expect("valid Last.fm HTTP client");
        Self {
            http,
            config,
            retry,
        }
    }

    /// Keyed digest over the parameter set: keys sorted, values
    /// concatenated, secret appended. `format` and `callback` never enter
    /// the signed string even though both are transmitted.
    pub fn api_signature(params: &[(String, String)], secret: &str) -> String {
        let mut signable: Vec<&(String, String)> = params
            .iter()
            .filter(|(key, _)| key != "format" && key != "callback")
            .collect();
        signable.sort_by(|a, b| a.0.cmp(&b.0));

        let mut message = String::new();
        for (key, value) in signable {
            message.push_str(key);
            message.push_str(value);
        }
        message.push_str(secret);
        utils::md5_hex(&message)
    }

    /// Executes one API call with the client's retry policy.
    ///
    /// All parameters travel in the URL query string regardless of HTTP
    /// method; `format=json` is always appended, and `api_sig` when the
    /// call is signed.
    pub(crate) async fn call(
        &self,
        params: &[(String, String)],
        signed: bool,
        method: Method,
    ) -> ApiResult<Value> {
        with_retry(&self.retry, |_| {
            self.call_once(params, signed, method.clone())
        })
        .await
    }

    async fn call_once(
        &self,
        params: &[(String, String)],
        signed: bool,
        method: Method,
    ) -> ApiResult<Value> {
        let mut all = params.to_vec();
        all.push(("format".to_string(), "json".to_string()));
        if signed {
            let signature = Self::api_signature(&all, &self.config.api_secret);
            all.push(("api_sig".to_string(), signature));
        }

        let response = self
            .http
            .request(method, &self.config.api_url)
            .query(&all)
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ApiError::RateLimit);
            }
            if status.is_server_error() {
                return Err(ApiError::Server {
                    status: status.as_u16(),
                });
            }
            return Err(ApiError::Protocol {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        // Failures can hide inside a 200 body; the status alone proves nothing.
        let body = response.text().await.map_err(ApiError::Network)?;
        let value: Value = serde_json::from_str(&body).map_err(|e| ApiError::Protocol {
            status: status.as_u16(),
            message: e.to_string(),
        })?;
        if let Some(code) = value.get("error").and_then(|v| v.as_i64()) {
            let message = value
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown Last.fm error")
                .to_string();
            return Err(ApiError::Remote { code, message });
        }

        Ok(value)
    }
}
