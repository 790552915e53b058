//! OAuth 1.0a signing and the three-legged handshake against Discogs.
//!
//! The signing functions are pure: given a fixed nonce and timestamp the
//! signature base string and signature are fully deterministic, which is
//! what the protocol requires for the server to verify them.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    config::{self, DiscogsConfig},
    error,
    error::{ApiError, ApiResult},
    management::CredentialsManager,
    server::start_api_server,
    success,
    types::{AuthState, Credentials},
    utils, warning,
};

use super::DiscogsClient;

/// Result of the first handshake leg.
#[derive(Debug, Clone)]
pub struct RequestToken {
    pub token: String,
    pub secret: String,
    /// Where the user grants access; the verifier comes back via the callback.
    pub authorize_url: String,
}

/// Builds a fresh `oauth_*` parameter set, signature excluded.
///
/// Nonce and timestamp are generated here, so each call produces a set that
/// is valid for exactly one outbound request.
pub fn oauth_params(config: &DiscogsConfig, token: Option<&str>) -> Vec<(String, String)> {
    let mut params = vec![
        (
            "oauth_consumer_key".to_string(),
            config.consumer_key.clone(),
        ),
        ("oauth_nonce".to_string(), utils::generate_nonce()),
        (
            "oauth_signature_method".to_string(),
            "HMAC-SHA1".to_string(),
        ),
        (
            "oauth_timestamp".to_string(),
            Utc::now().timestamp().to_string(),
        ),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];
    if let Some(token) = token {
        params.push(("oauth_token".to_string(), token.to_string()));
    }
    params
}

/// Canonical string covering method, URL, and every request parameter
/// sorted byte-lexicographically. This is what gets signed, so the
/// signature covers everything except itself.
pub fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut sorted = params.to_vec();
    sorted.sort();
    let param_string = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", utils::percent_encode(k), utils::percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        utils::percent_encode(url),
        utils::percent_encode(&param_string)
    )
}

/// HMAC key: encoded consumer secret and token secret joined by `&`. The
/// token secret is empty for the first handshake leg.
pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!(
        "{}&{}",
        utils::percent_encode(consumer_secret),
        utils::percent_encode(token_secret)
    )
}

/// Complete `oauth_*` set for one request, signature appended last.
pub fn signed_query(
    method: &str,
    url: &str,
    extra_params: &[(String, String)],
    config: &DiscogsConfig,
    token: Option<(&str, &str)>,
) -> Vec<(String, String)> {
    let (token_value, token_secret) = match token {
        Some((value, secret)) => (Some(value), secret),
        None => (None, ""),
    };

    let mut oauth = oauth_params(config, token_value);
    let mut all = extra_params.to_vec();
    all.extend(oauth.iter().cloned());

    let base = signature_base_string(method, url, &all);
    let key = signing_key(&config.consumer_secret, token_secret);
    oauth.push(("oauth_signature".to_string(), utils::hmac_sha1_base64(&base, &key)));
    oauth
}

impl DiscogsClient {
    /// Acquires a request token, the first leg of the handshake.
    ///
    /// The request is signed with an empty token secret and carries
    /// `oauth_callback` in the signed set. A non-success status and a body
    /// missing either token field are separate failures; a 200 response can
    /// still be semantically invalid.
    pub async fn request_token(&self, callback_url: &str) -> ApiResult<RequestToken> {
        let url = format!("{}/oauth/request_token", self.config.api_url);
        let params = vec![("oauth_callback".to_string(), callback_url.to_string())];
        let body = self.handshake_post(&url, &params, None).await?;

        let fields = parse_token_fields(&body);
        let token = fields.get("oauth_token").cloned().ok_or_else(|| {
            ApiError::Handshake(format!("response is missing oauth_token: {body}"))
        })?;
        let secret = fields.get("oauth_token_secret").cloned().ok_or_else(|| {
            ApiError::Handshake(format!("response is missing oauth_token_secret: {body}"))
        })?;
        let authorize_url = format!("{}?oauth_token={}", self.config.authorize_url, token);

        Ok(RequestToken {
            token,
            secret,
            authorize_url,
        })
    }

    /// Exchanges an authorized request token for long-lived credentials,
    /// the final leg of the handshake.
    pub async fn access_token(
        &self,
        request_token: &str,
        request_token_secret: &str,
        verifier: &str,
    ) -> ApiResult<Credentials> {
        let url = format!("{}/oauth/access_token", self.config.api_url);
        let params = vec![("oauth_verifier".to_string(), verifier.to_string())];
        let body = self
            .handshake_post(&url, &params, Some((request_token, request_token_secret)))
            .await?;

        let fields = parse_token_fields(&body);
        let access_token = fields.get("oauth_token").cloned().ok_or_else(|| {
            ApiError::Handshake(format!("response is missing oauth_token: {body}"))
        })?;
        let access_token_secret = fields.get("oauth_token_secret").cloned().ok_or_else(|| {
            ApiError::Handshake(format!("response is missing oauth_token_secret: {body}"))
        })?;

        Ok(Credentials {
            access_token,
            access_token_secret,
        })
    }

    /// POSTs a handshake request with every parameter, oauth fields
    /// included, carried in the URL query string, and returns the raw
    /// url-encoded response body.
    async fn handshake_post(
        &self,
        url: &str,
        params: &[(String, String)],
        token: Option<(&str, &str)>,
    ) -> ApiResult<String> {
        let oauth = signed_query("POST", url, params, &self.config, token);
        let mut query = params.to_vec();
        query.extend(oauth);

        let response = self
            .http
            .post(url)
            .query(&query)
            .header("Accept", "application/x-www-form-urlencoded")
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::Network)?;
        if !status.is_success() {
            return Err(ApiError::Handshake(format!(
                "endpoint answered {status}: {body}"
            )));
        }
        Ok(body)
    }
}

fn parse_token_fields(body: &str) -> HashMap<String, String> {
    serde_urlencoded::from_str(body).unwrap_or_default()
}

/// Runs the complete interactive authorization flow.
///
/// Starts the local callback server, fetches a request token, opens the
/// authorization page in the user's browser, and waits for the callback
/// handler to finish the token exchange. Credentials are persisted on
/// success. The user-grant step happens out-of-band in the browser; this
/// function only observes its result through the shared state.
pub async fn connect(shared_state: Arc<Mutex<AuthState>>) {
    let discogs_config = DiscogsConfig::from_env();
    let client = DiscogsClient::new(discogs_config);

    // start the callback server
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        start_api_server(server_state).await;
    });

    let callback_url = format!("{}/callback/discogs", config::callback_base());
    let request = match client.request_token(&callback_url).await {
        Ok(request) => request,
        Err(e) => error!("Failed to get a Discogs request token: {}", e),
    };

    // Store the pending request token before the user is redirected
    {
        let mut lock = shared_state.lock().await;
        lock.pending_request = Some((request.token.clone(), request.secret.clone()));
    }

    if webbrowser::open(&request.authorize_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            request.authorize_url
        );
    }

    match wait_for_credentials(shared_state).await {
        Some(credentials) => {
            let manager = CredentialsManager::new(credentials.clone());
            if let Err(e) = manager.persist().await {
                error!("Failed to save credentials: {}", e);
            }

            match client.identity(&credentials).await {
                Ok(identity) => success!("Connected to Discogs as {}.", identity.username),
                Err(_) => success!("Connected to Discogs."),
            }
        }
        None => error!("Authorization failed or timed out."),
    }
}

/// Polls the shared state for exchanged credentials, giving the user a
/// minute to complete the grant in the browser.
async fn wait_for_credentials(shared_state: Arc<Mutex<AuthState>>) -> Option<Credentials> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(credentials) = &lock.credentials {
            return Some(credentials.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
