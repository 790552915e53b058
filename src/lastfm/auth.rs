use std::{sync::Arc, time::Duration};

use reqwest::Method;
use tokio::sync::Mutex;

use crate::{
    config::{self, LastfmConfig},
    error,
    error::{ApiError, ApiResult},
    management::SessionManager,
    server::start_api_server,
    success,
    types::{AuthState, Session, SessionResponse},
    warning,
};

use super::LastfmClient;

impl LastfmClient {
    /// URL the user must visit to grant access; `cb` routes the
    /// authentication token back to the local callback server.
    pub fn auth_url(&self, callback_url: &str) -> String {
        format!(
            "{}?api_key={}&cb={}",
            self.config.auth_url, self.config.api_key, callback_url
        )
    }

    /// Exchanges a browser-issued authentication token for a session key.
    pub async fn session(&self, token: &str) -> ApiResult<Session> {
        let params = vec![
            ("method".to_string(), "auth.getsession".to_string()),
            ("api_key".to_string(), self.config.api_key.clone()),
            ("token".to_string(), token.to_string()),
        ];
        let value = self.call(&params, true, Method::GET).await?;
        serde_json::from_value::<SessionResponse>(value)
            .map(|response| response.session)
            .map_err(|e| ApiError::Protocol {
                status: 200,
                message: e.to_string(),
            })
    }
}

/// Runs the interactive Last.fm authorization flow.
///
/// Starts the local callback server, opens the grant page in the user's
/// browser, and waits for the callback handler to turn the returned token
/// into a session. The session key is persisted on success.
pub async fn connect(shared_state: Arc<Mutex<AuthState>>) {
    let lastfm_config = LastfmConfig::from_env();
    let client = LastfmClient::new(lastfm_config);

    // start the callback server
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        start_api_server(server_state).await;
    });

    let callback_url = format!("{}/callback/lastfm", config::callback_base());
    let auth_url = client.auth_url(&callback_url);

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        );
    }

    match wait_for_session(shared_state).await {
        Some(session) => {
            let manager = SessionManager::new(session.clone());
            if let Err(e) = manager.persist().await {
                error!("Failed to save session: {}", e);
            }

            success!("Connected to Last.fm as {}.", session.name);
        }
        None => error!("Authorization failed or timed out."),
    }
}

/// Polls the shared state for a session, giving the user a minute to
/// complete the grant in the browser.
async fn wait_for_session(shared_state: Arc<Mutex<AuthState>>) -> Option<Session> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(session) = &lock.session {
            return Some(session.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
