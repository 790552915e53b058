use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{
    config::{DiscogsConfig, LastfmConfig},
    discogs::DiscogsClient,
    lastfm::LastfmClient,
    types::AuthState,
    warning,
};

/// Completes the Discogs handshake when the user returns from the browser.
///
/// The route receives `oauth_token` and `oauth_verifier`; the request-token
/// secret was parked in the shared state before the redirect, so the final
/// exchange can run right here.
pub async fn discogs_callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<AuthState>>>,
) -> Html<&'static str> {
    let Some(verifier) = params.get("oauth_verifier") else {
        return Html("<h4>Missing OAuth verifier.</h4>");
    };

    let mut state = shared_state.lock().await;
    let Some((token, secret)) = state.pending_request.clone() else {
        return Html("<h4>No authorization in progress.</h4>");
    };

    let client = DiscogsClient::new(DiscogsConfig::from_env());
    match client.access_token(&token, &secret, verifier).await {
        Ok(credentials) => {
            state.credentials = Some(credentials);
            Html("<h2>Discogs connected.</h2><p>Close this browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}

/// Turns the Last.fm callback token into a session key.
pub async fn lastfm_callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<AuthState>>>,
) -> Html<&'static str> {
    let Some(token) = params.get("token") else {
        return Html("<h4>Missing authentication token.</h4>");
    };

    let client = LastfmClient::new(LastfmConfig::from_env());
    match client.session(token).await {
        Ok(session) => {
            let mut state = shared_state.lock().await;
            state.session = Some(session);
            Html("<h2>Last.fm connected.</h2><p>Close this browser window.</p>")
        }
        Err(e) => {
            warning!("Session exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
