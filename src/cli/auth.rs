use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{discogs, lastfm, types::AuthState};

pub async fn auth_discogs(shared_state: Arc<Mutex<AuthState>>) {
    discogs::oauth::connect(shared_state).await;
}

pub async fn auth_lastfm(shared_state: Arc<Mutex<AuthState>>) {
    lastfm::auth::connect(shared_state).await;
}
