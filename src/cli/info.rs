use crate::{
    info,
    management::{CollectionManager, CredentialsManager, QueueManager, SessionManager},
    warning,
};

/// Prints connection and cache status.
pub async fn info() {
    match CredentialsManager::load().await {
        Ok(_) => info!("Discogs: connected"),
        Err(_) => warning!("Discogs: not connected. Run scrobcli auth discogs."),
    }

    match SessionManager::load().await {
        Ok(manager) => info!("Last.fm: connected as {}", manager.session().name),
        Err(_) => warning!("Last.fm: not connected. Run scrobcli auth lastfm."),
    }

    match CollectionManager::load().await {
        Ok(manager) => info!("Collection cache: {} releases", manager.count()),
        Err(_) => info!("Collection cache: empty. Run scrobcli collection update."),
    }

    match QueueManager::load().await {
        Ok(queue) => info!("Scrobble queue: {} tracks pending", queue.count()),
        Err(_) => info!("Scrobble queue: empty"),
    }
}
