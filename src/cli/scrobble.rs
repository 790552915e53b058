use crate::{
    config::LastfmConfig,
    error,
    error::ApiError,
    info,
    lastfm::{LastfmClient, MAX_TRACKS_PER_REQUEST},
    management::{QueueManager, SessionManager},
    success,
    types::ScrobbleTrack,
    warning,
};

/// Submits the pending queue to Last.fm.
///
/// The queue is drained in order, at most fifty tracks per request. On a
/// failure the unsent remainder is written back, so a later run picks up
/// exactly where this one stopped.
pub async fn scrobble() {
    let session_mgr = match SessionManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            error!(
                "Failed to load Last.fm session. Please run scrobcli auth lastfm\n Error: {}",
                e
            );
        }
    };
    let session_key = session_mgr.session().key.clone();

    let mut queue = match QueueManager::load().await {
        Ok(queue) => queue,
        Err(e) => error!("Failed to load queue. Err: {}", e),
    };
    if queue.count() == 0 {
        info!("Queue is empty; nothing to scrobble.");
        return;
    }

    let client = LastfmClient::new(LastfmConfig::from_env());
    let tracks = queue.tracks().to_vec();

    let mut accepted = 0u64;
    let mut ignored = 0u64;
    let mut submitted = 0usize;

    for chunk in tracks.chunks(MAX_TRACKS_PER_REQUEST) {
        match client.scrobble(chunk, &session_key).await {
            Ok(outcome) => {
                accepted += outcome.accepted;
                ignored += outcome.ignored;
                submitted += chunk.len();
            }
            Err(err) => {
                // keep the unsent remainder queued for the next run
                let remaining: Vec<ScrobbleTrack> = tracks[submitted..].to_vec();
                let kept = remaining.len();
                let remainder = QueueManager::new(remaining);
                if let Err(e) = remainder.persist().await {
                    warning!("Failed to persist remaining queue: {}", e);
                }

                match err {
                    ApiError::Auth | ApiError::Remote { code: 9, .. } => {
                        error!(
                            "Last.fm rejected the session. Reconnect with scrobcli auth lastfm."
                        );
                    }
                    ApiError::RateLimit | ApiError::Server { .. } | ApiError::Network(_) => {
                        error!(
                            "Last.fm is unavailable right now; {} tracks stay queued. Try again later.",
                            kept
                        );
                    }
                    other => error!("Scrobbling failed: {}", other),
                }
            }
        }
    }

    if let Err(e) = queue.clear().await {
        warning!("Failed to clear queue: {}", e);
    }
    success!("Scrobbled {} tracks ({} ignored).", accepted, ignored);
}
