use chrono::Utc;
use tabled::Table;

use crate::{
    config::DiscogsConfig,
    discogs::DiscogsClient,
    error, info,
    management::{CredentialsManager, QueueManager},
    success,
    types::{QueueTableRow, ReleaseDetail, ScrobbleTrack},
    utils, warning,
};

/// Fallback for tracklist entries without a printed duration.
const DEFAULT_TRACK_SECONDS: u32 = 180;

/// Fetches a release's tracklist and appends it to the scrobble queue.
pub async fn add_release(release_id: u64) {
    let credentials_mgr = match CredentialsManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            error!(
                "Failed to load credentials. Please run scrobcli auth discogs\n Error: {}",
                e
            );
        }
    };
    let credentials = credentials_mgr.credentials();

    let client = DiscogsClient::new(DiscogsConfig::from_env());
    let release = match client.release(release_id, credentials).await {
        Ok(release) => release,
        Err(e) => error!("Failed to fetch release {}: {}", release_id, e),
    };

    let plays = plays_for_release(&release);
    if plays.is_empty() {
        warning!("Release {} has no tracklist to queue.", release.title);
        return;
    }

    let mut queue = match QueueManager::load().await {
        Ok(queue) => queue,
        Err(e) => error!("Failed to load queue. Err: {}", e),
    };
    let queued = plays.len();
    queue.extend(plays);
    if let Err(e) = queue.persist().await {
        error!("Failed to persist queue. Err: {}", e);
    }

    success!("Queued {} tracks from {}.", queued, release.title);
}

/// One play per tracklist entry, timestamped as if the record just finished:
/// the last track ends now, earlier tracks are offset by the durations that
/// follow them. Headings and index entries are skipped.
fn plays_for_release(release: &ReleaseDetail) -> Vec<ScrobbleTrack> {
    let artist = release
        .artists
        .first()
        .map(|artist| artist.name.clone())
        .unwrap_or_else(|| "Unknown Artist".to_string());

    let tracks: Vec<_> = release
        .tracklist
        .iter()
        .filter(|entry| entry.type_.as_deref().is_none_or(|kind| kind == "track"))
        .collect();

    let durations: Vec<i64> = tracks
        .iter()
        .map(|entry| {
            utils::parse_track_duration(&entry.duration).unwrap_or(DEFAULT_TRACK_SECONDS) as i64
        })
        .collect();
    let total: i64 = durations.iter().sum();

    let mut start = Utc::now().timestamp() - total;
    tracks
        .iter()
        .zip(durations)
        .map(|(entry, duration)| {
            let play = ScrobbleTrack {
                artist: artist.clone(),
                track: entry.title.clone(),
                album: Some(release.title.clone()),
                timestamp: start,
            };
            start += duration;
            play
        })
        .collect()
}

/// Shows the pending queue in submission order.
pub async fn list_queue() {
    let queue = match QueueManager::load().await {
        Ok(queue) => queue,
        Err(e) => error!("Failed to load queue. Err: {}", e),
    };

    if queue.count() == 0 {
        info!("Queue is empty.");
        return;
    }

    let table_rows: Vec<QueueTableRow> = queue
        .tracks()
        .iter()
        .enumerate()
        .map(|(index, track)| QueueTableRow {
            position: (index + 1).to_string(),
            artist: track.artist.clone(),
            track: track.track.clone(),
            album: track.album.clone().unwrap_or_default(),
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}

/// Drops every pending play.
pub async fn clear_queue() {
    let mut queue = match QueueManager::load().await {
        Ok(queue) => queue,
        Err(e) => error!("Failed to load queue. Err: {}", e),
    };

    let dropped = queue.count();
    if let Err(e) = queue.clear().await {
        error!("Failed to clear queue. Err: {}", e);
    }
    success!("Cleared {} queued tracks.", dropped);
}
