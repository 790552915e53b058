use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub access_token_secret: String,
}

/// Shared state between an interactive auth flow and the callback server.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    /// Request token and secret awaiting the user's grant.
    pub pending_request: Option<(String, String)>,
    pub credentials: Option<Credentials>,
    pub session: Option<Session>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: u64,
    pub username: String,
    pub resource_url: String,
    pub consumer_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub items: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionPage {
    pub pagination: Pagination,
    pub releases: Vec<CollectionRelease>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRelease {
    pub id: u64,
    pub instance_id: Option<u64>,
    pub date_added: Option<String>,
    pub basic_information: BasicInformation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicInformation {
    pub id: u64,
    pub title: String,
    pub year: Option<u32>,
    #[serde(default)]
    pub artists: Vec<ReleaseArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseArtist {
    pub id: Option<u64>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseDetail {
    pub id: u64,
    pub title: String,
    pub year: Option<u32>,
    #[serde(default)]
    pub artists: Vec<ReleaseArtist>,
    #[serde(default)]
    pub tracklist: Vec<TrackEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackEntry {
    #[serde(default)]
    pub position: String,
    pub title: String,
    #[serde(default)]
    pub duration: String,
    /// Discogs marks headings and index entries here; plain tracks say "track".
    #[serde(default)]
    pub type_: Option<String>,
}

/// One pending play. Batches are ordered; the wire format indexes entries
/// positionally, so this order is what reaches the remote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrobbleTrack {
    pub artist: String,
    pub track: String,
    pub album: Option<String>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub key: String,
    pub subscriber: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub session: Session,
}

/// Accepted/ignored counts reported by a scrobble submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrobbleOutcome {
    pub accepted: u64,
    pub ignored: u64,
}

#[derive(Tabled)]
pub struct CollectionTableRow {
    pub added: String,
    pub artists: String,
    pub title: String,
    pub year: String,
}

#[derive(Tabled)]
pub struct QueueTableRow {
    pub position: String,
    pub artist: String,
    pub track: String,
    pub album: String,
}
