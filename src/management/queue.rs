use crate::types::ScrobbleTrack;

use super::store::{Store, StoreError};

const QUEUE_NAMESPACE: &str = "queue";
const PENDING_KEY: &str = "pending";

/// Ordered, persisted queue of plays awaiting submission.
///
/// Order matters: submission encodes positions into the wire format, so the
/// queue never reorders what was added.
pub struct QueueManager {
    tracks: Vec<ScrobbleTrack>,
}

impl QueueManager {
    pub fn new(tracks: Vec<ScrobbleTrack>) -> Self {
        Self { tracks }
    }

    /// Loads the pending queue; an absent queue is simply empty.
    pub async fn load() -> Result<Self, StoreError> {
        let tracks = match Store::new(QUEUE_NAMESPACE).get(PENDING_KEY).await? {
            Some(content) => serde_json::from_str(&content)?,
            None => Vec::new(),
        };
        Ok(Self { tracks })
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.tracks)?;
        Store::new(QUEUE_NAMESPACE).set(PENDING_KEY, &json).await
    }

    pub fn add(&mut self, track: ScrobbleTrack) -> &mut Self {
        self.tracks.push(track);
        self
    }

    pub fn extend(&mut self, tracks: Vec<ScrobbleTrack>) -> &mut Self {
        self.tracks.extend(tracks);
        self
    }

    pub fn tracks(&self) -> &[ScrobbleTrack] {
        &self.tracks
    }

    pub fn count(&self) -> usize {
        self.tracks.len()
    }

    pub async fn clear(&mut self) -> Result<(), StoreError> {
        self.tracks.clear();
        Store::new(QUEUE_NAMESPACE).remove(PENDING_KEY).await
    }
}
