use reqwest::Method;
use serde_json::Value;

use crate::{
    error::ApiResult,
    types::{ScrobbleOutcome, ScrobbleTrack},
};

use super::LastfmClient;

/// Upstream cap on tracks per `track.scrobble` call.
pub const MAX_TRACKS_PER_REQUEST: usize = 50;

/// Index-encoded wire parameters for one batch.
///
/// Array position is encoded in the parameter name itself (`artist[0]`,
/// `track[0]`, ...), so the caller's ordering is exactly what reaches the
/// wire. `album[i]` is only present for tracks that carry an album.
pub fn batch_params(tracks: &[ScrobbleTrack]) -> Vec<(String, String)> {
    let mut params = Vec::new();
    for (index, track) in tracks.iter().enumerate() {
        params.push((format!("artist[{index}]"), track.artist.clone()));
        params.push((format!("track[{index}]"), track.track.clone()));
        if let Some(album) = &track.album {
            params.push((format!("album[{index}]"), album.clone()));
        }
        params.push((format!("timestamp[{index}]"), track.timestamp.to_string()));
    }
    params
}

impl LastfmClient {
    /// Submits one batch of plays under the given session key.
    ///
    /// Callers must keep batches at or under [`MAX_TRACKS_PER_REQUEST`]
    /// tracks and must not reorder them; timestamps and positions are
    /// matched up index by index on the remote end.
    pub async fn scrobble(
        &self,
        tracks: &[ScrobbleTrack],
        session_key: &str,
    ) -> ApiResult<ScrobbleOutcome> {
        let mut params = vec![
            ("method".to_string(), "track.scrobble".to_string()),
            ("api_key".to_string(), self.config.api_key.clone()),
            ("sk".to_string(), session_key.to_string()),
        ];
        params.extend(batch_params(tracks));

        let value = self.call(&params, true, Method::POST).await?;
        Ok(parse_outcome(&value))
    }
}

fn parse_outcome(value: &Value) -> ScrobbleOutcome {
    let attr = value.get("scrobbles").and_then(|s| s.get("@attr"));
    ScrobbleOutcome {
        accepted: attr
            .and_then(|a| a.get("accepted"))
            .and_then(Value::as_u64)
            .unwrap_or(0),
        ignored: attr
            .and_then(|a| a.get("ignored"))
            .and_then(Value::as_u64)
            .unwrap_or(0),
    }
}
