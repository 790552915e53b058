use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Classified failure of a remote API call.
///
/// The fetch layer retries `RateLimit`, `Server`, and `Network` with backoff
/// before surfacing them; every other variant is fatal for the call and
/// propagates immediately. Call sites match exhaustively so the CLI can tell
/// "reconnect your account" apart from "try again later".
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service rejected the credentials (HTTP 401). Never retried.
    #[error("authentication rejected; reconnect your account")]
    Auth,
    /// Rate limited (HTTP 429) on every attempt.
    #[error("rate limit exceeded after retries")]
    RateLimit,
    /// Server-side failure (HTTP 5xx) on every attempt.
    #[error("server error {status} after retries")]
    Server { status: u16 },
    /// Transport-level failure (connect, timeout, TLS) on every attempt.
    #[error("network error: {0}")]
    Network(reqwest::Error),
    /// The response had an unexpected status or a body that does not parse.
    #[error("unexpected response (status {status}): {message}")]
    Protocol { status: u16, message: String },
    /// An OAuth handshake step failed or returned an incomplete token set.
    #[error("OAuth handshake failed: {0}")]
    Handshake(String),
    /// Last.fm reported an error inside a 200-status JSON body.
    #[error("Last.fm error {code}: {message}")]
    Remote { code: i64, message: String },
}
