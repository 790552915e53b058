use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::{Rng, distr::Alphanumeric};
use sha1::Sha1;

/// RFC 3986 escape set: everything outside ALPHA / DIGIT / `-` / `.` / `_`
/// / `~` is encoded, including `!`, `'`, `(`, `)`, `*`, which default URL
/// encoders leave alone.
const RFC3986_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

type HmacSha1 = Hmac<Sha1>;

pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, RFC3986_ENCODE_SET).to_string()
}

pub fn hmac_sha1_base64(message: &str, key: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC-SHA1 accepts keys of any length");
    mac.update(message.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

pub fn md5_hex(message: &str) -> String {
    Md5::digest(message.as_bytes())
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Millisecond timestamp plus a random alphanumeric tail. Single-use per
/// request; a reused nonce may be rejected upstream as a replay.
pub fn generate_nonce() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    format!("{}{}", Utc::now().timestamp_millis(), suffix)
}

/// Parses a Discogs `m:ss` (or `h:mm:ss`) track duration into seconds.
/// Empty or malformed durations yield `None`.
pub fn parse_track_duration(duration: &str) -> Option<u32> {
    let trimmed = duration.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut seconds: u32 = 0;
    for part in trimmed.split(':') {
        seconds = seconds
            .checked_mul(60)?
            .checked_add(part.parse::<u32>().ok()?)?;
    }
    Some(seconds)
}
