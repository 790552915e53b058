//! Configuration management for the scrobbler CLI.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Application credentials for the
//! two API surfaces are collected into config structs at startup and passed
//! explicitly into the clients; nothing reads credentials from module scope
//! at request time.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (endpoint URLs, server address)

use dotenv;
use std::{env, path::PathBuf};

/// User agent sent on every outbound request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const DEFAULT_DISCOGS_API_URL: &str = "https://api.discogs.com";
const DEFAULT_DISCOGS_AUTHORIZE_URL: &str = "https://www.discogs.com/oauth/authorize";
const DEFAULT_LASTFM_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";
const DEFAULT_LASTFM_AUTH_URL: &str = "https://www.last.fm/api/auth/";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8807";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `scrobcli/.env`. This allows users to store
/// configuration securely without hardcoding sensitive values.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/scrobcli/.env`
/// - macOS: `~/Library/Application Support/scrobcli/.env`
/// - Windows: `%LOCALAPPDATA%/scrobcli/.env`
///
/// # Returns
///
/// Returns `Ok(())` if the environment file is successfully loaded or does
/// not exist (variables may come from the process environment instead), or
/// an error string if directory creation or file parsing fails.
///
/// # Example
///
/// ```
/// use scrobcli::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("scrobcli/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Discogs application credentials and endpoints.
///
/// Built once at startup via [`DiscogsConfig::from_env`] and handed to
/// [`crate::discogs::DiscogsClient`]; the endpoint fields default to the
/// public API and are overridable for testing.
#[derive(Debug, Clone)]
pub struct DiscogsConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub api_url: String,
    pub authorize_url: String,
}

impl DiscogsConfig {
    /// Reads the Discogs configuration from the environment.
    ///
    /// # Panics
    ///
    /// Panics if `DISCOGS_CONSUMER_KEY` or `DISCOGS_CONSUMER_SECRET` is not
    /// set. These are obtained by registering an application with Discogs.
    pub fn from_env() -> Self {
        DiscogsConfig {
            consumer_key: env::var("DISCOGS_CONSUMER_KEY")
                .expect("DISCOGS_CONSUMER_KEY must be set"),
            consumer_secret: env::var("DISCOGS_CONSUMER_SECRET")
                .expect("DISCOGS_CONSUMER_SECRET must be set"),
            api_url: env::var("DISCOGS_API_URL")
                .unwrap_or_else(|_| DEFAULT_DISCOGS_API_URL.to_string()),
            authorize_url: env::var("DISCOGS_AUTHORIZE_URL")
                .unwrap_or_else(|_| DEFAULT_DISCOGS_AUTHORIZE_URL.to_string()),
        }
    }
}

/// Last.fm API account credentials and endpoints.
///
/// Built once at startup via [`LastfmConfig::from_env`] and handed to
/// [`crate::lastfm::LastfmClient`].
#[derive(Debug, Clone)]
pub struct LastfmConfig {
    pub api_key: String,
    pub api_secret: String,
    pub api_url: String,
    pub auth_url: String,
}

impl LastfmConfig {
    /// Reads the Last.fm configuration from the environment.
    ///
    /// # Panics
    ///
    /// Panics if `LASTFM_API_KEY` or `LASTFM_API_SECRET` is not set. These
    /// are obtained by creating a Last.fm API account.
    pub fn from_env() -> Self {
        LastfmConfig {
            api_key: env::var("LASTFM_API_KEY").expect("LASTFM_API_KEY must be set"),
            api_secret: env::var("LASTFM_API_SECRET").expect("LASTFM_API_SECRET must be set"),
            api_url: env::var("LASTFM_API_URL")
                .unwrap_or_else(|_| DEFAULT_LASTFM_API_URL.to_string()),
            auth_url: env::var("LASTFM_AUTH_URL")
                .unwrap_or_else(|_| DEFAULT_LASTFM_AUTH_URL.to_string()),
        }
    }
}

/// Returns the bind address for the local auth-callback server.
///
/// Reads `SERVER_ADDRESS`, falling back to `127.0.0.1:8807`.
///
/// # Example
///
/// ```
/// let addr = server_addr(); // e.g., "127.0.0.1:8807"
/// ```
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Returns the externally visible base URL of the callback server.
///
/// Reads `CALLBACK_BASE_URL`, falling back to `http://` plus the bind
/// address. The per-service callback routes are appended to this base when
/// the auth flows construct their redirect URLs.
pub fn callback_base() -> String {
    env::var("CALLBACK_BASE_URL").unwrap_or_else(|_| format!("http://{}", server_addr()))
}
