use crate::types::{Credentials, Session};

use super::store::{Store, StoreError};

const AUTH_NAMESPACE: &str = "auth";
const CREDENTIALS_KEY: &str = "discogs-credentials";
const SESSION_KEY: &str = "lastfm-session";

/// Persists the Discogs access-token pair across runs.
pub struct CredentialsManager {
    credentials: Credentials,
}

impl CredentialsManager {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub async fn load() -> Result<Self, StoreError> {
        let content = Store::new(AUTH_NAMESPACE)
            .get(CREDENTIALS_KEY)
            .await?
            .ok_or(StoreError::Missing(CREDENTIALS_KEY))?;
        let credentials: Credentials = serde_json::from_str(&content)?;
        Ok(Self { credentials })
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.credentials)?;
        Store::new(AUTH_NAMESPACE).set(CREDENTIALS_KEY, &json).await
    }

    pub async fn clear() -> Result<(), StoreError> {
        Store::new(AUTH_NAMESPACE).remove(CREDENTIALS_KEY).await
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Persists the Last.fm session key across runs.
pub struct SessionManager {
    session: Session,
}

impl SessionManager {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn load() -> Result<Self, StoreError> {
        let content = Store::new(AUTH_NAMESPACE)
            .get(SESSION_KEY)
            .await?
            .ok_or(StoreError::Missing(SESSION_KEY))?;
        let session: Session = serde_json::from_str(&content)?;
        Ok(Self { session })
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.session)?;
        Store::new(AUTH_NAMESPACE).set(SESSION_KEY, &json).await
    }

    pub async fn clear() -> Result<(), StoreError> {
        Store::new(AUTH_NAMESPACE).remove(SESSION_KEY).await
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
