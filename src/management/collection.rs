use crate::types::CollectionRelease;

use super::store::{Store, StoreError};

const CACHE_NAMESPACE: &str = "cache";
const COLLECTION_KEY: &str = "collection";

/// Local snapshot of the user's collection for offline listing.
pub struct CollectionManager {
    releases: Vec<CollectionRelease>,
}

impl CollectionManager {
    pub fn new(releases: Vec<CollectionRelease>) -> Self {
        Self { releases }
    }

    pub async fn load() -> Result<Self, StoreError> {
        let content = Store::new(CACHE_NAMESPACE)
            .get(COLLECTION_KEY)
            .await?
            .ok_or(StoreError::Missing(COLLECTION_KEY))?;
        let releases: Vec<CollectionRelease> = serde_json::from_str(&content)?;
        Ok(Self { releases })
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.releases)?;
        Store::new(CACHE_NAMESPACE).set(COLLECTION_KEY, &json).await
    }

    pub fn releases(&self) -> &[CollectionRelease] {
        &self.releases
    }

    pub fn count(&self) -> usize {
        self.releases.len()
    }
}
