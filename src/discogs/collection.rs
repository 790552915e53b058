use crate::{
    error::ApiResult,
    types::{CollectionPage, Credentials, Identity, ReleaseDetail},
};

use super::DiscogsClient;

/// Query parameters for a collection page fetch.
///
/// The defaults mirror the service's own: newest additions first, fifty
/// releases per page.
#[derive(Debug, Clone)]
pub struct CollectionQuery {
    pub page: u32,
    pub per_page: u32,
    pub sort: String,
    pub sort_order: String,
}

impl Default for CollectionQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 50,
            sort: "added".to_string(),
            sort_order: "desc".to_string(),
        }
    }
}

impl DiscogsClient {
    /// Looks up the identity behind the supplied credentials.
    pub async fn identity(&self, credentials: &Credentials) -> ApiResult<Identity> {
        self.fetch("/oauth/identity", &[], credentials).await
    }

    /// Fetches one page of a user's collection (folder 0, "All").
    pub async fn collection_page(
        &self,
        username: &str,
        query: &CollectionQuery,
        credentials: &Credentials,
    ) -> ApiResult<CollectionPage> {
        let path = format!("/users/{}/collection/folders/0/releases", username);
        let params = vec![
            ("page".to_string(), query.page.to_string()),
            ("per_page".to_string(), query.per_page.to_string()),
            ("sort".to_string(), query.sort.clone()),
            ("sort_order".to_string(), query.sort_order.clone()),
        ];
        self.fetch(&path, &params, credentials).await
    }

    /// Fetches a single release with its tracklist.
    pub async fn release(
        &self,
        release_id: u64,
        credentials: &Credentials,
    ) -> ApiResult<ReleaseDetail> {
        self.fetch(&format!("/releases/{}", release_id), &[], credentials)
            .await
    }
}
