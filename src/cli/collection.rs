use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::DiscogsConfig,
    discogs::{CollectionQuery, DiscogsClient},
    error,
    management::{CollectionManager, CredentialsManager},
    success,
    types::{CollectionRelease, CollectionTableRow},
    warning,
};

/// Fetches the complete collection from Discogs and caches it locally.
///
/// Pages are fetched sequentially; each page's pagination block drives the
/// loop, so the cache ends up with every release the remote reports.
pub async fn update_collection() {
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
    let identity = match client.identity(credentials).await {
        Ok(identity) => identity,
        Err(e) => error!("Failed to look up Discogs identity: {}", e),
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching collection...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let mut releases: Vec<CollectionRelease> = Vec::new();
    let mut query = CollectionQuery::default();

    loop {
        let page = match client
            .collection_page(&identity.username, &query, credentials)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                pb.finish_and_clear();
                error!("Failed to fetch collection page {}: {}", query.page, e);
            }
        };

        releases.extend(page.releases);
        pb.set_message(format!(
            "Fetched {}/{} releases...",
            releases.len(),
            page.pagination.items
        ));

        if query.page >= page.pagination.pages {
            break;
        }
        query.page += 1;
    }

    pb.finish_and_clear();

    let collection_mgr = CollectionManager::new(releases);
    if let Err(e) = collection_mgr.persist().await {
        error!("Failed to cache collection. Err: {}", e);
    }
    success!("Cached {} releases!", collection_mgr.count());
}

/// Lists the cached collection, optionally filtered by artist or title.
pub async fn list_collection(search: Option<String>) {
    match CollectionManager::load().await {
        Ok(manager) => {
            let mut releases = manager.releases().to_vec();

            if let Some(term) = search {
                let term = term.to_lowercase();
                releases.retain(|release| {
                    release
                        .basic_information
                        .title
                        .to_lowercase()
                        .contains(&term)
                        || release
                            .basic_information
                            .artists
                            .iter()
                            .any(|artist| artist.name.to_lowercase().contains(&term))
                });
            }

            let table_rows: Vec<CollectionTableRow> = releases
                .into_iter()
                .map(|release| {
                    let artists = release
                        .basic_information
                        .artists
                        .iter()
                        .map(|artist| artist.name.clone())
                        .collect::<Vec<_>>()
                        .join(", ");
                    CollectionTableRow {
                        added: release
                            .date_added
                            .map(|added| added.chars().take(10).collect())
                            .unwrap_or_default(),
                        artists,
                        title: release.basic_information.title,
                        year: release
                            .basic_information
                            .year
                            .map(|year| year.to_string())
                            .unwrap_or_default(),
                    }
                })
                .collect();

            let table = Table::new(table_rows);
            println!("{}", table);
        }
        Err(e) => warning!(
            "Failed to load collection. Run scrobcli collection update. Err: {}",
            e
        ),
    }
}
