mod auth;
mod collection;
mod queue;
mod store;

pub use auth::CredentialsManager;
pub use auth::SessionManager;
pub use collection::CollectionManager;
pub use queue::QueueManager;
pub use store::Store;
pub use store::StoreError;
