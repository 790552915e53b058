//! # CLI Module
//!
//! This module provides the command-line interface layer for Scrobcli, a
//! scrobbler that submits plays from a Discogs record collection to Last.fm.
//! It implements all user-facing CLI commands and coordinates between the
//! API clients, data management, and user interaction components.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`auth_discogs`] - Runs the three-legged OAuth 1.0a flow against Discogs
//! - [`auth_lastfm`] - Runs the Last.fm web-auth flow and stores the session
//!
//! ### Collection Operations
//!
//! - [`update_collection`] - Fetches the full collection page by page and
//!   caches it locally
//! - [`list_collection`] - Displays the cached collection with optional
//!   search filtering
//!
//! ### Queue and Scrobble Operations
//!
//! - [`add_release`] - Queues a release's tracklist as pending plays
//! - [`list_queue`] - Shows pending plays in queue order
//! - [`clear_queue`] - Drops all pending plays
//! - [`scrobble`] - Submits the queue to Last.fm in order, in bounded batches
//!
//! ### Information Commands
//!
//! - [`info`] - Connection and cache status
//!
//! ## Architecture Design
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Management Layer (Persistence: credentials, cache, queue)
//!     ↓
//! API Layer (Discogs / Last.fm clients)
//!     ↓
//! Network Layer (signed HTTP requests with bounded retries)
//! ```
//!
//! Each CLI command delegates to the management and client modules while
//! handling user interaction, progress feedback, and error presentation.
//! Errors carry their classification up from the network layer, so the CLI
//! can tell users to reconnect an account, to try again later, or that
//! something unexpected broke.

mod auth;
mod collection;
mod info;
mod queue;
mod scrobble;

pub use auth::auth_discogs;
pub use auth::auth_lastfm;
pub use collection::list_collection;
pub use collection::update_collection;
pub use info::info;
pub use queue::add_release;
pub use queue::clear_queue;
pub use queue::list_queue;
pub use scrobble::scrobble;
