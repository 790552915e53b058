use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use scrobcli::{cli, config, error, types::AuthState};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Connect a Discogs or Last.fm account
    Auth(AuthOptions),

    /// Browse or refresh the local collection cache
    Collection(CollectionOptions),

    /// Manage the scrobble queue
    Queue(QueueOptions),

    /// Submit queued plays to Last.fm
    Scrobble,

    /// Connection and cache status
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Which account to connect
    #[command(subcommand)]
    pub service: AuthService,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AuthService {
    /// Authorize with Discogs (OAuth 1.0a)
    Discogs,
    /// Authorize with Last.fm
    Lastfm,
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Browse or refresh the local collection cache",
    args_conflicts_with_subcommands = true // disallow mixing --search with subcommands
)]
pub struct CollectionOptions {
    /// Filter by artist or title
    #[clap(long)]
    pub search: Option<String>,

    /// Subcommands under `collection` (e.g., `update`)
    #[command(subcommand)]
    pub command: Option<CollectionSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CollectionSubcommand {
    /// Fetch the full collection from Discogs and cache it
    Update,
}

#[derive(Parser, Debug, Clone)]
pub struct QueueOptions {
    #[command(subcommand)]
    pub command: QueueSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum QueueSubcommand {
    /// Queue a release's tracklist as pending plays
    Add(QueueAddOpts),
    /// Show pending plays
    List,
    /// Drop all pending plays
    Clear,
}

#[derive(Parser, Debug, Clone)]
pub struct QueueAddOpts {
    /// Discogs release id
    pub release: u64,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth(opt) => {
            let auth_state: Arc<Mutex<AuthState>> = Arc::new(Mutex::new(AuthState::default()));
            match opt.service {
                AuthService::Discogs => cli::auth_discogs(Arc::clone(&auth_state)).await,
                AuthService::Lastfm => cli::auth_lastfm(Arc::clone(&auth_state)).await,
            }
        }
        Command::Collection(opt) => match opt.command {
            Some(CollectionSubcommand::Update) => cli::update_collection().await,
            None => cli::list_collection(opt.search).await,
        },
        Command::Queue(opt) => match opt.command {
            QueueSubcommand::Add(a) => cli::add_release(a.release).await,
            QueueSubcommand::List => cli::list_queue().await,
            QueueSubcommand::Clear => cli::clear_queue().await,
        },
        Command::Scrobble => cli::scrobble().await,
        Command::Info => cli::info().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
