//! Headless command-line driver.
//!
//! Each subcommand drives one controller the way a screen would, waits for
//! its published state to settle, and prints it.
//!
//! ```text
//! bookexplorer list --pages 2
//! bookexplorer search "dune"
//! bookexplorer detail OL45804W
//! bookexplorer toggle OL45804W
//! bookexplorer favorites
//! bookexplorer --config bookexplorer.toml --set page_size=5 list
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use bookexplorer::domain::CoverSize;
use bookexplorer::observability::init_tracing;
use bookexplorer::{initialize, BookExplorer, BookSummary, Config, Result};

#[derive(Parser)]
#[command(name = "bookexplorer", version, about = "Browse the Open Library catalog")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override a configuration key (repeatable).
    #[arg(long = "set", global = true, value_name = "KEY=VALUE", value_parser = parse_key_val)]
    overrides: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List fiction, page by page.
    List {
        /// Number of pages to load.
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Search the catalog through the debounced search path.
    Search {
        query: String,

        /// Number of pages to load.
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Show one work and its authors.
    Detail {
        /// Work key, bare (`OL45804W`) or prefixed (`/works/OL45804W`).
        key: String,
    },

    /// Show resolved favorites.
    Favorites,

    /// Add or remove a favorite.
    Toggle {
        key: String,
    },
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    Ok((key.trim().to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let overrides: BTreeMap<String, String> = cli.overrides.into_iter().collect();
    config.apply_overrides(&overrides);

    init_tracing(&config);
    let explorer = initialize(&config)?;

    match cli.command {
        Commands::List { pages } => list(&explorer, pages).await,
        Commands::Search { query, pages } => search(&explorer, &query, pages).await,
        Commands::Detail { key } => detail(&explorer, &key).await,
        Commands::Favorites => favorites(&explorer).await,
        Commands::Toggle { key } => {
            let now_favorite = explorer.favorites_store().toggle(&key).await?;
            println!("{key}: {}", if now_favorite { "added to favorites" } else { "removed from favorites" });
            Ok(())
        }
    }
}

async fn list(explorer: &BookExplorer, pages: u32) -> Result<()> {
    let listing = explorer.listing();
    listing.load_first_page().await;
    for _ in 1..pages {
        listing.load_more_books().await;
    }

    let state = listing.state();
    print_books(explorer, &state.books);
    println!("-- page {}, more available: {}", state.page.current_page, state.page.can_load_more);
    print_error(state.error.as_deref());
    Ok(())
}

async fn search(explorer: &BookExplorer, query: &str, pages: u32) -> Result<()> {
    let listing = explorer.listing();
    let mut rx = listing.subscribe();

    listing.on_search_query_change(query).await;
    let _ = rx.wait_for(|s| !s.is_searching && !s.loading).await;
    for _ in 1..pages {
        listing.load_more_books().await;
    }

    let state = listing.state();
    if state.books.is_empty() && state.error.is_none() {
        println!("no results for \"{query}\"");
    }
    print_books(explorer, &state.books);
    print_error(state.error.as_deref());
    Ok(())
}

async fn detail(explorer: &BookExplorer, key: &str) -> Result<()> {
    let detail = explorer.detail();
    detail.load_book_detail(key).await;

    let state = detail.state();
    if let Some(book) = &state.book {
        println!("{}", book.title);
        let names: Vec<&str> = state.authors.iter().map(|a| a.name.as_str()).collect();
        if !names.is_empty() {
            println!("by {}", names.join(", "));
        }
        if let Some(date) = &book.publish_date {
            println!("first published {date}");
        }
        if let Some(url) = explorer.cover_url(book.primary_cover(), CoverSize::Large) {
            println!("cover {url}");
        }
        if let Some(description) = &book.description {
            println!("\n{description}");
        }
    }
    print_error(state.error.as_deref());
    Ok(())
}

async fn favorites(explorer: &BookExplorer) -> Result<()> {
    let favorites = explorer.favorites();
    let mut rx = favorites.subscribe();

    favorites.load_favorite_books();
    let _ = rx.wait_for(|s| s.resolved > 0).await;

    let state = favorites.state();
    if state.books.is_empty() && state.error.is_none() {
        println!("no favorites yet");
    }
    print_books(explorer, &state.books);
    print_error(state.error.as_deref());
    Ok(())
}

fn print_books(explorer: &BookExplorer, books: &[BookSummary]) {
    for (i, book) in books.iter().enumerate() {
        println!("{:>3}. {} ({})", i + 1, book.title, book.key);
        println!("     {}", book.author_line());
        if let Some(url) = explorer.cover_url(book.cover_id, CoverSize::Medium) {
            println!("     {url}");
        }
    }
}

fn print_error(error: Option<&str>) {
    if let Some(error) = error {
        eprintln!("error: {error}");
    }
}
