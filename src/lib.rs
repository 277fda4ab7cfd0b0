pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
use db::Store;
use models::book::Book;
use state::SharedState;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    init_tracing(&config.general.log_level);

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::List => cmd_list_books(&config).await,
        Commands::Show { id } => cmd_show_book(&config, id).await,
        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("Bookshelf v{} starting...", env!("CARGO_PKG_VERSION"));

    if !config.server.enabled {
        info!("Web server disabled in config, nothing to do");
        return Ok(());
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let shared = Arc::new(SharedState::new(config).await?);
    let state = api::create_app_state(shared);
    let app = api::router(state).await;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🌐 Web Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

async fn cmd_list_books(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let books = store.list_books().await?;

    if books.is_empty() {
        println!("No books in the catalog.");
        println!("Start the server with 'bookshelf serve' and add one.");
        return Ok(());
    }

    println!("{:<5} {:<40} {:<25} {:>6} {:>10}", "ID", "Title", "Author", "Year", "Price");
    println!("{:-<90}", "");

    for book in &books {
        println!(
            "{:<5} {:<40} {:<25} {:>6} {:>10}",
            book.id,
            truncate(&book.title, 40),
            truncate(&book.author, 25),
            book.published_year,
            format_final_price(book)
        );
    }

    println!();
    println!("{} book(s)", books.len());
    Ok(())
}

async fn cmd_show_book(config: &Config, id: i32) -> anyhow::Result<()> {
    let store = open_store(config).await?;

    let Some(book) = store.get_book(id).await? else {
        println!("Book {} not found", id);
        println!("Use 'bookshelf list' to see IDs");
        return Ok(());
    };

    print_book(&book);
    Ok(())
}

async fn open_store(config: &Config) -> anyhow::Result<Store> {
    Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
}

fn print_book(book: &Book) {
    println!("{}", book.title);
    println!("{:-<60}", "");
    println!("  ID:          {}", book.id);
    println!("  Author:      {}", book.author);
    println!("  Genre:       {}", book.genre);
    println!("  Published:   {}", book.published_year);
    println!("  Price:       {:.2}", book.price);
    println!("  Discount:    {}%", book.discount_percentage);
    println!("  Final price: {}", format_final_price(book));
    println!(
        "  Cover:       {}",
        book.image_url.as_deref().unwrap_or("(none)")
    );
}

fn format_final_price(book: &Book) -> String {
    book.final_price()
        .map_or_else(|| "n/a".to_string(), |price| format!("{price:.2}"))
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
