use crate::models::book::{Book, BookDraft};
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::book::BookRepository;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
        let in_memory = path_str.starts_with(":memory:") || path_str.contains("mode=memory");

        if !in_memory {
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn book_repo(&self) -> BookRepository {
        BookRepository::new(self.conn.clone())
    }

    pub async fn list_books(&self) -> Result<Vec<Book>> {
        self.book_repo().list_all().await
    }

    pub async fn get_book(&self, id: i32) -> Result<Option<Book>> {
        self.book_repo().get(id).await
    }

    pub async fn add_book(&self, draft: &BookDraft) -> Result<Book> {
        self.book_repo().add(draft).await
    }

    pub async fn upsert_book(&self, id: i32, draft: &BookDraft) -> Result<Book> {
        self.book_repo().upsert(id, draft).await
    }

    pub async fn update_book(&self, book: &Book) -> Result<bool> {
        self.book_repo().update(book).await
    }

    pub async fn delete_book(&self, id: i32) -> Result<bool> {
        self.book_repo().remove(id).await
    }
}
