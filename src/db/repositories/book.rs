use crate::entities::{books, prelude::*};
use crate::models::book::{Book, BookDraft};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use std::str::FromStr;
use tracing::info;

/// Repository for the `books` table
pub struct BookRepository {
    conn: DatabaseConnection,
}

impl BookRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: books::Model) -> Result<Book> {
        let price = Decimal::from_str(&model.price)
            .with_context(|| format!("Book {} has an unreadable price {:?}", model.id, model.price))?;

        Ok(Book {
            id: model.id,
            title: model.title,
            author: model.author,
            genre: model.genre,
            published_year: model.published_year,
            price,
            discount_percentage: model.discount_percentage,
            image_url: model.image_url,
        })
    }

    fn active_model(draft: &BookDraft) -> books::ActiveModel {
        books::ActiveModel {
            id: NotSet,
            title: Set(draft.title.clone()),
            author: Set(draft.author.clone()),
            genre: Set(draft.genre.clone()),
            published_year: Set(draft.published_year),
            price: Set(draft.price.to_string()),
            discount_percentage: Set(draft.discount_percentage),
            image_url: Set(draft.image_url.clone()),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Book>> {
        let rows = Books::find()
            .order_by_asc(books::Column::Id)
            .all(&self.conn)
            .await?;

        rows.into_iter().map(Self::map_model).collect()
    }

    pub async fn get(&self, id: i32) -> Result<Option<Book>> {
        let row = Books::find_by_id(id).one(&self.conn).await?;
        row.map(Self::map_model).transpose()
    }

    pub async fn add(&self, draft: &BookDraft) -> Result<Book> {
        let res = Books::insert(Self::active_model(draft))
            .exec(&self.conn)
            .await?;
        let id = res.last_insert_id;

        info!(book_id = id, title = %draft.title, "Added book");
        Ok(Self::book_from_draft(id, draft))
    }

    /// Overwrites every column of the row holding `id` when there is one.
    /// Anything else is inserted under a database-assigned id.
    pub async fn upsert(&self, id: i32, draft: &BookDraft) -> Result<Book> {
        let result = Books::update_many()
            .set(Self::active_model(draft))
            .filter(books::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            info!(requested_id = id, "No book holds the requested id, inserting instead");
            return self.add(draft).await;
        }

        info!(book_id = id, title = %draft.title, "Overwrote book");
        Ok(Self::book_from_draft(id, draft))
    }

    /// Returns false when no row holds `book.id`.
    pub async fn update(&self, book: &Book) -> Result<bool> {
        let active_model = books::ActiveModel {
            id: NotSet,
            title: Set(book.title.clone()),
            author: Set(book.author.clone()),
            genre: Set(book.genre.clone()),
            published_year: Set(book.published_year),
            price: Set(book.price.to_string()),
            discount_percentage: Set(book.discount_percentage),
            image_url: Set(book.image_url.clone()),
        };

        let result = Books::update_many()
            .set(active_model)
            .filter(books::Column::Id.eq(book.id))
            .exec(&self.conn)
            .await?;

        if result.rows_affected > 0 {
            info!(book_id = book.id, "Updated book");
        }
        Ok(result.rows_affected > 0)
    }

    /// Deleting an absent row is a no-op that returns false.
    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Books::delete_by_id(id).exec(&self.conn).await?;

        if result.rows_affected > 0 {
            info!(book_id = id, "Removed book");
        }
        Ok(result.rows_affected > 0)
    }

    fn book_from_draft(id: i32, draft: &BookDraft) -> Book {
        Book {
            id,
            title: draft.title.clone(),
            author: draft.author.clone(),
            genre: draft.genre.clone(),
            published_year: draft.published_year,
            price: draft.price,
            discount_percentage: draft.discount_percentage,
            image_url: draft.image_url.clone(),
        }
    }
}
