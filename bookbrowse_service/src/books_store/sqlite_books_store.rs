use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::error::DatabaseError;
use sqlx::{Row, SqlitePool};

use crate::api::{Book, BookId};
use crate::books_store::{BookStore, BookStoreError};

#[derive(Debug, Clone, serde::Deserialize)]
pub struct SqliteBooksStoreConfig {
    /// e.g. `sqlite://book.db` or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
}

/// Book store kept in a SQLite database file
pub struct SqliteBooksStore {
    pool: SqlitePool,
}

impl SqliteBooksStore {
    pub async fn init(config: SqliteBooksStoreConfig) -> anyhow::Result<Self> {
        tracing::info!("Opening sqlite database {}", config.url);
        let options = SqliteConnectOptions::from_str(&config.url)
            .with_context(|| format!("Invalid sqlite url {}", config.url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .context("Failed to open sqlite database")?;

        sqlx::query(
            "
        CREATE TABLE IF NOT EXISTS books (
            id              INTEGER PRIMARY KEY,
            title           TEXT,
            author          TEXT,
            year            INTEGER NOT NULL
            )
        ",
        )
        .execute(&pool)
        .await
        .context("Failed to setup table")?;

        Ok(Self { pool })
    }
}

fn book_from_row(row: &SqliteRow) -> Result<Book, BookStoreError> {
    Ok(Book {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        year: row.try_get("year")?,
    })
}

fn is_duplicate_key(db_err: &dyn DatabaseError) -> bool {
    // SQLITE_CONSTRAINT_PRIMARYKEY and SQLITE_CONSTRAINT_UNIQUE extended codes
    db_err.is_unique_violation() || matches!(db_err.code().as_deref(), Some("1555" | "2067"))
}

#[async_trait::async_trait]
impl BookStore for SqliteBooksStore {
    async fn list_books(&self) -> Result<Vec<Book>, BookStoreError> {
        let rows = sqlx::query("SELECT id, title, author, year FROM books")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(book_from_row).collect()
    }

    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>, BookStoreError> {
        let row = sqlx::query("SELECT id, title, author, year FROM books WHERE id = ?1")
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(book_from_row).transpose()
    }

    async fn add_book(&self, book: Book) -> Result<Book, BookStoreError> {
        let result = sqlx::query(
            "INSERT INTO books (id, title, author, year) VALUES (?1, ?2, ?3, ?4) \
             RETURNING id, title, author, year",
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => book_from_row(&row),
            Err(sqlx::Error::Database(db_err)) if is_duplicate_key(db_err.as_ref()) => {
                Err(BookStoreError::AlreadyExists(book.id))
            }
            Err(other_err) => Err(other_err.into()),
        }
    }

    async fn update_book(
        &self,
        book_id: BookId,
        book: Book,
    ) -> Result<Option<Book>, BookStoreError> {
        let row = sqlx::query(
            "UPDATE books SET title = ?1, author = ?2, year = ?3 WHERE id = ?4 \
             RETURNING id, title, author, year",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(book_from_row).transpose()
    }

    async fn delete_book(&self, book_id: BookId) -> Result<bool, BookStoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
