use anyhow::Context;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls, Row, Statement};

use crate::api::{Book, BookId};
use crate::books_store::{BookStore, BookStoreError};

pub struct PostgresBooksStore {
    client: Client,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct PostgresBooksStoreConfig {
    pub hostname: String,
    pub username: String,
    pub password: String,
}

impl PostgresBooksStore {
    pub async fn init(config: PostgresBooksStoreConfig) -> anyhow::Result<Self> {
        let connection_str = format!(
            "postgresql://{}:{}@{}",
            config.username, config.password, config.hostname
        );
        tracing::info!(
            "Connecting to postgres at {} as {}",
            config.hostname,
            config.username
        );
        let (client, connection) = tokio_postgres::connect(&connection_str, NoTls)
            .await
            .context("Failed to start postgres")?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("Postgres connection error: {}", e);
            }
        });

        client
            .batch_execute(
                "
        CREATE TABLE IF NOT EXISTS books (
            id              INTEGER PRIMARY KEY,
            title           TEXT,
            author          TEXT,
            year            INTEGER NOT NULL
            )
        ",
            )
            .await
            .context("Failed to setup table")?;
        Ok(Self { client })
    }
}

fn book_from_row(row: &Row) -> Result<Book, BookStoreError> {
    Ok(Book {
        id: row.try_get(0)?,
        title: row.try_get(1)?,
        author: row.try_get(2)?,
        year: row.try_get(3)?,
    })
}

#[async_trait::async_trait]
impl BookStore for PostgresBooksStore {
    async fn list_books(&self) -> Result<Vec<Book>, BookStoreError> {
        let stmt: Statement = self
            .client
            .prepare("SELECT id, title, author, year FROM books")
            .await?;

        let rows = self.client.query(&stmt, &[]).await?;
        rows.iter().map(book_from_row).collect()
    }

    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>, BookStoreError> {
        let stmt: Statement = self
            .client
            .prepare("SELECT id, title, author, year FROM books WHERE id = ($1)")
            .await?;

        let rows = self.client.query(&stmt, &[&book_id]).await?;
        rows.first().map(book_from_row).transpose()
    }

    async fn add_book(&self, book: Book) -> Result<Book, BookStoreError> {
        let stmt: Statement = self
            .client
            .prepare(
                "INSERT INTO books (id, title, author, year) VALUES ($1, $2, $3, $4) \
                 RETURNING id, title, author, year",
            )
            .await?;

        let rows = self
            .client
            .query(&stmt, &[&book.id, &book.title, &book.author, &book.year])
            .await;

        match rows {
            Ok(rows) => rows
                .first()
                .ok_or_else(|| BookStoreError::Other("Book not returned".to_string()))
                .and_then(book_from_row),
            Err(err)
                if err
                    .as_db_error()
                    // Primary key violation
                    .map(|db_err| db_err.code() == &SqlState::UNIQUE_VIOLATION)
                    .unwrap_or_default() =>
            {
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
        let stmt: Statement = self
            .client
            .prepare(
                "UPDATE books SET title = ($1), author = ($2), year = ($3) WHERE id = ($4) \
                 RETURNING id, title, author, year",
            )
            .await?;

        let rows = self
            .client
            .query(&stmt, &[&book.title, &book.author, &book.year, &book_id])
            .await?;
        rows.first().map(book_from_row).transpose()
    }

    async fn delete_book(&self, book_id: BookId) -> Result<bool, BookStoreError> {
        let stmt: Statement = self
            .client
            .prepare("DELETE FROM books WHERE id = ($1)")
            .await?;

        let deleted = self.client.execute(&stmt, &[&book_id]).await?;
        Ok(deleted > 0)
    }
}
