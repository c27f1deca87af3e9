pub use in_memory_books_store::InMemoryBooksStore;
pub use postgres_books_store::{PostgresBooksStore, PostgresBooksStoreConfig};
pub use sqlite_books_store::{SqliteBooksStore, SqliteBooksStoreConfig};

use crate::api::{Book, BookId};

mod in_memory_books_store;
mod postgres_books_store;
mod sqlite_books_store;

#[derive(thiserror::Error, Debug)]
pub enum BookStoreError {
    #[error("Book {0} already exists")]
    AlreadyExists(BookId),

    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),

    #[error("Sqlite failure {0}")]
    SqliteFailure(#[from] sqlx::Error),

    #[error("Other error {0}")]
    Other(String),
}

#[async_trait::async_trait]
pub trait BookStore: Send + Sync {
    /// Lists all books in the store
    async fn list_books(&self) -> Result<Vec<Book>, BookStoreError>;
    /// Retrieves the book with given id, None if there is no such book
    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>, BookStoreError>;
    /// Adds book to the store under its own id.
    /// Fails with AlreadyExists if the id is taken, the store is left untouched then
    async fn add_book(&self, book: Book) -> Result<Book, BookStoreError>;
    /// Overwrites title, author and year of the book, id of the passed book is ignored.
    /// Returns updated book or None if it was not found
    async fn update_book(
        &self,
        book_id: BookId,
        book: Book,
    ) -> Result<Option<Book>, BookStoreError>;
    /// Removes book from the store, returns true if book was removed and false if it was not found
    async fn delete_book(&self, book_id: BookId) -> Result<bool, BookStoreError>;
}

/// Books inserted on startup when seeding is enabled
pub fn sample_books() -> Vec<Book> {
    (1..=3)
        .map(|i| Book {
            id: i,
            title: Some(format!("Book {}", i)),
            author: Some(format!("Author {}", i)),
            year: 2019 + i,
        })
        .collect()
}

/// Adds sample books to the store, skipping the ones whose id is already present.
/// Returns number of books actually inserted
pub async fn seed_sample_books(store: &dyn BookStore) -> Result<usize, BookStoreError> {
    let mut inserted = 0;
    for book in sample_books() {
        match store.add_book(book).await {
            Ok(book) => {
                tracing::debug!("Seeded book {}", book.id);
                inserted += 1;
            }
            Err(BookStoreError::AlreadyExists(book_id)) => {
                tracing::debug!("Book {} already present, not seeding it", book_id)
            }
            Err(err) => return Err(err),
        }
    }
    Ok(inserted)
}
