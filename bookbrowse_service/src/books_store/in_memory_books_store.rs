use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::api::{Book, BookId};
use crate::books_store::{BookStore, BookStoreError};

#[derive(Default)]
pub struct InMemoryBooksStore {
    books: parking_lot::RwLock<HashMap<BookId, Book>>,
}

#[async_trait::async_trait]
impl BookStore for InMemoryBooksStore {
    async fn list_books(&self) -> Result<Vec<Book>, BookStoreError> {
        let mut books: Vec<Book> = self.books.read().values().cloned().collect();
        books.sort_by_key(|book| book.id);
        Ok(books)
    }

    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>, BookStoreError> {
        Ok(self.books.read().get(&book_id).cloned())
    }

    async fn add_book(&self, book: Book) -> Result<Book, BookStoreError> {
        let mut locked_books = self.books.write();

        match locked_books.entry(book.id) {
            Entry::Occupied(_) => Err(BookStoreError::AlreadyExists(book.id)),
            Entry::Vacant(entry) => Ok(entry.insert(book).clone()),
        }
    }

    async fn update_book(
        &self,
        book_id: BookId,
        book: Book,
    ) -> Result<Option<Book>, BookStoreError> {
        let mut locked_books = self.books.write();
        Ok(locked_books.get_mut(&book_id).map(|stored| {
            stored.title = book.title;
            stored.author = book.author;
            stored.year = book.year;
            stored.clone()
        }))
    }

    async fn delete_book(&self, book_id: BookId) -> Result<bool, BookStoreError> {
        Ok(self.books.write().remove(&book_id).is_some())
    }
}

#[cfg(test)]
mod in_memory_books_store_tests {
    use std::sync::Arc;

    use crate::api::Book;
    use crate::books_store::{BookStore, BookStoreError, InMemoryBooksStore};

    fn book(id: i32, title: &str, author: &str, year: i32) -> Book {
        Book {
            id,
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            year,
        }
    }

    #[tokio::test]
    /// Tests if add_book and get_book work correctly, including the duplicate id case
    async fn test_add_book_and_get_it() {
        let store = InMemoryBooksStore::default();

        let not_existing_book_id = 20000;
        assert_eq!(store.get_book(not_existing_book_id).await.unwrap(), None);

        let book1 = book(1, "Book 1", "Author 1", 2020);
        let added = store.add_book(book1.clone()).await.expect("Failed to add book");
        assert_eq!(added, book1);

        let fetched = store.get_book(1).await.expect("Failed to get book");
        assert_eq!(fetched, Some(book1.clone()));

        let duplicate = book(1, "Other", "Someone else", 1900);
        let result = store.add_book(duplicate).await;
        assert!(matches!(result, Err(BookStoreError::AlreadyExists(1))));

        // store is unchanged after the conflict
        assert_eq!(store.get_book(1).await.unwrap(), Some(book1));
    }

    #[tokio::test]
    async fn test_add_books_and_list_them() {
        let store = InMemoryBooksStore::default();

        let list = store.list_books().await.expect("Failed to list books");
        assert_eq!(list, vec![]);

        let books = vec![
            book(3, "Book 3", "Author 3", 2022),
            book(1, "Book 1", "Author 1", 2020),
            book(2, "Book 2", "Author 2", 2021),
        ];
        for b in &books {
            store.add_book(b.clone()).await.expect("Failed to add book");
        }

        let list = store.list_books().await.expect("Failed to list books");
        assert_eq!(
            list,
            vec![books[1].clone(), books[2].clone(), books[0].clone()]
        );
    }

    #[tokio::test]
    async fn test_update_book() {
        let store = InMemoryBooksStore::default();

        let not_existing_book = 2000;
        let result = store
            .update_book(not_existing_book, book(2000, "x", "y", 1))
            .await
            .expect("Failed to update");
        assert_eq!(result, None);
        assert_eq!(store.get_book(not_existing_book).await.unwrap(), None);

        store
            .add_book(book(1, "Book 1", "Author 1", 2020))
            .await
            .expect("Failed to add book");

        // id in the body is ignored
        let patch = Book {
            id: 77,
            title: Some("Updated".to_string()),
            author: Some("Updated Author".to_string()),
            year: 2024,
        };
        let updated = store
            .update_book(1, patch)
            .await
            .expect("Failed to update")
            .expect("Book not found");

        let expected = book(1, "Updated", "Updated Author", 2024);
        assert_eq!(updated, expected);
        assert_eq!(store.get_book(1).await.unwrap(), Some(expected));
        assert_eq!(store.get_book(77).await.unwrap(), None);

        let cleared = Book {
            id: 1,
            title: None,
            author: None,
            year: 0,
        };
        let updated = store.update_book(1, cleared.clone()).await.unwrap();
        assert_eq!(updated, Some(cleared));
    }

    #[tokio::test]
    async fn test_delete_book() {
        let store = InMemoryBooksStore::default();
        assert!(!store.delete_book(5).await.unwrap());

        store.add_book(book(5, "a", "b", 1)).await.unwrap();
        store.add_book(book(6, "c", "d", 2)).await.unwrap();

        assert!(store.delete_book(5).await.unwrap());
        assert_eq!(store.get_book(5).await.unwrap(), None);
        assert!(!store.delete_book(5).await.unwrap());

        assert_eq!(
            store.list_books().await.unwrap(),
            vec![book(6, "c", "d", 2)]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_with_same_id_only_one_wins() {
        let store = Arc::new(InMemoryBooksStore::default());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.add_book(book(42, "t", "a", i)).await })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(BookStoreError::AlreadyExists(42)) => conflicts += 1,
                Err(err) => panic!("Unexpected error {}", err),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(store.list_books().await.unwrap().len(), 1);
    }
}
