use rand::Rng;

use bookbrowse_service::api::{Book, BookId};
use bookbrowse_service::client::{AddBookOutcome, BookbrowseClient};

use crate::service_url;

/// Random id range, keeps reruns against the same database from colliding
fn random_book_id() -> BookId {
    rand::thread_rng().gen_range(1_000_000..i32::MAX)
}

#[tokio::test]
/// Simple test for bookbrowse service
/// Creates a book
/// Tries to create it again
/// Gets the book
/// Updates the book
/// Checks that the book is listed
/// Deletes the book
async fn bookbrowse_e2e_test() {
    let client = BookbrowseClient::new(&service_url()).expect("Failed to create client");
    let book_id = random_book_id();

    let book = Book {
        id: book_id,
        title: Some("Book 1".to_string()),
        author: Some("Author 1".to_string()),
        year: 2020,
    };

    // ADD BOOK
    let outcome = client.add_book(&book).await.expect("Failed to add book");
    assert_eq!(outcome, AddBookOutcome::Created(book.clone()));

    // ADD AGAIN - id already taken
    let outcome = client.add_book(&book).await.expect("Failed to add book");
    assert_eq!(
        outcome,
        AddBookOutcome::AlreadyExists("The book ID is existing already.".to_string())
    );

    // GET BOOK
    let returned_book = client
        .get_book(book_id)
        .await
        .expect("Failed to get book")
        .expect("Book not found");
    assert_eq!(returned_book, book);

    // UPDATE BOOK
    let update = Book {
        id: book_id,
        title: Some("Updated".to_string()),
        author: Some("Updated Author".to_string()),
        year: 2024,
    };
    let updated = client
        .update_book(book_id, &update)
        .await
        .expect("Failed to update book")
        .expect("Book not found");
    assert_eq!(updated, update);

    // LIST BOOKS
    let books = client.list_books().await.expect("Failed to list books");
    assert!(books.iter().any(|listed| *listed == update));

    // DELETE BOOK
    assert!(client.delete_book(book_id).await.expect("Failed to delete"));
    assert_eq!(client.get_book(book_id).await.expect("Failed to get book"), None);
    assert!(!client.delete_book(book_id).await.expect("Failed to delete"));
}

#[tokio::test]
async fn bookbrowse_missing_book_e2e_test() {
    let client = BookbrowseClient::new(&service_url()).expect("Failed to create client");
    let book_id = random_book_id();

    assert_eq!(client.get_book(book_id).await.unwrap(), None);
    assert!(!client.delete_book(book_id).await.unwrap());

    let update = Book {
        id: book_id,
        title: None,
        author: None,
        year: 1,
    };
    assert_eq!(client.update_book(book_id, &update).await.unwrap(), None);
    // update must not create the book
    assert_eq!(client.get_book(book_id).await.unwrap(), None);
}
