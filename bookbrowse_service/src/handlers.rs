use std::sync::Arc;

use actix_web::http::header::LOCATION;
use actix_web::web::Data;
use actix_web::Error;
use actix_web::HttpResponse;
use paperclip::actix::{
    api_v2_operation,
    web::{self},
};

use crate::api::{Book, BookId, BOOK_ALREADY_EXISTS_MESSAGE};
use crate::books_store::{BookStore, BookStoreError};

pub const BOOKS_PATH: &str = "/api/bookbrowse";

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
/// Lists all books
pub async fn get_all_books(
    books_store: Data<Arc<dyn BookStore>>,
) -> Result<HttpResponse, Error> {
    Ok(match books_store.list_books().await {
        Ok(books) => HttpResponse::Ok().json(books),
        Err(err) => {
            tracing::error!("Get all books failed {}", err);
            HttpResponse::InternalServerError().finish()
        }
    })
}

#[api_v2_operation]
/// Gets a single book by its id
pub async fn get_book(
    books_store: Data<Arc<dyn BookStore>>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    Ok(match books_store.get_book(book_id.into_inner()).await {
        Ok(Some(book)) => HttpResponse::Ok().json(book),
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(err) => {
            tracing::error!("Get book failed {}", err);
            HttpResponse::InternalServerError().finish()
        }
    })
}

#[api_v2_operation]
/// Adds a new book under the id given in the body
pub async fn add_book(
    books_store: Data<Arc<dyn BookStore>>,
    book: web::Json<Book>,
) -> Result<HttpResponse, Error> {
    Ok(match books_store.add_book(book.into_inner()).await {
        Ok(book) => HttpResponse::Created()
            .append_header((LOCATION, format!("{}/{}", BOOKS_PATH, book.id)))
            .json(book),
        Err(BookStoreError::AlreadyExists(book_id)) => {
            tracing::info!("Book {} not added, id already taken", book_id);
            HttpResponse::BadRequest()
                .content_type("text/plain; charset=utf-8")
                .body(BOOK_ALREADY_EXISTS_MESSAGE)
        }
        Err(err) => {
            tracing::error!("Add book failed {}", err);
            HttpResponse::InternalServerError().finish()
        }
    })
}

#[api_v2_operation]
/// Overwrites title, author and year of the book, id in the body is ignored
pub async fn update_book(
    books_store: Data<Arc<dyn BookStore>>,
    book_id: web::Path<BookId>,
    book: web::Json<Book>,
) -> Result<HttpResponse, Error> {
    Ok(
        match books_store
            .update_book(book_id.into_inner(), book.into_inner())
            .await
        {
            Ok(Some(book)) => HttpResponse::Ok().json(book),
            Ok(None) => HttpResponse::NotFound().finish(),
            Err(err) => {
                tracing::error!("Update book failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
/// Removes the book
pub async fn delete_book(
    books_store: Data<Arc<dyn BookStore>>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    Ok(match books_store.delete_book(book_id.into_inner()).await {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::NotFound().finish(),
        Err(err) => {
            tracing::error!("Delete book failed {}", err);
            HttpResponse::InternalServerError().finish()
        }
    })
}
