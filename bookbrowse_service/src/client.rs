use anyhow::{bail, Context};
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryPolicy;
use reqwest_retry::RetryTransientMiddleware;
use reqwest_tracing::TracingMiddleware;

use crate::api::{Book, BookId};

const MAX_RETRIES: u32 = 3;

/// Outcome of adding a book
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AddBookOutcome {
    Created(Book),
    /// Id was already taken, contains the message returned by the service
    AlreadyExists(String),
}

pub struct BookbrowseClient {
    url: String,
    /// Retries transient failures, only for idempotent requests
    client: ClientWithMiddleware,
    /// Never retries, a repeated create could report a conflict for a book it created itself
    create_client: ClientWithMiddleware,
}

impl BookbrowseClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        Self::with_retry_policy(
            url,
            ExponentialBackoff::builder().build_with_max_retries(MAX_RETRIES),
        )
    }

    pub fn with_retry_policy(
        url: &str,
        retry_policy: impl RetryPolicy + Send + Sync + 'static,
    ) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client.clone())
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        let create_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            create_client,
        })
    }

    fn books_url(&self) -> String {
        format!("{}/api/bookbrowse", self.url)
    }

    /// Calls GET /api/bookbrowse endpoint
    pub async fn list_books(&self) -> anyhow::Result<Vec<Book>> {
        let response = self.client.get(self.books_url()).send().await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let error = response.text().await.unwrap_or_default();
            bail!("Failed to list books {}", error)
        }
    }

    /// Calls GET /api/bookbrowse/{book_id} endpoint
    /// Returns None if book was not in the store
    pub async fn get_book(&self, book_id: BookId) -> anyhow::Result<Option<Book>> {
        let response = self
            .client
            .get(format!("{}/{}", self.books_url(), book_id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            let error = response.text().await.unwrap_or_default();
            bail!("Failed to get book {}", error)
        }
    }

    /// Calls POST /api/bookbrowse endpoint
    pub async fn add_book(&self, book: &Book) -> anyhow::Result<AddBookOutcome> {
        let response = self
            .create_client
            .post(self.books_url())
            .json(book)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(AddBookOutcome::Created(response.json().await?)),
            StatusCode::BAD_REQUEST => Ok(AddBookOutcome::AlreadyExists(
                response.text().await.context("Failed to read response")?,
            )),
            status => {
                let error = response.text().await.unwrap_or_default();
                bail!("Failed to add book, status {} {}", status, error)
            }
        }
    }

    /// Calls PUT /api/bookbrowse/{book_id} endpoint
    /// Returns None if book was not in the store
    pub async fn update_book(&self, book_id: BookId, book: &Book) -> anyhow::Result<Option<Book>> {
        let response = self
            .client
            .put(format!("{}/{}", self.books_url(), book_id))
            .json(book)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            let error = response.text().await.unwrap_or_default();
            bail!("Failed to update book {}", error)
        }
    }

    /// Calls DELETE /api/bookbrowse/{book_id} endpoint
    /// Returns true if book was deleted and false if it was not found
    pub async fn delete_book(&self, book_id: BookId) -> anyhow::Result<bool> {
        let response = self
            .client
            .delete(format!("{}/{}", self.books_url(), book_id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(false)
        } else if response.status().is_success() {
            Ok(true)
        } else {
            let error = response.text().await.unwrap_or_default();
            bail!("Failed to delete book {}", error)
        }
    }
}
