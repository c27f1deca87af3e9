//! End to end tests run against a running bookbrowse service.
//!
//! The service url is taken from `BOOKBROWSE_URL` (defaults to `http://127.0.0.1:8080`).
//! Run with `cargo test -p bookbrowse_tests --features system_tests` or `--features load_tests`.

#[cfg(feature = "system_tests")]
mod system_tests;

#[cfg(any(feature = "system_tests", feature = "load_tests"))]
pub(crate) fn service_url() -> String {
    std::env::var("BOOKBROWSE_URL").unwrap_or("http://127.0.0.1:8080".to_string())
}
