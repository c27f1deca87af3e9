pub mod api;

#[cfg(any(feature = "client", test))]
pub mod client;

#[cfg(feature = "server")]
pub mod app_config;
#[cfg(feature = "server")]
pub mod books_store;
#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
pub mod settings;
#[cfg(feature = "server")]
pub mod telemetry;
