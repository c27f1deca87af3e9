use std::sync::Arc;

use actix_web::{App, HttpServer};
use anyhow::Context;
use paperclip::actix::{web, OpenApiExt};
use tracing_actix_web::TracingLogger;

use bookbrowse_service::app_config::config_app;
use bookbrowse_service::books_store::{
    seed_sample_books, BookStore, InMemoryBooksStore, PostgresBooksStore, SqliteBooksStore,
};
use bookbrowse_service::settings::{Settings, StoreBackend, StoreSettings};
use bookbrowse_service::telemetry::{init_telemetry, shutdown_telemetry};

async fn init_books_store(settings: &StoreSettings) -> anyhow::Result<Arc<dyn BookStore>> {
    let books_store: Arc<dyn BookStore> = match settings.backend {
        StoreBackend::InMemory => Arc::new(InMemoryBooksStore::default()),
        StoreBackend::Sqlite => Arc::new(
            SqliteBooksStore::init(settings.sqlite_config())
                .await
                .context("Failed to init sqlite")?,
        ),
        StoreBackend::Postgres => Arc::new(
            PostgresBooksStore::init(settings.postgres.clone())
                .await
                .context("Failed to init postgres")?,
        ),
    };

    if settings.seed_sample_books {
        let inserted = seed_sample_books(books_store.as_ref())
            .await
            .context("Failed to seed sample books")?;
        tracing::info!("Seeded {} sample books", inserted);
    }

    Ok(books_store)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_telemetry(&settings.telemetry)?;
    tracing::info!(
        "starting HTTP server at http://{}:{} with {:?} store",
        settings.server.host,
        settings.server.port,
        settings.store.backend
    );

    let books_store = init_books_store(&settings.store).await?;

    HttpServer::new(move || {
        App::new()
            .wrap_api()
            .app_data(web::Data::new(books_store.clone()))
            .wrap(TracingLogger::default())
            .configure(config_app)
            .with_json_spec_at("/apispec/v2")
            .build()
    })
    .bind((settings.server.host.as_str(), settings.server.port))
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server failed")?;

    shutdown_telemetry(&settings.telemetry);
    Ok(())
}
