//! # Diary Binary
//!
//! The entry point that assembles the server from settings and compile-time
//! features.

use std::time::Duration;

use actix_web::middleware::Compress;
use actix_web::{web, App, HttpServer};
use diary_api::{configure_frontend, configure_routes, middleware, AppState, Frontend, RateLimiter};
use diary_config::{DatabaseSettings, Settings};
use diary_core::EntryStore;

#[cfg(feature = "db-sqlite")]
use diary_db_sqlite::SqliteEntryRepo;
#[cfg(feature = "db-sqlite")]
use secrecy::ExposeSecret;

/// A database that cannot be reached at startup does not stop the server;
/// every API call reports it until the process is restarted.
#[cfg(feature = "db-sqlite")]
async fn connect_store(db: &DatabaseSettings) -> EntryStore {
    match SqliteEntryRepo::new(db.url.expose_secret(), db.max_connections).await {
        Ok(repo) => EntryStore::ready(repo),
        Err(err) => {
            log::error!("Failed to initialize database pool: {err:#}");
            EntryStore::NotReady
        }
    }
}

#[cfg(not(feature = "db-sqlite"))]
async fn connect_store(_db: &DatabaseSettings) -> EntryStore {
    log::error!("Built without a storage backend; enable the `db-sqlite` feature");
    EntryStore::NotReady
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::load()?;
    let production = settings.environment.is_production();

    // 1. Storage
    let store = connect_store(&settings.database).await;
    let state = web::Data::new(AppState::new(store));

    // 2. Traffic control, shared by every worker
    let limiter = web::Data::new(
        RateLimiter::new(
            Duration::from_secs(settings.rate_limit.window_secs),
            settings.rate_limit.max_requests,
        )
        .trust_proxy(production),
    );

    // 3. Where the browser client comes from
    let frontend = if production {
        Frontend::Static(settings.server.static_dir.clone())
    } else {
        Frontend::DevRedirect(settings.server.dev_client_url.clone())
    };

    let cors_origins = settings.cors_origins();
    let (host, port) = settings.bind_address();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::cors_policy(&cors_origins))
            .wrap(Compress::default())
            .wrap(middleware::security_headers())
            .wrap(middleware::standard_middleware())
            .app_data(state.clone())
            .app_data(limiter.clone())
            .configure(configure_routes)
            .configure(|cfg| configure_frontend(cfg, &frontend))
    })
    .bind((host.as_str(), port))?;

    log::info!("Server listening on http://{host}:{port}");
    log::info!("Environment: {}", settings.environment.as_str());
    if production {
        log::info!("Serving static files from: {}", settings.server.static_dir.display());
    }

    server.run().await?;

    Ok(())
}
