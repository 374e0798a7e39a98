//! Shared harness: a real server on an ephemeral port backed by a private
//! in-memory database.

use actix_web::dev::ServerHandle;
use actix_web::{rt, web, App, HttpServer};
use diary_api::{configure_routes, AppState};
use diary_core::EntryStore;
use diary_db_sqlite::SqliteEntryRepo;

pub struct TestServer {
    pub base_url: String,
    handle: ServerHandle,
}

impl TestServer {
    /// Must be called from inside an actix system (e.g. `#[actix_web::test]`).
    pub async fn spawn() -> anyhow::Result<Self> {
        let repo = SqliteEntryRepo::in_memory().await?;
        Self::spawn_with(EntryStore::ready(repo)).await
    }

    pub async fn spawn_with(store: EntryStore) -> anyhow::Result<Self> {
        let state = web::Data::new(AppState::new(store));
        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .configure(configure_routes)
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))?;

        let addr = server
            .addrs()
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("server bound no address"))?;

        let server = server.run();
        let handle = server.handle();
        rt::spawn(server);

        Ok(Self {
            base_url: format!("http://{addr}"),
            handle,
        })
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}
