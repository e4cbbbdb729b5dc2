use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tokio::sync::Semaphore;
use tracing::info;

use crate::catalog::InMemoryCatalog;
use crate::config::{EngineConfig, ServerConfig};
use crate::server_handlers::{help_handler, schedule_handler};

/// Estado compartido entre workers: el catálogo es de sólo lectura.
pub struct AppState {
    pub catalog: Arc<InMemoryCatalog>,
    pub engine: EngineConfig,
    pub semaphore: Arc<Semaphore>,
}

impl AppState {
    pub fn new(catalog: InMemoryCatalog, engine: EngineConfig, max_concurrent: usize) -> Self {
        Self {
            catalog: Arc::new(catalog),
            engine,
            semaphore: Arc::new(Semaphore::new(std::cmp::max(1, max_concurrent))),
        }
    }
}

/// Rutas de la API; separado de `run_server` para poder montarlo en tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/schedule", web::post().to(schedule_handler))
        .route("/help", web::get().to(help_handler));
}

pub async fn run_server(server: ServerConfig, engine: EngineConfig) -> std::io::Result<()> {
    let catalog = InMemoryCatalog::from_path(&server.catalog_path).map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState::new(catalog, engine, server.max_concurrent));

    info!("Iniciando servidor en http://{}", server.bind);
    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(&server.bind)?
        .run()
        .await
}
