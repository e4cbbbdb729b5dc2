// --- Armador de Horarios - Archivo principal ---

use schedshift::{run_server, EngineConfig, ServerConfig};
use tracing_subscriber::EnvFilter;

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // antes de leer la configuración, para que se vean sus avisos
    setup_logging();
    let server = ServerConfig::from_env();
    let engine = EngineConfig::from_env();

    tracing::info!("=== Armador de Horarios (API) ===");
    tracing::info!(
        "catálogo: {} | timeout: {} ms | pool: {} | totalHours: {:?}",
        server.catalog_path.display(),
        engine.timeout.as_millis(),
        engine.pool_size,
        engine.total_hours
    );
    run_server(server, engine).await
}
