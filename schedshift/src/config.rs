//! Configuración del motor y del servidor.
//!
//! Se lee desde variables de entorno (con `.env` opcional vía dotenv). Los
//! valores inválidos se ignoran con un aviso y se usa el valor por defecto.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Tamaño del pool en modo best-of-pool. Es una política de latencia acotada,
/// no una garantía de encontrar el óptimo global.
pub const DEFAULT_POOL_SIZE: usize = 20;

/// Horas asumidas por bloque en el modo `Legacy` de `totalHours`.
pub const LEGACY_HOURS_PER_SLOT: f64 = 1.5;

/// Cómo se calcula `totalHours` en la respuesta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalHoursMode {
    /// Suma de duraciones reales (end - start).
    #[default]
    Actual,
    /// `cantidad_de_bloques * 1.5`, independiente de la duración real.
    Legacy,
}

impl FromStr for TotalHoursMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "actual" => Ok(TotalHoursMode::Actual),
            "legacy" => Ok(TotalHoursMode::Legacy),
            other => Err(format!("unknown total hours mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub timeout: Duration,
    pub pool_size: usize,
    pub total_hours: TotalHoursMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            pool_size: DEFAULT_POOL_SIZE,
            total_hours: TotalHoursMode::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    pub fn with_total_hours(mut self, mode: TotalHoursMode) -> Self {
        self.total_hours = mode;
        self
    }

    /// SCHEDSHIFT_TIMEOUT_MS, SCHEDSHIFT_POOL_SIZE, SCHEDSHIFT_TOTAL_HOURS
    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de valores inyectable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(ms) = parse_var::<u64, _>(&lookup, "SCHEDSHIFT_TIMEOUT_MS") {
            cfg.timeout = Duration::from_millis(ms);
        }
        if let Some(n) = parse_var::<usize, _>(&lookup, "SCHEDSHIFT_POOL_SIZE") {
            if n == 0 {
                warn!("SCHEDSHIFT_POOL_SIZE=0 ignored, using {}", DEFAULT_POOL_SIZE);
            } else {
                cfg.pool_size = n;
            }
        }
        if let Some(mode) = parse_var::<TotalHoursMode, _>(&lookup, "SCHEDSHIFT_TOTAL_HOURS") {
            cfg.total_hours = mode;
        }
        cfg
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: String,
    pub catalog_path: PathBuf,
    pub max_concurrent: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            catalog_path: PathBuf::from("data/catalog.json"),
            max_concurrent: std::cmp::max(1, num_cpus::get()),
        }
    }
}

impl ServerConfig {
    /// SCHEDSHIFT_BIND, SCHEDSHIFT_CATALOG, SCHEDSHIFT_MAX_CONCURRENT
    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(bind) = lookup("SCHEDSHIFT_BIND").filter(|b| !b.trim().is_empty()) {
            cfg.bind = bind.trim().to_string();
        }
        if let Some(path) = lookup("SCHEDSHIFT_CATALOG").filter(|p| !p.trim().is_empty()) {
            cfg.catalog_path = PathBuf::from(path.trim());
        }
        if let Some(n) = parse_var::<usize, _>(&lookup, "SCHEDSHIFT_MAX_CONCURRENT") {
            cfg.max_concurrent = n.max(1);
        }
        cfg
    }
}

// load .env if present
fn load_dotenv() {
    let _ = dotenv::dotenv();
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring invalid value for {}: '{}'", key, raw);
            None
        }
    }
}
