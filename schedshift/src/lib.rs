// Biblioteca raíz del crate `schedshift`.
// Motor de armado de horarios semanales sin choques a partir de la oferta de
// secciones, más una capa HTTP delgada para servirlo.
pub mod algorithm;
pub mod api_json;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod server_handlers;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;

pub use algorithm::{build_schedule, build_schedule_response, ScheduleOutcome};
pub use catalog::{InMemoryCatalog, SectionCatalog};
pub use config::{EngineConfig, ServerConfig, TotalHoursMode};
pub use error::{CatalogError, ErrorKind, ScheduleError};
pub use models::{Assignment, Day, Preferences, ScheduleResponse, Section, Slot, WeeklyGrid};
