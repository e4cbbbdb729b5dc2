//! Errores tipados del armado de horarios.

use serde::Serialize;
use thiserror::Error;

/// Fallas del proveedor de catálogo. Se propagan sin reintentos.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid catalog data: {0}")]
    InvalidData(String),
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("no sections are offered for {course} in term {term}")]
    InvalidCourseCode { course: String, term: String },

    #[error("no open sections of {course} satisfy your constraints")]
    NoOpenSections { course: String },

    #[error("no conflict-free schedule exists for these courses; try relaxing your constraints")]
    Infeasible,

    #[error("schedule search timed out after {elapsed_ms} ms; try again or request fewer courses")]
    Timeout { elapsed_ms: u128 },

    #[error("invalid preferences: {0}")]
    InvalidPreference(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Tipo de error expuesto en la respuesta JSON (`errorKind`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    InvalidCourseCode,
    NoOpenSections,
    Infeasible,
    Timeout,
    InvalidPreference,
    Catalog,
}

impl ScheduleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScheduleError::InvalidCourseCode { .. } => ErrorKind::InvalidCourseCode,
            ScheduleError::NoOpenSections { .. } => ErrorKind::NoOpenSections,
            ScheduleError::Infeasible => ErrorKind::Infeasible,
            ScheduleError::Timeout { .. } => ErrorKind::Timeout,
            ScheduleError::InvalidPreference(_) => ErrorKind::InvalidPreference,
            ScheduleError::Catalog(_) => ErrorKind::Catalog,
        }
    }

    /// Timeout sugiere reintentar; el resto (salvo catálogo) sugiere relajar restricciones.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScheduleError::Timeout { .. })
    }
}
