use serde::Serialize;

use super::{CourseCode, Day, Section, Slot};
use crate::error::ErrorKind;

/// Una sección elegida por ramo solicitado.
///
/// Las secciones se guardan en el orden en que se pidieron los ramos (no en el
/// orden en que la búsqueda las fue fijando).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assignment {
    sections: Vec<Section>,
}

impl Assignment {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    pub fn get(&self, course: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.course == course)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn slots(&self) -> impl Iterator<Item = (&Section, &Slot)> {
        self.sections
            .iter()
            .flat_map(|sec| sec.slots.iter().map(move |slot| (sec, slot)))
    }

    pub fn slot_count(&self) -> usize {
        self.sections.iter().map(|s| s.slots.len()).sum()
    }

    /// Reordena según la lista de ramos pedida; ramos no listados van al final.
    pub fn ordered_by(mut self, courses: &[CourseCode]) -> Self {
        self.sections.sort_by_key(|s| {
            courses
                .iter()
                .position(|c| *c == s.course)
                .unwrap_or(usize::MAX)
        });
        self
    }

    /// Clave (ramo, sección) usada para distinguir asignaciones en el pool.
    pub fn key(&self) -> Vec<(&str, &str)> {
        self.sections
            .iter()
            .map(|s| (s.course.as_str(), s.section_id.as_str()))
            .collect()
    }
}

/// Fila del horario devuelto al cliente.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub course: CourseCode,
    pub section: String,
    pub instructor: String,
    pub slots: Vec<Slot>,
}

impl From<&Section> for ScheduleEntry {
    fn from(s: &Section) -> Self {
        Self {
            course: s.course.clone(),
            section: s.section_id.clone(),
            instructor: s.instructor_or_tba().to_string(),
            slots: s.slots.clone(),
        }
    }
}

/// Grilla semanal lista para mostrar: `cells[row][day]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeeklyGrid {
    pub columns: Vec<Day>,
    pub rows: Vec<String>,
    pub cells: Vec<Vec<String>>,
}

impl WeeklyGrid {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: &str, day: Day) -> Option<&str> {
        let r = self.rows.iter().position(|x| x == row)?;
        let c = self.columns.iter().position(|d| *d == day)?;
        self.cells.get(r)?.get(c).map(String::as_str)
    }
}

/// Envelope de salida de `build_schedule`, tanto para éxito como para fallo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub success: bool,
    pub schedule: Vec<ScheduleEntry>,
    pub weekly_grid: WeeklyGrid,
    pub total_hours: f64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_score: Option<i64>,
}

impl ScheduleResponse {
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            schedule: Vec::new(),
            weekly_grid: WeeklyGrid::default(),
            total_hours: 0.0,
            message: message.into(),
            error_kind: Some(kind),
            gap_score: None,
        }
    }
}
