use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::{hhmm, Day};

/// Preferencias del estudiante. Todos los campos son opcionales; la ausencia
/// significa "sin restricción".
///
/// # Estructura del JSON esperado:
/// ```json
/// {
///   "excludeDays": ["Sat"],
///   "startAfter": "08:00",
///   "startBefore": "16:00",
///   "endBefore": "18:00",
///   "buildingPrefix": "SEC",
///   "preferBreaks": false,
///   "preferCompact": true,
///   "avoidInstructors": ["Dr. Cruz"]
/// }
/// ```
///
/// `includeDays` se acepta pero no afecta ni el filtro ni el puntaje.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub exclude_days: BTreeSet<Day>,
    pub include_days: BTreeSet<Day>,
    #[serde(with = "hhmm::option", skip_serializing_if = "Option::is_none")]
    pub start_after: Option<NaiveTime>,
    #[serde(with = "hhmm::option", skip_serializing_if = "Option::is_none")]
    pub start_before: Option<NaiveTime>,
    #[serde(with = "hhmm::option", skip_serializing_if = "Option::is_none")]
    pub end_before: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_prefix: Option<String>,
    pub prefer_breaks: bool,
    pub prefer_compact: bool,
    pub avoid_instructors: Vec<String>,
}

/// Qué extremo del gap score se busca cuando hay varias asignaciones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GapPreference {
    /// `preferBreaks`: máximo tiempo libre entre clases.
    MaximizeGaps,
    /// `preferCompact`: clases lo más seguidas posible.
    MinimizeGaps,
}

impl Preferences {
    pub fn excluding(mut self, day: Day) -> Self {
        self.exclude_days.insert(day);
        self
    }

    pub fn starting_after(mut self, t: NaiveTime) -> Self {
        self.start_after = Some(t);
        self
    }

    pub fn starting_before(mut self, t: NaiveTime) -> Self {
        self.start_before = Some(t);
        self
    }

    pub fn ending_before(mut self, t: NaiveTime) -> Self {
        self.end_before = Some(t);
        self
    }

    pub fn in_building(mut self, prefix: impl Into<String>) -> Self {
        self.building_prefix = Some(prefix.into());
        self
    }

    pub fn with_breaks(mut self) -> Self {
        self.prefer_breaks = true;
        self
    }

    pub fn compact(mut self) -> Self {
        self.prefer_compact = true;
        self
    }

    pub fn avoiding(mut self, instructor: impl Into<String>) -> Self {
        self.avoid_instructors.push(instructor.into());
        self
    }

    /// `None` => first-fit; `Some(_)` => best-of-pool con gap score.
    pub fn gap_preference(&self) -> Option<GapPreference> {
        if self.prefer_breaks {
            Some(GapPreference::MaximizeGaps)
        } else if self.prefer_compact {
            Some(GapPreference::MinimizeGaps)
        } else {
            None
        }
    }

    /// Prefijo de edificio normalizado, ignorando un prefijo vacío.
    pub fn building(&self) -> Option<&str> {
        self.building_prefix
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}
