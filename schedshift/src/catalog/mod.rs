//! Proveedor de secciones (catálogo / oferta académica).
//!
//! El motor nunca lee almacenamiento directamente: recibe, por ramo y
//! término, las secciones con cupo ya deduplicadas. `InMemoryCatalog` es la
//! implementación que usa el servidor, cargada una vez desde un JSON y
//! compartida en sólo lectura entre requests.
//!
//! # Formato del archivo
//! ```json
//! {
//!   "terms": {
//!     "2024-2": [
//!       {
//!         "course": "CSCI 111",
//!         "sectionId": "X",
//!         "instructor": "Dr. Reyes",
//!         "freeSlots": 12,
//!         "slots": [{"day": "Mon", "start": "08:00", "end": "09:30", "room": "SEC-A201"}]
//!       },
//!       {
//!         "course": "MATH 30.13",
//!         "sectionId": "B",
//!         "freeSlots": 3,
//!         "schedule": ["TUE FRI 10:00-11:30 SEC-B204"]
//!       }
//!     ]
//!   }
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::algorithm::conflict::parse_slots;
use crate::error::CatalogError;
use crate::models::{Section, Slot, DEFAULT_INSTRUCTOR};

/// Fuente externa de secciones. Debe devolver sólo secciones con cupo, con
/// instructor por defecto "TBA" y bloques ordenados.
pub trait SectionCatalog {
    fn sections_for(&self, course: &str, term: &str) -> Result<Vec<Section>, CatalogError>;
}

impl<T: SectionCatalog + ?Sized> SectionCatalog for &T {
    fn sections_for(&self, course: &str, term: &str) -> Result<Vec<Section>, CatalogError> {
        (**self).sections_for(course, term)
    }
}

impl<T: SectionCatalog + ?Sized> SectionCatalog for std::sync::Arc<T> {
    fn sections_for(&self, course: &str, term: &str) -> Result<Vec<Section>, CatalogError> {
        (**self).sections_for(course, term)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    terms: HashMap<String, Vec<Section>>,
}

#[derive(Deserialize)]
struct CatalogFile {
    terms: HashMap<String, Vec<SectionRecord>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectionRecord {
    course: String,
    section_id: String,
    #[serde(default)]
    instructor: Option<String>,
    free_slots: u32,
    #[serde(default)]
    slots: Vec<Slot>,
    /// Notación compacta, p.ej. "M-TH 0800-0930 SEC-A201".
    #[serde(default)]
    schedule: Vec<String>,
}

impl SectionRecord {
    fn into_section(self) -> Result<Section, CatalogError> {
        let mut slots = self.slots;
        for h in &self.schedule {
            let parsed = parse_slots(h);
            if parsed.is_empty() {
                return Err(CatalogError::InvalidData(format!(
                    "{} ({}): unreadable schedule '{}'",
                    self.course, self.section_id, h
                )));
            }
            slots.extend(parsed);
        }
        if let Some(bad) = slots.iter().find(|s| !s.is_valid()) {
            return Err(CatalogError::InvalidData(format!(
                "{} ({}): slot {} {} does not end after it starts",
                self.course,
                self.section_id,
                bad.day,
                bad.time_label()
            )));
        }
        slots.sort_by_key(|s| (s.day, s.start, s.end));

        Ok(Section {
            course: self.course.trim().to_string(),
            section_id: self.section_id.trim().to_string(),
            instructor: self.instructor.filter(|i| !i.trim().is_empty()),
            free_slots: self.free_slots,
            slots,
        })
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega secciones a un término; duplicados (ramo, sección) se ignoran.
    pub fn with_term(mut self, term: impl Into<String>, sections: Vec<Section>) -> Self {
        let term = term.into();
        for s in sections {
            self.insert(&term, s);
        }
        self
    }

    pub fn insert(&mut self, term: &str, section: Section) {
        let entry = self.terms.entry(term.to_string()).or_default();
        if entry
            .iter()
            .any(|s| s.course == section.course && s.section_id == section.section_id)
        {
            debug!("   ⊘ sección duplicada {} ({}) en {}", section.course, section.section_id, term);
            return;
        }
        entry.push(section);
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        // orden determinista de términos, las secciones mantienen el orden del archivo
        let mut terms: Vec<_> = file.terms.into_iter().collect();
        terms.sort_by(|a, b| a.0.cmp(&b.0));
        for (term, records) in terms {
            for r in records {
                catalog.insert(&term, r.into_section()?);
            }
        }
        Ok(catalog)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json_str(&text)?;
        info!(
            "📥 catálogo cargado desde {}: {} términos, {} secciones",
            path.as_ref().display(),
            catalog.terms.len(),
            catalog.section_count()
        );
        Ok(catalog)
    }

    pub fn section_count(&self) -> usize {
        self.terms.values().map(Vec::len).sum()
    }

    pub fn terms(&self) -> Vec<&str> {
        let mut t: Vec<&str> = self.terms.keys().map(String::as_str).collect();
        t.sort();
        t
    }

    /// Códigos de ramo distintos de un término, en orden de aparición.
    pub fn courses(&self, term: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.terms
            .get(term)
            .map(|secs| {
                secs.iter()
                    .map(|s| s.course.as_str())
                    .filter(|c| seen.insert(*c))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl SectionCatalog for InMemoryCatalog {
    fn sections_for(&self, course: &str, term: &str) -> Result<Vec<Section>, CatalogError> {
        let course = course.trim();
        let Some(secs) = self.terms.get(term.trim()) else {
            return Ok(Vec::new());
        };
        Ok(secs
            .iter()
            .filter(|s| s.course == course && s.is_open())
            .map(|s| {
                let mut s = s.clone();
                if s.instructor.is_none() {
                    s.instructor = Some(DEFAULT_INSTRUCTOR.to_string());
                }
                s
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Day;

    const SAMPLE: &str = r#"
    {
        "terms": {
            "2024-2": [
                {"course": "CSCI 111", "sectionId": "X", "instructor": "Dr. Reyes", "freeSlots": 12,
                 "slots": [{"day": "Mon", "start": "08:00", "end": "09:30", "room": "SEC-A201"}]},
                {"course": "CSCI 111", "sectionId": "Y", "freeSlots": 0, "schedule": ["WED 13:00-14:30"]},
                {"course": "MATH 30.13", "sectionId": "B", "freeSlots": 3, "schedule": ["FRI TUE 10:00-11:30 SEC-B204"]},
                {"course": "MATH 30.13", "sectionId": "B", "freeSlots": 9, "schedule": ["SAT 10:00-11:30"]}
            ]
        }
    }
    "#;

    #[test]
    fn test_load_and_query() {
        let cat = InMemoryCatalog::from_json_str(SAMPLE).expect("Debe parsear catálogo");
        assert_eq!(cat.section_count(), 3);
        assert_eq!(cat.terms(), vec!["2024-2"]);
        assert_eq!(cat.courses("2024-2"), vec!["CSCI 111", "MATH 30.13"]);

        // Y no tiene cupo
        let csci = cat.sections_for("CSCI 111", "2024-2").unwrap();
        assert_eq!(csci.len(), 1);
        assert_eq!(csci[0].section_id, "X");

        let math = cat.sections_for(" MATH 30.13 ", "2024-2").unwrap();
        assert_eq!(math.len(), 1);
        assert_eq!(math[0].instructor.as_deref(), Some("TBA"));
        // bloques ordenados por día
        assert_eq!(math[0].slots[0].day, Day::Tue);
        assert_eq!(math[0].slots[1].day, Day::Fri);
        assert_eq!(math[0].slots[0].room.as_deref(), Some("SEC-B204"));
    }

    #[test]
    fn test_unknown_term_or_course_is_empty() {
        let cat = InMemoryCatalog::from_json_str(SAMPLE).unwrap();
        assert!(cat.sections_for("CSCI 111", "2099-1").unwrap().is_empty());
        assert!(cat.sections_for("HIST 10", "2024-2").unwrap().is_empty());
    }

    #[test]
    fn test_bad_data_is_rejected() {
        let bad_slot = r#"{"terms": {"t": [{"course": "A", "sectionId": "1", "freeSlots": 1,
            "slots": [{"day": "Mon", "start": "10:00", "end": "09:00"}]}]}}"#;
        assert!(matches!(InMemoryCatalog::from_json_str(bad_slot), Err(CatalogError::InvalidData(_))));

        let bad_schedule = r#"{"terms": {"t": [{"course": "A", "sectionId": "1", "freeSlots": 1,
            "schedule": ["Sin horario"]}]}}"#;
        assert!(matches!(InMemoryCatalog::from_json_str(bad_schedule), Err(CatalogError::InvalidData(_))));

        assert!(matches!(InMemoryCatalog::from_json_str("{"), Err(CatalogError::Parse(_))));
        assert!(matches!(InMemoryCatalog::from_path("/no/existe/catalogo.json"), Err(CatalogError::Io(_))));
    }
}
