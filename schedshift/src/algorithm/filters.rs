//! Filtro de preferencias duras sobre las secciones candidatas de cada ramo.
//!
//! Una sección sobrevive sólo si cumple TODAS las restricciones activas:
//! días excluidos, ventana horaria de inicio/término, prefijo de edificio y
//! profesores a evitar. `includeDays` no participa.

use std::collections::HashSet;

use tracing::debug;

use crate::error::ScheduleError;
use crate::models::{Day, Preferences, Section, Slot};

/// Valida combinaciones contradictorias antes de consultar el catálogo.
pub fn validate_preferences(prefs: &Preferences) -> Result<(), ScheduleError> {
    if let (Some(after), Some(before)) = (prefs.start_after, prefs.start_before) {
        if after >= before {
            return Err(ScheduleError::InvalidPreference(format!(
                "startAfter ({}) must be earlier than startBefore ({})",
                after.format("%H:%M"),
                before.format("%H:%M")
            )));
        }
    }
    if let (Some(after), Some(end)) = (prefs.start_after, prefs.end_before) {
        if after >= end {
            return Err(ScheduleError::InvalidPreference(format!(
                "startAfter ({}) must be earlier than endBefore ({})",
                after.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
    }
    if Day::ALL.iter().all(|d| prefs.exclude_days.contains(d)) {
        return Err(ScheduleError::InvalidPreference(
            "excludeDays removes every teaching day".to_string(),
        ));
    }
    if prefs.prefer_breaks && prefs.prefer_compact {
        return Err(ScheduleError::InvalidPreference(
            "preferBreaks and preferCompact cannot both be set".to_string(),
        ));
    }
    if !prefs.include_days.is_empty() {
        debug!("includeDays {:?} supplied; it does not affect filtering", prefs.include_days);
    }
    Ok(())
}

fn slot_in_window(slot: &Slot, prefs: &Preferences) -> bool {
    if prefs.exclude_days.contains(&slot.day) {
        return false;
    }
    if let Some(after) = prefs.start_after {
        if slot.start < after {
            return false;
        }
    }
    if let Some(before) = prefs.start_before {
        if slot.start >= before {
            return false;
        }
    }
    if let Some(end) = prefs.end_before {
        if slot.end > end {
            return false;
        }
    }
    true
}

fn in_building(section: &Section, prefix: &str) -> bool {
    let prefix = prefix.to_lowercase();
    section.slots.iter().any(|slot| {
        slot.room
            .as_deref()
            .map(|r| r.trim().to_lowercase().starts_with(&prefix))
            .unwrap_or(false)
    })
}

/// True si la sección tiene cupo y cumple cada restricción dura.
pub fn section_passes(section: &Section, prefs: &Preferences) -> bool {
    if !section.is_open() {
        return false;
    }
    if !section.slots.iter().all(|s| slot_in_window(s, prefs)) {
        return false;
    }
    if let Some(prefix) = prefs.building() {
        if !in_building(section, prefix) {
            return false;
        }
    }
    if !prefs.avoid_instructors.is_empty() {
        let evitar: HashSet<String> = prefs
            .avoid_instructors
            .iter()
            .map(|p| p.trim().to_lowercase())
            .collect();
        if let Some(prof) = section.instructor.as_deref() {
            let prof = prof.trim().to_lowercase();
            if !prof.is_empty() && evitar.contains(&prof) {
                return false;
            }
        }
    }
    true
}

/// Subconjunto de `sections` que pasa el filtro, conservando el orden de entrada.
pub fn filter_sections(sections: &[Section], prefs: &Preferences) -> Vec<Section> {
    let kept: Vec<Section> = sections
        .iter()
        .filter(|s| section_passes(s, prefs))
        .cloned()
        .collect();
    if kept.len() < sections.len() {
        debug!(
            "   ⊘ filtro: {} de {} secciones descartadas",
            sections.len() - kept.len(),
            sections.len()
        );
    }
    kept
}
