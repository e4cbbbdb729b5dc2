// builder.rs - Orquestador de build_schedule
//
// Pipeline:
// PHASE 0: validar preferencias (InvalidPreference) y fijar el plazo
// PHASE 1: pedir secciones al catálogo por ramo (InvalidCourseCode)
// PHASE 2: filtro de preferencias duras (NoOpenSections, falla rápido)
// PHASE 3: ordenar ramos por cantidad de candidatos
// PHASE 4: búsqueda con forward checking (Infeasible / Timeout)
// PHASE 5: si hay preferBreaks/preferCompact, elegir por gap score
//
// La grilla y totalHours se calculan al armar la respuesta (`render_response`).

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::algorithm::filters::{filter_sections, validate_preferences};
use crate::algorithm::grid::project_weekly_grid;
use crate::algorithm::ordering::{order_by_constrainedness, CourseDomain};
use crate::algorithm::scoring::pick_best;
use crate::algorithm::section_selector::{search, Deadline, SearchMode, SearchStats};
use crate::catalog::SectionCatalog;
use crate::config::{EngineConfig, TotalHoursMode, LEGACY_HOURS_PER_SLOT};
use crate::error::ScheduleError;
use crate::models::{Assignment, CourseCode, Preferences, ScheduleEntry, ScheduleResponse};

/// Resultado exitoso de `build_schedule`.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// Una sección por ramo, en el orden en que se pidieron los ramos.
    pub assignment: Assignment,
    /// Gap score de la asignación elegida cuando hubo preferencia de puntaje.
    pub gap_score: Option<i64>,
    /// Asignaciones factibles evaluadas (1 en first-fit).
    pub pool_len: usize,
    /// El pool se cortó por plazo antes de llenarse.
    pub timed_out: bool,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

/// Ramos pedidos sin espacios sobrantes ni repetidos, en el orden pedido.
pub fn normalize_courses(course_codes: &[CourseCode]) -> Vec<CourseCode> {
    let mut out: Vec<CourseCode> = Vec::with_capacity(course_codes.len());
    for c in course_codes {
        let c = c.trim();
        if c.is_empty() {
            continue;
        }
        if out.iter().any(|x| x == c) {
            debug!("   ramo repetido en la solicitud: {}", c);
            continue;
        }
        out.push(c.to_string());
    }
    out
}

pub fn build_schedule<C: SectionCatalog + ?Sized>(
    catalog: &C,
    course_codes: &[CourseCode],
    preferences: &Preferences,
    term: &str,
    config: &EngineConfig,
) -> Result<ScheduleOutcome, ScheduleError> {
    let deadline = Deadline::after(config.timeout);
    validate_preferences(preferences)?;

    let courses = normalize_courses(course_codes);
    info!("🔁 build_schedule: {} ramos, término {}", courses.len(), term);

    // PHASE 1 + 2: catálogo y filtro, fallando rápido antes de buscar
    let mut domains: Vec<CourseDomain> = Vec::with_capacity(courses.len());
    for course in &courses {
        let offered = catalog.sections_for(course, term)?;
        if offered.is_empty() {
            warn!("   ⊘ {} no tiene secciones en {}", course, term);
            return Err(ScheduleError::InvalidCourseCode {
                course: course.clone(),
                term: term.to_string(),
            });
        }
        let candidates = filter_sections(&offered, preferences);
        if candidates.is_empty() {
            warn!("   ⊘ {}: ninguna de {} secciones pasa el filtro", course, offered.len());
            return Err(ScheduleError::NoOpenSections { course: course.clone() });
        }
        debug!("   {}: {} de {} secciones candidatas", course, candidates.len(), offered.len());
        domains.push(CourseDomain::new(course.clone(), candidates));
    }

    // PHASE 3
    let domains = order_by_constrainedness(domains);
    debug!(
        "   orden de búsqueda: {:?}",
        domains.iter().map(|d| (d.course.as_str(), d.len())).collect::<Vec<_>>()
    );

    // PHASE 4
    let goal = preferences.gap_preference();
    let mode = match goal {
        None => SearchMode::FirstFit,
        Some(_) => SearchMode::BestOfPool { pool_size: config.pool_size },
    };
    let result = match search(&domains, mode, &deadline) {
        Ok(r) => r,
        Err(e) => {
            warn!("❌ build_schedule: {}", e);
            return Err(e);
        }
    };
    if result.timed_out {
        warn!(
            "⚠️  plazo vencido con {} asignaciones en el pool; se puntúa lo encontrado",
            result.assignments.len()
        );
    }

    // PHASE 5
    let pool_len = result.assignments.len();
    let (chosen, gap_score) = match goal {
        Some(g) => match pick_best(result.assignments, g) {
            Some((a, score)) => (a, Some(score)),
            None => return Err(ScheduleError::Infeasible),
        },
        None => match result.assignments.into_iter().next() {
            Some(a) => (a, None),
            None => return Err(ScheduleError::Infeasible),
        },
    };

    let outcome = ScheduleOutcome {
        assignment: chosen.ordered_by(&courses),
        gap_score,
        pool_len,
        timed_out: result.timed_out,
        stats: result.stats,
        elapsed: deadline.elapsed(),
    };
    info!(
        "✅ build_schedule: {} secciones en {} ms (pool {})",
        outcome.assignment.len(),
        outcome.elapsed.as_millis(),
        outcome.pool_len
    );
    Ok(outcome)
}

/// `totalHours` según el modo configurado.
pub fn total_hours(assignment: &Assignment, mode: TotalHoursMode) -> f64 {
    match mode {
        TotalHoursMode::Legacy => assignment.slot_count() as f64 * LEGACY_HOURS_PER_SLOT,
        TotalHoursMode::Actual => {
            let minutes: i64 = assignment.slots().map(|(_, s)| s.duration_minutes()).sum();
            (minutes as f64 / 60.0 * 100.0).round() / 100.0
        }
    }
}

/// Convierte el resultado en el envelope JSON de salida.
pub fn render_response(
    result: &Result<ScheduleOutcome, ScheduleError>,
    mode: TotalHoursMode,
) -> ScheduleResponse {
    match result {
        Ok(outcome) => {
            let a = &outcome.assignment;
            let mut message = if a.is_empty() {
                "No courses requested".to_string()
            } else {
                format!("Found a conflict-free schedule for {} course(s)", a.len())
            };
            if let Some(score) = outcome.gap_score {
                message.push_str(&format!(
                    "; picked the best of {} candidate schedule(s) with {} minute(s) of gaps",
                    outcome.pool_len, score
                ));
            }
            if outcome.timed_out {
                message.push_str(" (search stopped at the time limit)");
            }
            ScheduleResponse {
                success: true,
                schedule: a.sections().iter().map(ScheduleEntry::from).collect(),
                weekly_grid: project_weekly_grid(a),
                total_hours: total_hours(a, mode),
                message,
                error_kind: None,
                gap_score: outcome.gap_score,
            }
        }
        Err(e) => ScheduleResponse::failure(e.kind(), e.to_string()),
    }
}

/// `build_schedule` + `render_response` en un paso.
pub fn build_schedule_response<C: SectionCatalog + ?Sized>(
    catalog: &C,
    course_codes: &[CourseCode],
    preferences: &Preferences,
    term: &str,
    config: &EngineConfig,
) -> ScheduleResponse {
    let result = build_schedule(catalog, course_codes, preferences, term, config);
    render_response(&result, config.total_hours)
}
