// Motor de armado de horarios: filtro -> orden -> búsqueda -> puntaje -> grilla.
// Declarar submódulos (archivos en la carpeta `src/algorithm`)
pub mod builder;
pub mod conflict;
pub mod filters;
pub mod grid;
pub mod ordering;
pub mod scoring;
pub mod section_selector;

// Reexportar la API pública del motor
pub use builder::{
    build_schedule, build_schedule_response, normalize_courses, render_response, total_hours,
    ScheduleOutcome,
};
pub use conflict::{find_conflict, is_conflict_free, parse_slots, sections_conflict, slots_conflict};
pub use filters::{filter_sections, section_passes, validate_preferences};
pub use grid::project_weekly_grid;
pub use ordering::{order_by_constrainedness, CourseDomain};
pub use scoring::{gap_score, pick_best};
pub use section_selector::{search, Deadline, SearchMode, SearchResult, SearchStats};
