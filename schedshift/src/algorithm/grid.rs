// Proyección de una asignación a la grilla semanal (Mon..Sat x franjas).
use std::collections::BTreeSet;

use chrono::NaiveTime;

use crate::models::{Assignment, Day, WeeklyGrid};

/// Función pura: misma asignación => misma grilla.
///
/// Filas: franjas "HH:MM-HH:MM" distintas, ordenadas por inicio y luego término.
/// Celda: "<ramo> (<sección>)" o vacío.
pub fn project_weekly_grid(assignment: &Assignment) -> WeeklyGrid {
    let franjas: BTreeSet<(NaiveTime, NaiveTime)> =
        assignment.slots().map(|(_, s)| (s.start, s.end)).collect();
    let franjas: Vec<_> = franjas.into_iter().collect();

    let columns = Day::ALL.to_vec();
    let mut cells = vec![vec![String::new(); columns.len()]; franjas.len()];

    for (section, slot) in assignment.slots() {
        let Some(row) = franjas.iter().position(|f| *f == (slot.start, slot.end)) else {
            continue;
        };
        let cell = &mut cells[row][slot.day.index()];
        let label = section.display_label();
        // una misma sección puede repetir el bloque; no duplicar la etiqueta
        if cell.is_empty() {
            *cell = label;
        } else if !cell.split(" / ").any(|l| l == label) {
            cell.push_str(" / ");
            cell.push_str(&label);
        }
    }

    let rows = franjas
        .iter()
        .map(|(start, end)| format!("{}-{}", start.format("%H:%M"), end.format("%H:%M")))
        .collect();

    WeeklyGrid { columns, rows, cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::conflict::parse_slots;
    use crate::models::Section;

    fn sample() -> Assignment {
        Assignment::new(vec![
            Section::new("MATH 30.13", "B").with_slots(parse_slots("TUE FRI 10:00-11:30")),
            Section::new("CSCI 111", "X").with_slots(parse_slots("MON THU 08:00-09:30")),
        ])
    }

    #[test]
    fn test_grid_layout() {
        let g = project_weekly_grid(&sample());
        assert_eq!(g.columns, Day::ALL.to_vec());
        assert_eq!(g.rows, vec!["08:00-09:30", "10:00-11:30"]);
        assert_eq!(g.cells.len(), 2);
        assert!(g.cells.iter().all(|r| r.len() == 6));
        assert_eq!(g.cell("08:00-09:30", Day::Mon), Some("CSCI 111 (X)"));
        assert_eq!(g.cell("08:00-09:30", Day::Thu), Some("CSCI 111 (X)"));
        assert_eq!(g.cell("10:00-11:30", Day::Fri), Some("MATH 30.13 (B)"));
        assert_eq!(g.cell("10:00-11:30", Day::Mon), Some(""));
        assert_eq!(g.cell("07:00-08:00", Day::Mon), None);
    }

    #[test]
    fn test_grid_is_idempotent() {
        let a = sample();
        let g1 = project_weekly_grid(&a);
        let g2 = project_weekly_grid(&a);
        assert_eq!(g1, g2);
        assert_eq!(serde_json::to_string(&g1).unwrap(), serde_json::to_string(&g2).unwrap());
    }

    #[test]
    fn test_empty_assignment_grid() {
        let g = project_weekly_grid(&Assignment::default());
        assert!(g.is_empty());
        assert_eq!(g.columns.len(), 6);
    }
}
