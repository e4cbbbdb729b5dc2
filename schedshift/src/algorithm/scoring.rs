// Gap score: minutos libres entre clases consecutivas del mismo día,
// sumados sobre la semana. Se usa para elegir dentro del pool cuando el
// estudiante pide `preferBreaks` (máximo) o `preferCompact` (mínimo).
use std::collections::BTreeMap;

use chrono::NaiveTime;

use crate::models::{Assignment, Day, GapPreference};

pub fn gap_score(assignment: &Assignment) -> i64 {
    let mut by_day: BTreeMap<Day, Vec<(NaiveTime, NaiveTime)>> = BTreeMap::new();
    for (_, slot) in assignment.slots() {
        by_day.entry(slot.day).or_default().push((slot.start, slot.end));
    }

    let mut total = 0i64;
    for blocks in by_day.values_mut() {
        blocks.sort();
        for pair in blocks.windows(2) {
            let gap = (pair[1].0 - pair[0].1).num_minutes();
            total += gap.max(0);
        }
    }
    total
}

/// Elige la asignación con el gap score extremo según `goal`. Ante empate gana
/// la que apareció primero en el pool.
pub fn pick_best(pool: Vec<Assignment>, goal: GapPreference) -> Option<(Assignment, i64)> {
    let mut best: Option<(Assignment, i64)> = None;
    for candidate in pool {
        let score = gap_score(&candidate);
        let better = match &best {
            None => true,
            Some((_, current)) => match goal {
                GapPreference::MaximizeGaps => score > *current,
                GapPreference::MinimizeGaps => score < *current,
            },
        };
        if better {
            best = Some((candidate, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::conflict::parse_slots;
    use crate::models::Section;

    fn asg(horarios: &[(&str, &str)]) -> Assignment {
        Assignment::new(
            horarios
                .iter()
                .map(|(id, h)| Section::new(format!("C-{}", id), *id).with_slots(parse_slots(h)))
                .collect(),
        )
    }

    #[test]
    fn test_gap_score_same_day() {
        // 08:00-09:30, 10:00-11:30, 13:00-14:30 el lunes -> 30 + 90
        let a = asg(&[("1", "MON 10:00-11:30"), ("2", "MON 08:00-09:30"), ("3", "MON 13:00-14:30")]);
        assert_eq!(gap_score(&a), 120);
    }

    #[test]
    fn test_gap_score_ignores_cross_day_and_back_to_back() {
        let a = asg(&[("1", "MON 08:00-09:30"), ("2", "MON 09:30-11:00"), ("3", "TUE 15:00-16:00")]);
        assert_eq!(gap_score(&a), 0);
        assert_eq!(gap_score(&Assignment::default()), 0);
    }

    #[test]
    fn test_gap_score_multi_slot_sections() {
        let a = asg(&[("1", "MON WED 08:00-09:00"), ("2", "MON WED 10:00-11:00")]);
        assert_eq!(gap_score(&a), 120);
    }

    #[test]
    fn test_pick_best_extremes_and_ties() {
        let tight = asg(&[("1", "MON 08:00-09:00"), ("2", "MON 09:00-10:00")]);
        let loose = asg(&[("1", "MON 08:00-09:00"), ("3", "MON 12:00-13:00")]);
        let tight_again = asg(&[("4", "TUE 08:00-09:00"), ("5", "TUE 09:00-10:00")]);
        let pool = vec![tight.clone(), loose.clone(), tight_again];

        let (best, score) = pick_best(pool.clone(), GapPreference::MaximizeGaps).unwrap();
        assert_eq!(best, loose);
        assert_eq!(score, 180);

        // empate en 0: gana el primero encontrado
        let (best, score) = pick_best(pool, GapPreference::MinimizeGaps).unwrap();
        assert_eq!(best, tight);
        assert_eq!(score, 0);

        assert!(pick_best(Vec::new(), GapPreference::MinimizeGaps).is_none());
    }
}
