// Funciones para detectar conflictos y parsear franjas horarias.
use crate::models::{parse_time, Assignment, Day, Section, Slot};

/// Dos bloques chocan si caen el mismo día y sus intervalos [start, end) se solapan.
/// Bloques contiguos (uno termina 09:30 y el otro parte 09:30) no chocan.
pub fn slots_conflict(a: &Slot, b: &Slot) -> bool {
    a.day == b.day && a.start < b.end && b.start < a.end
}

/// True si cualquiera de los bloques de `a` solapa con alguno de `b`.
pub fn sections_conflict(a: &Section, b: &Section) -> bool {
    a.slots
        .iter()
        .any(|s1| b.slots.iter().any(|s2| slots_conflict(s1, s2)))
}

/// Primer par de secciones (índices) que chocan dentro de una asignación.
pub fn find_conflict(assignment: &Assignment) -> Option<(usize, usize)> {
    let secs = assignment.sections();
    for i in 0..secs.len() {
        for j in (i + 1)..secs.len() {
            if sections_conflict(&secs[i], &secs[j]) {
                return Some((i, j));
            }
        }
    }
    None
}

pub fn is_conflict_free(assignment: &Assignment) -> bool {
    find_conflict(assignment).is_none()
}

/// Parsear una cadena de horario a bloques.
/// Ejemplo: "MON WED 08:30-10:00 SEC-A201" -> [(Mon,08:30,10:00,SEC-A201),(Wed,...)]
///
/// Los días pueden venir separados por espacios, '-' o '/' ("M-TH", "LU/MI").
/// Lo que sigue al rango horario se toma como sala. Si no hay un rango válido
/// o ningún día reconocible devuelve un vector vacío.
pub fn parse_slots(h: &str) -> Vec<Slot> {
    let parts: Vec<&str> = h.split_whitespace().collect();
    let time_idx = match parts.iter().position(|t| looks_like_range(t)) {
        Some(i) => i,
        None => return vec![],
    };
    let (start_raw, end_raw) = match parts[time_idx].split_once('-') {
        Some(p) => p,
        None => return vec![],
    };
    let (start, end) = match (parse_time(start_raw), parse_time(end_raw)) {
        (Some(s), Some(e)) if s < e => (s, e),
        _ => return vec![],
    };

    let mut days: Vec<Day> = Vec::new();
    for tok in &parts[..time_idx] {
        for piece in tok.split(['-', '/', ',']) {
            if piece.is_empty() {
                continue;
            }
            match Day::from_token(piece) {
                Some(d) if !days.contains(&d) => days.push(d),
                Some(_) => {}
                None => return vec![],
            }
        }
    }

    let room = parts[time_idx + 1..].join(" ");
    days.into_iter()
        .map(|d| {
            let slot = Slot::new(d, start, end);
            if room.is_empty() { slot } else { slot.with_room(room.clone()) }
        })
        .collect()
}

// "08:30-10:00" o "0830-1000"
fn looks_like_range(tok: &str) -> bool {
    tok.split_once('-')
        .map(|(a, b)| {
            a.chars().next().is_some_and(|c| c.is_ascii_digit())
                && b.chars().next().is_some_and(|c| c.is_ascii_digit())
        })
        .unwrap_or(false)
}
