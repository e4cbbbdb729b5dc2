// Estructuras de datos principales: días, bloques horarios y secciones.
//
// Todo se crea por request a partir de lo que entrega el catálogo y se
// descarta al terminar `build_schedule`; no hay estado compartido mutable.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

mod preferences;
mod schedule;

pub use preferences::{GapPreference, Preferences};
pub use schedule::{Assignment, ScheduleEntry, ScheduleResponse, WeeklyGrid};

/// Identificador opaco de un ramo, único dentro de un término.
pub type CourseCode = String;

/// Instructor reportado cuando el catálogo no trae uno.
pub const DEFAULT_INSTRUCTOR: &str = "TBA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    /// Columnas de la grilla semanal, en orden.
    pub const ALL: [Day; 6] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri, Day::Sat];

    pub fn label(self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Reconoce abreviaturas en inglés (MON, M, TH...) y las usadas en la
    /// oferta académica en español (LU, MA, MI, JU, VI, SA).
    pub fn from_token(token: &str) -> Option<Day> {
        let t = token.trim().to_uppercase();
        let day = match t.as_str() {
            "M" | "MON" | "MONDAY" | "LU" | "LUN" | "LUNES" => Day::Mon,
            "T" | "TU" | "TUE" | "TUES" | "TUESDAY" | "MA" | "MAR" | "MARTES" => Day::Tue,
            "W" | "WED" | "WEDNESDAY" | "MI" | "MIE" | "MIERCOLES" | "MIÉRCOLES" => Day::Wed,
            "TH" | "THU" | "THUR" | "THURS" | "THURSDAY" | "JU" | "JUE" | "JUEVES" => Day::Thu,
            "F" | "FRI" | "FRIDAY" | "VI" | "VIE" | "VIERNES" => Day::Fri,
            "S" | "SAT" | "SATURDAY" | "SA" | "SAB" | "SÁB" | "SABADO" | "SÁBADO" => Day::Sat,
            _ => return None,
        };
        Some(day)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::from_token(s).ok_or_else(|| format!("unknown day '{}'", s))
    }
}

impl TryFrom<String> for Day {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Parsea una hora del día: "08:30", "8:30", "0830", "08.30" o "08:30:00".
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let tok = raw.trim().replace('.', ":");
    if tok.is_empty() {
        return None;
    }
    if let Ok(t) = NaiveTime::parse_from_str(&tok, "%H:%M") {
        return Some(t);
    }
    if let Ok(t) = NaiveTime::parse_from_str(&tok, "%H:%M:%S") {
        return Some(t);
    }
    // forma compacta militar: 830 / 0830
    if (3..=4).contains(&tok.len()) && tok.chars().all(|c| c.is_ascii_digit()) {
        let (hh, mm) = tok.split_at(tok.len() - 2);
        let hh = hh.parse::<u32>().ok()?;
        let mm = mm.parse::<u32>().ok()?;
        return NaiveTime::from_hms_opt(hh, mm, 0);
    }
    None
}

pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Serde para horas en formato "HH:MM".
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_time(*t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day '{}'", raw)))
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(t: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
            match t {
                Some(t) => s.serialize_some(&crate::models::format_time(*t)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            match raw {
                None => Ok(None),
                Some(r) if r.trim().is_empty() => Ok(None),
                Some(r) => crate::models::parse_time(&r)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day '{}'", r))),
            }
        }
    }
}

/// Un bloque de reunión: día, rango horario [start, end) y sala opcional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub day: Day,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    #[serde(default)]
    pub room: Option<String>,
}

impl Slot {
    pub fn new(day: Day, start: NaiveTime, end: NaiveTime) -> Self {
        Self { day, start, end, room: None }
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// start < end
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Etiqueta de fila de la grilla: "08:00-09:30".
    pub fn time_label(&self) -> String {
        format!("{}-{}", format_time(self.start), format_time(self.end))
    }
}

/// Una sección ofrecida de un ramo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub course: CourseCode,
    pub section_id: String,
    #[serde(default)]
    pub instructor: Option<String>,
    pub free_slots: u32,
    #[serde(default)]
    pub slots: Vec<Slot>,
}

impl Section {
    pub fn new(course: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self {
            course: course.into(),
            section_id: section_id.into(),
            instructor: None,
            free_slots: 1,
            slots: Vec::new(),
        }
    }

    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    pub fn with_free_slots(mut self, free_slots: u32) -> Self {
        self.free_slots = free_slots;
        self
    }

    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn with_slots(mut self, slots: impl IntoIterator<Item = Slot>) -> Self {
        self.slots.extend(slots);
        self
    }

    /// Sólo las secciones con cupo son candidatas.
    pub fn is_open(&self) -> bool {
        self.free_slots > 0
    }

    pub fn instructor_or_tba(&self) -> &str {
        match self.instructor.as_deref() {
            Some(i) if !i.trim().is_empty() => i,
            _ => DEFAULT_INSTRUCTOR,
        }
    }

    /// "<course> (<section>)", usado en las celdas de la grilla.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.course, self.section_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_formats() {
        let t = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        assert_eq!(parse_time("08:30"), Some(t));
        assert_eq!(parse_time("8:30"), Some(t));
        assert_eq!(parse_time("0830"), Some(t));
        assert_eq!(parse_time("830"), Some(t));
        assert_eq!(parse_time("08.30"), Some(t));
        assert_eq!(parse_time("08:30:00"), Some(t));
        assert_eq!(parse_time("25:00"), None);
        assert_eq!(parse_time("tarde"), None);
    }

    #[test]
    fn test_day_tokens() {
        assert_eq!(Day::from_token("lu"), Some(Day::Mon));
        assert_eq!(Day::from_token("TH"), Some(Day::Thu));
        assert_eq!(Day::from_token("Saturday"), Some(Day::Sat));
        assert_eq!(Day::from_token("DO"), None);
        assert_eq!("Wed".parse::<Day>(), Ok(Day::Wed));
    }

    #[test]
    fn test_slot_json_uses_hhmm() {
        let slot: Slot = serde_json::from_str(r#"{"day":"MA","start":"1000","end":"11:30","room":"SEC-A201"}"#).unwrap();
        assert_eq!(slot.day, Day::Tue);
        assert_eq!(slot.duration_minutes(), 90);
        assert_eq!(slot.time_label(), "10:00-11:30");
        let back = serde_json::to_value(&slot).unwrap();
        assert_eq!(back["day"], "Tue");
        assert_eq!(back["start"], "10:00");
    }

    #[test]
    fn test_instructor_defaults_to_tba() {
        let s = Section::new("CSCI 111", "A");
        assert_eq!(s.instructor_or_tba(), "TBA");
        let s = s.with_instructor("  ");
        assert_eq!(s.instructor_or_tba(), "TBA");
        let s = Section::new("CSCI 111", "A").with_instructor("Dr. Reyes");
        assert_eq!(s.instructor_or_tba(), "Dr. Reyes");
    }
}
