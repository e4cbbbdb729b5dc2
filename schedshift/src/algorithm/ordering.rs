use crate::models::{CourseCode, Section};

/// Ramo con sus secciones candidatas ya filtradas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDomain {
    pub course: CourseCode,
    pub candidates: Vec<Section>,
}

impl CourseDomain {
    pub fn new(course: impl Into<String>, candidates: Vec<Section>) -> Self {
        Self { course: course.into(), candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Heurística most-constrained-variable: ramos con menos candidatos primero.
/// El sort es estable, así que los empates respetan el orden de entrada.
pub fn order_by_constrainedness(mut domains: Vec<CourseDomain>) -> Vec<CourseDomain> {
    domains.sort_by_key(CourseDomain::len);
    domains
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dom(course: &str, n: usize) -> CourseDomain {
        let secs = (0..n).map(|i| Section::new(course, format!("S{}", i))).collect();
        CourseDomain::new(course, secs)
    }

    #[test]
    fn test_fewest_candidates_first() {
        let ordered = order_by_constrainedness(vec![dom("A", 3), dom("B", 1), dom("C", 2)]);
        let names: Vec<&str> = ordered.iter().map(|d| d.course.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ordered = order_by_constrainedness(vec![dom("X", 2), dom("Y", 1), dom("Z", 2), dom("W", 1)]);
        let names: Vec<&str> = ordered.iter().map(|d| d.course.as_str()).collect();
        assert_eq!(names, vec!["Y", "W", "X", "Z"]);
    }
}
