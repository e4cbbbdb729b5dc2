//! Búsqueda con backtracking + forward checking para elegir exactamente una
//! sección por ramo sin choques de horario.
//!
//! Los ramos llegan ya ordenados (menos candidatos primero). Cada paso de la
//! recursión recibe su propio `SearchNode`: la asignación parcial y los
//! dominios restantes de los ramos que faltan, como índices dentro de
//! `CourseDomain::candidates`. Al ramificar se construye un nodo nuevo, de modo
//! que hermanos en el árbol nunca ven la poda del otro.
//!
//! El plazo (`Deadline`) se pasa explícitamente y se revisa al entrar a cada
//! llamada recursiva y antes de evaluar cada candidato.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::algorithm::conflict::sections_conflict;
use crate::algorithm::ordering::CourseDomain;
use crate::error::ScheduleError;
use crate::models::{Assignment, Section};

/// Instante límite fijado una sola vez al inicio de `build_schedule`.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    at: Instant,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        let started = Instant::now();
        Self { started, at: started + timeout }
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.at
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Devuelve la primera asignación completa y se detiene.
    FirstFit,
    /// Junta hasta `pool_size` asignaciones distintas para puntuarlas después.
    BestOfPool { pool_size: usize },
}

impl SearchMode {
    fn limit(self) -> usize {
        match self {
            SearchMode::FirstFit => 1,
            SearchMode::BestOfPool { pool_size } => pool_size.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Llamadas recursivas.
    pub nodes: u64,
    /// Candidatos descartados por chocar con lo ya asignado.
    pub rejected: u64,
    /// Candidatos descartados porque dejaban sin dominio a un ramo futuro.
    pub pruned: u64,
    pub backtracks: u64,
}

impl SearchStats {
    fn absorb(&mut self, other: SearchStats) {
        self.nodes += other.nodes;
        self.rejected += other.rejected;
        self.pruned += other.pruned;
        self.backtracks += other.backtracks;
    }
}

/// Resultado de una búsqueda que encontró al menos una asignación.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Asignaciones en el orden en que se encontraron, secciones en el orden
    /// de `domains`.
    pub assignments: Vec<Assignment>,
    /// El plazo venció antes de llenar el pool (sólo en best-of-pool).
    pub timed_out: bool,
    pub stats: SearchStats,
}

#[derive(Debug, Clone)]
struct SearchNode {
    /// Índice de la sección elegida para cada ramo ya fijado.
    assigned: Vec<usize>,
    /// Dominios de los ramos pendientes; `remaining[0]` es el ramo actual.
    remaining: Vec<Vec<usize>>,
}

impl SearchNode {
    fn root(domains: &[CourseDomain]) -> Self {
        Self {
            assigned: Vec::with_capacity(domains.len()),
            remaining: domains.iter().map(|d| (0..d.len()).collect()).collect(),
        }
    }
}

enum Flow {
    Continue,
    Done,
}

struct Expired;

struct Search<'a> {
    domains: &'a [CourseDomain],
    limit: usize,
    found: Vec<Vec<usize>>,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    fn new(domains: &'a [CourseDomain], mode: SearchMode) -> Self {
        Self { domains, limit: mode.limit(), found: Vec::new(), stats: SearchStats::default() }
    }

    fn section(&self, pos: usize, idx: usize) -> &'a Section {
        &self.domains[pos].candidates[idx]
    }

    fn explore(&mut self, node: &SearchNode, deadline: &Deadline) -> Result<Flow, Expired> {
        if deadline.expired() {
            return Err(Expired);
        }
        self.stats.nodes += 1;

        let depth = node.assigned.len();
        if depth == self.domains.len() {
            // cada hoja es un camino de índices único en el árbol, así que el
            // pool nunca repite asignaciones
            self.found.push(node.assigned.clone());
            return Ok(if self.found.len() >= self.limit { Flow::Done } else { Flow::Continue });
        }

        for &cand in &node.remaining[0] {
            if deadline.expired() {
                return Err(Expired);
            }
            let Some(child) = self.try_candidate(node, cand) else {
                continue;
            };
            if let Flow::Done = self.explore(&child, deadline)? {
                return Ok(Flow::Done);
            }
        }

        self.stats.backtracks += 1;
        Ok(Flow::Continue)
    }

    /// Chequea `cand` contra lo asignado y aplica forward checking sobre los
    /// ramos pendientes. `None` si choca o si algún dominio futuro queda vacío.
    fn try_candidate(&mut self, node: &SearchNode, cand: usize) -> Option<SearchNode> {
        let depth = node.assigned.len();
        let chosen = self.section(depth, cand);

        let clashes = node
            .assigned
            .iter()
            .enumerate()
            .any(|(pos, &idx)| sections_conflict(self.section(pos, idx), chosen));
        if clashes {
            self.stats.rejected += 1;
            return None;
        }

        let mut remaining = Vec::with_capacity(node.remaining.len().saturating_sub(1));
        for (offset, domain) in node.remaining.iter().enumerate().skip(1) {
            let pos = depth + offset;
            let kept: Vec<usize> = domain
                .iter()
                .copied()
                .filter(|&j| !sections_conflict(chosen, self.section(pos, j)))
                .collect();
            if kept.is_empty() {
                self.stats.pruned += 1;
                return None;
            }
            remaining.push(kept);
        }

        let mut assigned = node.assigned.clone();
        assigned.push(cand);
        Some(SearchNode { assigned, remaining })
    }
}

fn materialize(domains: &[CourseDomain], path: &[usize]) -> Assignment {
    Assignment::new(
        path.iter()
            .enumerate()
            .map(|(pos, &idx)| domains[pos].candidates[idx].clone())
            .collect(),
    )
}

/// Ejecuta la búsqueda sobre `domains` (ya filtrados y ordenados).
///
/// - `Ok` con al menos una asignación si hubo éxito; en best-of-pool puede
///   venir con `timed_out = true` si el plazo cortó la recolección.
/// - `Err(Infeasible)` si se agotó el espacio sin solución.
/// - `Err(Timeout)` si el plazo venció sin ninguna solución.
pub fn search(
    domains: &[CourseDomain],
    mode: SearchMode,
    deadline: &Deadline,
) -> Result<SearchResult, ScheduleError> {
    let (paths, timed_out, stats) = run(domains, mode, deadline);

    debug!(
        "   búsqueda: {} nodos, {} rechazados, {} podados, {} backtracks",
        stats.nodes, stats.rejected, stats.pruned, stats.backtracks
    );

    if paths.is_empty() {
        return Err(if timed_out {
            ScheduleError::Timeout { elapsed_ms: deadline.elapsed().as_millis() }
        } else {
            ScheduleError::Infeasible
        });
    }

    let assignments = paths.iter().map(|p| materialize(domains, p)).collect();
    Ok(SearchResult { assignments, timed_out, stats })
}

#[cfg(not(feature = "parallel"))]
fn run(
    domains: &[CourseDomain],
    mode: SearchMode,
    deadline: &Deadline,
) -> (Vec<Vec<usize>>, bool, SearchStats) {
    let mut s = Search::new(domains, mode);
    let timed_out = s.explore(&SearchNode::root(domains), deadline).is_err();
    (s.found, timed_out, s.stats)
}

/// Variante paralela: cada candidato del primer ramo se explora en su propio
/// worker con su propia copia de los dominios. Los resultados se juntan en el
/// orden de los candidatos, así que la salida coincide con la secuencial.
#[cfg(feature = "parallel")]
fn run(
    domains: &[CourseDomain],
    mode: SearchMode,
    deadline: &Deadline,
) -> (Vec<Vec<usize>>, bool, SearchStats) {
    use rayon::prelude::*;

    let root = SearchNode::root(domains);
    if domains.is_empty() || deadline.expired() {
        let mut s = Search::new(domains, mode);
        let timed_out = s.explore(&root, deadline).is_err();
        return (s.found, timed_out, s.stats);
    }
    let mut stats = SearchStats { nodes: 1, ..SearchStats::default() };

    struct Branch {
        found: Vec<Vec<usize>>,
        expired: bool,
        stats: SearchStats,
    }

    let branches: Vec<Branch> = root.remaining[0]
        .par_iter()
        .map(|&cand| {
            let mut s = Search::new(domains, mode);
            if deadline.expired() {
                return Branch { found: Vec::new(), expired: true, stats: s.stats };
            }
            let expired = match s.try_candidate(&root, cand) {
                Some(child) => s.explore(&child, deadline).is_err(),
                None => false,
            };
            Branch { found: s.found, expired, stats: s.stats }
        })
        .collect();

    let limit = mode.limit();
    let mut found: Vec<Vec<usize>> = Vec::new();
    let mut timed_out = false;
    for b in branches {
        stats.absorb(b.stats);
        for path in b.found {
            if found.len() < limit {
                found.push(path);
            }
        }
        if found.len() >= limit {
            break;
        }
        // una rama que venció antes de llenar el pool corta la mezcla, igual
        // que en la búsqueda secuencial
        if b.expired {
            timed_out = true;
            break;
        }
    }
    if found.is_empty() && !timed_out {
        stats.backtracks += 1;
    }
    (found, timed_out, stats)
}
