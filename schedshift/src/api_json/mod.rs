use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::models::{CourseCode, Preferences};

/// Parámetros de entrada de POST /schedule
///
/// # Estructura del JSON esperado:
/// ```json
/// {
///   "courses": ["MATH 30.13", "CSCI 111"],
///   "term": "2024-2",
///   "preferences": {
///     "excludeDays": ["Sat"],
///     "startAfter": "08:00",
///     "preferCompact": true
///   },
///   "timeoutMs": 3000,
///   "poolSize": 10
/// }
/// ```
///
/// # Campos:
/// - `courses` (alias `courseCodes`): ramos a inscribir (requerido)
/// - `term`: término académico del catálogo (requerido)
/// - `preferences`: restricciones duras y preferencias blandas (opcional)
/// - `timeoutMs` / `poolSize`: sobrescriben la configuración del motor sólo
///   para esta solicitud (opcional)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(alias = "courseCodes")]
    pub courses: Vec<CourseCode>,
    pub term: String,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<usize>,
}

pub fn parse_json_input(json_str: &str) -> Result<ScheduleRequest, serde_json::Error> {
    serde_json::from_str::<ScheduleRequest>(json_str)
}

impl ScheduleRequest {
    /// Configuración efectiva: la base del servidor con los overrides del request.
    ///
    /// Un request sólo puede achicar el plazo y el pool; los valores del
    /// servidor son el máximo.
    pub fn engine_config(&self, base: &EngineConfig) -> EngineConfig {
        let mut cfg = base.clone();
        if let Some(ms) = self.timeout_ms {
            let pedido = Duration::from_millis(ms);
            if pedido > base.timeout {
                debug!("timeoutMs {} capped to {} ms", ms, base.timeout.as_millis());
            }
            cfg = cfg.with_timeout(pedido.min(base.timeout));
        }
        if let Some(n) = self.pool_size {
            if n > base.pool_size {
                debug!("poolSize {} capped to {}", n, base.pool_size);
            }
            cfg = cfg.with_pool_size(n.min(base.pool_size));
        }
        cfg
    }

    /// Ejemplo usado por GET /help.
    pub fn example() -> Self {
        let preferences: Preferences = serde_json::from_value(serde_json::json!({
            "excludeDays": ["Sat"],
            "startAfter": "08:00",
            "endBefore": "18:00",
            "preferCompact": true
        }))
        .unwrap_or_default();
        Self {
            courses: vec!["MATH 30.13".to_string(), "CSCI 111".to_string()],
            term: "2024-2".to_string(),
            preferences,
            timeout_ms: None,
            pool_size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Day;

    #[test]
    fn test_parse_json_with_preferences() {
        let json_data = r#"
        {
            "courseCodes": ["MATH 30.13", "CSCI 111"],
            "term": "2024-2",
            "preferences": {
                "excludeDays": ["Saturday"],
                "startBefore": "15:00",
                "buildingPrefix": "SEC",
                "preferBreaks": true,
                "avoidInstructors": ["Dr. Cruz"]
            },
            "timeoutMs": 1500,
            "poolSize": 5
        }
        "#;

        let req = parse_json_input(json_data).expect("Debe parsear JSON con preferencias");
        assert_eq!(req.courses, vec!["MATH 30.13", "CSCI 111"]);
        assert_eq!(req.term, "2024-2");
        assert!(req.preferences.exclude_days.contains(&Day::Sat));
        assert!(req.preferences.prefer_breaks);
        assert_eq!(req.preferences.avoid_instructors, vec!["Dr. Cruz"]);

        let cfg = req.engine_config(&EngineConfig::default());
        assert_eq!(cfg.timeout, Duration::from_millis(1500));
        assert_eq!(cfg.pool_size, 5);
    }

    #[test]
    fn test_request_overrides_are_capped_by_server() {
        let json_data = format!(
            r#"{{"courses": ["CSCI 111"], "term": "2024-2", "timeoutMs": {}, "poolSize": {}}}"#,
            u64::MAX,
            usize::MAX
        );
        let req = parse_json_input(&json_data).expect("Debe parsear overrides enormes");
        let base = EngineConfig::default();
        let cfg = req.engine_config(&base);
        assert_eq!(cfg.timeout, base.timeout);
        assert_eq!(cfg.pool_size, base.pool_size);

        // un servidor más estricto también acota
        let estricto = EngineConfig::default()
            .with_timeout(Duration::from_millis(800))
            .with_pool_size(3);
        let cfg = req.engine_config(&estricto);
        assert_eq!(cfg.timeout, Duration::from_millis(800));
        assert_eq!(cfg.pool_size, 3);

        let req = parse_json_input(r#"{"courses": [], "term": "t", "timeoutMs": 0, "poolSize": 0}"#).unwrap();
        let cfg = req.engine_config(&base);
        assert_eq!(cfg.timeout, Duration::ZERO);
        assert_eq!(cfg.pool_size, 1);
    }

    #[test]
    fn test_parse_json_sin_preferencias() {
        let json_data = r#"{"courses": ["CSCI 111"], "term": "2024-2"}"#;
        let req = parse_json_input(json_data).expect("Debe parsear JSON sin preferencias");
        assert_eq!(req.preferences, Preferences::default());
        assert_eq!(req.engine_config(&EngineConfig::default()), EngineConfig::default());
    }

    #[test]
    fn test_missing_term_is_an_error() {
        assert!(parse_json_input(r#"{"courses": ["CSCI 111"]}"#).is_err());
    }

    #[test]
    fn test_example_round_trips() {
        let ex = ScheduleRequest::example();
        assert!(ex.preferences.prefer_compact);
        let text = serde_json::to_string(&ex).unwrap();
        let back = parse_json_input(&text).unwrap();
        assert_eq!(back.courses, ex.courses);
        assert_eq!(back.preferences, ex.preferences);
    }
}
