use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use tracing::{info, warn};

use crate::algorithm::{build_schedule, render_response};
use crate::api_json::ScheduleRequest;
use crate::error::ErrorKind;
use crate::models::ScheduleResponse;
use crate::server::AppState;

/// 200 para resultados del motor (éxito o fallo de armado), 400 para
/// preferencias contradictorias y 500 si falló el catálogo.
pub fn status_for(resp: &ScheduleResponse) -> StatusCode {
    match resp.error_kind {
        Some(ErrorKind::InvalidPreference) => StatusCode::BAD_REQUEST,
        Some(ErrorKind::Catalog) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::OK,
    }
}

/// POST /schedule
pub async fn schedule_handler(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let request: ScheduleRequest = match serde_json::from_value(body.into_inner()) {
        Ok(r) => r,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("failed to parse input: {}", e)}));
        }
    };

    let client_ip = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string();
    let start = std::time::Instant::now();

    // cada request corre en su propio hilo bloqueante; el semáforo limita
    // cuántas búsquedas corren a la vez
    let permit = match state.semaphore.clone().acquire_owned().await {
        Ok(p) => p,
        Err(_) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": "failed to acquire semaphore"}));
        }
    };

    let catalog = state.catalog.clone();
    let config = request.engine_config(&state.engine);
    let blocking_handle = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        let result = build_schedule(
            catalog.as_ref(),
            &request.courses,
            &request.preferences,
            &request.term,
            &config,
        );
        render_response(&result, config.total_hours)
    });

    let resp = match blocking_handle.await {
        Ok(r) => r,
        Err(e) => {
            warn!("schedule task failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("task join error: {}", e)}));
        }
    };

    info!(
        "POST /schedule from {}: success={} kind={:?} in {} ms",
        client_ip,
        resp.success,
        resp.error_kind,
        start.elapsed().as_millis()
    );

    HttpResponse::build(status_for(&resp)).json(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let ok = ScheduleResponse::failure(ErrorKind::Infeasible, "x");
        assert_eq!(status_for(&ok), StatusCode::OK);
        let timeout = ScheduleResponse::failure(ErrorKind::Timeout, "x");
        assert_eq!(status_for(&timeout), StatusCode::OK);
        let bad = ScheduleResponse::failure(ErrorKind::InvalidPreference, "x");
        assert_eq!(status_for(&bad), StatusCode::BAD_REQUEST);
        let boom = ScheduleResponse::failure(ErrorKind::Catalog, "x");
        assert_eq!(status_for(&boom), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
