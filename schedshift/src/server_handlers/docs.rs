use actix_web::{HttpResponse, Responder};
use serde_json::json;

use crate::api_json::ScheduleRequest;

pub async fn help_handler() -> impl Responder {
    let example = ScheduleRequest::example();

    let help = json!({
        "description": "API para armar un horario semanal sin choques. POST /schedule recibe los ramos, el término y las preferencias (ver 'post_example') y devuelve una sección por ramo, la grilla semanal y el total de horas.",
        "post_example": example,
        "preferences": {
            "excludeDays": "días sin clases (Mon..Sat)",
            "startAfter / startBefore / endBefore": "ventana horaria HH:MM",
            "buildingPrefix": "al menos un bloque en un edificio con ese prefijo",
            "avoidInstructors": "profesores a evitar",
            "preferBreaks / preferCompact": "elige entre varias soluciones por tiempo libre entre clases",
            "includeDays": "se acepta pero no tiene efecto"
        },
        "error_kinds": ["invalidCourseCode", "noOpenSections", "infeasible", "timeout", "invalidPreference", "catalog"],
        "note": "timeout indica que conviene reintentar; infeasible y noOpenSections que conviene relajar las restricciones."
    });

    HttpResponse::Ok().json(help)
}
