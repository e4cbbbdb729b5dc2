use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use schedshift::server::{configure, AppState};
use schedshift::{EngineConfig, InMemoryCatalog};

fn catalogo() -> InMemoryCatalog {
    InMemoryCatalog::from_path(concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalog.json"))
        .expect("Debe cargar el catálogo de ejemplo")
}

#[actix_web::test]
async fn test_post_schedule_ok() {
    let state = web::Data::new(AppState::new(catalogo(), EngineConfig::default(), 2));
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/schedule")
        .set_json(json!({
            "courses": ["MATH 30.13", "CSCI 111"],
            "term": "2024-2",
            "preferences": {"preferCompact": true}
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["schedule"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["weeklyGrid"]["columns"].as_array().map(Vec::len), Some(6));
    assert!(body["totalHours"].as_f64().unwrap_or(0.0) > 0.0);
}

#[actix_web::test]
async fn test_post_schedule_status_codes() {
    let state = web::Data::new(AppState::new(catalogo(), EngineConfig::default(), 1));
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    // horario imposible: 200 con success=false
    let req = test::TestRequest::post()
        .uri("/schedule")
        .set_json(json!({"courses": ["CSCI 999"], "term": "2024-2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["errorKind"], "invalidCourseCode");

    // preferencias contradictorias: 400
    let req = test::TestRequest::post()
        .uri("/schedule")
        .set_json(json!({"courses": ["CSCI 111"], "term": "2024-2",
            "preferences": {"preferBreaks": true, "preferCompact": true}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // JSON sin término: 400
    let req = test::TestRequest::post()
        .uri("/schedule")
        .set_json(json!({"courses": ["CSCI 111"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_help() {
    let state = web::Data::new(AppState::new(InMemoryCatalog::new(), EngineConfig::default(), 1));
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;
    let req = test::TestRequest::get().uri("/help").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["post_example"]["term"], "2024-2");
}
