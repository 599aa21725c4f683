//! End-to-end tests through Actix Web: same pipeline, different error
//! dialect (400 with `{"error", "details"}`).

#![cfg(feature = "actix-adapter")]

use actix_web::{test, web, App, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sluice::adapters::ActixAdapter;
use sluice::auth::{AuthGuard, TokenConfig, TokenService};
use sluice::{FieldKind, RequestContext, TypedSchema, ValidationMode, ValidationPipeline};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
struct Contact {
    name: String,
    email: String,
    message: String,
}

struct AppState {
    contact: ValidationPipeline<TypedSchema<Contact>>,
    any_user: AuthGuard,
}

fn state() -> web::Data<AppState> {
    let tokens = TokenService::new(TokenConfig::with_secret("test-secret-key-32-bytes-long!!"));
    web::Data::new(AppState {
        contact: ValidationPipeline::new(
            TypedSchema::<Contact>::new()
                .field("name", FieldKind::String)
                .field("email", FieldKind::String)
                .field("message", FieldKind::String),
        )
        .with_mode(ValidationMode::Permissive),
        any_user: AuthGuard::bearer(tokens),
    })
}

async fn submit_contact(
    request: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> HttpResponse {
    state.contact.run(
        &ActixAdapter,
        &(request, body),
        RequestContext::new(),
        |contact: Contact, _ctx| {
            HttpResponse::Ok().json(json!({"received": contact.name, "email": contact.email}))
        },
    )
}

async fn whoami(
    request: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> HttpResponse {
    state
        .any_user
        .run(&ActixAdapter, &(request, body), RequestContext::new(), |ctx| {
            let claims = ctx.claims.expect("guard attaches claims");
            HttpResponse::Ok().json(json!({"sub": claims.subject()}))
        })
}

fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state())
        .route("/contact", web::post().to(submit_contact))
        .route("/whoami", web::get().to(whoami))
}

#[actix_web::test]
async fn valid_contact_reaches_handler() {
    let app = test::init_service(test_app()).await;
    let request = test::TestRequest::post()
        .uri("/contact")
        .set_json(json!({
            "name": "Alice",
            "email": "alice@example.com",
            "message": "hello"
        }))
        .to_request();

    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["received"], "Alice");
}

#[actix_web::test]
async fn validation_failure_uses_the_actix_error_dialect() {
    let app = test::init_service(test_app()).await;
    let request = test::TestRequest::post()
        .uri("/contact")
        .set_json(json!({"name": "Alice"}))
        .to_request();

    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "Validation failed");
    let paths: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["path"].as_str())
        .collect();
    assert!(paths.contains(&"email"));
    assert!(paths.contains(&"message"));
}

#[actix_web::test]
async fn malformed_json_body_is_a_400() {
    let app = test::init_service(test_app()).await;
    let request = test::TestRequest::post()
        .uri("/contact")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();

    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "Invalid JSON in request body");
}

#[actix_web::test]
async fn query_parameters_merge_below_the_json_body() {
    let app = test::init_service(test_app()).await;
    let request = test::TestRequest::post()
        .uri("/contact?name=from-query")
        .set_json(json!({
            "name": "from-json",
            "email": "alice@example.com",
            "message": "hello"
        }))
        .to_request();

    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["received"], "from-json");
}

#[actix_web::test]
async fn guarded_route_round_trips_a_token() {
    let app = test::init_service(test_app()).await;

    let tokens = TokenService::new(TokenConfig::with_secret("test-secret-key-32-bytes-long!!"));
    let mut claims = serde_json::Map::new();
    claims.insert("sub".into(), json!("user-1"));
    let token = tokens.issue(claims).unwrap();

    let request = test::TestRequest::get()
        .uri("/whoami")
        .insert_header(("authorization", format!("Bearer {}", token)))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["sub"], "user-1");

    let request = test::TestRequest::get().uri("/whoami").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(
        response.status(),
        actix_web::http::StatusCode::UNAUTHORIZED
    );
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["detail"], "Authorization header is missing or invalid");
}
