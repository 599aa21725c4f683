//! A small Axum application wired through the validation pipeline and the
//! bearer-token guard.
//!
//! Run with:
//!
//! ```text
//! SLUICE_SECRET=dev-secret-change-me cargo run --example axum_server
//! ```
//!
//! Then exercise it:
//!
//! ```text
//! curl -s -X POST localhost:3000/login \
//!     -H 'content-type: application/json' \
//!     -d '{"username": "alice", "password": "password123"}'
//! curl -s localhost:3000/profile -H "Authorization: Bearer $TOKEN"
//! ```

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sluice::adapters::{buffer_request, AxumAdapter, FrameworkAdapter};
use sluice::auth::{AuthGuard, TokenConfig, TokenService};
use sluice::{
    prevalidate, FieldKind, RequestContext, TypedSchema, ValidationMode, ValidationPipeline,
};
use std::sync::Arc;
use validator::Validate;

const BODY_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Serialize, Deserialize, Validate)]
struct Login {
    username: String,
    password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
struct Contact {
    name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 1, max = 2000))]
    message: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
struct Search {
    query: String,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize, Deserialize, Validate)]
struct CreateUser {
    #[validate(length(min = 3, max = 32))]
    username: String,
    #[validate(range(min = 13, max = 130))]
    age: i64,
    #[validate(email)]
    email: String,
}

struct AppState {
    tokens: TokenService,
    login: ValidationPipeline<TypedSchema<Login>>,
    contact: ValidationPipeline<TypedSchema<Contact>>,
    search: ValidationPipeline<TypedSchema<Search>>,
    create_user: ValidationPipeline<TypedSchema<CreateUser>>,
    any_user: AuthGuard,
    admin_only: AuthGuard,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sluice::init_tracing();

    let config = match TokenConfig::from_env() {
        Ok(config) => config,
        Err(_) => {
            tracing::warn!("SLUICE_SECRET not set, using a development secret");
            TokenConfig::with_secret("dev-secret-change-me")
        }
    };
    let tokens = TokenService::new(config);

    let state = Arc::new(AppState {
        login: ValidationPipeline::new(
            TypedSchema::<Login>::new()
                .field("username", FieldKind::String)
                .field("password", FieldKind::String),
        ),
        contact: ValidationPipeline::new(
            TypedSchema::<Contact>::new()
                .field("name", FieldKind::String)
                .field("email", FieldKind::String)
                .field("message", FieldKind::String),
        )
        .with_mode(ValidationMode::Lax)
        .with_pre_validator(prevalidate::sanitize_strings)
        .with_pre_validator(prevalidate::normalize_email),
        search: ValidationPipeline::new(
            TypedSchema::<Search>::new()
                .field("query", FieldKind::String)
                .optional("limit", FieldKind::Integer),
        )
        .with_mode(ValidationMode::Lax),
        create_user: ValidationPipeline::new(
            TypedSchema::<CreateUser>::new()
                .field("username", FieldKind::String)
                .field("age", FieldKind::Integer)
                .field("email", FieldKind::String),
        )
        .with_pre_validator(prevalidate::normalize_email),
        any_user: AuthGuard::bearer(tokens.clone()),
        admin_only: AuthGuard::with_roles(tokens.clone(), ["admin"]),
        tokens,
    });

    let app = Router::new()
        .route("/login", post(login))
        .route("/contact", post(contact))
        .route("/search", get(search))
        .route("/profile", get(profile))
        .route("/users", post(create_user))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn login(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let request = match buffer_request(request, BODY_LIMIT).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    state.login.run(
        &AxumAdapter,
        &request,
        RequestContext::new(),
        |login: Login, _ctx| {
            // Fixed credential record standing in for a user store.
            if login.username != "alice" || login.password != "password123" {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"detail": "Invalid username or password"})),
                )
                    .into_response();
            }

            let mut claims = serde_json::Map::new();
            claims.insert("sub".into(), json!(login.username));
            claims.insert("role".into(), json!("admin"));
            match state.tokens.issue(claims) {
                Ok(token) => {
                    Json(json!({"access_token": token, "token_type": "bearer"})).into_response()
                }
                Err(error) => AxumAdapter.auth_error_response(error),
            }
        },
    )
}

async fn contact(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let request = match buffer_request(request, BODY_LIMIT).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    state.contact.run(
        &AxumAdapter,
        &request,
        RequestContext::new(),
        |contact: Contact, _ctx| {
            tracing::info!(from = %contact.email, "contact message received");
            Json(json!({"status": "received", "from": contact.email})).into_response()
        },
    )
}

async fn search(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let request = match buffer_request(request, BODY_LIMIT).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    state.search.run(
        &AxumAdapter,
        &request,
        RequestContext::new(),
        |search: Search, _ctx| {
            Json(json!({"query": search.query, "limit": search.limit, "results": []}))
                .into_response()
        },
    )
}

async fn profile(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let request = match buffer_request(request, BODY_LIMIT).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    state
        .any_user
        .run(&AxumAdapter, &request, RequestContext::new(), |ctx| {
            let claims = match ctx.claims {
                Some(claims) => claims,
                None => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            };
            Json(json!({"sub": claims.subject(), "role": claims.role()})).into_response()
        })
}

async fn create_user(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let request = match buffer_request(request, BODY_LIMIT).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    state
        .admin_only
        .run(&AxumAdapter, &request, RequestContext::new(), |ctx| {
            state.create_user.run(
                &AxumAdapter,
                &request,
                ctx,
                |user: CreateUser, _ctx| {
                    tracing::info!(username = %user.username, "user created");
                    (
                        StatusCode::CREATED,
                        Json(json!({"username": user.username, "email": user.email})),
                    )
                        .into_response()
                },
            )
        })
}
