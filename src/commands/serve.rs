use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::controllers::{paste, search};
use crate::db::Database;
use crate::models::{Paste, PasteSummary};
use crate::pages;
use crate::types::api::{CreatePaste, CreatedPaste};
use crate::{ApiError, ApiResult, App};

/// The about page source, rendered to HTML at request time.
const ABOUT_PAGE: &str = include_str!("../../assets/about.md");

pub async fn run(app: App) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], app.config.port));

    info!("listening on http://{addr}");

    axum::Server::bind(&addr)
        .serve(router(app).into_make_service())
        .await?;

    Ok(())
}

pub fn router(app: App) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/about", get(about))
        .route("/paste", post(create_paste))
        .route("/paste/:id", get(view_paste))
        .route("/paste/:id/raw", get(raw_paste))
        .route("/search", get(search_pastes))
        .route("/api/pastes", get(api_recent_pastes).post(api_create_paste))
        .route("/api/pastes/:id", get(api_get_paste))
        .route("/api/pastes/:id/raw", get(raw_paste))
        .fallback(not_found)
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

async fn index(State(db): State<Database>) -> ApiResult<Html<String>> {
    let pastes = paste::list_recent(&db).await?;
    Ok(Html(pages::index(&pastes)))
}

async fn about() -> Html<String> {
    Html(pages::about(ABOUT_PAGE))
}

async fn create_paste(
    State(db): State<Database>,
    Form(body): Form<CreatePaste>,
) -> ApiResult<Redirect> {
    let paste = paste::create(&db, body).await?;
    Ok(Redirect::to(&format!("/paste/{}", paste.id)))
}

async fn view_paste(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> ApiResult<Html<String>> {
    let paste = paste::view(&db, &id).await?;
    Ok(Html(pages::paste(&paste)))
}

async fn raw_paste(State(db): State<Database>, Path(id): Path<String>) -> ApiResult<String> {
    paste::raw(&db, &id).await
}

async fn search_pastes(
    State(db): State<Database>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Html<String>> {
    let query = params.get("q").map(String::as_str).unwrap_or_default();
    let outcome = search::search(&db, query).await?;
    Ok(Html(pages::search(query.trim(), &outcome)))
}

async fn api_recent_pastes(State(db): State<Database>) -> ApiResult<Json<Vec<PasteSummary>>> {
    Ok(Json(paste::list_recent(&db).await?))
}

async fn api_create_paste(
    State(config): State<Config>,
    State(db): State<Database>,
    Json(body): Json<CreatePaste>,
) -> ApiResult<impl IntoResponse> {
    if body.content.trim().is_empty() {
        return Err(ApiError::MissingContent);
    }

    let paste = paste::create(&db, body).await?;

    let path = format!("/paste/{}", paste.id);
    let url = format!("{base_url}{path}", base_url = config.base_url);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, path)],
        Json(CreatedPaste { id: paste.id, url }),
    ))
}

async fn api_get_paste(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> ApiResult<Json<Paste>> {
    Ok(Json(paste::view(&db, &id).await?))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
