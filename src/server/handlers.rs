use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{AppState, error::ServerError};
use crate::common::models::{Category, Course};
use crate::parser::models::ShareLinkInfo;

type ApiResult<T> = Result<T, ServerError>;

pub const DEFAULT_COVER: &str = "/uploads/default-course-image.jpg";

#[derive(Debug, Default, Deserialize)]
pub struct CourseFilter {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub watched_episodes: u32,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub url: String,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenProxyRequest {
    pub pwd_id: String,
    #[serde(default)]
    pub passcode: Option<String>,
}

// ---------------------------------------------------------------- 课程

pub async fn list_courses(
    State(state): State<AppState>,
    Query(filter): Query<CourseFilter>,
) -> ApiResult<Json<Vec<Course>>> {
    let courses = match filter.category.as_deref() {
        Some(category) => state.db.courses().list_by_category(category)?,
        None => state.db.courses().list()?,
    };
    Ok(Json(courses))
}

pub async fn create_course(
    State(state): State<AppState>,
    Json(mut course): Json<Course>,
) -> ApiResult<(StatusCode, Json<Course>)> {
    if course.image_url.trim().is_empty() {
        course.image_url = DEFAULT_COVER.to_string();
    }
    let course = state.db.courses().create(course)?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(course): Json<Course>,
) -> ApiResult<Json<Course>> {
    Ok(Json(state.db.courses().update(&id, course)?))
}

pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.courses().delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn advance_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Course>> {
    Ok(Json(state.db.courses().advance_progress(&id)?))
}

pub async fn set_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ProgressRequest>,
) -> ApiResult<Json<Course>> {
    Ok(Json(
        state.db.courses().set_progress(&id, req.watched_episodes)?,
    ))
}

// ---------------------------------------------------------------- 分类

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.categories().list()?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(category): Json<Category>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = state.db.categories().create(category)?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(category): Json<Category>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.db.categories().update(&id, category)?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.categories().delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------- 分享链接

pub async fn resolve_share(
    State(state): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> ApiResult<Json<ShareLinkInfo>> {
    let info = state
        .resolver
        .resolve(&req.url, req.password.as_deref())
        .await?;
    Ok(Json(info))
}

// 夸克接口不接受浏览器跨域请求，由这里转发，状态码和内容都不做修改
pub async fn quark_token_proxy(
    State(state): State<AppState>,
    Json(req): Json<TokenProxyRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    info!("转发夸克分享请求: {}", req.pwd_id);
    let (upstream, body) = state
        .quark
        .fetch_token_raw(&req.pwd_id, req.passcode.as_deref())
        .await?;
    let status = StatusCode::from_u16(upstream.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(body)))
}
