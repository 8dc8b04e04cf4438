pub mod error;
pub mod handlers;
pub mod upload;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::common::config::AppConfig;
use crate::parser::{LinkResolver, errors::ParseError, quark_client::QuarkClient};
use crate::store::Database;

// 留给 multipart 边界和其他字段的余量
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub resolver: Arc<LinkResolver>,
    pub quark: Arc<QuarkClient>,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// `db` 必须是已经完成迁移的句柄
    pub fn new(config: &AppConfig, db: Database) -> Result<Self, ParseError> {
        let quark = Arc::new(QuarkClient::new(&config.resolver)?);
        let resolver = if config.resolver.resolve_remote {
            LinkResolver::with_resolver(quark.clone())
        } else {
            LinkResolver::new()
        };

        Ok(Self {
            db,
            resolver: Arc::new(resolver),
            quark,
            upload_dir: config.upload_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes + MULTIPART_OVERHEAD;
    let uploads = ServeDir::new(&state.upload_dir);

    Router::new()
        .route(
            "/api/courses",
            get(handlers::list_courses).post(handlers::create_course),
        )
        .route(
            "/api/courses/{id}",
            put(handlers::update_course).delete(handlers::delete_course),
        )
        .route(
            "/api/courses/{id}/progress",
            post(handlers::advance_progress).put(handlers::set_progress),
        )
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/categories/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .route(
            "/api/upload",
            post(upload::upload_image).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/share/resolve", post(handlers::resolve_share))
        .route("/api/quark/token", post(handlers::quark_token_proxy))
        .nest_service("/uploads", uploads)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// 启动 HTTP 服务，调用前数据库必须已经迁移完成
pub async fn serve(config: &AppConfig, db: Database) -> anyhow::Result<()> {
    let state = AppState::new(config, db)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("服务器运行在 http://{}", config.bind);
    axum::serve(listener, app).await?;
    Ok(())
}
