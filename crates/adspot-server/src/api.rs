use crate::{handlers, state::AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// multipart 边界和头部的额外空间
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// 创建 API 路由
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.upload_policy.max_bytes + MULTIPART_OVERHEAD;

    Router::new()
        // 健康检查
        .route("/health", get(health_check))

        // 广告平台 API
        .route("/api/v1/platforms/upload", post(handlers::upload_platforms))
        .route("/api/v1/platforms/search", post(handlers::search_platforms))
        .route(
            "/api/v1/platforms/search/*location",
            get(handlers::search_platforms_by_path),
        )
        .route("/api/v1/platforms/stats", get(handlers::get_stats))
        .route("/api/v1/platforms/clear", delete(handlers::clear_platforms))

        // 添加中间件
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 健康检查
async fn health_check() -> &'static str {
    "OK"
}
