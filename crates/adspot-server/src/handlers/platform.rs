use crate::{
    error::{ApiError, Result},
    models::*,
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    Json,
};
use tracing::{debug, info};

/// 上传数据集（整体覆盖已有数据）
pub async fn upload_platforms(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let max_bytes = state.upload_policy.max_bytes;
    let mut file_name: Option<String> = None;
    let mut data = Bytes::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, max_bytes))?
    {
        if field.name() != Some("file") {
            continue;
        }
        file_name = field.file_name().map(str::to_string);
        data = field
            .bytes()
            .await
            .map_err(|e| ApiError::from_multipart(e, max_bytes))?;
        break;
    }

    state.upload_policy.validate(file_name.as_deref(), data.len())?;
    let file_name = file_name.unwrap_or_default();
    info!(file_name = %file_name, size = data.len(), "Received dataset upload");

    let report = state.service.load_from_reader(&data[..]).await?;

    info!(
        file_name = %file_name,
        platforms = report.platform_count,
        locations = report.location_count,
        "Dataset upload applied"
    );
    Ok(Json(UploadResponse::new(file_name, data.len(), report)))
}

/// 按请求体中的位置查询
///
/// 空白或格式错误的位置返回空列表；请求体本身无法解析时由 `Json` 提取器拒绝。
pub async fn search_platforms(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Json<SearchResponse> {
    let platforms = state.service.search(&req.location).await;
    info!(location = %req.location, count = platforms.len(), "Platforms searched");

    Json(SearchResponse::new(req.location, platforms))
}

/// 按路径中的位置查询，例如 `/api/v1/platforms/search/ru/svrd`
pub async fn search_platforms_by_path(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Json<SearchResponse> {
    let location = if location.starts_with('/') {
        location
    } else {
        format!("/{}", location)
    };

    let platforms = state.service.search(&location).await;
    info!(location = %location, count = platforms.len(), "Platforms searched");

    Json(SearchResponse::new(location, platforms))
}

/// 获取统计信息
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    debug!("Getting index statistics");
    Json(StatsResponse::from(state.service.stats().await))
}

/// 清空全部数据
pub async fn clear_platforms(State(state): State<AppState>) -> Json<MessageResponse> {
    info!("Clearing all platform data");
    state.service.clear().await;

    Json(MessageResponse {
        message: "All data cleared".to_string(),
    })
}
