use adspot_core::{IndexStats, LoadReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 位置搜索请求
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub location: String,
}

/// 位置搜索响应
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub location: String,
    pub advertising_platforms: Vec<String>,
    pub total_count: usize,
    pub search_timestamp: DateTime<Utc>,
}

impl SearchResponse {
    pub fn new(location: String, advertising_platforms: Vec<String>) -> Self {
        Self {
            location,
            total_count: advertising_platforms.len(),
            advertising_platforms,
            search_timestamp: Utc::now(),
        }
    }
}

/// 上传结果
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_name: String,
    pub file_size: usize,
    pub total_platforms: usize,
    pub total_locations: usize,
    pub valid_lines: usize,
    pub invalid_lines: usize,
    pub timestamp: DateTime<Utc>,
}

impl UploadResponse {
    pub fn new(file_name: String, file_size: usize, report: LoadReport) -> Self {
        Self {
            message: "Data loaded successfully".to_string(),
            file_name,
            file_size,
            total_platforms: report.platform_count,
            total_locations: report.location_count,
            valid_lines: report.valid_lines,
            invalid_lines: report.invalid_lines,
            timestamp: Utc::now(),
        }
    }
}

/// 统计响应
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_platforms: usize,
    pub total_locations: usize,
    pub timestamp: DateTime<Utc>,
}

impl From<IndexStats> for StatsResponse {
    fn from(stats: IndexStats) -> Self {
        Self {
            total_platforms: stats.platform_count,
            total_locations: stats.location_count,
            timestamp: Utc::now(),
        }
    }
}

/// 通用消息响应
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
