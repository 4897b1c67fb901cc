use crate::config::AppConfig;
use adspot_core::{PlatformService, UploadPolicy};
use std::sync::Arc;

/// API 应用状态
#[derive(Clone)]
pub struct AppState {
    /// 平台索引服务
    pub service: Arc<PlatformService>,

    /// 上传校验策略
    pub upload_policy: Arc<UploadPolicy>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(service: Arc<PlatformService>, upload_policy: UploadPolicy) -> Self {
        Self {
            service,
            upload_policy: Arc::new(upload_policy),
        }
    }

    /// 按配置构建服务与上传策略
    pub fn from_config(config: &AppConfig) -> Self {
        let service = PlatformService::with_cache_config(config.cache.to_cache_config());
        Self::new(Arc::new(service), config.upload.to_policy())
    }
}
