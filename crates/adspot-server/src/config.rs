use adspot_core::{CacheConfig, UploadPolicy};
use anyhow::{anyhow, Result};
use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 应用配置
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub upload: UploadSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// 搜索缓存配置
#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    /// 条目有效期（秒）
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,

    /// 软容量上限
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// 超限时一次淘汰的条目数
    #[serde(default = "default_cache_eviction_batch")]
    pub eviction_batch: usize,
}

/// 上传配置
#[derive(Debug, Deserialize, Clone)]
pub struct UploadSettings {
    /// 最大文件大小（字节）
    #[serde(default = "default_upload_max_bytes")]
    pub max_bytes: usize,

    /// 允许的文件扩展名
    #[serde(default = "default_upload_extension")]
    pub allowed_extension: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// 日志输出格式
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

// 默认值函数
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_capacity() -> usize {
    1000
}

fn default_cache_eviction_batch() -> usize {
    100
}

fn default_upload_max_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_upload_extension() -> String {
    "txt".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default trait 实现
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            capacity: default_cache_capacity(),
            eviction_batch: default_cache_eviction_batch(),
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_bytes: default_upload_max_bytes(),
            allowed_extension: default_upload_extension(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: Duration::from_secs(self.ttl_secs),
            capacity: self.capacity,
            eviction_batch: self.eviction_batch,
        }
    }
}

impl UploadSettings {
    pub fn to_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_bytes: self.max_bytes,
            allowed_extension: self.allowed_extension.trim_start_matches('.').to_string(),
        }
    }
}

impl AppConfig {
    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if self.cache.ttl_secs == 0 {
            return Err(anyhow!("cache.ttl_secs must be greater than 0"));
        }

        if self.cache.capacity == 0 {
            return Err(anyhow!("cache.capacity must be greater than 0"));
        }

        if self.cache.eviction_batch == 0 {
            return Err(anyhow!("cache.eviction_batch must be greater than 0"));
        }

        if self.cache.eviction_batch > self.cache.capacity {
            return Err(anyhow!(
                "cache.eviction_batch ({}) cannot be greater than cache.capacity ({})",
                self.cache.eviction_batch,
                self.cache.capacity
            ));
        }

        if self.upload.max_bytes == 0 {
            return Err(anyhow!("upload.max_bytes must be greater than 0"));
        }

        if self.upload.allowed_extension.trim_start_matches('.').is_empty() {
            return Err(anyhow!("upload.allowed_extension must not be empty"));
        }

        Ok(())
    }
}

/// 配置加载器
///
/// TOML 文件可选，缺失时使用默认值；`ADSPOT__<SECTION>__<KEY>` 环境变量覆盖文件中的值。
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// 创建配置加载器
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// 加载并验证配置
    pub fn load(&self) -> Result<AppConfig> {
        let config = Config::builder()
            .add_source(
                File::new(
                    self.path.to_str().ok_or_else(|| anyhow!("Invalid config path"))?,
                    FileFormat::Toml,
                )
                .required(false),
            )
            .add_source(
                Environment::with_prefix("ADSPOT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }
}
