use thiserror::Error;

/// 广告平台索引错误类型
#[derive(Error, Debug)]
pub enum PlatformError {
    /// 输入验证失败（空文件、超出大小限制、扩展名不支持等）
    #[error("Validation error: {0}")]
    Validation(String),

    /// 数据集加载失败（没有可用记录、读取失败）
    #[error("File load error: {0}")]
    FileLoad(String),

    /// 单行数据格式错误
    #[error("Invalid data at line {line}: {reason}")]
    InvalidData { line: usize, reason: String },

    /// 位置路径格式错误
    #[error("Invalid location: {0}")]
    InvalidLocation(String),
}

/// 结果类型
pub type Result<T> = std::result::Result<T, PlatformError>;

impl PlatformError {
    /// 创建验证错误
    pub fn validation(msg: impl Into<String>) -> Self {
        PlatformError::Validation(msg.into())
    }

    /// 创建加载错误
    pub fn file_load(msg: impl Into<String>) -> Self {
        PlatformError::FileLoad(msg.into())
    }

    /// 创建数据错误
    pub fn invalid_data(line: usize, reason: impl Into<String>) -> Self {
        PlatformError::InvalidData {
            line,
            reason: reason.into(),
        }
    }
}
