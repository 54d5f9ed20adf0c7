//! 参数层错误类型定义

use thiserror::Error;

/// 参数层错误类型
#[derive(Error, Debug)]
pub enum ParamsError {
    /// 未知车型名称
    #[error("Unknown car model: {0}")]
    UnknownModel(String),

    /// 可调常量取值非法
    #[error("Invalid parameter {field}: {reason}")]
    InvalidParam { field: &'static str, reason: String },

    /// 静态报文表项非法
    #[error("Invalid static message 0x{address:X}: {reason}")]
    InvalidStaticMessage { address: u32, reason: String },

    /// 读取配置文件失败
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件解析失败
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// 配置序列化失败
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl ParamsError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ParamsError::InvalidParam {
            field,
            reason: reason.into(),
        }
    }
}
