//! 翻译前端统一错误类型
//!
//! 各组件保留自己的 `thiserror` 枚举，`VmError` 在工具与 API 边界处汇总它们。

use thiserror::Error;

use crate::config::ConfigError;

/// 前端各组件的统一错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// 构建块时发现的程序不变量违例
    #[error("Translation fault: {message}")]
    Translation { message: String },

    #[error("Evaluation error: {message}")]
    Evaluation { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for VmError {
    fn from(err: std::io::Error) -> Self {
        VmError::Io {
            message: err.to_string(),
        }
    }
}

pub type VmResult<T> = Result<T, VmError>;
