//! # vm-core - 翻译前端核心库
//!
//! 提供翻译前端各组件共享的配置 Trait 与统一错误类型。
//!
//! ## 主要组件
//!
//! - **配置**: [`Config`] trait 定义统一的配置接口（TOML / JSON 加载、校验、合并）
//! - **错误**: [`VmError`] 汇总各组件的错误，供工具与上层调用者使用
//! - **架构**: [`GuestArch`] 区分 A32 与 A64 客体指令集

use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;

pub use config::{Config, ConfigError};
pub use error::{VmError, VmResult};

/// 客体指令集架构
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestArch {
    /// AArch32 (ARM 状态，定长 32 位编码)
    A32,
    /// AArch64
    A64,
}

impl GuestArch {
    /// 定长指令宽度（字节）
    pub fn instruction_width(self) -> u64 {
        4
    }
}

impl std::fmt::Display for GuestArch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuestArch::A32 => write!(f, "a32"),
            GuestArch::A64 => write!(f, "a64"),
        }
    }
}

impl std::str::FromStr for GuestArch {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a32" | "arm" | "arm32" => Ok(GuestArch::A32),
            "a64" | "arm64" | "aarch64" => Ok(GuestArch::A64),
            other => Err(ConfigError::Invalid(format!("unknown guest architecture: {other}"))),
        }
    }
}
