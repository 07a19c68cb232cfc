//! 统一配置管理
//!
//! 提供翻译前端各组件的统一配置 Trait。

use serde::Serialize;

/// 统一配置 Trait
///
/// 为所有前端组件提供一致的配置接口。
///
/// # 示例
///
/// ```rust,ignore
/// use vm_core::config::{Config, ConfigError};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct MyConfig {
///     pub enabled: bool,
/// }
///
/// impl Config for MyConfig {
///     fn validate(&self) -> Result<(), ConfigError> {
///         Ok(())
///     }
///
///     fn defaults() -> Self {
///         Self { enabled: true }
///     }
///
///     fn merge(&self, other: &Self) -> Result<Self, ConfigError> {
///         Ok(other.clone())
///     }
/// }
/// ```
pub trait Config: Serialize + serde::de::DeserializeOwned {
    /// 验证配置的有效性
    ///
    /// # 错误
    ///
    /// 如果配置无效，返回 `ConfigError::Invalid`
    fn validate(&self) -> Result<(), ConfigError>;

    /// 获取默认配置
    fn defaults() -> Self;

    /// 合并两个配置
    ///
    /// `self` 为基础配置，`other` 优先级更高
    fn merge(&self, other: &Self) -> Result<Self, ConfigError>
    where
        Self: Sized;

    /// 从 TOML 字符串加载配置，加载后立即校验
    fn from_toml(toml: &str) -> Result<Self, ConfigError>
    where
        Self: Sized,
    {
        let config: Self = toml::from_str(toml)
            .map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 字符串加载配置，加载后立即校验
    fn from_json(json: &str) -> Result<Self, ConfigError>
    where
        Self: Sized,
    {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigError::Parse(format!("JSON parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 将配置序列化为 TOML
    fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(format!("TOML serialize error: {}", e)))
    }

    /// 将配置序列化为 JSON
    fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(format!("JSON serialize error: {}", e)))
    }
}

/// 配置错误类型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// 无效的配置
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// 解析错误
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// 序列化错误
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),
}
