//! 翻译选项

use serde::{Deserialize, Serialize};
use vm_core::{Config, ConfigError};

/// 影响块构造方式的选项
///
/// 可从 TOML / JSON 加载，缺省字段取默认值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationOptions {
    /// 为 UNPREDICTABLE 编码定义行为：交给解释器执行，而不是报告故障
    pub define_unpredictable_behaviour: bool,
    /// 提示指令（NOP、YIELD、WFE、WFI、SEV）结束块并交给解释器，以便宿主观察
    pub hook_hint_instructions: bool,
}

impl Config for TranslationOptions {
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    fn defaults() -> Self {
        Self::default()
    }

    fn merge(&self, other: &Self) -> Result<Self, ConfigError> {
        Ok(Self {
            define_unpredictable_behaviour: self.define_unpredictable_behaviour
                || other.define_unpredictable_behaviour,
            hook_hint_instructions: self.hook_hint_instructions || other.hook_hint_instructions,
        })
    }
}
