//! 翻译例程的返回值与故障类型

use thiserror::Error;
use vm_ir::{IrError, LocationDescriptor};

/// 单条指令翻译后的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 继续翻译下一条指令
    Continue,
    /// 块已结束，终结节点已设置
    Stop,
    /// 未分配编码，块以 `Interpret` 结束
    Unallocated,
    /// 交给解释器执行，块以 `Interpret` 结束
    Interpret,
}

impl Outcome {
    pub fn should_continue(self) -> bool {
        matches!(self, Outcome::Continue)
    }
}

/// 违反翻译器内部不变量的故障。出现即说明调用逻辑有误，块不可用。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationFault {
    #[error("condition evaluated twice for one block at {location}")]
    ConditionReentered { location: LocationDescriptor },

    #[error("translation continued after a block break at {location}")]
    BreakNotHonored { location: LocationDescriptor },

    #[error("UNPREDICTABLE instruction {word:#010x} at {location}")]
    Unpredictable { location: LocationDescriptor, word: u32 },

    #[error("block at {location} finished without a terminal")]
    MissingTerminal { location: LocationDescriptor },

    #[error(transparent)]
    Ir(#[from] IrError),
}

pub type TranslateResult = Result<Outcome, TranslationFault>;

impl From<TranslationFault> for vm_core::VmError {
    fn from(fault: TranslationFault) -> Self {
        vm_core::VmError::Translation {
            message: fault.to_string(),
        }
    }
}
