use thiserror::Error;

use crate::cond::Cond;
use crate::location::LocationDescriptor;
use crate::value::InstRef;

/// 块构建器的误用；每种情况都是调用方的程序错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    #[error("terminal already set to {existing} (attempted {attempted})")]
    TerminalAlreadySet { existing: String, attempted: String },

    #[error("block condition already set to {existing} (attempted {attempted})")]
    ConditionAlreadySet { existing: Cond, attempted: Cond },
}

/// 参考求值器错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("instruction {index} uses {value}, which is not defined before it")]
    UndefinedValue { index: usize, value: InstRef },

    #[error("block at {location} has no terminal")]
    InvalidTerminal { location: LocationDescriptor },

    #[error("guarded block at {location} has no condition-failed location")]
    MissingConditionFailed { location: LocationDescriptor },
}

impl From<EvalError> for vm_core::VmError {
    fn from(err: EvalError) -> Self {
        vm_core::VmError::Evaluation {
            message: err.to_string(),
        }
    }
}
