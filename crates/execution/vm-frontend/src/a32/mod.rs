//! AArch32 (ARM 状态) 前端

pub mod decoder;
pub mod translate;
pub mod types;

pub use decoder::decode_arm;
pub use translate::{ArmTranslatorVisitor, ConditionalState, translate_arm};
pub use types::{DataProcOp, ShiftType};
