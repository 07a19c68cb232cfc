//! # vm-ir - 翻译前端中间表示
//!
//! 客体块被翻译为 [`IRBlock`]：线性指令序列加一个 [`Terminal`]。
//!
//! ## 主要组件
//!
//! - **位置**: [`A32LocationDescriptor`] / [`A64LocationDescriptor`]，块缓存键
//! - **指令**: [`IROp`] 与 [`Value`]，SSA 风格，只能引用之前的结果
//! - **终结节点**: [`Terminal`]，描述控制流如何离开块
//! - **发射器**: [`IREmitter`]，翻译器追加指令的唯一入口
//! - **求值器**: [`Evaluator`]，在 [`GuestState`] 上直接解释块，用于测试与工具

pub mod block;
pub mod cond;
pub mod emitter;
pub mod error;
pub mod eval;
pub mod location;
pub mod opcode;
pub mod terminal;
pub mod types;
pub mod value;

pub use block::{IRBlock, IRInst};
pub use cond::{Cond, Nzcv};
pub use emitter::{IREmitter, ResultAndCarry, ResultAndCarryAndOverflow};
pub use error::{EvalError, IrError};
pub use eval::{BlockExit, Evaluator, GuestState};
pub use location::{A32LocationDescriptor, A64LocationDescriptor, LocationDescriptor};
pub use opcode::IROp;
pub use terminal::Terminal;
pub use types::Type;
pub use value::{A32Reg, A64Reg, A64Vec, InstRef, Value};
