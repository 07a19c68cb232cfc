//! # vm-frontend - A32/A64 块翻译前端
//!
//! 把客体机器码翻译为 [`vm_ir::IRBlock`]。
//!
//! ## 主要组件
//!
//! - **A32**: [`a32::translate_arm`]，带条件执行状态机与移位单元
//! - **A64**: [`a64::translate_a64`]，支持单步模式
//! - **解码表**: [`decoder::DecodeTable`]，按位模式查找翻译例程
//! - **入口**: [`Translator`] 按架构分派
//!
//! ## 使用示例
//!
//! ```rust
//! use vm_frontend::{TranslationOptions, Translator};
//! use vm_ir::{A32LocationDescriptor, Terminal};
//!
//! let translator = Translator::new(TranslationOptions::default());
//! // mov r0, #1 ; b .
//! let code = [0xE3A0_0001u32, 0xEAFF_FFFE];
//! let block = translator.translate(A32LocationDescriptor::arm(0).into(), |pc| {
//!     code[(pc / 4) as usize]
//! });
//! assert_eq!(block.cycle_count, 2);
//! assert!(matches!(block.terminal, Terminal::LinkBlock { .. }));
//! ```

pub mod a32;
pub mod a64;
pub mod decoder;
pub mod options;
pub mod outcome;
pub mod translator;

pub use options::TranslationOptions;
pub use outcome::{Outcome, TranslateResult, TranslationFault};
pub use translator::Translator;
