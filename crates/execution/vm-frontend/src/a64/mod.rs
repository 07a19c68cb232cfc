//! AArch64 前端

pub mod decoder;
pub mod translate;

pub use decoder::decode_a64;
pub use translate::{A64TranslatorVisitor, translate_a64};
