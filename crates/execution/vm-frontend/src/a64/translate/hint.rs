//! A64 提示指令，规则与 A32 相同；SEVL 与 SEV 一样不结束块

use super::visitor::A64TranslatorVisitor;
use crate::outcome::{Outcome, TranslateResult};

impl A64TranslatorVisitor {
    fn hint(&mut self, ends_block: bool) -> TranslateResult {
        if self.options.hook_hint_instructions {
            return self.interpret_this_instruction();
        }
        if ends_block {
            return self.link_to_next_instruction();
        }
        Ok(Outcome::Continue)
    }

    pub fn nop(&mut self, _word: u32) -> TranslateResult {
        self.hint(false)
    }

    pub fn yield_(&mut self, _word: u32) -> TranslateResult {
        self.hint(false)
    }

    pub fn wfe(&mut self, _word: u32) -> TranslateResult {
        self.hint(true)
    }

    pub fn wfi(&mut self, _word: u32) -> TranslateResult {
        self.hint(true)
    }

    pub fn sev(&mut self, _word: u32) -> TranslateResult {
        self.hint(false)
    }

    pub fn sevl(&mut self, _word: u32) -> TranslateResult {
        self.hint(false)
    }
}
