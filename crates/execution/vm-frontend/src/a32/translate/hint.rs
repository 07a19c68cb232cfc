//! A32 提示指令
//!
//! 开启 `hook_hint_instructions` 时全部交给解释器；否则 NOP、YIELD、SEV 不产生
//! IR，WFE、WFI 结束块并链接到下一条指令。条件字段与其他指令一样经过条件执行
//! 状态机。

use vm_ir::Cond;

use super::visitor::ArmTranslatorVisitor;
use crate::decoder::bits;
use crate::outcome::{Outcome, TranslateResult};

impl ArmTranslatorVisitor {
    fn hint(&mut self, word: u32, ends_block: bool) -> TranslateResult {
        if !self.condition_passed(Cond::from_bits(bits(word, 31, 28)))? {
            return Ok(Outcome::Continue);
        }
        if self.options.hook_hint_instructions {
            return self.interpret_this_instruction();
        }
        if ends_block {
            return self.link_to_next_instruction();
        }
        Ok(Outcome::Continue)
    }

    pub fn arm_nop(&mut self, word: u32) -> TranslateResult {
        self.hint(word, false)
    }

    pub fn arm_yield(&mut self, word: u32) -> TranslateResult {
        self.hint(word, false)
    }

    pub fn arm_wfe(&mut self, word: u32) -> TranslateResult {
        self.hint(word, true)
    }

    pub fn arm_wfi(&mut self, word: u32) -> TranslateResult {
        self.hint(word, true)
    }

    pub fn arm_sev(&mut self, word: u32) -> TranslateResult {
        self.hint(word, false)
    }
}
