use vm_ir::{Cond, Terminal};

use super::visitor::ArmTranslatorVisitor;
use crate::decoder::bits;
use crate::outcome::{Outcome, TranslateResult};

impl ArmTranslatorVisitor {
    /// `SVC #imm24`
    pub fn arm_svc(&mut self, word: u32) -> TranslateResult {
        if !self.condition_passed(Cond::from_bits(bits(word, 31, 28)))? {
            return Ok(Outcome::Continue);
        }
        let next_pc = self.ir.imm32(self.pc().wrapping_add(4));
        self.ir.a32_branch_write_pc(next_pc);
        self.ir.a32_call_supervisor(bits(word, 23, 0));
        self.ir.set_term(Terminal::CheckHalt {
            else_: Box::new(Terminal::ReturnToDispatch),
        })?;
        Ok(Outcome::Stop)
    }
}
