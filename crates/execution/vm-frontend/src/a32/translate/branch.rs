use vm_ir::{A32Reg, Cond, Terminal};

use super::visitor::ArmTranslatorVisitor;
use crate::decoder::{bit, bits, sign_extend};
use crate::outcome::{Outcome, TranslateResult};

impl ArmTranslatorVisitor {
    /// 目标 = PC + 8 + SignExtend(imm24:'00')
    fn branch_target_offset(word: u32) -> i32 {
        (sign_extend(bits(word, 23, 0) << 2, 26) + 8) as i32
    }

    fn link_to_target(&mut self, offset: i32) -> TranslateResult {
        let next = self.current_location.advance_pc(offset);
        self.ir.set_term(Terminal::LinkBlock { next: next.into() })?;
        Ok(Outcome::Stop)
    }

    /// `B <label>`
    pub fn arm_b(&mut self, word: u32) -> TranslateResult {
        if !self.condition_passed(Cond::from_bits(bits(word, 31, 28)))? {
            return Ok(Outcome::Continue);
        }
        self.link_to_target(Self::branch_target_offset(word))
    }

    /// `BL <label>`
    pub fn arm_bl(&mut self, word: u32) -> TranslateResult {
        if !self.condition_passed(Cond::from_bits(bits(word, 31, 28)))? {
            return Ok(Outcome::Continue);
        }
        let return_address = self.ir.imm32(self.pc().wrapping_add(4));
        self.ir.a32_set_register(A32Reg::LR, return_address);
        self.link_to_target(Self::branch_target_offset(word))
    }

    /// `BLX <label>`：无条件，切换到 Thumb 状态
    pub fn arm_blx_imm(&mut self, word: u32) -> TranslateResult {
        let h = u32::from(bit(word, 24));
        let imm32 = sign_extend((bits(word, 23, 0) << 2) | (h << 1), 26);
        let return_address = self.ir.imm32(self.pc().wrapping_add(4));
        self.ir.a32_set_register(A32Reg::LR, return_address);

        let next = self
            .current_location
            .advance_pc((imm32 + 8) as i32)
            .set_t_flag(true);
        self.ir.set_term(Terminal::LinkBlock { next: next.into() })?;
        Ok(Outcome::Stop)
    }

    /// `BX Rm`
    pub fn arm_bx(&mut self, word: u32) -> TranslateResult {
        let m = A32Reg::from_bits(bits(word, 3, 0));
        if !self.condition_passed(Cond::from_bits(bits(word, 31, 28)))? {
            return Ok(Outcome::Continue);
        }
        let target = self.reg(m);
        self.ir.a32_bx_write_pc(target);
        let terminal = if m == A32Reg::LR {
            Terminal::PopRSBHint
        } else {
            Terminal::ReturnToDispatch
        };
        self.ir.set_term(terminal)?;
        Ok(Outcome::Stop)
    }

    /// `BLX Rm`
    pub fn arm_blx_reg(&mut self, word: u32) -> TranslateResult {
        let m = A32Reg::from_bits(bits(word, 3, 0));
        if m.is_pc() {
            return self.unpredictable_instruction();
        }
        if !self.condition_passed(Cond::from_bits(bits(word, 31, 28)))? {
            return Ok(Outcome::Continue);
        }
        // 先读目标再写 LR：Rm 可以是 LR
        let target = self.ir.a32_get_register(m);
        let return_address = self.ir.imm32(self.pc().wrapping_add(4));
        self.ir.a32_set_register(A32Reg::LR, return_address);
        self.ir.a32_bx_write_pc(target);
        self.ir.set_term(Terminal::ReturnToDispatch)?;
        Ok(Outcome::Stop)
    }
}
