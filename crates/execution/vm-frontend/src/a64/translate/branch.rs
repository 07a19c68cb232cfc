use vm_ir::{A64Reg, Cond, Terminal};

use super::visitor::A64TranslatorVisitor;
use crate::decoder::{bits, sign_extend};
use crate::outcome::{Outcome, TranslateResult};

impl A64TranslatorVisitor {
    fn link_to_offset(&mut self, offset: i64) -> TranslateResult {
        let next = self.current_location.advance_pc(offset);
        self.ir.set_term(Terminal::LinkBlock { next: next.into() })?;
        Ok(Outcome::Stop)
    }

    fn write_link_register(&mut self) {
        let return_address = self.ir.imm64(self.pc().wrapping_add(4));
        self.set_x(64, A64Reg::LR, return_address);
    }

    /// `B <label>`
    pub fn b_uncond(&mut self, word: u32) -> TranslateResult {
        let offset = sign_extend(bits(word, 25, 0) << 2, 28);
        self.link_to_offset(offset)
    }

    /// `BL <label>`
    pub fn bl(&mut self, word: u32) -> TranslateResult {
        let offset = sign_extend(bits(word, 25, 0) << 2, 28);
        self.write_link_register();
        self.link_to_offset(offset)
    }

    /// `B.<cond> <label>`
    pub fn b_cond(&mut self, word: u32) -> TranslateResult {
        let offset = sign_extend(bits(word, 23, 5) << 2, 21);
        let cond = Cond::from_bits(bits(word, 3, 0));
        let taken = self.current_location.advance_pc(offset);
        let not_taken = self.current_location.advance_pc(4);
        self.ir.set_term(Terminal::If {
            cond,
            then_: Box::new(Terminal::LinkBlock { next: taken.into() }),
            else_: Box::new(Terminal::LinkBlock {
                next: not_taken.into(),
            }),
        })?;
        Ok(Outcome::Stop)
    }

    /// `BR <Xn>`
    pub fn br(&mut self, word: u32) -> TranslateResult {
        let target = self.x(64, A64Reg::from_bits(bits(word, 9, 5)));
        self.ir.a64_set_pc(target);
        self.ir.set_term(Terminal::ReturnToDispatch)?;
        Ok(Outcome::Stop)
    }

    /// `BLR <Xn>`：先读目标再写 X30
    pub fn blr(&mut self, word: u32) -> TranslateResult {
        let target = self.x(64, A64Reg::from_bits(bits(word, 9, 5)));
        self.write_link_register();
        self.ir.a64_set_pc(target);
        self.ir.set_term(Terminal::ReturnToDispatch)?;
        Ok(Outcome::Stop)
    }

    /// `RET {<Xn>}`
    pub fn ret(&mut self, word: u32) -> TranslateResult {
        let target = self.x(64, A64Reg::from_bits(bits(word, 9, 5)));
        self.ir.a64_set_pc(target);
        self.ir.set_term(Terminal::PopRSBHint)?;
        Ok(Outcome::Stop)
    }
}
