use vm_ir::{A64Reg, Cond};

use super::visitor::A64TranslatorVisitor;
use crate::decoder::{bit, bits};
use crate::outcome::{Outcome, TranslateResult};

struct CondSelFields {
    datasize: u32,
    m: A64Reg,
    cond: Cond,
    n: A64Reg,
    d: A64Reg,
}

impl CondSelFields {
    fn decode(word: u32) -> Self {
        Self {
            datasize: if bit(word, 31) { 64 } else { 32 },
            m: A64Reg::from_bits(bits(word, 20, 16)),
            cond: Cond::from_bits(bits(word, 15, 12)),
            n: A64Reg::from_bits(bits(word, 9, 5)),
            d: A64Reg::from_bits(bits(word, 4, 0)),
        }
    }
}

impl A64TranslatorVisitor {
    /// `CSEL <R>d, <R>n, <R>m, <cond>`
    pub fn csel(&mut self, word: u32) -> TranslateResult {
        let f = CondSelFields::decode(word);
        let operand1 = self.x(f.datasize, f.n);
        let operand2 = self.x(f.datasize, f.m);
        let result = self.ir.conditional_select(f.cond, operand1, operand2);
        self.set_x(f.datasize, f.d, result);
        Ok(Outcome::Continue)
    }

    /// `CSINC <R>d, <R>n, <R>m, <cond>`
    pub fn csinc(&mut self, word: u32) -> TranslateResult {
        let f = CondSelFields::decode(word);
        let operand1 = self.x(f.datasize, f.n);
        let operand2 = self.x(f.datasize, f.m);
        let incremented = if f.datasize == 64 {
            let one = self.ir.imm64(1);
            self.ir.add64(operand2, one)
        } else {
            let one = self.ir.imm32(1);
            self.ir.add(operand2, one)
        };
        let result = self.ir.conditional_select(f.cond, operand1, incremented);
        self.set_x(f.datasize, f.d, result);
        Ok(Outcome::Continue)
    }
}
