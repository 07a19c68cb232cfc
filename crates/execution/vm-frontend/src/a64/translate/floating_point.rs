use vm_ir::{A64Vec, Cond};

use super::visitor::A64TranslatorVisitor;
use crate::decoder::bits;
use crate::outcome::{Outcome, TranslateResult};

impl A64TranslatorVisitor {
    /// `FCSEL <V>d, <V>n, <V>m, <cond>`
    ///
    /// 只支持单、双精度；半精度与保留类型视为未分配编码。
    pub fn fcsel(&mut self, word: u32) -> TranslateResult {
        let datasize = match bits(word, 23, 22) {
            0b00 => 32,
            0b01 => 64,
            _ => return self.unallocated_encoding(),
        };
        let m = A64Vec::from_bits(bits(word, 20, 16));
        let cond = Cond::from_bits(bits(word, 15, 12));
        let n = A64Vec::from_bits(bits(word, 9, 5));
        let d = A64Vec::from_bits(bits(word, 4, 0));

        let operand1 = self.v(datasize, n);
        let operand2 = self.v(datasize, m);
        let result = self.ir.conditional_select(cond, operand1, operand2);
        self.set_v(datasize, d, result);
        Ok(Outcome::Continue)
    }
}
