//! SHA3 与 SM3 扩展中的三操作数指令

use vm_ir::A64Vec;

use super::visitor::A64TranslatorVisitor;
use crate::decoder::bits;
use crate::outcome::{Outcome, TranslateResult};

/// `Vd, Vn, Vm, Va` 四个寄存器字段
fn four_regs(word: u32) -> (A64Vec, A64Vec, A64Vec, A64Vec) {
    (
        A64Vec::from_bits(bits(word, 4, 0)),
        A64Vec::from_bits(bits(word, 9, 5)),
        A64Vec::from_bits(bits(word, 20, 16)),
        A64Vec::from_bits(bits(word, 14, 10)),
    )
}

impl A64TranslatorVisitor {
    /// `EOR3 Vd.16B, Vn.16B, Vm.16B, Va.16B`：Vd = Vn ^ Vm ^ Va
    pub fn eor3(&mut self, word: u32) -> TranslateResult {
        let (d, n, m, a) = four_regs(word);
        let vn = self.v(128, n);
        let vm = self.v(128, m);
        let va = self.v(128, a);
        let partial = self.ir.vector_eor(vn, vm);
        let result = self.ir.vector_eor(partial, va);
        self.set_v(128, d, result);
        Ok(Outcome::Continue)
    }

    /// `BCAX Vd.16B, Vn.16B, Vm.16B, Va.16B`：Vd = Vn ^ (Vm & !Va)
    pub fn bcax(&mut self, word: u32) -> TranslateResult {
        let (d, n, m, a) = four_regs(word);
        let vn = self.v(128, n);
        let vm = self.v(128, m);
        let va = self.v(128, a);
        let not_a = self.ir.vector_not(va);
        let cleared = self.ir.vector_and(vm, not_a);
        let result = self.ir.vector_eor(vn, cleared);
        self.set_v(128, d, result);
        Ok(Outcome::Continue)
    }

    /// `SM3SS1 Vd.4S, Vn.4S, Vm.4S, Va.4S`
    ///
    /// 只使用各源寄存器的最高 32 位元素：`ROL(ROL(n, 12) + m + a, 7)`，结果写入
    /// 零向量的元素 3。
    pub fn sm3ss1(&mut self, word: u32) -> TranslateResult {
        let (d, n, m, a) = four_regs(word);
        let vn = self.v(128, n);
        let vm = self.v(128, m);
        let va = self.v(128, a);

        let top_n = self.ir.vector_get_element32(vn, 3);
        let top_m = self.ir.vector_get_element32(vm, 3);
        let top_a = self.ir.vector_get_element32(va, 3);

        let rotated_n = self.ir.rotate_right_u32(top_n, 20);
        let sum = self.ir.add(rotated_n, top_m);
        let sum = self.ir.add(sum, top_a);
        let result = self.ir.rotate_right_u32(sum, 25);

        let zero = self.ir.zero_vector();
        let vector_result = self.ir.vector_set_element32(zero, 3, result);
        self.set_v(128, d, vector_result);
        Ok(Outcome::Continue)
    }
}
