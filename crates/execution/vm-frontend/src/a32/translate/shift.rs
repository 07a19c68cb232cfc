//! 移位操作数语义
//!
//! 立即数编码中 `LSR #0` 与 `ASR #0` 表示移 32 位，`ROR #0` 表示 RRX。
//! 寄存器编码的移位量是运行期值，数量为 0 或不小于 32 的行为由 IR 移位操作定义。

use vm_ir::{ResultAndCarry, Value};

use super::visitor::ArmTranslatorVisitor;
use crate::a32::types::ShiftType;

impl ArmTranslatorVisitor {
    pub fn emit_imm_shift(
        &mut self,
        value: Value,
        shift: ShiftType,
        imm5: u8,
        carry_in: Value,
    ) -> ResultAndCarry {
        let imm5 = imm5 & 0x1F;
        match shift {
            ShiftType::LSL => {
                let amount = self.ir.imm8(imm5);
                self.ir.logical_shift_left(value, amount, carry_in)
            }
            ShiftType::LSR => {
                let amount = self.ir.imm8(if imm5 == 0 { 32 } else { imm5 });
                self.ir.logical_shift_right(value, amount, carry_in)
            }
            ShiftType::ASR => {
                let amount = self.ir.imm8(if imm5 == 0 { 32 } else { imm5 });
                self.ir.arithmetic_shift_right(value, amount, carry_in)
            }
            ShiftType::ROR => {
                if imm5 == 0 {
                    self.ir.rotate_right_extended(value, carry_in)
                } else {
                    let amount = self.ir.imm8(imm5);
                    self.ir.rotate_right(value, amount, carry_in)
                }
            }
        }
    }

    /// `amount` 为 u8 值（通常是移位寄存器的最低字节）
    pub fn emit_reg_shift(
        &mut self,
        value: Value,
        shift: ShiftType,
        amount: Value,
        carry_in: Value,
    ) -> ResultAndCarry {
        match shift {
            ShiftType::LSL => self.ir.logical_shift_left(value, amount, carry_in),
            ShiftType::LSR => self.ir.logical_shift_right(value, amount, carry_in),
            ShiftType::ASR => self.ir.arithmetic_shift_right(value, amount, carry_in),
            ShiftType::ROR => self.ir.rotate_right(value, amount, carry_in),
        }
    }
}
