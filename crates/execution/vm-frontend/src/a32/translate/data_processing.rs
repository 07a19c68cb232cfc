//! A32 数据处理指令：立即数、寄存器移位立即数、寄存器移位寄存器三种形式

use vm_ir::{A32Reg, Cond, Terminal, Value};

use super::visitor::ArmTranslatorVisitor;
use crate::a32::types::{DataProcOp, ShiftType};
use crate::decoder::{bit, bits};
use crate::outcome::{Outcome, TranslateResult};

/// 第二操作数及移位器进位；进位为 `None` 表示 C 标志保持不变
struct Operand2 {
    value: Value,
    carry: Option<Value>,
}

/// 各形式共有的字段
struct DataProcFields {
    cond: Cond,
    op: DataProcOp,
    set_flags: bool,
    n: A32Reg,
    d: A32Reg,
}

impl DataProcFields {
    fn decode(word: u32) -> Self {
        Self {
            cond: Cond::from_bits(bits(word, 31, 28)),
            op: DataProcOp::from_bits(bits(word, 24, 21)),
            set_flags: bit(word, 20),
            n: A32Reg::from_bits(bits(word, 19, 16)),
            d: A32Reg::from_bits(bits(word, 15, 12)),
        }
    }

    /// 带 S 写 PC 是异常返回，此处不支持
    fn is_flag_setting_pc_write(&self) -> bool {
        !self.op.is_comparison() && self.set_flags && self.d.is_pc()
    }
}

impl ArmTranslatorVisitor {
    /// `<op>{S} Rd, Rn, #imm`（8 位立即数循环右移 2*rotate）
    pub fn arm_dp_imm(&mut self, word: u32) -> TranslateResult {
        let f = DataProcFields::decode(word);
        let rotate = bits(word, 11, 8);
        let imm8 = bits(word, 7, 0);

        if !self.condition_passed(f.cond)? {
            return Ok(Outcome::Continue);
        }
        if f.is_flag_setting_pc_write() {
            return self.unpredictable_instruction();
        }

        let imm32 = imm8.rotate_right(rotate * 2);
        let carry = (rotate != 0).then(|| self.ir.imm1(imm32 >> 31 != 0));
        let value = self.ir.imm32(imm32);
        self.data_processing(&f, Operand2 { value, carry })
    }

    /// `<op>{S} Rd, Rn, Rm{, <shift> #imm5}`
    pub fn arm_dp_reg(&mut self, word: u32) -> TranslateResult {
        let f = DataProcFields::decode(word);
        let imm5 = bits(word, 11, 7) as u8;
        let shift = ShiftType::from_bits(bits(word, 6, 5));
        let m = A32Reg::from_bits(bits(word, 3, 0));

        if !self.condition_passed(f.cond)? {
            return Ok(Outcome::Continue);
        }
        if f.is_flag_setting_pc_write() {
            return self.unpredictable_instruction();
        }

        let carry_in = self.ir.a32_get_c_flag();
        let rm = self.reg(m);
        let shifted = self.emit_imm_shift(rm, shift, imm5, carry_in);
        self.data_processing(
            &f,
            Operand2 {
                value: shifted.result,
                carry: Some(shifted.carry),
            },
        )
    }

    /// `<op>{S} Rd, Rn, Rm, <shift> Rs`
    pub fn arm_dp_rsr(&mut self, word: u32) -> TranslateResult {
        let f = DataProcFields::decode(word);
        let s = A32Reg::from_bits(bits(word, 11, 8));
        let shift = ShiftType::from_bits(bits(word, 6, 5));
        let m = A32Reg::from_bits(bits(word, 3, 0));

        if f.d.is_pc() || f.n.is_pc() || m.is_pc() || s.is_pc() {
            return self.unpredictable_instruction();
        }
        if !self.condition_passed(f.cond)? {
            return Ok(Outcome::Continue);
        }

        let carry_in = self.ir.a32_get_c_flag();
        let rs = self.ir.a32_get_register(s);
        let amount = self.ir.least_significant_byte(rs);
        let rm = self.ir.a32_get_register(m);
        let shifted = self.emit_reg_shift(rm, shift, amount, carry_in);
        self.data_processing(
            &f,
            Operand2 {
                value: shifted.result,
                carry: Some(shifted.carry),
            },
        )
    }

    fn data_processing(&mut self, f: &DataProcFields, operand: Operand2) -> TranslateResult {
        let op2 = operand.value;
        let rn = if f.op.is_move() {
            Value::Void
        } else {
            self.reg(f.n)
        };

        // (结果, C, V)；逻辑操作不影响 V
        let (result, carry, overflow) = match f.op {
            DataProcOp::AND | DataProcOp::TST => (self.ir.and(rn, op2), operand.carry, None),
            DataProcOp::EOR | DataProcOp::TEQ => (self.ir.eor(rn, op2), operand.carry, None),
            DataProcOp::ORR => (self.ir.or(rn, op2), operand.carry, None),
            DataProcOp::MOV => (op2, operand.carry, None),
            DataProcOp::BIC => {
                let inverted = self.ir.not(op2);
                (self.ir.and(rn, inverted), operand.carry, None)
            }
            DataProcOp::MVN => (self.ir.not(op2), operand.carry, None),
            arith => {
                let one = self.ir.imm1(true);
                let zero = self.ir.imm1(false);
                let r = match arith {
                    DataProcOp::SUB | DataProcOp::CMP => self.ir.sub_with_carry(rn, op2, one),
                    DataProcOp::RSB => self.ir.sub_with_carry(op2, rn, one),
                    DataProcOp::ADD | DataProcOp::CMN => self.ir.add_with_carry(rn, op2, zero),
                    DataProcOp::ADC => {
                        let c = self.ir.a32_get_c_flag();
                        self.ir.add_with_carry(rn, op2, c)
                    }
                    DataProcOp::SBC => {
                        let c = self.ir.a32_get_c_flag();
                        self.ir.sub_with_carry(rn, op2, c)
                    }
                    // RSC
                    _ => {
                        let c = self.ir.a32_get_c_flag();
                        self.ir.sub_with_carry(op2, rn, c)
                    }
                };
                (r.result, Some(r.carry), Some(r.overflow))
            }
        };

        if f.op.is_comparison() {
            self.set_nzcv(result, carry, overflow);
            return Ok(Outcome::Continue);
        }

        if f.d.is_pc() {
            self.ir.a32_branch_write_pc(result);
            self.ir.set_term(Terminal::ReturnToDispatch)?;
            return Ok(Outcome::Stop);
        }

        self.ir.a32_set_register(f.d, result);
        if f.set_flags {
            self.set_nzcv(result, carry, overflow);
        }
        Ok(Outcome::Continue)
    }

    fn set_nzcv(&mut self, result: Value, carry: Option<Value>, overflow: Option<Value>) {
        let n = self.ir.most_significant_bit(result);
        self.ir.a32_set_n_flag(n);
        let z = self.ir.is_zero(result);
        self.ir.a32_set_z_flag(z);
        if let Some(c) = carry {
            self.ir.a32_set_c_flag(c);
        }
        if let Some(v) = overflow {
            self.ir.a32_set_v_flag(v);
        }
    }
}
