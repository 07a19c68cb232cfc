//! IR 发射器
//!
//! 翻译器通过 [`IREmitter`] 向当前块追加指令。带进位/溢出的操作会额外发射
//! `GetCarryFromOp` / `GetOverflowFromOp` 伪指令，以便调用者按值使用副结果。

use crate::block::IRBlock;
use crate::cond::Cond;
use crate::error::IrError;
use crate::location::LocationDescriptor;
use crate::opcode::IROp;
use crate::terminal::Terminal;
use crate::types::Type;
use crate::value::{A32Reg, A64Reg, A64Vec, Value};

/// 结果与进位输出
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultAndCarry {
    pub result: Value,
    pub carry: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultAndCarryAndOverflow {
    pub result: Value,
    pub carry: Value,
    pub overflow: Value,
}

/// 当前位置由各架构的访问者持有，发射器只负责块本身
pub struct IREmitter {
    pub block: IRBlock,
}

impl IREmitter {
    pub fn new(location: LocationDescriptor) -> Self {
        Self {
            block: IRBlock::new(location),
        }
    }

    pub fn into_block(self) -> IRBlock {
        self.block
    }

    fn inst(&mut self, op: IROp) -> Value {
        Value::Inst(self.block.push(op))
    }

    fn void(&mut self, op: IROp) {
        self.block.push(op);
    }

    pub fn imm1(&self, value: bool) -> Value {
        Value::ImmU1(value)
    }

    pub fn imm8(&self, value: u8) -> Value {
        Value::ImmU8(value)
    }

    pub fn imm32(&self, value: u32) -> Value {
        Value::ImmU32(value)
    }

    pub fn imm64(&self, value: u64) -> Value {
        Value::ImmU64(value)
    }

    pub fn set_term(&mut self, terminal: Terminal) -> Result<(), IrError> {
        self.block.set_terminal(terminal)
    }

    pub fn get_carry_from_op(&mut self, op: Value) -> Value {
        self.inst(IROp::GetCarryFromOp { op })
    }

    pub fn get_overflow_from_op(&mut self, op: Value) -> Value {
        self.inst(IROp::GetOverflowFromOp { op })
    }

    fn with_carry(&mut self, op: IROp) -> ResultAndCarry {
        let result = self.inst(op);
        let carry = self.get_carry_from_op(result);
        ResultAndCarry { result, carry }
    }

    // 移位：`amount` 为 u8，数量为 0 时结果与进位均原样传出

    pub fn logical_shift_left(&mut self, value: Value, amount: Value, carry_in: Value) -> ResultAndCarry {
        self.with_carry(IROp::LogicalShiftLeft32 { value, amount, carry_in })
    }

    pub fn logical_shift_right(&mut self, value: Value, amount: Value, carry_in: Value) -> ResultAndCarry {
        self.with_carry(IROp::LogicalShiftRight32 { value, amount, carry_in })
    }

    pub fn arithmetic_shift_right(
        &mut self,
        value: Value,
        amount: Value,
        carry_in: Value,
    ) -> ResultAndCarry {
        self.with_carry(IROp::ArithmeticShiftRight32 { value, amount, carry_in })
    }

    pub fn rotate_right(&mut self, value: Value, amount: Value, carry_in: Value) -> ResultAndCarry {
        self.with_carry(IROp::RotateRight32 { value, amount, carry_in })
    }

    /// 带扩展的循环右移（RRX）：移入 `carry_in`，移出原 bit 0
    pub fn rotate_right_extended(&mut self, value: Value, carry_in: Value) -> ResultAndCarry {
        self.with_carry(IROp::RotateRightExtended { value, carry_in })
    }

    /// 不关心进位的循环右移
    pub fn rotate_right_u32(&mut self, value: Value, amount: u8) -> Value {
        let carry_in = self.imm1(false);
        let amount = self.imm8(amount);
        self.inst(IROp::RotateRight32 { value, amount, carry_in })
    }

    pub fn add_with_carry(&mut self, a: Value, b: Value, carry_in: Value) -> ResultAndCarryAndOverflow {
        let result = self.inst(IROp::Add32 { a, b, carry_in });
        let carry = self.get_carry_from_op(result);
        let overflow = self.get_overflow_from_op(result);
        ResultAndCarryAndOverflow { result, carry, overflow }
    }

    /// `a + NOT(b) + carry_in`，即 ARM 的 SUB/SBC 语义
    pub fn sub_with_carry(&mut self, a: Value, b: Value, carry_in: Value) -> ResultAndCarryAndOverflow {
        let result = self.inst(IROp::Sub32 { a, b, carry_in });
        let carry = self.get_carry_from_op(result);
        let overflow = self.get_overflow_from_op(result);
        ResultAndCarryAndOverflow { result, carry, overflow }
    }

    pub fn add(&mut self, a: Value, b: Value) -> Value {
        let carry_in = self.imm1(false);
        self.inst(IROp::Add32 { a, b, carry_in })
    }

    pub fn add64(&mut self, a: Value, b: Value) -> Value {
        let carry_in = self.imm1(false);
        self.inst(IROp::Add64 { a, b, carry_in })
    }

    pub fn and(&mut self, a: Value, b: Value) -> Value {
        self.inst(IROp::And32 { a, b })
    }

    pub fn eor(&mut self, a: Value, b: Value) -> Value {
        self.inst(IROp::Eor32 { a, b })
    }

    pub fn or(&mut self, a: Value, b: Value) -> Value {
        self.inst(IROp::Or32 { a, b })
    }

    pub fn not(&mut self, value: Value) -> Value {
        self.inst(IROp::Not32 { value })
    }

    pub fn least_significant_byte(&mut self, value: Value) -> Value {
        self.inst(IROp::LeastSignificantByte { value })
    }

    pub fn most_significant_bit(&mut self, value: Value) -> Value {
        self.inst(IROp::MostSignificantBit { value })
    }

    pub fn is_zero(&mut self, value: Value) -> Value {
        self.inst(IROp::IsZero32 { value })
    }

    /// 按 `a` 的宽度选择 32 位或 64 位条件选择
    pub fn conditional_select(&mut self, cond: Cond, a: Value, b: Value) -> Value {
        match self.block.type_of(a) {
            Type::U64 => self.inst(IROp::ConditionalSelect64 { cond, a, b }),
            _ => self.inst(IROp::ConditionalSelect32 { cond, a, b }),
        }
    }

    pub fn vector_get_element32(&mut self, vec: Value, index: u8) -> Value {
        self.inst(IROp::VectorGetElement32 { vec, index })
    }

    pub fn vector_set_element32(&mut self, vec: Value, index: u8, elem: Value) -> Value {
        self.inst(IROp::VectorSetElement32 { vec, index, elem })
    }

    pub fn vector_and(&mut self, a: Value, b: Value) -> Value {
        self.inst(IROp::VectorAnd { a, b })
    }

    pub fn vector_eor(&mut self, a: Value, b: Value) -> Value {
        self.inst(IROp::VectorEor { a, b })
    }

    pub fn vector_not(&mut self, a: Value) -> Value {
        self.inst(IROp::VectorNot { a })
    }

    pub fn zero_vector(&mut self) -> Value {
        self.inst(IROp::ZeroVector)
    }

    // A32 上下文

    pub fn a32_get_register(&mut self, reg: A32Reg) -> Value {
        self.inst(IROp::A32GetRegister { reg })
    }

    pub fn a32_set_register(&mut self, reg: A32Reg, value: Value) {
        self.void(IROp::A32SetRegister { reg, value })
    }

    pub fn a32_get_c_flag(&mut self) -> Value {
        self.inst(IROp::A32GetCFlag)
    }

    pub fn a32_set_n_flag(&mut self, value: Value) {
        self.void(IROp::A32SetNFlag { value })
    }

    pub fn a32_set_z_flag(&mut self, value: Value) {
        self.void(IROp::A32SetZFlag { value })
    }

    pub fn a32_set_c_flag(&mut self, value: Value) {
        self.void(IROp::A32SetCFlag { value })
    }

    pub fn a32_set_v_flag(&mut self, value: Value) {
        self.void(IROp::A32SetVFlag { value })
    }

    pub fn a32_branch_write_pc(&mut self, value: Value) {
        self.void(IROp::A32BranchWritePC { value })
    }

    pub fn a32_bx_write_pc(&mut self, value: Value) {
        self.void(IROp::A32BXWritePC { value })
    }

    pub fn a32_call_supervisor(&mut self, imm: u32) {
        self.void(IROp::A32CallSupervisor { imm })
    }

    // A64 上下文

    pub fn a64_get_w(&mut self, reg: A64Reg) -> Value {
        self.inst(IROp::A64GetW { reg })
    }

    pub fn a64_get_x(&mut self, reg: A64Reg) -> Value {
        self.inst(IROp::A64GetX { reg })
    }

    pub fn a64_set_w(&mut self, reg: A64Reg, value: Value) {
        self.void(IROp::A64SetW { reg, value })
    }

    pub fn a64_set_x(&mut self, reg: A64Reg, value: Value) {
        self.void(IROp::A64SetX { reg, value })
    }

    pub fn a64_get_s(&mut self, vec: A64Vec) -> Value {
        self.inst(IROp::A64GetS { vec })
    }

    pub fn a64_get_d(&mut self, vec: A64Vec) -> Value {
        self.inst(IROp::A64GetD { vec })
    }

    pub fn a64_get_q(&mut self, vec: A64Vec) -> Value {
        self.inst(IROp::A64GetQ { vec })
    }

    pub fn a64_set_s(&mut self, vec: A64Vec, value: Value) {
        self.void(IROp::A64SetS { vec, value })
    }

    pub fn a64_set_d(&mut self, vec: A64Vec, value: Value) {
        self.void(IROp::A64SetD { vec, value })
    }

    pub fn a64_set_q(&mut self, vec: A64Vec, value: Value) {
        self.void(IROp::A64SetQ { vec, value })
    }

    pub fn a64_set_pc(&mut self, value: Value) {
        self.void(IROp::A64SetPC { value })
    }
}
