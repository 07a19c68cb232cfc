//! IR 操作
//!
//! 每个变体携带自身的操作数；结果类型由变体静态决定。

use std::fmt;

use crate::cond::Cond;
use crate::types::Type;
use crate::value::{A32Reg, A64Reg, A64Vec, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum IROp {
    // A32 context
    A32GetRegister { reg: A32Reg },
    A32SetRegister { reg: A32Reg, value: Value },
    A32GetCFlag,
    A32SetNFlag { value: Value },
    A32SetZFlag { value: Value },
    A32SetCFlag { value: Value },
    A32SetVFlag { value: Value },
    A32BranchWritePC { value: Value },
    A32BXWritePC { value: Value },
    A32CallSupervisor { imm: u32 },

    // A64 context
    A64GetW { reg: A64Reg },
    A64GetX { reg: A64Reg },
    A64SetW { reg: A64Reg, value: Value },
    A64SetX { reg: A64Reg, value: Value },
    A64GetS { vec: A64Vec },
    A64GetD { vec: A64Vec },
    A64GetQ { vec: A64Vec },
    A64SetS { vec: A64Vec, value: Value },
    A64SetD { vec: A64Vec, value: Value },
    A64SetQ { vec: A64Vec, value: Value },
    A64SetPC { value: Value },

    // Pseudo-operations: read a secondary result of `op`
    GetCarryFromOp { op: Value },
    GetOverflowFromOp { op: Value },

    // Integer
    LeastSignificantByte { value: Value },
    MostSignificantBit { value: Value },
    IsZero32 { value: Value },
    LogicalShiftLeft32 { value: Value, amount: Value, carry_in: Value },
    LogicalShiftRight32 { value: Value, amount: Value, carry_in: Value },
    ArithmeticShiftRight32 { value: Value, amount: Value, carry_in: Value },
    RotateRight32 { value: Value, amount: Value, carry_in: Value },
    RotateRightExtended { value: Value, carry_in: Value },
    Add32 { a: Value, b: Value, carry_in: Value },
    Add64 { a: Value, b: Value, carry_in: Value },
    /// `a + !b + carry_in`
    Sub32 { a: Value, b: Value, carry_in: Value },
    And32 { a: Value, b: Value },
    Eor32 { a: Value, b: Value },
    Or32 { a: Value, b: Value },
    Not32 { value: Value },
    ConditionalSelect32 { cond: Cond, a: Value, b: Value },
    ConditionalSelect64 { cond: Cond, a: Value, b: Value },

    // Vector
    VectorGetElement32 { vec: Value, index: u8 },
    VectorSetElement32 { vec: Value, index: u8, elem: Value },
    VectorAnd { a: Value, b: Value },
    VectorEor { a: Value, b: Value },
    VectorNot { a: Value },
    ZeroVector,
}

impl IROp {
    pub fn result_type(&self) -> Type {
        use IROp::*;
        match self {
            A32SetRegister { .. }
            | A32SetNFlag { .. }
            | A32SetZFlag { .. }
            | A32SetCFlag { .. }
            | A32SetVFlag { .. }
            | A32BranchWritePC { .. }
            | A32BXWritePC { .. }
            | A32CallSupervisor { .. }
            | A64SetW { .. }
            | A64SetX { .. }
            | A64SetS { .. }
            | A64SetD { .. }
            | A64SetQ { .. }
            | A64SetPC { .. } => Type::Void,

            A32GetCFlag
            | GetCarryFromOp { .. }
            | GetOverflowFromOp { .. }
            | MostSignificantBit { .. }
            | IsZero32 { .. } => Type::U1,

            LeastSignificantByte { .. } => Type::U8,

            A32GetRegister { .. }
            | A64GetW { .. }
            | A64GetS { .. }
            | LogicalShiftLeft32 { .. }
            | LogicalShiftRight32 { .. }
            | ArithmeticShiftRight32 { .. }
            | RotateRight32 { .. }
            | RotateRightExtended { .. }
            | Add32 { .. }
            | Sub32 { .. }
            | And32 { .. }
            | Eor32 { .. }
            | Or32 { .. }
            | Not32 { .. }
            | ConditionalSelect32 { .. }
            | VectorGetElement32 { .. } => Type::U32,

            A64GetX { .. } | A64GetD { .. } | Add64 { .. } | ConditionalSelect64 { .. } => Type::U64,

            A64GetQ { .. }
            | VectorSetElement32 { .. }
            | VectorAnd { .. }
            | VectorEor { .. }
            | VectorNot { .. }
            | ZeroVector => Type::U128,
        }
    }

    /// 是否写入客体状态（不可删除）
    pub fn writes_guest_state(&self) -> bool {
        self.result_type() == Type::Void
    }

    pub fn name(&self) -> &'static str {
        use IROp::*;
        match self {
            A32GetRegister { .. } => "A32GetRegister",
            A32SetRegister { .. } => "A32SetRegister",
            A32GetCFlag => "A32GetCFlag",
            A32SetNFlag { .. } => "A32SetNFlag",
            A32SetZFlag { .. } => "A32SetZFlag",
            A32SetCFlag { .. } => "A32SetCFlag",
            A32SetVFlag { .. } => "A32SetVFlag",
            A32BranchWritePC { .. } => "A32BranchWritePC",
            A32BXWritePC { .. } => "A32BXWritePC",
            A32CallSupervisor { .. } => "A32CallSupervisor",
            A64GetW { .. } => "A64GetW",
            A64GetX { .. } => "A64GetX",
            A64SetW { .. } => "A64SetW",
            A64SetX { .. } => "A64SetX",
            A64GetS { .. } => "A64GetS",
            A64GetD { .. } => "A64GetD",
            A64GetQ { .. } => "A64GetQ",
            A64SetS { .. } => "A64SetS",
            A64SetD { .. } => "A64SetD",
            A64SetQ { .. } => "A64SetQ",
            A64SetPC { .. } => "A64SetPC",
            GetCarryFromOp { .. } => "GetCarryFromOp",
            GetOverflowFromOp { .. } => "GetOverflowFromOp",
            LeastSignificantByte { .. } => "LeastSignificantByte",
            MostSignificantBit { .. } => "MostSignificantBit",
            IsZero32 { .. } => "IsZero32",
            LogicalShiftLeft32 { .. } => "LogicalShiftLeft32",
            LogicalShiftRight32 { .. } => "LogicalShiftRight32",
            ArithmeticShiftRight32 { .. } => "ArithmeticShiftRight32",
            RotateRight32 { .. } => "RotateRight32",
            RotateRightExtended { .. } => "RotateRightExtended",
            Add32 { .. } => "Add32",
            Add64 { .. } => "Add64",
            Sub32 { .. } => "Sub32",
            And32 { .. } => "And32",
            Eor32 { .. } => "Eor32",
            Or32 { .. } => "Or32",
            Not32 { .. } => "Not32",
            ConditionalSelect32 { .. } => "ConditionalSelect32",
            ConditionalSelect64 { .. } => "ConditionalSelect64",
            VectorGetElement32 { .. } => "VectorGetElement32",
            VectorSetElement32 { .. } => "VectorSetElement32",
            VectorAnd { .. } => "VectorAnd",
            VectorEor { .. } => "VectorEor",
            VectorNot { .. } => "VectorNot",
            ZeroVector => "ZeroVector",
        }
    }

    /// 按位置顺序排列的值操作数
    pub fn args(&self) -> Vec<Value> {
        use IROp::*;
        match *self {
            A32GetRegister { .. }
            | A32GetCFlag
            | A32CallSupervisor { .. }
            | A64GetW { .. }
            | A64GetX { .. }
            | A64GetS { .. }
            | A64GetD { .. }
            | A64GetQ { .. }
            | ZeroVector => Vec::new(),

            A32SetRegister { value, .. }
            | A32SetNFlag { value }
            | A32SetZFlag { value }
            | A32SetCFlag { value }
            | A32SetVFlag { value }
            | A32BranchWritePC { value }
            | A32BXWritePC { value }
            | A64SetW { value, .. }
            | A64SetX { value, .. }
            | A64SetS { value, .. }
            | A64SetD { value, .. }
            | A64SetQ { value, .. }
            | A64SetPC { value }
            | LeastSignificantByte { value }
            | MostSignificantBit { value }
            | IsZero32 { value }
            | Not32 { value } => vec![value],

            GetCarryFromOp { op } | GetOverflowFromOp { op } => vec![op],

            LogicalShiftLeft32 { value, amount, carry_in }
            | LogicalShiftRight32 { value, amount, carry_in }
            | ArithmeticShiftRight32 { value, amount, carry_in }
            | RotateRight32 { value, amount, carry_in } => vec![value, amount, carry_in],

            RotateRightExtended { value, carry_in } => vec![value, carry_in],

            Add32 { a, b, carry_in } | Add64 { a, b, carry_in } | Sub32 { a, b, carry_in } => {
                vec![a, b, carry_in]
            }

            And32 { a, b }
            | Eor32 { a, b }
            | Or32 { a, b }
            | ConditionalSelect32 { a, b, .. }
            | ConditionalSelect64 { a, b, .. }
            | VectorAnd { a, b }
            | VectorEor { a, b } => vec![a, b],

            VectorNot { a } => vec![a],
            VectorGetElement32 { vec, .. } => vec![vec],
            VectorSetElement32 { vec, elem, .. } => vec![vec, elem],
        }
    }

    /// Non-value attributes (registers, condition, lane, immediate fields).
    fn attribute(&self) -> Option<String> {
        use IROp::*;
        match self {
            A32GetRegister { reg } | A32SetRegister { reg, .. } => Some(reg.to_string()),
            A32CallSupervisor { imm } => Some(format!("{:#x}", imm)),
            A64GetW { reg } | A64GetX { reg } | A64SetW { reg, .. } | A64SetX { reg, .. } => {
                Some(reg.to_string())
            }
            A64GetS { vec }
            | A64GetD { vec }
            | A64GetQ { vec }
            | A64SetS { vec, .. }
            | A64SetD { vec, .. }
            | A64SetQ { vec, .. } => Some(vec.to_string()),
            ConditionalSelect32 { cond, .. } | ConditionalSelect64 { cond, .. } => {
                Some(cond.to_string())
            }
            VectorGetElement32 { index, .. } | VectorSetElement32 { index, .. } => {
                Some(format!("[{}]", index))
            }
            _ => None,
        }
    }
}

impl fmt::Display for IROp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        let mut operands: Vec<String> = self.attribute().into_iter().collect();
        operands.extend(self.args().iter().map(ToString::to_string));
        if !operands.is_empty() {
            write!(f, " {}", operands.join(", "))?;
        }
        Ok(())
    }
}
