use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Type;

/// 对同一块中先前指令的引用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstRef(pub u32);

impl InstRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InstRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// IR 操作数：指令结果或立即数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    Void,
    Inst(InstRef),
    ImmU1(bool),
    ImmU8(u8),
    ImmU32(u32),
    ImmU64(u64),
}

impl Value {
    pub fn is_immediate(&self) -> bool {
        !matches!(self, Value::Void | Value::Inst(_))
    }

    pub fn as_inst(&self) -> Option<InstRef> {
        match self {
            Value::Inst(r) => Some(*r),
            _ => None,
        }
    }

    /// 立即数的类型；指令结果的类型记录在块中，这里返回 `None`
    pub fn immediate_type(&self) -> Option<Type> {
        match self {
            Value::Void => Some(Type::Void),
            Value::Inst(_) => None,
            Value::ImmU1(_) => Some(Type::U1),
            Value::ImmU8(_) => Some(Type::U8),
            Value::ImmU32(_) => Some(Type::U32),
            Value::ImmU64(_) => Some(Type::U64),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("void"),
            Value::Inst(r) => write!(f, "{}", r),
            Value::ImmU1(b) => write!(f, "#{}", u8::from(*b)),
            Value::ImmU8(v) => write!(f, "#{}", v),
            Value::ImmU32(v) => write!(f, "#{:#x}", v),
            Value::ImmU64(v) => write!(f, "#{:#x}", v),
        }
    }
}

/// A32 通用寄存器 R0-R15
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct A32Reg(u8);

impl A32Reg {
    pub const SP: A32Reg = A32Reg(13);
    pub const LR: A32Reg = A32Reg(14);
    pub const PC: A32Reg = A32Reg(15);

    /// 从 4 位寄存器字段解码
    pub fn from_bits(bits: u32) -> Self {
        A32Reg((bits & 0xF) as u8)
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn is_pc(self) -> bool {
        self == Self::PC
    }
}

impl fmt::Display for A32Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            13 => f.write_str("SP"),
            14 => f.write_str("LR"),
            15 => f.write_str("PC"),
            n => write!(f, "R{}", n),
        }
    }
}

/// A64 通用寄存器字段 R0-R31
///
/// 31 号表示 SP 还是零寄存器取决于具体指令，由翻译例程决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct A64Reg(u8);

impl A64Reg {
    pub const LR: A64Reg = A64Reg(30);
    pub const R31: A64Reg = A64Reg(31);

    /// 从 5 位寄存器字段解码
    pub fn from_bits(bits: u32) -> Self {
        A64Reg((bits & 0x1F) as u8)
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn is_r31(self) -> bool {
        self == Self::R31
    }
}

impl fmt::Display for A64Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// A64 SIMD&FP 寄存器 V0-V31
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct A64Vec(u8);

impl A64Vec {
    pub fn from_bits(bits: u32) -> Self {
        A64Vec((bits & 0x1F) as u8)
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for A64Vec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_fields_are_masked() {
        assert_eq!(A32Reg::from_bits(0x1F), A32Reg::PC);
        assert_eq!(A64Reg::from_bits(0x3F), A64Reg::R31);
        assert_eq!(A64Vec::from_bits(33).index(), 1);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Inst(InstRef(3)).to_string(), "%3");
        assert_eq!(Value::ImmU1(true).to_string(), "#1");
        assert_eq!(Value::ImmU32(0x20).to_string(), "#0x20");
        assert_eq!(A32Reg::LR.to_string(), "LR");
        assert_eq!(A32Reg::from_bits(7).to_string(), "R7");
    }

    #[test]
    fn test_immediate_type() {
        assert_eq!(Value::ImmU8(1).immediate_type(), Some(Type::U8));
        assert_eq!(Value::Inst(InstRef(0)).immediate_type(), None);
        assert!(Value::ImmU64(0).is_immediate());
        assert!(!Value::Void.is_immediate());
    }
}
