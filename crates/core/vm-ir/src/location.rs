//! 位置描述符
//!
//! 标识下一条待翻译的客体指令：程序计数器加上影响解码的处理器模式位。
//! 描述符是不可变值，只能通过 `advance_pc` 等方法生成新值来"前进"。

use std::fmt;

use serde::{Deserialize, Serialize};

/// A32 位置描述符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct A32LocationDescriptor {
    pc: u32,
    /// CPSR.T：Thumb 状态
    t_flag: bool,
    /// CPSR.E：大端数据访问
    e_flag: bool,
    /// 影响代码生成的 FPSCR 位
    fpscr_mode: u32,
}

impl A32LocationDescriptor {
    pub const FPSCR_MODE_MASK: u32 = 0x07F7_0000;

    pub fn new(pc: u32, t_flag: bool, e_flag: bool) -> Self {
        Self {
            pc,
            t_flag,
            e_flag,
            fpscr_mode: 0,
        }
    }

    /// ARM 状态、小端的描述符
    pub fn arm(pc: u32) -> Self {
        Self::new(pc, false, false)
    }

    #[must_use]
    pub fn with_fpscr(self, fpscr: u32) -> Self {
        Self {
            fpscr_mode: fpscr & Self::FPSCR_MODE_MASK,
            ..self
        }
    }

    pub fn pc(&self) -> u32 {
        self.pc
    }

    pub fn t_flag(&self) -> bool {
        self.t_flag
    }

    pub fn e_flag(&self) -> bool {
        self.e_flag
    }

    pub fn fpscr_mode(&self) -> u32 {
        self.fpscr_mode
    }

    #[must_use]
    pub fn set_pc(self, pc: u32) -> Self {
        Self { pc, ..self }
    }

    #[must_use]
    pub fn set_t_flag(self, t_flag: bool) -> Self {
        Self { t_flag, ..self }
    }

    #[must_use]
    pub fn advance_pc(self, amount: i32) -> Self {
        self.set_pc(self.pc.wrapping_add_signed(amount))
    }

    /// 用作块缓存键的 64 位哈希
    pub fn unique_hash(&self) -> u64 {
        u64::from(self.pc)
            | (u64::from(self.t_flag) << 32)
            | (u64::from(self.e_flag) << 33)
            | (u64::from(self.fpscr_mode) << 32)
    }
}

impl fmt::Display for A32LocationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:08x},", self.pc)?;
        if self.t_flag {
            f.write_str("T")?;
        }
        if self.e_flag {
            f.write_str("E")?;
        }
        write!(f, ",{:08x}}}", self.fpscr_mode)
    }
}

/// A64 位置描述符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct A64LocationDescriptor {
    pc: u64,
    fpcr: u32,
    single_stepping: bool,
}

impl A64LocationDescriptor {
    pub const PC_BIT_COUNT: u32 = 56;
    pub const PC_MASK: u64 = (1u64 << Self::PC_BIT_COUNT) - 1;
    pub const FPCR_MASK: u32 = 0x07C8_0000;
    const FPCR_SHIFT: u32 = 37;
    const SINGLE_STEPPING_BIT: u32 = 57;

    pub fn new(pc: u64, fpcr: u32) -> Self {
        Self {
            pc,
            fpcr: fpcr & Self::FPCR_MASK,
            single_stepping: false,
        }
    }

    pub fn pc(&self) -> u64 {
        self.pc
    }

    pub fn fpcr(&self) -> u32 {
        self.fpcr
    }

    pub fn single_stepping(&self) -> bool {
        self.single_stepping
    }

    #[must_use]
    pub fn set_pc(self, pc: u64) -> Self {
        Self { pc, ..self }
    }

    #[must_use]
    pub fn set_single_stepping(self, single_stepping: bool) -> Self {
        Self {
            single_stepping,
            ..self
        }
    }

    #[must_use]
    pub fn advance_pc(self, amount: i64) -> Self {
        self.set_pc(self.pc.wrapping_add_signed(amount))
    }

    pub fn unique_hash(&self) -> u64 {
        (self.pc & Self::PC_MASK)
            | (u64::from(self.fpcr) << Self::FPCR_SHIFT)
            | (u64::from(self.single_stepping) << Self::SINGLE_STEPPING_BIT)
    }
}

impl fmt::Display for A64LocationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:016x},{:08x}", self.pc, self.fpcr)?;
        if self.single_stepping {
            f.write_str(",step")?;
        }
        f.write_str("}")
    }
}

/// 与客体架构无关的位置描述符，终结节点与块使用它
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationDescriptor {
    A32(A32LocationDescriptor),
    A64(A64LocationDescriptor),
}

impl LocationDescriptor {
    pub fn pc(&self) -> u64 {
        match self {
            LocationDescriptor::A32(loc) => u64::from(loc.pc()),
            LocationDescriptor::A64(loc) => loc.pc(),
        }
    }

    #[must_use]
    pub fn advance_pc(self, amount: i64) -> Self {
        match self {
            // A32 的 PC 只有 32 位，截断后回绕即为正确结果
            LocationDescriptor::A32(loc) => LocationDescriptor::A32(loc.advance_pc(amount as i32)),
            LocationDescriptor::A64(loc) => LocationDescriptor::A64(loc.advance_pc(amount)),
        }
    }

    pub fn unique_hash(&self) -> u64 {
        match self {
            LocationDescriptor::A32(loc) => loc.unique_hash(),
            LocationDescriptor::A64(loc) => loc.unique_hash(),
        }
    }

    pub fn as_a32(&self) -> Option<A32LocationDescriptor> {
        match self {
            LocationDescriptor::A32(loc) => Some(*loc),
            LocationDescriptor::A64(_) => None,
        }
    }

    pub fn as_a64(&self) -> Option<A64LocationDescriptor> {
        match self {
            LocationDescriptor::A64(loc) => Some(*loc),
            LocationDescriptor::A32(_) => None,
        }
    }
}

impl From<A32LocationDescriptor> for LocationDescriptor {
    fn from(loc: A32LocationDescriptor) -> Self {
        LocationDescriptor::A32(loc)
    }
}

impl From<A64LocationDescriptor> for LocationDescriptor {
    fn from(loc: A64LocationDescriptor) -> Self {
        LocationDescriptor::A64(loc)
    }
}

impl fmt::Display for LocationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationDescriptor::A32(loc) => write!(f, "a32{}", loc),
            LocationDescriptor::A64(loc) => write!(f, "a64{}", loc),
        }
    }
}
