use std::fmt;

/// IR value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    U1,
    U8,
    U32,
    U64,
    U128,
}

impl Type {
    /// 位宽；`Void` 为 0
    pub fn bit_width(self) -> u32 {
        match self {
            Type::Void => 0,
            Type::U1 => 1,
            Type::U8 => 8,
            Type::U32 => 32,
            Type::U64 => 64,
            Type::U128 => 128,
        }
    }

    /// 覆盖低 `bit_width` 位的掩码
    pub fn mask(self) -> u128 {
        match self {
            Type::Void => 0,
            Type::U128 => u128::MAX,
            other => (1u128 << other.bit_width()) - 1,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Void => "void",
            Type::U1 => "u1",
            Type::U8 => "u8",
            Type::U32 => "u32",
            Type::U64 => "u64",
            Type::U128 => "u128",
        };
        f.write_str(name)
    }
}
