use std::fmt;

/// 移位类型，编码于指令位 6..5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftType {
    LSL,
    LSR,
    ASR,
    /// `ROR #0` 的立即数编码表示 RRX
    ROR,
}

impl ShiftType {
    pub fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => ShiftType::LSL,
            1 => ShiftType::LSR,
            2 => ShiftType::ASR,
            _ => ShiftType::ROR,
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 数据处理操作码，编码于指令位 24..21
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataProcOp {
    AND,
    EOR,
    SUB,
    RSB,
    ADD,
    ADC,
    SBC,
    RSC,
    TST,
    TEQ,
    CMP,
    CMN,
    ORR,
    MOV,
    BIC,
    MVN,
}

impl DataProcOp {
    pub const ALL: [DataProcOp; 16] = [
        DataProcOp::AND,
        DataProcOp::EOR,
        DataProcOp::SUB,
        DataProcOp::RSB,
        DataProcOp::ADD,
        DataProcOp::ADC,
        DataProcOp::SBC,
        DataProcOp::RSC,
        DataProcOp::TST,
        DataProcOp::TEQ,
        DataProcOp::CMP,
        DataProcOp::CMN,
        DataProcOp::ORR,
        DataProcOp::MOV,
        DataProcOp::BIC,
        DataProcOp::MVN,
    ];

    pub fn from_bits(bits: u32) -> Self {
        Self::ALL[(bits & 0xF) as usize]
    }

    pub fn bits(self) -> u32 {
        self as u32
    }

    /// TST/TEQ/CMP/CMN：只更新标志，不写 Rd
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            DataProcOp::TST | DataProcOp::TEQ | DataProcOp::CMP | DataProcOp::CMN
        )
    }

    /// MOV/MVN 不读取 Rn
    pub fn is_move(self) -> bool {
        matches!(self, DataProcOp::MOV | DataProcOp::MVN)
    }
}

impl fmt::Display for DataProcOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
