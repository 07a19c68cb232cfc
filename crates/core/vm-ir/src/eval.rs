//! 参考求值器
//!
//! 直接在 [`GuestState`] 上逐条解释 IR 块，用于测试翻译结果以及命令行工具的
//! 单块执行。它不是执行引擎：不处理内存访问，也不负责块间调度。

use log::trace;

use crate::block::IRBlock;
use crate::cond::Nzcv;
use crate::error::EvalError;
use crate::location::LocationDescriptor;
use crate::opcode::IROp;
use crate::terminal::Terminal;
use crate::types::Type;
use crate::value::Value;

/// 客体寄存器状态（A32 与 A64 共用一个结构，各自只使用自己的部分）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestState {
    /// A32 R0-R15，R15 为 PC
    pub regs: [u32; 16],
    /// A32 CPSR.T
    pub t_flag: bool,
    /// A64 X0-X30 与 SP（下标 31）
    pub x: [u64; 32],
    /// A64 PC
    pub pc: u64,
    /// A64 V0-V31
    pub vec: [u128; 32],
    pub flags: Nzcv,
    /// 停机请求，`CheckHalt` 据此返回调度器
    pub halt_requested: bool,
    /// 已执行的 SVC 立即数，按执行顺序
    pub svc_calls: Vec<u32>,
}

/// 块的离开方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockExit {
    /// 守卫不成立，跳过整个块
    ConditionFailed(LocationDescriptor),
    Link(LocationDescriptor),
    Interpret(LocationDescriptor),
    ReturnToDispatch { pc: u64 },
    PopRSBHint { pc: u64 },
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    bits: u128,
    carry: bool,
    overflow: bool,
}

impl Slot {
    fn value(bits: u128) -> Self {
        Self { bits, ..Self::default() }
    }
}

pub struct Evaluator;

impl Evaluator {
    pub fn run(block: &IRBlock, state: &mut GuestState) -> Result<BlockExit, EvalError> {
        if let Some(cond) = block.cond {
            let failed = block.cond_failed.ok_or(EvalError::MissingConditionFailed {
                location: block.location,
            })?;
            if !cond.passed(state.flags) {
                trace!("guard {} failed at {}", cond, block.location);
                return Ok(BlockExit::ConditionFailed(failed));
            }
        }

        let mut slots: Vec<Slot> = Vec::with_capacity(block.insts.len());
        for (index, inst) in block.insts.iter().enumerate() {
            let slot = Self::step(&inst.op, index, &slots, state)?;
            slots.push(Slot {
                bits: slot.bits & inst.ty.mask(),
                ..slot
            });
        }

        Self::exit(&block.terminal, block.location, state)
    }

    fn exit(
        terminal: &Terminal,
        location: LocationDescriptor,
        state: &GuestState,
    ) -> Result<BlockExit, EvalError> {
        let pc = match location {
            LocationDescriptor::A32(_) => u64::from(state.regs[15]),
            LocationDescriptor::A64(_) => state.pc,
        };
        match terminal {
            Terminal::Invalid => Err(EvalError::InvalidTerminal { location }),
            Terminal::Interpret(loc) => Ok(BlockExit::Interpret(*loc)),
            Terminal::ReturnToDispatch => Ok(BlockExit::ReturnToDispatch { pc }),
            Terminal::LinkBlock { next } => Ok(BlockExit::Link(*next)),
            Terminal::PopRSBHint => Ok(BlockExit::PopRSBHint { pc }),
            Terminal::If { cond, then_, else_ } => {
                let taken = if cond.passed(state.flags) { then_ } else { else_ };
                Self::exit(taken, location, state)
            }
            Terminal::CheckHalt { else_ } => {
                if state.halt_requested {
                    Ok(BlockExit::ReturnToDispatch { pc })
                } else {
                    Self::exit(else_, location, state)
                }
            }
        }
    }

    fn operand(slots: &[Slot], index: usize, value: Value) -> Result<Slot, EvalError> {
        Ok(match value {
            Value::Void => Slot::default(),
            Value::Inst(r) => {
                if r.index() >= index {
                    return Err(EvalError::UndefinedValue { index, value: r });
                }
                slots[r.index()]
            }
            Value::ImmU1(b) => Slot::value(u128::from(b)),
            Value::ImmU8(v) => Slot::value(u128::from(v)),
            Value::ImmU32(v) => Slot::value(u128::from(v)),
            Value::ImmU64(v) => Slot::value(u128::from(v)),
        })
    }

    fn step(
        op: &IROp,
        index: usize,
        slots: &[Slot],
        state: &mut GuestState,
    ) -> Result<Slot, EvalError> {
        let get = |v: Value| Self::operand(slots, index, v).map(|s| s.bits);
        let get32 = |v: Value| get(v).map(|b| b as u32);
        let get1 = |v: Value| get(v).map(|b| b & 1 != 0);
        let get8 = |v: Value| get(v).map(|b| b as u8);

        let slot = match *op {
            IROp::A32GetRegister { reg } => Slot::value(u128::from(state.regs[reg.index()])),
            IROp::A32SetRegister { reg, value } => {
                state.regs[reg.index()] = get32(value)?;
                Slot::default()
            }
            IROp::A32GetCFlag => Slot::value(u128::from(state.flags.c)),
            IROp::A32SetNFlag { value } => {
                state.flags.n = get1(value)?;
                Slot::default()
            }
            IROp::A32SetZFlag { value } => {
                state.flags.z = get1(value)?;
                Slot::default()
            }
            IROp::A32SetCFlag { value } => {
                state.flags.c = get1(value)?;
                Slot::default()
            }
            IROp::A32SetVFlag { value } => {
                state.flags.v = get1(value)?;
                Slot::default()
            }
            IROp::A32BranchWritePC { value } => {
                let target = get32(value)?;
                state.regs[15] = if state.t_flag { target & !1 } else { target & !3 };
                Slot::default()
            }
            IROp::A32BXWritePC { value } => {
                let target = get32(value)?;
                state.t_flag = target & 1 != 0;
                state.regs[15] = if state.t_flag { target & !1 } else { target & !3 };
                Slot::default()
            }
            IROp::A32CallSupervisor { imm } => {
                state.svc_calls.push(imm);
                Slot::default()
            }

            IROp::A64GetW { reg } => Slot::value(u128::from(state.x[reg.index()] as u32)),
            IROp::A64GetX { reg } => Slot::value(u128::from(state.x[reg.index()])),
            IROp::A64SetW { reg, value } => {
                state.x[reg.index()] = u64::from(get32(value)?);
                Slot::default()
            }
            IROp::A64SetX { reg, value } => {
                state.x[reg.index()] = get(value)? as u64;
                Slot::default()
            }
            IROp::A64GetS { vec } => Slot::value(state.vec[vec.index()] & Type::U32.mask()),
            IROp::A64GetD { vec } => Slot::value(state.vec[vec.index()] & Type::U64.mask()),
            IROp::A64GetQ { vec } => Slot::value(state.vec[vec.index()]),
            // 标量写入清零高位
            IROp::A64SetS { vec, value } => {
                state.vec[vec.index()] = get(value)? & Type::U32.mask();
                Slot::default()
            }
            IROp::A64SetD { vec, value } => {
                state.vec[vec.index()] = get(value)? & Type::U64.mask();
                Slot::default()
            }
            IROp::A64SetQ { vec, value } => {
                state.vec[vec.index()] = get(value)?;
                Slot::default()
            }
            IROp::A64SetPC { value } => {
                state.pc = get(value)? as u64;
                Slot::default()
            }

            IROp::GetCarryFromOp { op } => {
                Slot::value(u128::from(Self::operand(slots, index, op)?.carry))
            }
            IROp::GetOverflowFromOp { op } => {
                Slot::value(u128::from(Self::operand(slots, index, op)?.overflow))
            }

            IROp::LeastSignificantByte { value } => Slot::value(get(value)? & 0xFF),
            IROp::MostSignificantBit { value } => Slot::value(u128::from(get32(value)? >> 31)),
            IROp::IsZero32 { value } => Slot::value(u128::from(get32(value)? == 0)),
            IROp::LogicalShiftLeft32 { value, amount, carry_in } => {
                shifted(lsl(get32(value)?, get8(amount)?, get1(carry_in)?))
            }
            IROp::LogicalShiftRight32 { value, amount, carry_in } => {
                shifted(lsr(get32(value)?, get8(amount)?, get1(carry_in)?))
            }
            IROp::ArithmeticShiftRight32 { value, amount, carry_in } => {
                shifted(asr(get32(value)?, get8(amount)?, get1(carry_in)?))
            }
            IROp::RotateRight32 { value, amount, carry_in } => {
                shifted(ror(get32(value)?, get8(amount)?, get1(carry_in)?))
            }
            IROp::RotateRightExtended { value, carry_in } => {
                shifted(rrx(get32(value)?, get1(carry_in)?))
            }
            IROp::Add32 { a, b, carry_in } => {
                add_with_carry32(get32(a)?, get32(b)?, get1(carry_in)?)
            }
            IROp::Sub32 { a, b, carry_in } => {
                add_with_carry32(get32(a)?, !get32(b)?, get1(carry_in)?)
            }
            IROp::Add64 { a, b, carry_in } => {
                add_with_carry64(get(a)? as u64, get(b)? as u64, get1(carry_in)?)
            }
            IROp::And32 { a, b } => Slot::value(get(a)? & get(b)?),
            IROp::Eor32 { a, b } => Slot::value(get(a)? ^ get(b)?),
            IROp::Or32 { a, b } => Slot::value(get(a)? | get(b)?),
            IROp::Not32 { value } => Slot::value(u128::from(!get32(value)?)),
            IROp::ConditionalSelect32 { cond, a, b } | IROp::ConditionalSelect64 { cond, a, b } => {
                if cond.passed(state.flags) {
                    Slot::value(get(a)?)
                } else {
                    Slot::value(get(b)?)
                }
            }

            IROp::VectorGetElement32 { vec, index: lane } => {
                let shift = 32 * u32::from(lane & 3);
                Slot::value((get(vec)? >> shift) & Type::U32.mask())
            }
            IROp::VectorSetElement32 { vec, index: lane, elem } => {
                let shift = 32 * u32::from(lane & 3);
                let cleared = get(vec)? & !(Type::U32.mask() << shift);
                Slot::value(cleared | (u128::from(get32(elem)?) << shift))
            }
            IROp::VectorAnd { a, b } => Slot::value(get(a)? & get(b)?),
            IROp::VectorEor { a, b } => Slot::value(get(a)? ^ get(b)?),
            IROp::VectorNot { a } => Slot::value(!get(a)?),
            IROp::ZeroVector => Slot::value(0),
        };
        Ok(slot)
    }
}

fn shifted((result, carry): (u32, bool)) -> Slot {
    Slot {
        bits: u128::from(result),
        carry,
        overflow: false,
    }
}

fn lsl(value: u32, amount: u8, carry_in: bool) -> (u32, bool) {
    match amount {
        0 => (value, carry_in),
        1..=31 => (value << amount, (value >> (32 - amount)) & 1 != 0),
        32 => (0, value & 1 != 0),
        _ => (0, false),
    }
}

fn lsr(value: u32, amount: u8, carry_in: bool) -> (u32, bool) {
    match amount {
        0 => (value, carry_in),
        1..=31 => (value >> amount, (value >> (amount - 1)) & 1 != 0),
        32 => (0, value >> 31 != 0),
        _ => (0, false),
    }
}

fn asr(value: u32, amount: u8, carry_in: bool) -> (u32, bool) {
    match amount {
        0 => (value, carry_in),
        1..=31 => (
            ((value as i32) >> amount) as u32,
            (value >> (amount - 1)) & 1 != 0,
        ),
        _ => (((value as i32) >> 31) as u32, value >> 31 != 0),
    }
}

fn ror(value: u32, amount: u8, carry_in: bool) -> (u32, bool) {
    if amount == 0 {
        return (value, carry_in);
    }
    let result = value.rotate_right(u32::from(amount) % 32);
    (result, result >> 31 != 0)
}

fn rrx(value: u32, carry_in: bool) -> (u32, bool) {
    ((value >> 1) | (u32::from(carry_in) << 31), value & 1 != 0)
}

fn add_with_carry32(a: u32, b: u32, carry_in: bool) -> Slot {
    let sum = u64::from(a) + u64::from(b) + u64::from(carry_in);
    let result = sum as u32;
    Slot {
        bits: u128::from(result),
        carry: sum >> 32 != 0,
        overflow: ((a ^ result) & (b ^ result)) >> 31 != 0,
    }
}

fn add_with_carry64(a: u64, b: u64, carry_in: bool) -> Slot {
    let sum = u128::from(a) + u128::from(b) + u128::from(carry_in);
    let result = sum as u64;
    Slot {
        bits: u128::from(result),
        carry: sum >> 64 != 0,
        overflow: ((a ^ result) & (b ^ result)) >> 63 != 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cond::Cond;
    use crate::emitter::IREmitter;
    use crate::location::{A32LocationDescriptor, A64LocationDescriptor};
    use crate::value::{A32Reg, A64Vec, InstRef};

    fn a32_emitter() -> IREmitter {
        IREmitter::new(A32LocationDescriptor::arm(0x100).into())
    }

    #[test]
    fn test_shift_edge_amounts() {
        let v = 0x8000_0001;
        assert_eq!(lsl(v, 0, true), (v, true));
        assert_eq!(lsl(v, 1, false), (2, true));
        assert_eq!(lsl(v, 32, false), (0, true));
        assert_eq!(lsl(v, 33, true), (0, false));
        assert_eq!(lsr(v, 32, false), (0, true));
        assert_eq!(lsr(v, 1, false), (0x4000_0000, true));
        assert_eq!(asr(v, 32, false), (0xFFFF_FFFF, true));
        assert_eq!(asr(v, 200, false), (0xFFFF_FFFF, true));
        assert_eq!(asr(0x7FFF_FFFF, 40, true), (0, false));
        assert_eq!(ror(v, 1, false), (0xC000_0000, true));
        assert_eq!(ror(v, 32, false), (v, true));
        assert_eq!(rrx(v, false), (0x4000_0000, true));
        assert_eq!(rrx(2, true), (0x8000_0001, false));
    }

    #[test]
    fn test_add_sub_flags() {
        let s = add_with_carry32(0xFFFF_FFFF, 1, false);
        assert_eq!((s.bits, s.carry, s.overflow), (0, true, false));
        let s = add_with_carry32(0x7FFF_FFFF, 1, false);
        assert_eq!((s.bits, s.carry, s.overflow), (0x8000_0000, false, true));
        // 5 - 5 = 0，无借位时 C=1
        let s = add_with_carry32(5, !5, true);
        assert_eq!((s.bits, s.carry, s.overflow), (0, true, false));
    }

    #[test]
    fn test_guard_failure_skips_block() {
        let mut ir = a32_emitter();
        ir.a32_set_register(A32Reg::from_bits(0), Value::ImmU32(1));
        ir.set_term(Terminal::ReturnToDispatch).unwrap();
        let mut block = ir.into_block();
        block.set_condition(Cond::EQ).unwrap();
        let next: LocationDescriptor = A32LocationDescriptor::arm(0x104).into();
        block.set_condition_failed_location(next);

        let mut state = GuestState::default();
        assert_eq!(
            Evaluator::run(&block, &mut state).unwrap(),
            BlockExit::ConditionFailed(next)
        );
        assert_eq!(state.regs[0], 0);

        state.flags.z = true;
        state.regs[15] = 0x104;
        assert_eq!(
            Evaluator::run(&block, &mut state).unwrap(),
            BlockExit::ReturnToDispatch { pc: 0x104 }
        );
        assert_eq!(state.regs[0], 1);
    }

    #[test]
    fn test_guard_without_failed_location_is_error() {
        let mut ir = a32_emitter();
        ir.set_term(Terminal::ReturnToDispatch).unwrap();
        let mut block = ir.into_block();
        block.set_condition(Cond::NE).unwrap();
        assert!(matches!(
            Evaluator::run(&block, &mut GuestState::default()),
            Err(EvalError::MissingConditionFailed { .. })
        ));
    }

    #[test]
    fn test_forward_reference_is_rejected() {
        let mut block = IRBlock::new(A32LocationDescriptor::arm(0).into());
        block.push(IROp::Not32 { value: Value::Inst(InstRef(0)) });
        block.set_terminal(Terminal::ReturnToDispatch).unwrap();
        assert_eq!(
            Evaluator::run(&block, &mut GuestState::default()),
            Err(EvalError::UndefinedValue { index: 0, value: InstRef(0) })
        );
    }

    #[test]
    fn test_invalid_terminal_is_error() {
        let block = IRBlock::new(A32LocationDescriptor::arm(0).into());
        assert!(matches!(
            Evaluator::run(&block, &mut GuestState::default()),
            Err(EvalError::InvalidTerminal { .. })
        ));
    }

    #[test]
    fn test_if_and_check_halt() {
        let here: LocationDescriptor = A64LocationDescriptor::new(0x40, 0).into();
        let then_loc = here.advance_pc(0x20);
        let else_loc = here.advance_pc(4);
        let mut block = IRBlock::new(here);
        block
            .set_terminal(Terminal::CheckHalt {
                else_: Box::new(Terminal::If {
                    cond: Cond::CS,
                    then_: Box::new(Terminal::LinkBlock { next: then_loc }),
                    else_: Box::new(Terminal::LinkBlock { next: else_loc }),
                }),
            })
            .unwrap();

        let mut state = GuestState::default();
        assert_eq!(Evaluator::run(&block, &mut state).unwrap(), BlockExit::Link(else_loc));
        state.flags.c = true;
        assert_eq!(Evaluator::run(&block, &mut state).unwrap(), BlockExit::Link(then_loc));
        state.halt_requested = true;
        state.pc = 0x40;
        assert_eq!(
            Evaluator::run(&block, &mut state).unwrap(),
            BlockExit::ReturnToDispatch { pc: 0x40 }
        );
    }

    #[test]
    fn test_vector_lanes_and_scalar_writes() {
        let mut ir = IREmitter::new(A64LocationDescriptor::new(0, 0).into());
        let zero = ir.zero_vector();
        let v = ir.vector_set_element32(zero, 3, Value::ImmU32(0xDEAD_BEEF));
        let lane = ir.vector_get_element32(v, 3);
        ir.a64_set_q(A64Vec::from_bits(0), v);
        ir.a64_set_s(A64Vec::from_bits(1), lane);
        ir.set_term(Terminal::ReturnToDispatch).unwrap();
        let block = ir.into_block();

        let mut state = GuestState::default();
        state.vec[1] = u128::MAX;
        Evaluator::run(&block, &mut state).unwrap();
        assert_eq!(state.vec[0], 0xDEAD_BEEF_u128 << 96);
        assert_eq!(state.vec[1], 0xDEAD_BEEF);
    }

    #[test]
    fn test_bx_switches_instruction_set() {
        let mut ir = a32_emitter();
        ir.a32_bx_write_pc(Value::ImmU32(0x2001));
        ir.set_term(Terminal::ReturnToDispatch).unwrap();
        let block = ir.into_block();
        let mut state = GuestState::default();
        let exit = Evaluator::run(&block, &mut state).unwrap();
        assert!(state.t_flag);
        assert_eq!(exit, BlockExit::ReturnToDispatch { pc: 0x2000 });
    }
}
