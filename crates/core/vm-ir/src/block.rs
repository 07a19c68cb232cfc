//! IR 基本块
//!
//! 块由起始位置、线性指令序列、周期计数、可选的条件守卫以及唯一的终结节点组成。
//! 块内指令只能引用位于其之前的指令结果。

use std::fmt;

use crate::cond::Cond;
use crate::error::IrError;
use crate::location::LocationDescriptor;
use crate::opcode::IROp;
use crate::terminal::Terminal;
use crate::types::Type;
use crate::value::{InstRef, Value};

/// 块内的一条指令
#[derive(Debug, Clone, PartialEq)]
pub struct IRInst {
    pub op: IROp,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IRBlock {
    /// 块的起始位置
    pub location: LocationDescriptor,
    pub insts: Vec<IRInst>,
    /// 块所覆盖的客体指令数
    pub cycle_count: u64,
    /// 块级条件守卫：不成立时整个块被跳过
    pub cond: Option<Cond>,
    /// 守卫不成立时的继续位置
    pub cond_failed: Option<LocationDescriptor>,
    pub terminal: Terminal,
}

impl IRBlock {
    pub fn new(location: LocationDescriptor) -> Self {
        Self {
            location,
            insts: Vec::new(),
            cycle_count: 0,
            cond: None,
            cond_failed: None,
            terminal: Terminal::Invalid,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.insts.len()
    }

    /// 追加一条指令，返回其结果引用
    pub fn push(&mut self, op: IROp) -> InstRef {
        let index = InstRef(self.insts.len() as u32);
        let ty = op.result_type();
        self.insts.push(IRInst { op, ty });
        index
    }

    /// 操作数的类型；越界引用视为 `Void`
    pub fn type_of(&self, value: Value) -> Type {
        match value {
            Value::Inst(r) => self.insts.get(r.index()).map_or(Type::Void, |inst| inst.ty),
            other => other.immediate_type().unwrap_or(Type::Void),
        }
    }

    pub fn has_terminal(&self) -> bool {
        !self.terminal.is_invalid()
    }

    /// 设置终结节点。每个块只能设置一次。
    pub fn set_terminal(&mut self, terminal: Terminal) -> Result<(), IrError> {
        if self.has_terminal() {
            return Err(IrError::TerminalAlreadySet {
                existing: self.terminal.to_string(),
                attempted: terminal.to_string(),
            });
        }
        self.terminal = terminal;
        Ok(())
    }

    /// 设置块级条件守卫。每个块只能设置一次。
    pub fn set_condition(&mut self, cond: Cond) -> Result<(), IrError> {
        if let Some(existing) = self.cond {
            return Err(IrError::ConditionAlreadySet {
                existing,
                attempted: cond,
            });
        }
        self.cond = Some(cond);
        Ok(())
    }

    pub fn set_condition_failed_location(&mut self, location: LocationDescriptor) {
        self.cond_failed = Some(location);
    }
}

impl fmt::Display for IRBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "block {}:", self.location)?;
        if let Some(cond) = self.cond {
            write!(f, "  guard: {}", cond)?;
            if let Some(failed) = self.cond_failed {
                write!(f, " (else {})", failed)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  cycles: {}", self.cycle_count)?;
        for (i, inst) in self.insts.iter().enumerate() {
            if inst.ty == Type::Void {
                writeln!(f, "  {}", inst.op)?;
            } else {
                writeln!(f, "  %{}: {} = {}", i, inst.ty, inst.op)?;
            }
        }
        write!(f, "  terminal: {}", self.terminal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::A32LocationDescriptor;
    use crate::value::A32Reg;

    fn block() -> IRBlock {
        IRBlock::new(A32LocationDescriptor::arm(0x1000).into())
    }

    #[test]
    fn test_push_returns_sequential_refs() {
        let mut b = block();
        let r0 = b.push(IROp::A32GetRegister { reg: A32Reg::from_bits(0) });
        let r1 = b.push(IROp::IsZero32 { value: Value::Inst(r0) });
        assert_eq!(r0, InstRef(0));
        assert_eq!(r1, InstRef(1));
        assert_eq!(b.type_of(Value::Inst(r0)), Type::U32);
        assert_eq!(b.type_of(Value::Inst(r1)), Type::U1);
        assert_eq!(b.type_of(Value::ImmU8(3)), Type::U8);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_terminal_set_once() {
        let mut b = block();
        assert!(!b.has_terminal());
        b.set_terminal(Terminal::ReturnToDispatch).unwrap();
        let err = b.set_terminal(Terminal::PopRSBHint).unwrap_err();
        assert!(matches!(err, IrError::TerminalAlreadySet { .. }));
        assert_eq!(b.terminal, Terminal::ReturnToDispatch);
    }

    #[test]
    fn test_condition_set_once() {
        let mut b = block();
        b.set_condition(Cond::EQ).unwrap();
        assert_eq!(
            b.set_condition(Cond::NE),
            Err(IrError::ConditionAlreadySet {
                existing: Cond::EQ,
                attempted: Cond::NE
            })
        );
    }

    #[test]
    fn test_display_lists_instructions() {
        let mut b = block();
        let r = b.push(IROp::A32GetRegister { reg: A32Reg::from_bits(1) });
        b.push(IROp::A32SetRegister { reg: A32Reg::from_bits(0), value: Value::Inst(r) });
        b.cycle_count = 1;
        b.set_terminal(Terminal::ReturnToDispatch).unwrap();
        let text = b.to_string();
        assert!(text.contains("%0: u32 = A32GetRegister R1"));
        assert!(text.contains("  A32SetRegister R0, %0"));
        assert!(text.ends_with("terminal: ReturnToDispatch"));
    }
}
