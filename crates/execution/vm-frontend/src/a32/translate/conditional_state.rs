//! 条件执行状态机
//!
//! 带条件的 A32 指令可以作为块级守卫：块的第一条产生 IR 的指令若带条件，
//! 整个块都受该条件保护；否则在条件指令处断开，由下一个块处理它。

use vm_ir::{Cond, Terminal};

use super::visitor::ArmTranslatorVisitor;
use crate::outcome::TranslationFault;

/// 状态只会单调迁移：`None → Translating` 或 `None → Break`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalState {
    /// 尚未遇到条件指令
    None,
    /// 块以条件守卫开始，当前指令在守卫下翻译
    Translating,
    /// 遇到条件指令但块中已有指令，块在此结束
    Break,
}

impl ArmTranslatorVisitor {
    /// 判断当前指令是否应在本块中按条件 `cond` 翻译
    ///
    /// 返回 `false` 时调用者应直接返回 `Outcome::Continue`，不产生任何 IR。
    pub fn condition_passed(&mut self, cond: Cond) -> Result<bool, TranslationFault> {
        if self.cond_state != ConditionalState::None {
            return Err(TranslationFault::ConditionReentered {
                location: self.current_location.into(),
            });
        }

        match cond {
            Cond::AL => Ok(true),
            Cond::NV => Ok(false),
            _ if !self.ir.block.is_empty() => {
                // 不消费该指令：下一个块从这里开始并以它为守卫
                self.cond_state = ConditionalState::Break;
                self.ir.set_term(Terminal::LinkBlock {
                    next: self.current_location.into(),
                })?;
                Ok(false)
            }
            _ => {
                self.cond_state = ConditionalState::Translating;
                self.ir.block.set_condition(cond)?;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TranslationOptions;
    use vm_ir::{A32LocationDescriptor, A32Reg};

    fn visitor() -> ArmTranslatorVisitor {
        ArmTranslatorVisitor::new(A32LocationDescriptor::arm(0x100), TranslationOptions::default())
    }

    #[test]
    fn test_always_and_never() {
        let mut v = visitor();
        assert!(v.condition_passed(Cond::AL).unwrap());
        assert!(!v.condition_passed(Cond::NV).unwrap());
        assert_eq!(v.cond_state(), ConditionalState::None);
        assert!(v.block().cond.is_none());
    }

    #[test]
    fn test_first_conditional_becomes_guard() {
        let mut v = visitor();
        assert!(v.condition_passed(Cond::EQ).unwrap());
        assert_eq!(v.cond_state(), ConditionalState::Translating);
        assert_eq!(v.block().cond, Some(Cond::EQ));
        assert!(!v.block().has_terminal());
    }

    #[test]
    fn test_conditional_after_instructions_breaks() {
        let mut v = visitor();
        v.ir.a32_set_register(A32Reg::from_bits(0), vm_ir::Value::ImmU32(1));
        assert!(!v.condition_passed(Cond::NE).unwrap());
        assert_eq!(v.cond_state(), ConditionalState::Break);
        assert_eq!(
            v.block().terminal,
            Terminal::LinkBlock {
                next: A32LocationDescriptor::arm(0x100).into()
            }
        );
        assert!(v.block().cond.is_none());
    }

    #[test]
    fn test_reentry_is_a_fault() {
        let mut v = visitor();
        v.condition_passed(Cond::GT).unwrap();
        assert!(matches!(
            v.condition_passed(Cond::AL),
            Err(TranslationFault::ConditionReentered { .. })
        ));

        let mut v = visitor();
        v.ir.a32_get_c_flag();
        v.condition_passed(Cond::LT).unwrap();
        assert!(matches!(
            v.condition_passed(Cond::LT),
            Err(TranslationFault::ConditionReentered { .. })
        ));
    }
}
