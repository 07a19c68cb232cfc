//! A32 翻译访问者
//!
//! 一次块翻译独占一个访问者：它持有 IR 发射器、当前位置和条件执行状态。

use log::warn;
use vm_ir::{A32LocationDescriptor, A32Reg, IRBlock, IREmitter, Terminal, Value};

use super::conditional_state::ConditionalState;
use crate::options::TranslationOptions;
use crate::outcome::{Outcome, TranslateResult, TranslationFault};

pub struct ArmTranslatorVisitor {
    pub(crate) ir: IREmitter,
    /// 正在翻译的指令位置，只有驱动循环推进它
    pub(crate) current_location: A32LocationDescriptor,
    pub(crate) cond_state: ConditionalState,
    pub(crate) options: TranslationOptions,
    /// 正在翻译的指令字，用于故障报告
    pub(crate) current_word: u32,
}

impl ArmTranslatorVisitor {
    pub fn new(location: A32LocationDescriptor, options: TranslationOptions) -> Self {
        Self {
            ir: IREmitter::new(location.into()),
            current_location: location,
            cond_state: ConditionalState::None,
            options,
            current_word: 0,
        }
    }

    pub fn location(&self) -> A32LocationDescriptor {
        self.current_location
    }

    pub fn cond_state(&self) -> ConditionalState {
        self.cond_state
    }

    pub fn block(&self) -> &IRBlock {
        &self.ir.block
    }

    pub fn into_block(self) -> IRBlock {
        self.ir.into_block()
    }

    pub(crate) fn pc(&self) -> u32 {
        self.current_location.pc()
    }

    /// 读取寄存器；读 PC 得到当前指令地址加 8
    pub(crate) fn reg(&mut self, reg: A32Reg) -> Value {
        if reg.is_pc() {
            self.ir.imm32(self.pc().wrapping_add(8))
        } else {
            self.ir.a32_get_register(reg)
        }
    }

    /// 块以 `Interpret(当前位置)` 结束
    pub fn interpret_this_instruction(&mut self) -> TranslateResult {
        self.ir.set_term(Terminal::Interpret(self.current_location.into()))?;
        Ok(Outcome::Interpret)
    }

    pub fn unpredictable_instruction(&mut self) -> TranslateResult {
        if self.options.define_unpredictable_behaviour {
            warn!(
                "UNPREDICTABLE instruction {:#010x} at {:#010x}, interpreting",
                self.current_word,
                self.pc()
            );
            return self.interpret_this_instruction();
        }
        Err(TranslationFault::Unpredictable {
            location: self.current_location.into(),
            word: self.current_word,
        })
    }

    /// 块以链接到下一条指令结束
    pub fn link_to_next_instruction(&mut self) -> TranslateResult {
        let next = self.current_location.advance_pc(4);
        self.ir.set_term(Terminal::LinkBlock { next: next.into() })?;
        Ok(Outcome::Stop)
    }

    /// 未定义指令与未匹配的编码都交给解释器
    pub fn arm_udf(&mut self, _word: u32) -> TranslateResult {
        self.interpret_this_instruction()
    }
}
