//! A64 翻译访问者

use vm_ir::{A64LocationDescriptor, A64Reg, A64Vec, IRBlock, IREmitter, Terminal, Value};

use crate::options::TranslationOptions;
use crate::outcome::{Outcome, TranslateResult};

pub struct A64TranslatorVisitor {
    pub(crate) ir: IREmitter,
    pub(crate) current_location: A64LocationDescriptor,
    pub(crate) options: TranslationOptions,
}

impl A64TranslatorVisitor {
    pub fn new(location: A64LocationDescriptor, options: TranslationOptions) -> Self {
        Self {
            ir: IREmitter::new(location.into()),
            current_location: location,
            options,
        }
    }

    pub fn location(&self) -> A64LocationDescriptor {
        self.current_location
    }

    pub fn block(&self) -> &IRBlock {
        &self.ir.block
    }

    pub fn into_block(self) -> IRBlock {
        self.ir.into_block()
    }

    pub(crate) fn pc(&self) -> u64 {
        self.current_location.pc()
    }

    pub fn interpret_this_instruction(&mut self) -> TranslateResult {
        self.ir.set_term(Terminal::Interpret(self.current_location.into()))?;
        Ok(Outcome::Interpret)
    }

    /// 未分配编码：块以 `Interpret(当前位置)` 结束，由解释器产生未定义指令异常
    pub fn unallocated_encoding(&mut self) -> TranslateResult {
        self.ir.set_term(Terminal::Interpret(self.current_location.into()))?;
        Ok(Outcome::Unallocated)
    }

    /// 字段取保留值，处理方式同未分配编码
    pub fn reserved_value(&mut self) -> TranslateResult {
        self.unallocated_encoding()
    }

    pub fn link_to_next_instruction(&mut self) -> TranslateResult {
        let next = self.current_location.advance_pc(4);
        self.ir.set_term(Terminal::LinkBlock { next: next.into() })?;
        Ok(Outcome::Stop)
    }

    /// 读通用寄存器；寄存器 31 读作零
    pub(crate) fn x(&mut self, datasize: u32, reg: A64Reg) -> Value {
        match (datasize, reg.is_r31()) {
            (64, true) => self.ir.imm64(0),
            (_, true) => self.ir.imm32(0),
            (64, false) => self.ir.a64_get_x(reg),
            (_, false) => self.ir.a64_get_w(reg),
        }
    }

    /// 写通用寄存器；写寄存器 31 被丢弃
    pub(crate) fn set_x(&mut self, datasize: u32, reg: A64Reg, value: Value) {
        if reg.is_r31() {
            return;
        }
        if datasize == 64 {
            self.ir.a64_set_x(reg, value);
        } else {
            self.ir.a64_set_w(reg, value);
        }
    }

    /// 读 SIMD&FP 寄存器的低 `datasize` 位
    pub(crate) fn v(&mut self, datasize: u32, vec: A64Vec) -> Value {
        match datasize {
            32 => self.ir.a64_get_s(vec),
            64 => self.ir.a64_get_d(vec),
            _ => self.ir.a64_get_q(vec),
        }
    }

    /// 写 SIMD&FP 寄存器，高位清零
    pub(crate) fn set_v(&mut self, datasize: u32, vec: A64Vec, value: Value) {
        match datasize {
            32 => self.ir.a64_set_s(vec, value),
            64 => self.ir.a64_set_d(vec, value),
            _ => self.ir.a64_set_q(vec, value),
        }
    }
}
