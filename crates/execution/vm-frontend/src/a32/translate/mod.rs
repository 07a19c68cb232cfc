//! A32 块翻译
//!
//! 驱动循环逐条读取、解码并翻译指令，直到某个翻译例程结束块，或条件执行
//! 状态机要求在此断开。

pub mod branch;
pub mod conditional_state;
pub mod data_processing;
pub mod exception;
pub mod hint;
pub mod shift;
pub mod visitor;

use log::{debug, trace, warn};
use vm_ir::{A32LocationDescriptor, IRBlock, Terminal};

use crate::a32::decoder::decode_arm;
use crate::options::TranslationOptions;
use crate::outcome::{Outcome, TranslationFault};

pub use conditional_state::ConditionalState;
pub use visitor::ArmTranslatorVisitor;

/// 从 `descriptor` 开始翻译一个 A32 块
///
/// `read_code` 按地址返回指令字，按 PC 递增顺序调用；导致断块的那条指令也会被读取一次。
pub fn translate_arm<R>(
    descriptor: A32LocationDescriptor,
    mut read_code: R,
    options: &TranslationOptions,
) -> Result<IRBlock, TranslationFault>
where
    R: FnMut(u32) -> u32,
{
    if descriptor.t_flag() {
        debug!("Thumb location {}, deferring to interpreter", descriptor);
        let mut block = IRBlock::new(descriptor.into());
        block.set_terminal(Terminal::Interpret(descriptor.into()))?;
        block.cycle_count = 1;
        return Ok(block);
    }

    let mut visitor = ArmTranslatorVisitor::new(descriptor, *options);
    let mut should_continue = true;

    while should_continue && visitor.cond_state == ConditionalState::None {
        let pc = visitor.current_location.pc();
        let word = read_code(pc);
        visitor.current_word = word;

        let outcome = match decode_arm(word) {
            Some(matcher) => {
                trace!("{:08x}: {:08x} {}", pc, word, matcher.name());
                matcher.call(&mut visitor, word)?
            }
            None => {
                warn!("no A32 decoder for {:#010x} at {:#010x}", word, pc);
                visitor.arm_udf(word)?
            }
        };

        if visitor.cond_state == ConditionalState::Break {
            if outcome != Outcome::Continue {
                return Err(TranslationFault::BreakNotHonored {
                    location: visitor.current_location.into(),
                });
            }
            break;
        }

        visitor.current_location = visitor.current_location.advance_pc(4);
        visitor.ir.block.cycle_count += 1;
        should_continue = outcome.should_continue();
    }

    if visitor.cond_state == ConditionalState::Translating {
        let current = visitor.current_location.into();
        if should_continue {
            visitor.ir.set_term(Terminal::LinkBlock { next: current })?;
        }
        visitor.ir.block.set_condition_failed_location(current);
    }

    let block = visitor.into_block();
    if !block.has_terminal() {
        return Err(TranslationFault::MissingTerminal {
            location: block.location,
        });
    }

    debug!(
        "translated A32 block {}: {} guest instructions, {} IR instructions, terminal {}",
        block.location,
        block.cycle_count,
        block.len(),
        block.terminal
    );
    Ok(block)
}
