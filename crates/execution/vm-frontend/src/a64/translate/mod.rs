//! A64 块翻译
//!
//! A64 没有条件执行状态机：块在翻译例程返回非 `Continue` 时结束，或在单步
//! 模式下翻译一条指令后结束。

pub mod branch;
pub mod conditional_select;
pub mod crypto;
pub mod floating_point;
pub mod hint;
pub mod visitor;

use log::{debug, trace, warn};
use vm_ir::{A64LocationDescriptor, IRBlock, Terminal};

use crate::a64::decoder::decode_a64;
use crate::options::TranslationOptions;
use crate::outcome::TranslationFault;

pub use visitor::A64TranslatorVisitor;

/// 从 `descriptor` 开始翻译一个 A64 块
pub fn translate_a64<R>(
    descriptor: A64LocationDescriptor,
    mut read_code: R,
    options: &TranslationOptions,
) -> Result<IRBlock, TranslationFault>
where
    R: FnMut(u64) -> u32,
{
    let single_step = descriptor.single_stepping();
    let mut visitor = A64TranslatorVisitor::new(descriptor, *options);

    loop {
        let pc = visitor.current_location.pc();
        let word = read_code(pc);

        let outcome = match decode_a64(word) {
            Some(matcher) => {
                trace!("{:016x}: {:08x} {}", pc, word, matcher.name());
                matcher.call(&mut visitor, word)?
            }
            None => {
                warn!("no A64 decoder for {:#010x} at {:#018x}", word, pc);
                visitor.interpret_this_instruction()?
            }
        };

        visitor.current_location = visitor.current_location.advance_pc(4);
        visitor.ir.block.cycle_count += 1;

        if !outcome.should_continue() {
            break;
        }
        if single_step {
            let next = visitor.current_location.into();
            visitor.ir.set_term(Terminal::LinkBlock { next })?;
            break;
        }
    }

    let block = visitor.into_block();
    if !block.has_terminal() {
        return Err(TranslationFault::MissingTerminal {
            location: block.location,
        });
    }

    debug!(
        "translated A64 block {}: {} guest instructions, {} IR instructions, terminal {}",
        block.location,
        block.cycle_count,
        block.len(),
        block.terminal
    );
    Ok(block)
}
