//! # Translate Command
//!
//! Translate blocks from a guest image, following direct links, and optionally
//! run each block once through the reference evaluator

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use vm_core::GuestArch;
use vm_frontend::Translator;
use vm_ir::{
    A32LocationDescriptor, A64LocationDescriptor, BlockExit, Evaluator, GuestState, IRBlock,
    LocationDescriptor, Terminal,
};

use crate::image::GuestImage;

pub struct TranslateRequest {
    pub arch: GuestArch,
    pub pc: u64,
    pub thumb: bool,
    pub single_step: bool,
    pub max_blocks: usize,
    pub evaluate: bool,
}

impl TranslateRequest {
    pub fn start_location(&self) -> Result<LocationDescriptor> {
        Ok(match self.arch {
            GuestArch::A32 => {
                let pc = u32::try_from(self.pc)
                    .map_err(|_| anyhow!("A32 start address {:#x} does not fit in 32 bits", self.pc))?;
                A32LocationDescriptor::arm(pc).set_t_flag(self.thumb).into()
            }
            GuestArch::A64 => A64LocationDescriptor::new(self.pc, 0)
                .set_single_stepping(self.single_step)
                .into(),
        })
    }
}

/// Translate up to `max_blocks` blocks starting at the requested location
pub fn run(translator: &Translator, image: &GuestImage, request: &TranslateRequest) -> Result<Vec<IRBlock>> {
    let mut location = request.start_location()?;
    let mut state = GuestState::default();
    let mut blocks = Vec::new();

    for _ in 0..request.max_blocks {
        let block = translator
            .try_translate(location, |addr| image.fetch(request.arch, addr))
            .with_context(|| format!("failed to translate block at {}", location))?;
        println!("{}", block);

        let next = if request.evaluate {
            let exit = Evaluator::run(&block, &mut state)
                .with_context(|| format!("failed to evaluate block at {}", location))?;
            println!("  exit: {:?}", exit);
            follow_exit(exit)
        } else {
            follow_terminal(&block.terminal)
        };
        blocks.push(block);

        match next {
            Some(next) if image.contains(next.pc()) => location = next,
            Some(next) => {
                info!("next block {} is outside the image", next);
                break;
            }
            None => break,
        }
    }

    debug!("translated {} blocks", blocks.len());
    if request.evaluate {
        print_state(request.arch, &state);
    }
    Ok(blocks)
}

/// Static successor: only a direct link is followed
fn follow_terminal(terminal: &Terminal) -> Option<LocationDescriptor> {
    match terminal {
        Terminal::LinkBlock { next } => Some(*next),
        _ => None,
    }
}

fn follow_exit(exit: BlockExit) -> Option<LocationDescriptor> {
    match exit {
        BlockExit::Link(next) | BlockExit::ConditionFailed(next) => Some(next),
        _ => None,
    }
}

fn print_state(arch: GuestArch, state: &GuestState) {
    match arch {
        GuestArch::A32 => {
            for (i, value) in state.regs.iter().enumerate() {
                if *value != 0 {
                    println!("  r{:<2} = {:#010x}", i, value);
                }
            }
        }
        GuestArch::A64 => {
            for (i, value) in state.x.iter().enumerate() {
                if *value != 0 {
                    println!("  x{:<2} = {:#018x}", i, value);
                }
            }
            for (i, value) in state.vec.iter().enumerate() {
                if *value != 0 {
                    println!("  v{:<2} = {:#034x}", i, value);
                }
            }
            println!("  pc  = {:#018x}", state.pc);
        }
    }
    println!("  nzcv = {:#x}", state.flags.to_bits() >> 28);
    if !state.svc_calls.is_empty() {
        println!("  svc  = {:x?}", state.svc_calls);
    }
}
