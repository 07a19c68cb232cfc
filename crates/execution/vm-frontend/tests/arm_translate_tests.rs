//! A32 块翻译测试
//!
//! 覆盖驱动循环、条件执行状态机与各翻译例程，并用参考求值器检查生成的 IR。

use std::cell::Cell;

use proptest::prelude::*;
use vm_frontend::a32::translate_arm;
use vm_frontend::{TranslationFault, TranslationOptions};
use vm_ir::{
    A32LocationDescriptor, BlockExit, Cond, Evaluator, GuestState, IRBlock, LocationDescriptor,
    Nzcv, Terminal,
};

const MOV_R0_1: u32 = 0xE3A0_0001;
const MOV_R1_2: u32 = 0xE3A0_1002;
const MOVEQ_R1_2: u32 = 0x03A0_1002;
const MOVNV_R0_1: u32 = 0xF3A0_0001;
const B_SELF: u32 = 0xEAFF_FFFE;
const WFINE: u32 = 0x1320_F003;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn loc(pc: u32) -> A32LocationDescriptor {
    A32LocationDescriptor::arm(pc)
}

fn link(pc: u32) -> Terminal {
    Terminal::LinkBlock {
        next: loc(pc).into(),
    }
}

/// 程序从地址 `base` 开始依次存放 `code`
fn translate_program(base: u32, code: &[u32], options: TranslationOptions) -> IRBlock {
    translate_arm(
        loc(base),
        |pc| code[((pc - base) / 4) as usize],
        &options,
    )
    .expect("translation fault")
}

fn translate(code: &[u32]) -> IRBlock {
    translate_program(0x100, code, TranslationOptions::default())
}

#[cfg(test)]
mod driver_tests {
    use super::*;

    // Test 1: 单条无条件指令加分支
    #[test]
    fn test_straight_line_block() {
        init_logger();
        let block = translate(&[MOV_R0_1, MOV_R1_2, B_SELF]);
        assert_eq!(block.cycle_count, 3);
        assert_eq!(block.terminal, link(0x108));
        assert!(block.cond.is_none());
        assert!(block.cond_failed.is_none());
    }

    // Test 2: 未匹配的指令字交给解释器
    #[test]
    fn test_unmatched_word_interprets() {
        init_logger();
        let block = translate(&[0xE600_0010]);
        assert_eq!(block.cycle_count, 1);
        assert_eq!(block.terminal, Terminal::Interpret(loc(0x100).into()));
        assert!(block.is_empty());
    }

    // Test 3: UDF 与未匹配的编码走同一路径
    #[test]
    fn test_udf_interprets_after_prefix() {
        init_logger();
        let block = translate(&[MOV_R0_1, 0xE7F0_00F0]);
        assert_eq!(block.cycle_count, 2);
        assert_eq!(block.terminal, Terminal::Interpret(loc(0x104).into()));
    }

    // Test 4: Thumb 位置整体交给解释器
    #[test]
    fn test_thumb_location_interprets() {
        init_logger();
        let thumb = loc(0x200).set_t_flag(true);
        let reads = Cell::new(0);
        let block = translate_arm(
            thumb,
            |_| {
                reads.set(reads.get() + 1);
                0
            },
            &TranslationOptions::default(),
        )
        .unwrap();
        assert_eq!(reads.get(), 0);
        assert_eq!(block.cycle_count, 1);
        assert_eq!(block.terminal, Terminal::Interpret(thumb.into()));
    }

    // Test 5: 回调按 PC 递增顺序调用，断块指令也被读取一次
    #[test]
    fn test_read_callback_order() {
        init_logger();
        let code = [MOV_R0_1, MOV_R1_2, MOVEQ_R1_2];
        let mut seen = Vec::new();
        let block = translate_arm(
            loc(0x100),
            |pc| {
                seen.push(pc);
                code[((pc - 0x100) / 4) as usize]
            },
            &TranslationOptions::default(),
        )
        .unwrap();
        assert_eq!(seen, vec![0x100, 0x104, 0x108]);
        assert_eq!(block.cycle_count, 2);
    }
}

#[cfg(test)]
mod conditional_tests {
    use super::*;

    // Test 1: 首条条件指令成为块守卫
    #[test]
    fn test_first_conditional_becomes_guard() {
        init_logger();
        let block = translate(&[MOVEQ_R1_2, MOV_R0_1]);
        assert_eq!(block.cond, Some(Cond::EQ));
        assert_eq!(block.cycle_count, 1);
        assert_eq!(block.cond_failed, Some(LocationDescriptor::from(loc(0x104))));
        assert_eq!(block.terminal, link(0x104));
    }

    // Test 2: 已有指令时遇到条件指令则断块，且不消费它
    #[test]
    fn test_conditional_after_prefix_breaks() {
        init_logger();
        let code = [MOV_R0_1, MOVEQ_R1_2, B_SELF];
        let block = translate_program(0x100, &code, TranslationOptions::default());
        assert_eq!(block.cycle_count, 1);
        assert_eq!(block.terminal, link(0x104));
        assert!(block.cond.is_none());
        assert!(block.cond_failed.is_none());

        let next = translate_program(0x104, &code[1..], TranslationOptions::default());
        assert_eq!(next.cond, Some(Cond::EQ));
        assert_eq!(next.cycle_count, 1);
        assert_eq!(next.cond_failed, Some(LocationDescriptor::from(loc(0x108))));
    }

    // Test 3: NV 条件总是跳过，不产生 IR
    #[test]
    fn test_never_condition_is_skipped() {
        init_logger();
        let block = translate(&[MOVNV_R0_1, MOV_R1_2, MOVNV_R0_1, B_SELF]);
        assert_eq!(block.cycle_count, 4);
        assert!(block.cond.is_none());
        assert_eq!(block.terminal, link(0x10C));

        let mut state = GuestState::default();
        Evaluator::run(&block, &mut state).unwrap();
        assert_eq!(state.regs[0], 0);
        assert_eq!(state.regs[1], 2);
    }

    // Test 4: 守卫成立与不成立时的求值结果
    #[test]
    fn test_guard_evaluation() {
        init_logger();
        let block = translate(&[MOVEQ_R1_2]);

        let mut state = GuestState {
            flags: Nzcv { z: true, ..Nzcv::default() },
            ..GuestState::default()
        };
        let exit = Evaluator::run(&block, &mut state).unwrap();
        assert_eq!(exit, BlockExit::Link(loc(0x104).into()));
        assert_eq!(state.regs[1], 2);

        let mut state = GuestState::default();
        let exit = Evaluator::run(&block, &mut state).unwrap();
        assert_eq!(exit, BlockExit::ConditionFailed(loc(0x104).into()));
        assert_eq!(state.regs[1], 0);
    }

    // Test 5: 守卫下的分支由分支本身设置终结节点
    #[test]
    fn test_guarded_branch_keeps_its_terminal() {
        init_logger();
        // bne +8
        let block = translate(&[0x1A00_0000]);
        assert_eq!(block.cond, Some(Cond::NE));
        assert_eq!(block.terminal, link(0x108));
        assert_eq!(block.cond_failed, Some(LocationDescriptor::from(loc(0x104))));
    }
}

#[cfg(test)]
mod data_processing_tests {
    use super::*;

    fn run(code: &[u32], mut state: GuestState) -> GuestState {
        let block = translate(code);
        Evaluator::run(&block, &mut state).unwrap();
        state
    }

    // Test 1: ADDS 设置全部标志
    #[test]
    fn test_adds_sets_flags() {
        init_logger();
        // mvn r0, #0 ; adds r1, r0, #1 ; b .
        let state = run(&[0xE3E0_0000, 0xE290_1001, B_SELF], GuestState::default());
        assert_eq!(state.regs[0], 0xFFFF_FFFF);
        assert_eq!(state.regs[1], 0);
        assert_eq!(
            state.flags,
            Nzcv {
                n: false,
                z: true,
                c: true,
                v: false
            }
        );
    }

    // Test 2: CMP 只写标志
    #[test]
    fn test_cmp_borrow() {
        init_logger();
        let mut initial = GuestState::default();
        initial.regs[0] = 3;
        // cmp r0, #5 ; b .
        let state = run(&[0xE350_0005, B_SELF], initial);
        assert_eq!(state.regs[0], 3);
        assert!(state.flags.n);
        assert!(!state.flags.z);
        assert!(!state.flags.c);
        assert!(!state.flags.v);
    }

    // Test 3: 未循环的立即数不改变 C
    #[test]
    fn test_unrotated_immediate_keeps_carry() {
        init_logger();
        let initial = GuestState {
            flags: Nzcv { c: true, ..Nzcv::default() },
            ..GuestState::default()
        };
        // movs r0, #0 ; b .
        let state = run(&[0xE3B0_0000, B_SELF], initial);
        assert!(state.flags.z);
        assert!(state.flags.c);

        // movs r0, #0x80000000 (0x02 ror 2)
        let state = run(&[0xE3B0_0102, B_SELF], GuestState::default());
        assert_eq!(state.regs[0], 0x8000_0000);
        assert!(state.flags.n);
        assert!(state.flags.c);
    }

    // Test 4: 读 PC 得到指令地址加 8
    #[test]
    fn test_pc_operand_reads_ahead() {
        init_logger();
        // add r0, pc, #0 ; b .
        let state = run(&[0xE28F_0000, B_SELF], GuestState::default());
        assert_eq!(state.regs[0], 0x108);
    }

    // Test 5: SBC 与 RSB
    #[test]
    fn test_subtract_variants() {
        init_logger();
        let mut initial = GuestState::default();
        initial.regs[1] = 10;
        initial.regs[2] = 3;
        // sbc r0, r1, r2 ; rsb r3, r2, #20 ; b .
        let state = run(&[0xE0C1_0002, 0xE262_3014, B_SELF], initial);
        assert_eq!(state.regs[0], 6);
        assert_eq!(state.regs[3], 17);
    }

    // Test 6: 写 PC 结束块并返回调度器
    #[test]
    fn test_write_to_pc_returns_to_dispatch() {
        init_logger();
        // mov pc, #0x4000
        let block = translate(&[0xE3A0_FA04]);
        assert_eq!(block.terminal, Terminal::ReturnToDispatch);
        assert_eq!(block.cycle_count, 1);

        let mut state = GuestState::default();
        let exit = Evaluator::run(&block, &mut state).unwrap();
        assert_eq!(exit, BlockExit::ReturnToDispatch { pc: 0x4000 });
    }

    // Test 7: 寄存器移位寄存器形式使用 PC 属于 UNPREDICTABLE
    #[test]
    fn test_unpredictable_register_shift() {
        init_logger();
        // add pc, pc, pc, lsl r0
        let word = 0xE08F_F01F;
        let err = translate_arm(loc(0x100), |_| word, &TranslationOptions::default()).unwrap_err();
        assert_eq!(
            err,
            TranslationFault::Unpredictable {
                location: loc(0x100).into(),
                word
            }
        );

        let options = TranslationOptions {
            define_unpredictable_behaviour: true,
            ..TranslationOptions::default()
        };
        let block = translate_program(0x100, &[word], options);
        assert_eq!(block.terminal, Terminal::Interpret(loc(0x100).into()));
        assert_eq!(block.cycle_count, 1);
    }

    // Test 8: 带 S 写 PC
    #[test]
    fn test_flag_setting_pc_write() {
        init_logger();
        // movs pc, lr
        let word = 0xE1B0_F00E;
        let err = translate_arm(loc(0x100), |_| word, &TranslationOptions::default()).unwrap_err();
        assert!(matches!(err, TranslationFault::Unpredictable { .. }));
    }
}

#[cfg(test)]
mod branch_tests {
    use super::*;

    // Test 1: BL 写 LR 并链接到目标
    #[test]
    fn test_bl_links() {
        init_logger();
        // bl +0x20
        let block = translate(&[0xEB00_0006]);
        assert_eq!(block.terminal, link(0x128));
        let mut state = GuestState::default();
        Evaluator::run(&block, &mut state).unwrap();
        assert_eq!(state.regs[14], 0x104);
    }

    // Test 2: BX LR 提示返回栈
    #[test]
    fn test_bx_lr_pops_rsb() {
        init_logger();
        let block = translate(&[0xE12F_FF1E]);
        assert_eq!(block.terminal, Terminal::PopRSBHint);

        let mut state = GuestState::default();
        state.regs[14] = 0x2001;
        let exit = Evaluator::run(&block, &mut state).unwrap();
        assert_eq!(exit, BlockExit::PopRSBHint { pc: 0x2000 });
        assert!(state.t_flag);
    }

    // Test 3: BX 其他寄存器返回调度器
    #[test]
    fn test_bx_register_returns_to_dispatch() {
        init_logger();
        // bx r3
        let block = translate(&[0xE12F_FF13]);
        assert_eq!(block.terminal, Terminal::ReturnToDispatch);
    }

    // Test 4: BLX (imm) 切换到 Thumb
    #[test]
    fn test_blx_immediate_switches_to_thumb() {
        init_logger();
        // blx +0x0A (H=1)
        let block = translate(&[0xFB00_0000]);
        assert_eq!(
            block.terminal,
            Terminal::LinkBlock {
                next: loc(0x10A).set_t_flag(true).into()
            }
        );
    }

    // Test 5: BLX (reg) 先读目标再写 LR
    #[test]
    fn test_blx_register_reads_before_link() {
        init_logger();
        // blx lr
        let block = translate(&[0xE12F_FF3E]);
        let mut state = GuestState::default();
        state.regs[14] = 0x3000;
        let exit = Evaluator::run(&block, &mut state).unwrap();
        assert_eq!(exit, BlockExit::ReturnToDispatch { pc: 0x3000 });
        assert_eq!(state.regs[14], 0x104);
    }
}

#[cfg(test)]
mod exception_and_hint_tests {
    use super::*;

    // Test 1: SVC 记录调用号并检查停机请求
    #[test]
    fn test_svc_checks_halt() {
        init_logger();
        let block = translate(&[0xEF00_0010]);
        assert_eq!(
            block.terminal,
            Terminal::CheckHalt {
                else_: Box::new(Terminal::ReturnToDispatch)
            }
        );

        let mut state = GuestState::default();
        let exit = Evaluator::run(&block, &mut state).unwrap();
        assert_eq!(exit, BlockExit::ReturnToDispatch { pc: 0x104 });
        assert_eq!(state.svc_calls, vec![0x10]);
    }

    // Test 2: NOP 不产生 IR，WFI 结束块
    #[test]
    fn test_hints_without_hook() {
        init_logger();
        let block = translate(&[0xE320_F000, 0xE320_F003]);
        assert!(block.is_empty());
        assert_eq!(block.cycle_count, 2);
        assert_eq!(block.terminal, link(0x108));
    }

    // Test 3: 开启钩子后提示指令交给解释器
    #[test]
    fn test_hints_with_hook() {
        init_logger();
        let options = TranslationOptions {
            hook_hint_instructions: true,
            ..TranslationOptions::default()
        };
        let block = translate_program(0x100, &[MOV_R0_1, 0xE320_F001], options);
        assert_eq!(block.cycle_count, 2);
        assert_eq!(block.terminal, Terminal::Interpret(loc(0x104).into()));
    }

    // Test 4: 条件提示指令在已有指令后断块
    #[test]
    fn test_conditional_hint_breaks_block() {
        init_logger();
        // mov r0, #1 ; wfine
        let block = translate(&[MOV_R0_1, WFINE]);
        assert_eq!(block.cycle_count, 1);
        assert_eq!(block.terminal, link(0x104));
        assert!(block.cond.is_none());
    }

    // Test 5: 块首的条件提示指令成为守卫
    #[test]
    fn test_conditional_hint_becomes_guard() {
        init_logger();
        let block = translate(&[WFINE]);
        assert_eq!(block.cond, Some(Cond::NE));
        assert_eq!(block.cycle_count, 1);
        assert_eq!(block.terminal, link(0x104));
        assert_eq!(block.cond_failed, Some(LocationDescriptor::from(loc(0x104))));

        let mut state = GuestState {
            flags: Nzcv {
                z: true,
                ..Nzcv::default()
            },
            ..GuestState::default()
        };
        assert_eq!(
            Evaluator::run(&block, &mut state).unwrap(),
            BlockExit::ConditionFailed(loc(0x104).into())
        );
    }

    // Test 6: 前导 NOP 不产生 IR，条件 NOP 仍成为守卫
    #[test]
    fn test_conditional_nop_after_nop_is_guard() {
        init_logger();
        // nop ; nopeq
        let block = translate(&[0xE320_F000, 0x0320_F000]);
        assert_eq!(block.cond, Some(Cond::EQ));
        assert_eq!(block.cycle_count, 2);
        assert_eq!(block.terminal, link(0x108));
    }
}

/// `<op>{S} Rd, Rn, #imm12`，比较指令强制 S、MOV/MVN 的 Rn 置零，Rd 不为 PC
fn dp_imm_word(cond: u32, op: u32, s: bool, rn: u32, rd: u32, imm12: u32) -> u32 {
    let comparison = (8..=11).contains(&op);
    let is_move = op == 13 || op == 15;
    let s = s || comparison;
    let rn = if is_move { 0 } else { rn };
    let rd = if comparison { 0 } else { rd };
    (cond << 28) | (0b001 << 25) | (op << 21) | (u32::from(s) << 20) | (rn << 16) | (rd << 12) | imm12
}

fn unconditional_dp() -> impl Strategy<Value = u32> {
    (0u32..16, any::<bool>(), 0u32..16, 0u32..15, 0u32..0x1000)
        .prop_map(|(op, s, rn, rd, imm12)| dp_imm_word(0xE, op, s, rn, rd, imm12))
}

/// 翻译 `code`（从 `base` 开始）并记录回调读取的地址
fn translate_recording(base: u32, code: &[u32]) -> (IRBlock, Vec<u32>) {
    let mut seen = Vec::new();
    let block = translate_arm(
        loc(base),
        |pc| {
            seen.push(pc);
            code[((pc - base) / 4) as usize]
        },
        &TranslationOptions::default(),
    )
    .expect("translation fault");
    (block, seen)
}

proptest! {
    // 属性测试：N 条无条件指令加 `b .`，块长 N+1，按顺序读取每个地址一次
    #[test]
    fn prop_straight_line_block_length(
        base in (0u32..0x0100_0000).prop_map(|x| x * 4),
        body in proptest::collection::vec(unconditional_dp(), 0..16),
    ) {
        let n = body.len() as u32;
        let mut code = body;
        code.push(B_SELF);

        let (block, seen) = translate_recording(base, &code);
        let expected: Vec<u32> = (0..=n).map(|i| base + 4 * i).collect();
        prop_assert_eq!(seen, expected);
        prop_assert_eq!(block.cycle_count, u64::from(n) + 1);
        prop_assert_eq!(block.terminal, link(base + 4 * n));
        prop_assert!(block.cond.is_none());
    }

    // 属性测试：第 k 条（k > 0）为条件指令时块在其前断开，从断点重新翻译得到守卫块
    #[test]
    fn prop_conditional_splits_block(
        base in (0u32..0x0100_0000).prop_map(|x| x * 4),
        prefix in proptest::collection::vec(unconditional_dp(), 1..12),
        conditional in unconditional_dp(),
        cond_bits in 0u32..14,
    ) {
        let k = prefix.len() as u32;
        let mut code = prefix;
        code.push((conditional & 0x0FFF_FFFF) | (cond_bits << 28));

        let (block, seen) = translate_recording(base, &code);
        let expected: Vec<u32> = (0..=k).map(|i| base + 4 * i).collect();
        prop_assert_eq!(seen, expected);
        prop_assert_eq!(block.cycle_count, u64::from(k));
        prop_assert_eq!(block.terminal, link(base + 4 * k));
        prop_assert!(block.cond.is_none());

        let resume = base + 4 * k;
        let (next, seen) = translate_recording(resume, &code[k as usize..]);
        prop_assert_eq!(seen, vec![resume]);
        prop_assert_eq!(next.cond, Some(Cond::from_bits(cond_bits)));
        prop_assert_eq!(next.cycle_count, 1);
        prop_assert_eq!(next.cond_failed, Some(LocationDescriptor::from(loc(resume + 4))));
        prop_assert_eq!(next.terminal, link(resume + 4));
    }
}
