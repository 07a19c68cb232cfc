//! A32 解码表

use std::sync::LazyLock;

use super::translate::ArmTranslatorVisitor;
use super::types::DataProcOp;
use crate::decoder::{DecodeTable, Handler, Matcher};

type ArmMatcher = Matcher<ArmTranslatorVisitor>;

static ARM_TABLE: LazyLock<DecodeTable<ArmTranslatorVisitor>> = LazyLock::new(build_table);

/// 查找 `word` 对应的翻译例程；无匹配时返回 `None`
pub fn decode_arm(word: u32) -> Option<&'static ArmMatcher> {
    ARM_TABLE.decode(word)
}

/// 数据处理指令的三种操作数形式
#[derive(Clone, Copy)]
enum Operand2Form {
    Immediate,
    Register,
    RegisterShiftedRegister,
}

fn data_processing_pattern(op: DataProcOp, form: Operand2Form) -> String {
    let s = if op.is_comparison() { "1" } else { "S" };
    let n = if op.is_move() { "0000" } else { "nnnn" };
    let d = if op.is_comparison() { "0000" } else { "dddd" };
    let (class, operand) = match form {
        Operand2Form::Immediate => ("001", "rrrrvvvvvvvv"),
        Operand2Form::Register => ("000", "vvvvvrr0mmmm"),
        Operand2Form::RegisterShiftedRegister => ("000", "ssss0rr1mmmm"),
    };
    format!("cccc{}{:04b}{}{}{}{}", class, op.bits(), s, n, d, operand)
}

fn build_table() -> DecodeTable<ArmTranslatorVisitor> {
    let mut matchers = Vec::new();

    for op in DataProcOp::ALL {
        matchers.push(ArmMatcher::new(
            format!("{} (imm)", op),
            &data_processing_pattern(op, Operand2Form::Immediate),
            ArmTranslatorVisitor::arm_dp_imm,
        ));
        matchers.push(ArmMatcher::new(
            format!("{} (reg)", op),
            &data_processing_pattern(op, Operand2Form::Register),
            ArmTranslatorVisitor::arm_dp_reg,
        ));
        matchers.push(ArmMatcher::new(
            format!("{} (rsr)", op),
            &data_processing_pattern(op, Operand2Form::RegisterShiftedRegister),
            ArmTranslatorVisitor::arm_dp_rsr,
        ));
    }

    let fixed: [(&str, &str, Handler<ArmTranslatorVisitor>); 12] = [
        // Branch
        ("B", "cccc1010vvvvvvvvvvvvvvvvvvvvvvvv", ArmTranslatorVisitor::arm_b),
        ("BL", "cccc1011vvvvvvvvvvvvvvvvvvvvvvvv", ArmTranslatorVisitor::arm_bl),
        ("BLX (imm)", "1111101hvvvvvvvvvvvvvvvvvvvvvvvv", ArmTranslatorVisitor::arm_blx_imm),
        ("BX", "cccc000100101111111111110001mmmm", ArmTranslatorVisitor::arm_bx),
        ("BLX (reg)", "cccc000100101111111111110011mmmm", ArmTranslatorVisitor::arm_blx_reg),
        // Exception generating
        ("SVC", "cccc1111vvvvvvvvvvvvvvvvvvvvvvvv", ArmTranslatorVisitor::arm_svc),
        ("UDF", "111001111111vvvvvvvvvvvv1111vvvv", ArmTranslatorVisitor::arm_udf),
        // Hints
        ("NOP", "cccc0011001000001111000000000000", ArmTranslatorVisitor::arm_nop),
        ("YIELD", "cccc0011001000001111000000000001", ArmTranslatorVisitor::arm_yield),
        ("WFE", "cccc0011001000001111000000000010", ArmTranslatorVisitor::arm_wfe),
        ("WFI", "cccc0011001000001111000000000011", ArmTranslatorVisitor::arm_wfi),
        ("SEV", "cccc0011001000001111000000000100", ArmTranslatorVisitor::arm_sev),
    ];
    for (name, pattern, handler) in fixed {
        matchers.push(ArmMatcher::new(name, pattern, handler));
    }

    DecodeTable::new(matchers)
}
