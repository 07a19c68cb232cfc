//! A64 解码表

use std::sync::LazyLock;

use super::translate::A64TranslatorVisitor;
use crate::decoder::{DecodeTable, Handler, Matcher};

type A64Matcher = Matcher<A64TranslatorVisitor>;

static A64_TABLE: LazyLock<DecodeTable<A64TranslatorVisitor>> = LazyLock::new(build_table);

/// 查找 `word` 对应的翻译例程；无匹配时返回 `None`
pub fn decode_a64(word: u32) -> Option<&'static A64Matcher> {
    A64_TABLE.decode(word)
}

fn build_table() -> DecodeTable<A64TranslatorVisitor> {
    let entries: [(&str, &str, Handler<A64TranslatorVisitor>); 18] = [
        // Unconditional branch (immediate)
        ("B", "000101iiiiiiiiiiiiiiiiiiiiiiiiii", A64TranslatorVisitor::b_uncond),
        ("BL", "100101iiiiiiiiiiiiiiiiiiiiiiiiii", A64TranslatorVisitor::bl),
        // Conditional branch (immediate)
        ("B.cond", "01010100iiiiiiiiiiiiiiiiiii0cccc", A64TranslatorVisitor::b_cond),
        // Unconditional branch (register)
        ("BR", "1101011000011111000000nnnnn00000", A64TranslatorVisitor::br),
        ("BLR", "1101011000111111000000nnnnn00000", A64TranslatorVisitor::blr),
        ("RET", "1101011001011111000000nnnnn00000", A64TranslatorVisitor::ret),
        // Hints
        ("NOP", "11010101000000110010000000011111", A64TranslatorVisitor::nop),
        ("YIELD", "11010101000000110010000000111111", A64TranslatorVisitor::yield_),
        ("WFE", "11010101000000110010000001011111", A64TranslatorVisitor::wfe),
        ("WFI", "11010101000000110010000001111111", A64TranslatorVisitor::wfi),
        ("SEV", "11010101000000110010000010011111", A64TranslatorVisitor::sev),
        ("SEVL", "11010101000000110010000010111111", A64TranslatorVisitor::sevl),
        // Conditional select
        ("CSEL", "z0011010100mmmmmcccc00nnnnnddddd", A64TranslatorVisitor::csel),
        ("CSINC", "z0011010100mmmmmcccc01nnnnnddddd", A64TranslatorVisitor::csinc),
        // Floating-point conditional select
        ("FCSEL", "00011110yy1mmmmmcccc11nnnnnddddd", A64TranslatorVisitor::fcsel),
        // Cryptographic four-register
        ("EOR3", "11001110000mmmmm0aaaaannnnnddddd", A64TranslatorVisitor::eor3),
        ("BCAX", "11001110001mmmmm0aaaaannnnnddddd", A64TranslatorVisitor::bcax),
        ("SM3SS1", "11001110010mmmmm0aaaaannnnnddddd", A64TranslatorVisitor::sm3ss1),
    ];

    let matchers = entries
        .into_iter()
        .map(|(name, pattern, handler)| A64Matcher::new(name, pattern, handler))
        .collect();

    DecodeTable::new(matchers)
}
