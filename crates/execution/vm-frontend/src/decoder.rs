//! 位模式解码表
//!
//! 每个 [`Matcher`] 由 32 字符的位串构造：`0`/`1` 为固定位，其他字符为字段
//! （通配）。表按固定位数量降序排列，因此更具体的编码优先匹配。

use crate::outcome::TranslateResult;

pub type Handler<V> = fn(&mut V, u32) -> TranslateResult;

pub struct Matcher<V> {
    name: String,
    mask: u32,
    expected: u32,
    handler: Handler<V>,
}

impl<V> Matcher<V> {
    /// 从位串构造
    ///
    /// # Panics
    ///
    /// 位串长度不是 32 时 panic；解码表是静态数据，这属于编写错误。
    pub fn new(name: impl Into<String>, pattern: &str, handler: Handler<V>) -> Self {
        let name = name.into();
        assert_eq!(pattern.len(), 32, "bad pattern for {}: {}", name, pattern);
        let (mut mask, mut expected) = (0u32, 0u32);
        for (i, ch) in pattern.bytes().enumerate() {
            let bit = 1u32 << (31 - i);
            match ch {
                b'0' => mask |= bit,
                b'1' => {
                    mask |= bit;
                    expected |= bit;
                }
                _ => {}
            }
        }
        Self {
            name,
            mask,
            expected,
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn expected(&self) -> u32 {
        self.expected
    }

    pub fn matches(&self, word: u32) -> bool {
        word & self.mask == self.expected
    }

    pub fn call(&self, visitor: &mut V, word: u32) -> TranslateResult {
        (self.handler)(visitor, word)
    }
}

pub struct DecodeTable<V> {
    matchers: Vec<Matcher<V>>,
}

impl<V> DecodeTable<V> {
    pub fn new(mut matchers: Vec<Matcher<V>>) -> Self {
        // 稳定排序：固定位数相同的条目保持声明顺序
        matchers.sort_by_key(|m| std::cmp::Reverse(m.mask.count_ones()));
        Self { matchers }
    }

    pub fn decode(&self, word: u32) -> Option<&Matcher<V>> {
        self.matchers.iter().find(|m| m.matches(word))
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

/// 提取位 `hi..=lo`
#[inline]
pub fn bits(word: u32, hi: u32, lo: u32) -> u32 {
    (word >> lo) & (u32::MAX >> (31 - (hi - lo)))
}

#[inline]
pub fn bit(word: u32, n: u32) -> bool {
    (word >> n) & 1 != 0
}

/// 将低 `width` 位作为有符号数扩展
#[inline]
pub fn sign_extend(value: u32, width: u32) -> i64 {
    let shift = 64 - width;
    (i64::from(value) << shift) >> shift
}
