//! 终结节点：描述控制流如何离开一个块

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cond::Cond;
use crate::location::LocationDescriptor;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminal {
    /// 尚未设置
    #[default]
    Invalid,
    /// 由解释器执行指定位置的单条指令
    Interpret(LocationDescriptor),
    /// 返回调度器，由其根据客体 PC 查找下一个块
    ReturnToDispatch,
    /// 直接链接到下一个块
    LinkBlock { next: LocationDescriptor },
    /// 使用返回栈缓冲预测目标
    PopRSBHint,
    /// 依据条件在两个终结节点中选择
    If {
        cond: Cond,
        then_: Box<Terminal>,
        else_: Box<Terminal>,
    },
    /// 若有停机请求则返回调度器，否则执行 `else_`
    CheckHalt { else_: Box<Terminal> },
}

impl Terminal {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Terminal::Invalid)
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Invalid => f.write_str("<invalid>"),
            Terminal::Interpret(loc) => write!(f, "Interpret{{{}}}", loc),
            Terminal::ReturnToDispatch => f.write_str("ReturnToDispatch"),
            Terminal::LinkBlock { next } => write!(f, "LinkBlock{{{}}}", next),
            Terminal::PopRSBHint => f.write_str("PopRSBHint"),
            Terminal::If { cond, then_, else_ } => write!(f, "If{{{}, {}, {}}}", cond, then_, else_),
            Terminal::CheckHalt { else_ } => write!(f, "CheckHalt{{{}}}", else_),
        }
    }
}
