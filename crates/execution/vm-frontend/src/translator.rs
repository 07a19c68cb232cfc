//! 统一翻译入口
//!
//! [`Translator`] 按位置描述符的架构分派到 A32 或 A64 前端。它只持有不可变
//! 选项，可在线程间共享；每次翻译构造独立的访问者与块。

use std::path::Path;

use log::{error, info};
use vm_core::{Config, VmResult};
use vm_ir::{IRBlock, LocationDescriptor};

use crate::a32::translate_arm;
use crate::a64::translate_a64;
use crate::options::TranslationOptions;
use crate::outcome::TranslationFault;

#[derive(Debug, Clone, Default)]
pub struct Translator {
    options: TranslationOptions,
}

impl Translator {
    pub fn new(options: TranslationOptions) -> Self {
        Self { options }
    }

    /// 从 TOML 文件加载选项
    pub fn with_config_file(path: impl AsRef<Path>) -> VmResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let options = TranslationOptions::from_toml(&text)?;
        info!("loaded translation options from {}: {:?}", path.display(), options);
        Ok(Self::new(options))
    }

    pub fn options(&self) -> &TranslationOptions {
        &self.options
    }

    /// 翻译 `location` 处的块
    ///
    /// `read_code` 以客体地址返回 32 位指令字；A32 地址零扩展为 `u64`。
    pub fn try_translate<R>(
        &self,
        location: LocationDescriptor,
        mut read_code: R,
    ) -> Result<IRBlock, TranslationFault>
    where
        R: FnMut(u64) -> u32,
    {
        match location {
            LocationDescriptor::A32(descriptor) => {
                translate_arm(descriptor, |pc| read_code(u64::from(pc)), &self.options)
            }
            LocationDescriptor::A64(descriptor) => {
                translate_a64(descriptor, read_code, &self.options)
            }
        }
    }

    /// 翻译 `location` 处的块
    ///
    /// # Panics
    ///
    /// 出现 [`TranslationFault`] 时 panic。故障表示翻译器自身的不变量被破坏，
    /// 调用者无法恢复；需要处理故障时使用 [`Translator::try_translate`]。
    pub fn translate<R>(&self, location: LocationDescriptor, read_code: R) -> IRBlock
    where
        R: FnMut(u64) -> u32,
    {
        match self.try_translate(location, read_code) {
            Ok(block) => block,
            Err(fault) => {
                error!("translation fault at {}: {}", location, fault);
                panic!("translation fault at {location}: {fault}");
            }
        }
    }
}
