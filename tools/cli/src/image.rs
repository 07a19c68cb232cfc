//! # Guest Image
//!
//! Flat little-endian code image mapped at a fixed guest address

use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use vm_core::GuestArch;

/// Permanently undefined encodings, substituted for reads outside the image
const A32_UNDEFINED: u32 = 0xE7F0_00F0;
const A64_UNDEFINED: u32 = 0x0000_0000;

pub struct GuestImage {
    base: u64,
    bytes: Vec<u8>,
}

impl GuestImage {
    pub fn new(base: u64, bytes: Vec<u8>) -> Self {
        Self { base, bytes }
    }

    pub fn load(path: &Path, base: u64) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self::new(base, bytes))
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn contains(&self, addr: u64) -> bool {
        self.word_at(addr).is_some()
    }

    /// Read the 32-bit word at `addr`, or `None` if any byte lies outside the image
    pub fn word_at(&self, addr: u64) -> Option<u32> {
        let offset = usize::try_from(addr.checked_sub(self.base)?).ok()?;
        let end = offset.checked_add(4)?;
        let bytes: [u8; 4] = self.bytes.get(offset..end)?.try_into().ok()?;
        Some(u32::from_le_bytes(bytes))
    }

    /// Instruction fetch used by the translator
    pub fn fetch(&self, arch: GuestArch, addr: u64) -> u32 {
        self.word_at(addr).unwrap_or_else(|| {
            warn!("fetch at {:#x} is outside the image, substituting an undefined encoding", addr);
            match arch {
                GuestArch::A32 => A32_UNDEFINED,
                GuestArch::A64 => A64_UNDEFINED,
            }
        })
    }
}
