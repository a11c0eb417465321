//! PPU errors
//!
//! The core has no recoverable runtime errors: every hardware condition is
//! modeled as defined behavior. What remains are caller bugs.

use thiserror::Error;

use crate::common::Word;

/// PPU-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PpuError {
    /// The bus routed an address the PPU does not decode
    #[error("PPU: unmapped register {0:#06X}")]
    UnmappedRegister(Word),
    /// Construction options that do not describe real hardware
    #[error("PPU: invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
