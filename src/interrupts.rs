//! Interrupts
//!
//! The PPU raises two of the Game Boy interrupts: VBlank (IF bit 0) and
//! LCD STAT (IF bit 1). Requests leave the PPU through an [`InterruptSink`]
//! handed in by the caller on every call that can raise one.

use crate::common::Byte;

/// Interrupt lines driven by the PPU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptType {
    /// VBlank interrupt (highest priority)
    VBlank,
    /// LCD STAT interrupt
    LcdStat,
}

impl InterruptType {
    /// Get the bit for this interrupt in the IE/IF registers
    pub fn bit(&self) -> Byte {
        match self {
            InterruptType::VBlank => 0x01,
            InterruptType::LcdStat => 0x02,
        }
    }
}

/// Receiver for everything the PPU signals to the rest of the machine.
///
/// Requests are delivered synchronously, at the exact transition that caused
/// them. The two hooks fire on VBlank start and HBlank entry so the host can
/// catch up other components.
pub trait InterruptSink {
    /// Raise an interrupt request
    fn request_interrupt(&mut self, interrupt: InterruptType);

    /// Called once per frame, right after the frame buffers are swapped
    fn on_vblank(&mut self) {}

    /// Called when a visible line enters HBlank
    fn on_hblank(&mut self) {}
}

/// Interrupt sink backed by an IF register byte (0xFF0F)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterruptFlags {
    pub flags: Byte,
}

impl InterruptFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a request is pending
    pub fn pending(&self, interrupt: InterruptType) -> bool {
        self.flags & interrupt.bit() != 0
    }

    /// Acknowledge a request
    pub fn clear(&mut self, interrupt: InterruptType) {
        self.flags &= !interrupt.bit();
    }
}

impl InterruptSink for InterruptFlags {
    fn request_interrupt(&mut self, interrupt: InterruptType) {
        self.flags |= interrupt.bit();
    }
}
