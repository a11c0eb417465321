//! Game Boy PPU Library
//!
//! This library provides a dot-accurate Pixel Processing Unit for the Game Boy
//! and Game Boy Color. It covers the mode state machine, the scan-line
//! renderer, VRAM/OAM access locking, the DMG OAM corruption bug and the CGB
//! compatibility palette selection done by the boot ROM.
//!
//! A host drives the PPU with [`Ppu::tick`] and routes CPU accesses to
//! `0x8000-0x9FFF`, `0xFE00-0xFEFF` and the LCD registers through
//! [`Ppu::read`]/[`Ppu::write`].

pub mod cart;
pub mod common;
pub mod error;
pub mod interrupts;
pub mod lcd;
pub mod ppu;
#[cfg(feature = "display")]
pub mod ui;

pub use cart::{Cartridge, RomImage};
pub use error::PpuError;
pub use interrupts::{InterruptFlags, InterruptSink, InterruptType};
pub use lcd::PpuMode;
pub use ppu::frame::Frame;
pub use ppu::modes::ModeState;
pub use ppu::{Model, Ppu, PpuConfig};
