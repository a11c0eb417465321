//! LCD Registers
//!
//! The register bank of the PPU and the decoding of its bit fields.
//!
//! LCD Registers:
//! - LCDC (0xFF40): LCD Control
//! - STAT (0xFF41): LCD Status
//! - SCY (0xFF42): Scroll Y
//! - SCX (0xFF43): Scroll X
//! - LY (0xFF44): Current scanline (read-only)
//! - LYC (0xFF45): LY Compare
//! - BGP (0xFF47): Background Palette
//! - OBP0 (0xFF48): Object Palette 0
//! - OBP1 (0xFF49): Object Palette 1
//! - WY (0xFF4A): Window Y Position
//! - WX (0xFF4B): Window X Position
//!
//! LCDC is decoded into [`LcdControl`] on every write; the renderer only ever
//! reads the decoded fields, never the raw byte.

use bitflags::bitflags;

use crate::common::{bit_set, Byte, Word};

bitflags! {
    /// LCD Control Register (LCDC) bits at 0xFF40
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LcdcFlags: u8 {
        const LCD_ENABLE          = 0b1000_0000;
        const WINDOW_TILE_MAP     = 0b0100_0000;
        const WINDOW_ENABLE       = 0b0010_0000;
        const BG_WINDOW_TILE_DATA = 0b0001_0000;
        const BG_TILE_MAP         = 0b0000_1000;
        const OBJ_SIZE            = 0b0000_0100;
        const OBJ_ENABLE          = 0b0000_0010;
        const BG_WINDOW_ENABLE    = 0b0000_0001;
    }
}

bitflags! {
    /// LCD Status Register (STAT) bits at 0xFF41
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StatFlags: u8 {
        const LYC_INTERRUPT    = 0b0100_0000;
        const OAM_INTERRUPT    = 0b0010_0000;
        const VBLANK_INTERRUPT = 0b0001_0000;
        const HBLANK_INTERRUPT = 0b0000_1000;
        const LYC_EQUAL_LY     = 0b0000_0100;
        const MODE_MASK        = 0b0000_0011;
    }
}

/// STAT bits writable from the bus (3-6)
pub const STAT_WRITE_MASK: Byte = 0b0111_1000;

/// PPU modes as reported in STAT bits 0-1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpuMode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Drawing = 3,
}

impl From<u8> for PpuMode {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            0 => PpuMode::HBlank,
            1 => PpuMode::VBlank,
            2 => PpuMode::OamScan,
            _ => PpuMode::Drawing,
        }
    }
}

/// Fields derived from LCDC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcdControl {
    /// Bit 7
    pub enabled: bool,
    /// Bit 6 (0x9800 or 0x9C00)
    pub window_tile_map: Word,
    /// Bit 5
    pub window_enabled: bool,
    /// Bit 4 (true = 0x8000 unsigned, false = 0x8800 signed)
    pub unsigned_tile_data: bool,
    /// Bit 3 (0x9800 or 0x9C00)
    pub bg_tile_map: Word,
    /// Bit 2 (8x16 objects)
    pub tall_objects: bool,
    /// Bit 1
    pub obj_enabled: bool,
    /// Bit 0: BG/window enable on DMG, master priority on CGB
    pub bg_window_enabled: bool,
}

impl LcdControl {
    /// Decode a raw LCDC value
    pub fn decode(lcdc: Byte) -> Self {
        let flags = LcdcFlags::from_bits_retain(lcdc);
        let map = |set: bool| if set { 0x9C00 } else { 0x9800 };

        Self {
            enabled: flags.contains(LcdcFlags::LCD_ENABLE),
            window_tile_map: map(flags.contains(LcdcFlags::WINDOW_TILE_MAP)),
            window_enabled: flags.contains(LcdcFlags::WINDOW_ENABLE),
            unsigned_tile_data: flags.contains(LcdcFlags::BG_WINDOW_TILE_DATA),
            bg_tile_map: map(flags.contains(LcdcFlags::BG_TILE_MAP)),
            tall_objects: flags.contains(LcdcFlags::OBJ_SIZE),
            obj_enabled: flags.contains(LcdcFlags::OBJ_ENABLE),
            bg_window_enabled: flags.contains(LcdcFlags::BG_WINDOW_ENABLE),
        }
    }

    /// Object height in pixels
    pub fn obj_height(&self) -> u8 {
        if self.tall_objects { 16 } else { 8 }
    }
}

impl Default for LcdControl {
    fn default() -> Self {
        Self::decode(0)
    }
}

/// LCD register bank
#[derive(Debug, Clone)]
pub struct Lcd {
    /// LCDC - LCD Control (0xFF40)
    lcdc: Byte,
    /// Decoded LCDC
    control: LcdControl,
    /// STAT - LCD Status (0xFF41)
    pub stat: Byte,
    /// SCY - Scroll Y (0xFF42)
    pub scy: Byte,
    /// SCX - Scroll X (0xFF43)
    pub scx: Byte,
    /// LY - Current scanline (0xFF44)
    pub ly: Byte,
    /// LYC - LY Compare (0xFF45)
    pub lyc: Byte,
    /// BGP - Background Palette (0xFF47)
    pub bgp: Byte,
    /// OBP0/OBP1 - Object Palettes (0xFF48-0xFF49)
    pub obp: [Byte; 2],
    /// WY - Window Y Position (0xFF4A)
    pub wy: Byte,
    /// WX - Window X Position (0xFF4B)
    pub wx: Byte,
}

impl Default for Lcd {
    fn default() -> Self {
        Self::new()
    }
}

impl Lcd {
    /// Power-on register state (LCD off, LY == LYC)
    pub fn new() -> Self {
        Self {
            lcdc: 0,
            control: LcdControl::default(),
            stat: 0x04,
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            bgp: 0,
            obp: [0; 2],
            wy: 0,
            wx: 0,
        }
    }

    /// Raw LCDC value
    pub fn lcdc(&self) -> Byte {
        self.lcdc
    }

    /// Decoded LCDC fields
    pub fn control(&self) -> &LcdControl {
        &self.control
    }

    /// Store LCDC and refresh every derived field
    pub fn set_lcdc(&mut self, value: Byte) {
        self.lcdc = value;
        self.control = LcdControl::decode(value);
    }

    /// Current mode (STAT bits 0-1)
    pub fn mode(&self) -> PpuMode {
        PpuMode::from(self.stat)
    }

    /// Set STAT bits 0-1
    pub fn set_mode(&mut self, mode: PpuMode) {
        self.stat = (self.stat & 0xFC) | mode as u8;
    }

    /// LYC=LY Coincidence Flag (bit 2)
    pub fn lyc_flag(&self) -> bool {
        StatFlags::from_bits_retain(self.stat).contains(StatFlags::LYC_EQUAL_LY)
    }

    /// Set or clear the coincidence flag
    pub fn set_lyc_flag(&mut self, on: bool) {
        bit_set(&mut self.stat, 2, on);
    }

    /// Apply a bus write to STAT, keeping the read-only bits
    pub fn write_stat(&mut self, value: Byte) {
        self.stat = (value & STAT_WRITE_MASK) | (self.stat & !STAT_WRITE_MASK);
    }

    /// Refresh the coincidence flag and evaluate the STAT interrupt line
    /// for the given interrupt mode
    pub fn stat_line(&mut self, interrupt_mode: Option<PpuMode>) -> bool {
        let coincidence = self.ly == self.lyc;
        self.set_lyc_flag(coincidence);

        let enabled = StatFlags::from_bits_retain(self.stat);
        let mode_source = match interrupt_mode {
            Some(PpuMode::OamScan) => enabled.contains(StatFlags::OAM_INTERRUPT),
            Some(PpuMode::VBlank) => enabled.contains(StatFlags::VBLANK_INTERRUPT),
            Some(PpuMode::HBlank) => enabled.contains(StatFlags::HBLANK_INTERRUPT),
            Some(PpuMode::Drawing) | None => false,
        };

        (coincidence && enabled.contains(StatFlags::LYC_INTERRUPT)) || mode_source
    }
}
