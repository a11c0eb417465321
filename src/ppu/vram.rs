//! Video RAM
//!
//! 8KB per bank at 0x8000-0x9FFF: tile data at 0x8000-0x97FF, tile maps at
//! 0x9800-0x9FFF. The CGB adds a second bank whose map area holds per-tile
//! attributes.

use crate::common::{bit, Byte, Word};

pub const VRAM_START: Word = 0x8000;
pub const VRAM_SIZE: usize = 0x2000;
/// Bytes per tile (8 rows, 2 bitplanes)
pub const TILE_SIZE: usize = 16;

/// Attribute byte shared by CGB BG map entries and OAM entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileAttributes(pub Byte);

impl TileAttributes {
    /// CGB palette number (bits 0-2)
    pub fn cgb_palette(&self) -> u8 {
        self.0 & 0x07
    }

    /// CGB VRAM bank (bit 3)
    pub fn vram_bank(&self) -> usize {
        bit(self.0, 3) as usize
    }

    /// DMG palette number (bit 4, objects only)
    pub fn dmg_palette(&self) -> usize {
        bit(self.0, 4) as usize
    }

    /// X flip (bit 5)
    pub fn x_flip(&self) -> bool {
        bit(self.0, 5)
    }

    /// Y flip (bit 6)
    pub fn y_flip(&self) -> bool {
        bit(self.0, 6)
    }

    /// BG-over-OBJ priority (bit 7)
    pub fn bg_priority(&self) -> bool {
        bit(self.0, 7)
    }
}

/// Video RAM with bus access locking
#[derive(Debug, Clone)]
pub struct Vram {
    banks: Box<[[Byte; VRAM_SIZE]; 2]>,
    /// Bank selected by VBK
    bank: usize,
    /// Bus reads return 0xFF while set
    pub read_disabled: bool,
    /// Bus writes are dropped while set
    pub write_disabled: bool,
}

impl Default for Vram {
    fn default() -> Self {
        Self::new()
    }
}

impl Vram {
    pub fn new() -> Self {
        Self {
            banks: Box::new([[0; VRAM_SIZE]; 2]),
            bank: 0,
            read_disabled: false,
            write_disabled: false,
        }
    }

    /// Bus read
    pub fn read(&self, address: Word) -> Byte {
        if self.read_disabled {
            return 0xFF;
        }
        self.byte(self.bank, address)
    }

    /// Bus write
    pub fn write(&mut self, address: Word, value: Byte) {
        if self.write_disabled {
            return;
        }
        self.banks[self.bank][Self::offset(address)] = value;
    }

    /// VBK value
    pub fn bank_number(&self) -> Byte {
        self.bank as Byte
    }

    pub fn set_bank(&mut self, value: Byte) {
        self.bank = (value & 0x01) as usize;
    }

    /// Unlocked access for the PPU itself
    pub fn byte(&self, bank: usize, address: Word) -> Byte {
        self.banks[bank & 1][Self::offset(address)]
    }

    /// Unlocked store, used when pre-loading boot state
    pub fn set_byte(&mut self, bank: usize, address: Word, value: Byte) {
        self.banks[bank & 1][Self::offset(address)] = value;
    }

    /// Tile index and CGB attributes of a tile map entry
    pub fn map_entry(&self, address: Word) -> (Byte, TileAttributes) {
        (self.byte(0, address), TileAttributes(self.byte(1, address)))
    }

    /// Decode one 8-pixel row of a tile into color indices, leftmost first
    pub fn tile_row(&self, bank: usize, tile_address: Word, row: u8, x_flip: bool) -> [u8; 8] {
        let address = tile_address + (row as Word & 0x07) * 2;
        let lo = self.byte(bank, address);
        let hi = self.byte(bank, address + 1);

        let mut pixels = [0; 8];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            let shift = if x_flip { i } else { 7 - i };
            *pixel = ((hi >> shift) & 1) << 1 | ((lo >> shift) & 1);
        }
        pixels
    }

    fn offset(address: Word) -> usize {
        (address.wrapping_sub(VRAM_START) as usize) % VRAM_SIZE
    }
}

/// Address of a BG/window tile for the LCDC.4 addressing mode
pub fn bg_tile_address(tile: Byte, unsigned_tile_data: bool) -> Word {
    if unsigned_tile_data {
        VRAM_START + tile as Word * TILE_SIZE as Word
    } else {
        (0x9000i32 + (tile as i8 as i32) * TILE_SIZE as i32) as Word
    }
}
