//! Palettes
//!
//! Translation from 2-bit color indices to the 15-bit values stored in the
//! frame buffer. DMG palettes yield a shade (0-3); CGB palettes yield RGB555.

use crate::common::Byte;

/// Anything that maps a 2-bit color index to a frame buffer value
pub trait Palette {
    fn color(&self, id: u8) -> u16;
}

/// Monochrome palette register (BGP, OBP0, OBP1)
///
/// Bits 7-6: id 3; bits 5-4: id 2; bits 3-2: id 1; bits 1-0: id 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DmgPalette(pub Byte);

impl DmgPalette {
    /// Shade for a color index
    pub fn shade(&self, id: u8) -> u8 {
        (self.0 >> ((id & 0x03) * 2)) & 0x03
    }

    /// In DMG compatibility mode the shades index into a CGB palette slot
    /// instead of the grey ramp.
    pub fn to_cgb(self, cgb_palette: &[Byte]) -> CgbPalette {
        let mut data = [0; 8];
        for id in 0..4 {
            let shade = self.shade(id) as usize;
            data[2 * id as usize] = cgb_palette[2 * shade];
            data[2 * id as usize + 1] = cgb_palette[2 * shade + 1];
        }
        CgbPalette(data)
    }
}

impl Palette for DmgPalette {
    fn color(&self, id: u8) -> u16 {
        self.shade(id) as u16
    }
}

/// One CGB palette slot: four little-endian RGB555 colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CgbPalette(pub [Byte; 8]);

impl CgbPalette {
    /// Slot `index` of a 64-byte palette RAM
    pub fn from_ram(ram: &[Byte; 64], index: u8) -> Self {
        let start = 8 * (index as usize & 0x07);
        let mut data = [0; 8];
        data.copy_from_slice(&ram[start..start + 8]);
        CgbPalette(data)
    }
}

impl Palette for CgbPalette {
    fn color(&self, id: u8) -> u16 {
        let id = (id & 0x03) as usize;
        (self.0[2 * id] as u16 | (self.0[2 * id + 1] as u16) << 8) & 0x7FFF
    }
}
