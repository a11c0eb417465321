//! Boot ROM skipping
//!
//! Puts the PPU in the state the boot ROM leaves it in (line 153 of VBlank,
//! LCD on, BGP = 0xFC) so a host can start at 0x0100 without a boot image.
//!
//! On the CGB, booting a DMG cartridge also assigns colors to the three DMG
//! palettes. The boot ROM picks them from a fixed bank using a checksum of the
//! cartridge title, restricted to Nintendo-licensed games.

use log::debug;

use super::modes::ModeState;
use super::Ppu;
use crate::cart::{
    Cartridge, HEADER_LIC_CODE, HEADER_NEW_LIC_CODE, HEADER_TITLE_START, USE_NEW_LICENSEE,
};
use crate::common::{Byte, Word};
use crate::lcd::PpuMode;
use crate::ppu::vram::{TILE_SIZE, VRAM_START};

/// Line dots already elapsed when the boot ROM hands over
const BOOT_DOTS: i32 = 400;
/// Dots left before line 0 starts
const BOOT_COUNTDOWN: i32 = 56;
const BOOT_LCDC: Byte = 0x91;
const BOOT_LY: Byte = 0x99;
const BOOT_BGP: Byte = 0xFC;

/// Fourth title byte, used to split colliding checksums
const HEADER_FOURTH_LETTER: Word = 0x137;
/// Checksum table entries past this index are ambiguous
const LAST_UNAMBIGUOUS: usize = 0x40;
/// Entries per row of the fourth-letter table
const LETTER_ROW: usize = 14;

/// Title checksums of first-party games; the position is the palette entry
const TITLE_CHECKSUMS: [Byte; 79] = [
    0x00, 0x88, 0x16, 0x36, 0xD1, 0xDB, 0xF2, 0x3C, 0x8C, 0x92, 0x3D, 0x5C, 0x58, 0xC9, 0x3E, 0x70,
    0x1D, 0x59, 0x69, 0x19, 0x35, 0xA8, 0x14, 0xAA, 0x75, 0x95, 0x99, 0x34, 0x6F, 0x15, 0xFF, 0x97,
    0x4B, 0x90, 0x17, 0x10, 0x39, 0xF7, 0xF6, 0xA2, 0x49, 0x4E, 0x43, 0x68, 0xE0, 0x8B, 0xF0, 0xCE,
    0x0C, 0x29, 0xE8, 0xB7, 0x86, 0x9A, 0x52, 0x01, 0x9D, 0x71, 0x9C, 0xBD, 0x5D, 0x6D, 0x67, 0x3F,
    0x6B,
    // Shared by several titles
    0xB3, 0x46, 0x28, 0xA5, 0xC6, 0xD3, 0x27, 0x61, 0x18, 0x66, 0x6A, 0xBF, 0x0D, 0xF4,
];

/// Fourth title letters for the ambiguous checksums, one column per entry
const TITLE_FOURTH_LETTERS: [Byte; 29] = [
    b'B', b'E', b'F', b'A', b'A', b'R', b'B', b'E', b'K', b'E', b'K', b' ', b'R', b'-',
    b'U', b'R', b'A', b'R', b' ', b'I', b'N', b'A', b'I', b'L', b'I', b'C', b'E', b' ',
    b'R',
];

/// Low 5 bits: row of `PALETTE_OFFSETS`. High 3 bits: shuffle flags.
const PALETTE_IDS_AND_FLAGS: [Byte; 94] = [
    0x7C, 0x08, 0x12, 0xA3, 0xA2, 0x07, 0x87, 0x4B, 0x20, 0x12, 0x65, 0xA8, 0x16, 0xA9, 0x86, 0xB1,
    0x68, 0xA0, 0x87, 0x66, 0x12, 0xA1, 0x30, 0x3C, 0x12, 0x85, 0x12, 0x64, 0x1B, 0x07, 0x06, 0x6F,
    0x6E, 0x6E, 0xAE, 0xAF, 0x6F, 0xB2, 0xAF, 0xB2, 0xA8, 0xAB, 0x6F, 0xAF, 0x86, 0xAE, 0xA2, 0xA2,
    0x12, 0xAF, 0x13, 0x12, 0xA1, 0x6E, 0xAF, 0xAF, 0xAD, 0x06, 0x4C, 0x6E, 0xAF, 0xAF, 0x12, 0x7C,
    0xAC,
    0xA8, 0x6A, 0x6E, 0x13, 0xA0, 0x2D, 0xA8, 0x2B, 0xAC, 0x64, 0xAC, 0x6D, 0x87, 0xBC,
    0x60, 0xB4, 0x13, 0x72, 0x7C, 0xB5, 0xAE, 0xAE, 0x7C, 0x7C, 0x65, 0xA2, 0x6C, 0x64,
    0x85,
];

/// Byte offsets into `PALETTES`: [OBP0 source, OBP1 source, BGP]
const PALETTE_OFFSETS: [[usize; 3]; 29] = [
    [16 * 8, 22 * 8, 8 * 8],
    [17 * 8, 4 * 8, 13 * 8],
    [27 * 8 + 6, 0, 14 * 8],
    [27 * 8 + 6, 4 * 8, 15 * 8],
    [4 * 8, 4 * 8, 7 * 8],
    [4 * 8, 22 * 8, 18 * 8],
    [4 * 8, 22 * 8, 20 * 8],
    [28 * 8, 22 * 8, 24 * 8],
    [19 * 8, 22 * 8 + 6, 9 * 8],
    [16 * 8, 28 * 8, 10 * 8],
    [3 * 8 + 6, 3 * 8 + 6, 11 * 8],
    [4 * 8, 23 * 8, 28 * 8],
    [17 * 8, 22 * 8, 2 * 8],
    [4 * 8, 0, 2 * 8],
    [4 * 8, 28 * 8, 3 * 8],
    [28 * 8, 3 * 8, 0],
    [3 * 8, 28 * 8, 4 * 8],
    [21 * 8, 28 * 8, 4 * 8],
    [3 * 8, 28 * 8, 0],
    [4 * 8, 3 * 8, 27 * 8],
    [25 * 8, 3 * 8, 28 * 8],
    [0, 28 * 8, 8 * 8],
    [5 * 8, 5 * 8, 5 * 8],
    [3 * 8, 28 * 8, 12 * 8],
    [4 * 8, 3 * 8, 28 * 8],
    [0, 0, 8],
    [28 * 8, 3 * 8, 6 * 8],
    [26 * 8, 26 * 8, 26 * 8],
    [4 * 8, 28 * 8, 29 * 8],
];

/// 30 palettes of four RGB555 colors
const PALETTES: [Byte; 240] = [
    0xFF, 0x7F, 0xBF, 0x32, 0xD0, 0x00, 0x00, 0x00,
    0x9F, 0x63, 0x79, 0x42, 0xB0, 0x15, 0xCB, 0x04,
    0xFF, 0x7F, 0x31, 0x6E, 0x4A, 0x45, 0x00, 0x00,
    0xFF, 0x7F, 0xEF, 0x1B, 0x00, 0x02, 0x00, 0x00,
    0xFF, 0x7F, 0x1F, 0x42, 0xF2, 0x1C, 0x00, 0x00,
    0xFF, 0x7F, 0x94, 0x52, 0x4A, 0x29, 0x00, 0x00,
    0xFF, 0x7F, 0xFF, 0x03, 0x2F, 0x01, 0x00, 0x00,
    0xFF, 0x7F, 0xEF, 0x03, 0xD6, 0x01, 0x00, 0x00,
    0xFF, 0x7F, 0xB5, 0x42, 0xC8, 0x3D, 0x00, 0x00,
    0x74, 0x7E, 0xFF, 0x03, 0x80, 0x01, 0x00, 0x00,
    0xFF, 0x67, 0xAC, 0x77, 0x13, 0x1A, 0x6B, 0x2D,
    0xD6, 0x7E, 0xFF, 0x4B, 0x75, 0x21, 0x00, 0x00,
    0xFF, 0x53, 0x5F, 0x4A, 0x52, 0x7E, 0x00, 0x00,
    0xFF, 0x4F, 0xD2, 0x7E, 0x4C, 0x3A, 0xE0, 0x1C,
    0xED, 0x03, 0xFF, 0x7F, 0x5F, 0x25, 0x00, 0x00,
    0x6A, 0x03, 0x1F, 0x02, 0xFF, 0x03, 0xFF, 0x7F,
    0xFF, 0x7F, 0xDF, 0x01, 0x12, 0x01, 0x00, 0x00,
    0x1F, 0x23, 0x5F, 0x03, 0xF2, 0x00, 0x09, 0x00,
    0xFF, 0x7F, 0xEA, 0x03, 0x1F, 0x01, 0x00, 0x00,
    0x9F, 0x29, 0x1A, 0x00, 0x0C, 0x00, 0x00, 0x00,
    0xFF, 0x7F, 0x7F, 0x02, 0x1F, 0x00, 0x00, 0x00,
    0xFF, 0x7F, 0xE0, 0x03, 0x06, 0x02, 0x20, 0x01,
    0xFF, 0x7F, 0xEB, 0x7E, 0x1F, 0x00, 0x00, 0x7C,
    0xFF, 0x7F, 0xFF, 0x3F, 0x00, 0x7E, 0x1F, 0x00,
    0xFF, 0x7F, 0xFF, 0x03, 0x1F, 0x00, 0x00, 0x00,
    0xFF, 0x03, 0x1F, 0x00, 0x0C, 0x00, 0x00, 0x00,
    0xFF, 0x7F, 0x3F, 0x03, 0x93, 0x01, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x42, 0x7F, 0x03, 0xFF, 0x7F,
    0xFF, 0x7F, 0x8C, 0x7E, 0x00, 0x7C, 0x00, 0x00,
    0xFF, 0x7F, 0xEF, 0x1B, 0x80, 0x61, 0x00, 0x00,
];

/// Logo tiles 1-25 as the DMG boot ROM leaves them (high bitplane empty)
const LOGO_TILES: [[Byte; 8]; 25] = [
    [0xF0, 0xF0, 0xFC, 0xFC, 0xFC, 0xFC, 0xF3, 0xF3],
    [0x3C, 0x3C, 0x3C, 0x3C, 0x3C, 0x3C, 0x3C, 0x3C],
    [0xF0, 0xF0, 0xF0, 0xF0, 0x00, 0x00, 0xF3, 0xF3],
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xCF, 0xCF],
    [0x00, 0x00, 0x0F, 0x0F, 0x3F, 0x3F, 0x0F, 0x0F],
    [0x00, 0x00, 0x00, 0x00, 0xC0, 0xC0, 0x0F, 0x0F],
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0xF0],
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF3, 0xF3],
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0xC0],
    [0x03, 0x03, 0x03, 0x03, 0x03, 0x03, 0xFF, 0xFF],
    [0xC0, 0xC0, 0xC0, 0xC0, 0xC0, 0xC0, 0xC3, 0xC3],
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFC, 0xFC],
    [0xF3, 0xF3, 0xF0, 0xF0, 0xF0, 0xF0, 0xF0, 0xF0],
    [0x3C, 0x3C, 0xFC, 0xFC, 0xFC, 0xFC, 0x3C, 0x3C],
    [0xF3, 0xF3, 0xF3, 0xF3, 0xF3, 0xF3, 0xF3, 0xF3],
    [0xF3, 0xF3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3],
    [0xCF, 0xCF, 0xCF, 0xCF, 0xCF, 0xCF, 0xCF, 0xCF],
    [0x3C, 0x3C, 0x3F, 0x3F, 0x3C, 0x3C, 0x0F, 0x0F],
    [0x3C, 0x3C, 0xFC, 0xFC, 0x00, 0x00, 0xFC, 0xFC],
    [0xFC, 0xFC, 0xF0, 0xF0, 0xF0, 0xF0, 0xF0, 0xF0],
    [0xF3, 0xF3, 0xF3, 0xF3, 0xF3, 0xF3, 0xF0, 0xF0],
    [0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF],
    [0xCF, 0xCF, 0xCF, 0xCF, 0xCF, 0xCF, 0xC3, 0xC3],
    [0x0F, 0x0F, 0x0F, 0x0F, 0x0F, 0x0F, 0xFC, 0xFC],
    [0x3C, 0x42, 0xB9, 0xA5, 0xB9, 0xA5, 0x42, 0x3C],
];

/// Logo placement in the 0x9800 map
const LOGO_MAP: Word = 0x9800;
const LOGO_TOP_ROW: Word = 0x104;
const LOGO_BOTTOM_ROW: Word = 0x124;
const LOGO_TRADEMARK: Word = 0x110;
const TRADEMARK_TILE: Byte = 25;

/// Byte offsets into the palette bank chosen for a DMG game on CGB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatPalettes {
    pub obp0: usize,
    pub obp1: usize,
    pub bg: usize,
}

impl CompatPalettes {
    /// Resolve a palette id and its shuffle flags
    pub fn from_id(id_and_flags: Byte) -> Self {
        let row = (id_and_flags & 0x1F) as usize % PALETTE_OFFSETS.len();
        let [obp0_source, obp1_source, bg] = PALETTE_OFFSETS[row];
        let flags = id_and_flags >> 5;

        // BGP is never shuffled; by default both object palettes copy it
        let mut palettes = Self { obp0: bg, obp1: bg, bg };
        if flags & 0b001 != 0 {
            palettes.obp0 = obp0_source;
        }
        if flags & 0b010 != 0 {
            palettes.obp1 = obp0_source;
        }
        if flags & 0b100 != 0 {
            palettes.obp1 = obp1_source;
        }
        palettes
    }

    pub fn bg_colors(&self) -> &'static [Byte] {
        &PALETTES[self.bg..self.bg + 8]
    }

    pub fn obp0_colors(&self) -> &'static [Byte] {
        &PALETTES[self.obp0..self.obp0 + 8]
    }

    pub fn obp1_colors(&self) -> &'static [Byte] {
        &PALETTES[self.obp1..self.obp1 + 8]
    }
}

/// Title checksum and palette id/flags the CGB boot ROM picks for a cartridge
pub fn find_palette_flags<C: Cartridge + ?Sized>(cart: &C) -> (Byte, Byte) {
    let default = PALETTE_IDS_AND_FLAGS[0];

    // Only Nintendo titles get a dedicated palette
    let first_party = if cart.read(HEADER_LIC_CODE as Word) == USE_NEW_LICENSEE {
        cart.read(HEADER_NEW_LIC_CODE as Word) == b'0'
            && cart.read(HEADER_NEW_LIC_CODE as Word + 1) == b'1'
    } else {
        cart.read(HEADER_LIC_CODE as Word) == 0x01
    };
    if !first_party {
        return (0, default);
    }

    let checksum = (0..16).fold(0u8, |sum, i| {
        sum.wrapping_add(cart.read(HEADER_TITLE_START as Word + i))
    });

    let index = match TITLE_CHECKSUMS.iter().position(|&c| c == checksum) {
        Some(index) => index,
        None => return (checksum, default),
    };
    if index <= LAST_UNAMBIGUOUS {
        return (checksum, PALETTE_IDS_AND_FLAGS[index]);
    }

    let column = index % LAST_UNAMBIGUOUS - 1;
    let letter = cart.read(HEADER_FOURTH_LETTER);
    let id_and_flags = if letter == TITLE_FOURTH_LETTERS[column] {
        PALETTE_IDS_AND_FLAGS[index]
    } else if letter == TITLE_FOURTH_LETTERS[LETTER_ROW + column] {
        PALETTE_IDS_AND_FLAGS[index + LETTER_ROW]
    } else if column == 0 && letter == TITLE_FOURTH_LETTERS[2 * LETTER_ROW] {
        PALETTE_IDS_AND_FLAGS[index + 2 * LETTER_ROW]
    } else {
        default
    };
    (checksum, id_and_flags)
}

impl Ppu {
    /// Enter the post-boot state of a DMG, logo included
    pub fn skip_dmg_boot(&mut self) {
        self.post_boot_state();

        for (n, tile) in LOGO_TILES.iter().enumerate() {
            let base = VRAM_START + (n as Word + 1) * TILE_SIZE as Word;
            for (row, &lo) in tile.iter().enumerate() {
                self.vram.set_byte(0, base + row as Word * 2, lo);
                self.vram.set_byte(0, base + row as Word * 2 + 1, 0);
            }
        }

        for i in 0..12 {
            self.vram.set_byte(0, LOGO_MAP + LOGO_TOP_ROW + i, i as Byte + 1);
            self.vram.set_byte(0, LOGO_MAP + LOGO_BOTTOM_ROW + i, i as Byte + 13);
        }
        self.vram.set_byte(0, LOGO_MAP + LOGO_TRADEMARK, TRADEMARK_TILE);

        debug!("PPU: skipped DMG boot");
    }

    /// Enter the post-boot state of a CGB and load the compatibility palettes
    /// for `cart`. Returns the title checksum.
    pub fn skip_cgb_boot<C: Cartridge + ?Sized>(&mut self, cart: &C) -> Byte {
        self.post_boot_state();

        let (checksum, id_and_flags) = find_palette_flags(cart);
        let palettes = CompatPalettes::from_id(id_and_flags);
        self.obj_palette[0..8].copy_from_slice(palettes.obp0_colors());
        self.obj_palette[8..16].copy_from_slice(palettes.obp1_colors());
        self.bg_palette[0..8].copy_from_slice(palettes.bg_colors());

        debug!(
            "PPU: skipped CGB boot, title checksum {:#04X}, palette {:#04X} ({:?})",
            checksum, id_and_flags, palettes
        );
        checksum
    }

    fn post_boot_state(&mut self) {
        self.active = true;
        self.dots = BOOT_DOTS;
        self.state = ModeState::VBlank;
        self.interrupt_mode = Some(PpuMode::VBlank);
        self.countdown = BOOT_COUNTDOWN;
        self.state_duration = ModeState::VBlank.duration(self);

        self.lcd.set_lcdc(BOOT_LCDC);
        self.lcd.stat = PpuMode::VBlank as Byte;
        self.lcd.ly = BOOT_LY;
        self.lcd.bgp = BOOT_BGP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppu::{Model, PpuConfig};

    fn nintendo_rom(title: &[u8]) -> Vec<u8> {
        let mut rom = vec![0u8; 0x150];
        rom[HEADER_TITLE_START..HEADER_TITLE_START + title.len()].copy_from_slice(title);
        rom[HEADER_LIC_CODE] = 0x01;
        rom
    }

    /// Title whose checksum is `checksum` with `letter` in fourth position
    fn ambiguous_rom(checksum: u8, letter: u8) -> Vec<u8> {
        let mut title = [0u8; 4];
        title[3] = letter;
        title[0] = checksum.wrapping_sub(letter);
        nintendo_rom(&title)
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(TITLE_CHECKSUMS.len(), 79);
        assert_eq!(PALETTE_IDS_AND_FLAGS.len(), 94);
        assert_eq!(PALETTES.len(), 30 * 8);
        assert!(PALETTE_OFFSETS.iter().flatten().all(|&o| o + 8 <= PALETTES.len()));
    }

    #[test]
    fn test_non_nintendo_uses_default() {
        let mut rom = nintendo_rom(b"TETRIS");
        rom[HEADER_LIC_CODE] = 0x08;
        assert_eq!(find_palette_flags(rom.as_slice()), (0, 0x7C));

        rom[HEADER_LIC_CODE] = USE_NEW_LICENSEE;
        rom[HEADER_NEW_LIC_CODE..HEADER_NEW_LIC_CODE + 2].copy_from_slice(b"02");
        assert_eq!(find_palette_flags(rom.as_slice()), (0, 0x7C));
    }

    #[test]
    fn test_zero_checksum_new_licensee() {
        let mut rom = nintendo_rom(b"");
        rom[HEADER_LIC_CODE] = USE_NEW_LICENSEE;
        rom[HEADER_NEW_LIC_CODE..HEADER_NEW_LIC_CODE + 2].copy_from_slice(b"01");

        // Checksum 0x00 is entry 0 of the checksum table
        let (checksum, id_and_flags) = find_palette_flags(rom.as_slice());
        assert_eq!(checksum, 0x00);
        assert_eq!(id_and_flags, PALETTE_IDS_AND_FLAGS[0]);
    }

    #[test]
    fn test_known_title() {
        let rom = nintendo_rom(b"TETRIS");
        assert_eq!(find_palette_flags(rom.as_slice()), (0xDB, 0x07));
    }

    #[test]
    fn test_unknown_checksum() {
        // 0x02 is not in the table
        let rom = nintendo_rom(&[0x01, 0x01]);
        assert_eq!(find_palette_flags(rom.as_slice()), (0x02, 0x7C));
    }

    #[test]
    fn test_fourth_letter_disambiguation() {
        // 0xB3 is entry 65, column 0
        assert_eq!(find_palette_flags(ambiguous_rom(0xB3, b'B').as_slice()), (0xB3, 0xA8));
        assert_eq!(find_palette_flags(ambiguous_rom(0xB3, b'U').as_slice()), (0xB3, 0x60));
        assert_eq!(find_palette_flags(ambiguous_rom(0xB3, b'R').as_slice()), (0xB3, 0x85));
        assert_eq!(find_palette_flags(ambiguous_rom(0xB3, b'X').as_slice()), (0xB3, 0x7C));

        // 0x46 is entry 66, column 1: no third row
        assert_eq!(find_palette_flags(ambiguous_rom(0x46, b'E').as_slice()), (0x46, 0x6A));
        assert_eq!(find_palette_flags(ambiguous_rom(0x46, b'R').as_slice()), (0x46, 0xB4));
        assert_eq!(find_palette_flags(ambiguous_rom(0x46, b'B').as_slice()), (0x46, 0x7C));
    }

    #[test]
    fn test_palette_shuffle() {
        // No flags: everything follows BGP
        let palettes = CompatPalettes::from_id(0x00);
        assert_eq!(palettes, CompatPalettes { obp0: 64, obp1: 64, bg: 64 });
        assert_eq!(palettes.bg_colors(), palettes.obp0_colors());

        // Bits 0 and 1: both object palettes use the first source
        let palettes = CompatPalettes::from_id(0x7C);
        assert_eq!(palettes, CompatPalettes { obp0: 32, obp1: 32, bg: 232 });

        // Bit 2 overrides bit 1
        let palettes = CompatPalettes::from_id(0xE3);
        assert_eq!(palettes, CompatPalettes { obp0: 222, obp1: 32, bg: 120 });

        // Bit 1 alone
        let palettes = CompatPalettes::from_id(0x43);
        assert_eq!(palettes, CompatPalettes { obp0: 120, obp1: 222, bg: 120 });
    }

    #[test]
    fn test_skip_dmg_boot() {
        let mut ppu = Ppu::new(PpuConfig::default()).unwrap();
        ppu.skip_dmg_boot();

        assert!(ppu.is_active());
        assert_eq!(ppu.ly(), 0x99);
        assert_eq!(ppu.mode(), PpuMode::VBlank);
        assert_eq!(ppu.state(), Some(ModeState::VBlank));
        assert_eq!(ppu.countdown(), 56);
        assert_eq!(ppu.lcd.lcdc(), 0x91);
        assert!(ppu.lcd.control().unsigned_tile_data);
        assert_eq!(ppu.lcd.bgp, 0xFC);

        // Logo tiles and map
        assert_eq!(ppu.vram.byte(0, 0x8010), 0xF0);
        assert_eq!(ppu.vram.byte(0, 0x8011), 0x00);
        assert_eq!(ppu.vram.byte(0, 0x8190), 0x3C);
        assert_eq!(ppu.vram.byte(0, 0x9903), 0);
        assert_eq!(ppu.vram.byte(0, 0x9904), 1);
        assert_eq!(ppu.vram.byte(0, 0x990F), 12);
        assert_eq!(ppu.vram.byte(0, 0x9910), 25);
        assert_eq!(ppu.vram.byte(0, 0x9924), 13);
        assert_eq!(ppu.vram.byte(0, 0x992F), 24);
        assert_eq!(ppu.vram.byte(0, 0x9930), 0);
    }

    #[test]
    fn test_skip_cgb_boot_loads_palettes() {
        let config = PpuConfig { model: Model::Cgb, dmg_compatibility: true };
        let mut ppu = Ppu::new(config).unwrap();
        let rom = nintendo_rom(b"TETRIS");

        assert_eq!(ppu.skip_cgb_boot(rom.as_slice()), 0xDB);

        // 0x07: id 7, no flags -> BGP source 24 * 8 everywhere
        let expected = &PALETTES[24 * 8..24 * 8 + 8];
        assert_eq!(&ppu.bg_palette[0..8], expected);
        assert_eq!(&ppu.obj_palette[0..8], expected);
        assert_eq!(&ppu.obj_palette[8..16], expected);
        assert_eq!(ppu.ly(), 0x99);
    }
}
