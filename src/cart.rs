//! Cartridge header access
//!
//! The PPU only ever looks at the cartridge through a handful of header bytes
//! (title, licensee codes, CGB flag), consulted by the CGB boot-skip palette
//! picker. This module exposes that view as the [`Cartridge`] capability and
//! provides a file-backed ROM image for hosts.

use crate::common::{Byte, Word};
use std::fs;
use std::io;
use std::path::Path;

/// ROM header offsets
pub const HEADER_TITLE_START: usize = 0x134;
pub const HEADER_TITLE_END: usize = 0x143;
pub const HEADER_CGB_FLAG: usize = 0x143;
pub const HEADER_NEW_LIC_CODE: usize = 0x144;
pub const HEADER_LIC_CODE: usize = 0x14B;
pub const HEADER_CHECKSUM: usize = 0x14D;

/// Old licensee value meaning "see the new licensee code"
pub const USE_NEW_LICENSEE: Byte = 0x33;

/// Single-byte read access to the cartridge ROM
pub trait Cartridge {
    /// Read the byte at `address` in ROM bank 0
    fn read(&self, address: Word) -> Byte;
}

impl Cartridge for [Byte] {
    fn read(&self, address: Word) -> Byte {
        self.get(address as usize).copied().unwrap_or(0xFF)
    }
}

/// ROM header information
#[derive(Debug, Clone)]
pub struct RomHeader {
    /// Game title (up to 16 characters)
    pub title: String,
    /// CGB flag (0x80 = CGB enhanced, 0xC0 = CGB only)
    pub cgb_flag: Byte,
    /// New licensee code (two ASCII characters)
    pub new_lic_code: [Byte; 2],
    /// Old licensee code
    pub lic_code: Byte,
    /// Header checksum
    pub checksum: Byte,
}

impl RomHeader {
    /// Parse ROM header from ROM data
    pub fn parse(rom_data: &[Byte]) -> Option<Self> {
        if rom_data.len() < 0x150 {
            return None;
        }

        // Title is null-terminated; CGB titles are shorter and end in the flag byte
        let title_bytes = &rom_data[HEADER_TITLE_START..=HEADER_TITLE_END];
        let title = title_bytes
            .iter()
            .take_while(|&&b| b == b' ' || b.is_ascii_graphic())
            .map(|&b| b as char)
            .collect();

        Some(Self {
            title,
            cgb_flag: rom_data[HEADER_CGB_FLAG],
            new_lic_code: [
                rom_data[HEADER_NEW_LIC_CODE],
                rom_data[HEADER_NEW_LIC_CODE + 1],
            ],
            lic_code: rom_data[HEADER_LIC_CODE],
            checksum: rom_data[HEADER_CHECKSUM],
        })
    }

    /// Whether the cartridge uses CGB features (otherwise a CGB runs it in
    /// DMG compatibility mode)
    pub fn supports_cgb(&self) -> bool {
        self.cgb_flag & 0x80 != 0
    }

    /// Whether the header names Nintendo as licensee
    pub fn is_first_party(&self) -> bool {
        if self.lic_code == USE_NEW_LICENSEE {
            self.new_lic_code == *b"01"
        } else {
            self.lic_code == 0x01
        }
    }
}

/// A ROM image loaded in memory
#[derive(Debug, Clone)]
pub struct RomImage {
    /// ROM data
    pub rom: Vec<Byte>,
    /// Parsed ROM header
    pub header: RomHeader,
}

impl RomImage {
    /// Wrap ROM bytes, parsing the header
    pub fn from_bytes(rom: Vec<Byte>) -> io::Result<Self> {
        let header = RomHeader::parse(&rom)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "Invalid ROM header"))?;

        if !Self::validate_checksum(&rom) {
            log::warn!("ROM header checksum invalid");
        }

        Ok(Self { rom, header })
    }

    /// Load a ROM image from a file
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::from_bytes(fs::read(path)?)
    }

    /// Validate ROM header checksum
    pub fn validate_checksum(rom_data: &[Byte]) -> bool {
        rom_data.len() >= 0x150 && Self::calculate_checksum(rom_data) == rom_data[HEADER_CHECKSUM]
    }

    /// Calculate header checksum
    pub fn calculate_checksum(rom_data: &[Byte]) -> Byte {
        if rom_data.len() < 0x14D {
            return 0;
        }

        let mut checksum: u8 = 0;
        for &b in &rom_data[0x134..=0x14C] {
            checksum = checksum.wrapping_sub(b).wrapping_sub(1);
        }
        checksum
    }
}

impl Cartridge for RomImage {
    fn read(&self, address: Word) -> Byte {
        self.rom.as_slice().read(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_rom() -> Vec<Byte> {
        let mut rom = vec![0u8; 0x8000];

        let title = b"TEST ROM";
        rom[HEADER_TITLE_START..HEADER_TITLE_START + title.len()].copy_from_slice(title);
        rom[HEADER_LIC_CODE] = USE_NEW_LICENSEE;
        rom[HEADER_NEW_LIC_CODE] = b'0';
        rom[HEADER_NEW_LIC_CODE + 1] = b'1';
        rom[HEADER_CHECKSUM] = RomImage::calculate_checksum(&rom);

        rom
    }

    #[test]
    fn test_header_parse() {
        let rom = create_test_rom();
        let header = RomHeader::parse(&rom).unwrap();

        assert_eq!(header.title, "TEST ROM");
        assert_eq!(header.cgb_flag, 0x00);
        assert!(!header.supports_cgb());
        assert!(header.is_first_party());
    }

    #[test]
    fn test_short_rom_rejected() {
        assert!(RomHeader::parse(&[0u8; 0x100]).is_none());
        assert!(RomImage::from_bytes(vec![0u8; 0x100]).is_err());
    }

    #[test]
    fn test_checksum_calculation() {
        let rom = create_test_rom();
        assert!(RomImage::validate_checksum(&rom));
    }

    #[test]
    fn test_licensee() {
        let mut rom = create_test_rom();
        rom[HEADER_NEW_LIC_CODE + 1] = b'8';
        assert!(!RomHeader::parse(&rom).unwrap().is_first_party());

        rom[HEADER_LIC_CODE] = 0x01;
        assert!(RomHeader::parse(&rom).unwrap().is_first_party());
    }

    #[test]
    fn test_cartridge_read() {
        let image = RomImage::from_bytes(create_test_rom()).unwrap();
        assert_eq!(image.read(0x134), b'T');
        assert_eq!(image.rom.as_slice().read(0x9000), 0xFF);
    }
}
