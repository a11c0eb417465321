//! PPU bus interface
//!
//! Address decoding for VRAM, OAM and the LCD registers. The OAM DMA register
//! (0xFF46) belongs to the DMA unit and is not decoded here.

use log::error;

use super::Ppu;
use crate::common::{bit, Byte, Word};
use crate::error::PpuError;
use crate::interrupts::{InterruptSink, InterruptType};
use crate::lcd::PpuMode;

pub const LCDC_ADDR: Word = 0xFF40;
pub const STAT_ADDR: Word = 0xFF41;
pub const SCY_ADDR: Word = 0xFF42;
pub const SCX_ADDR: Word = 0xFF43;
pub const LY_ADDR: Word = 0xFF44;
pub const LYC_ADDR: Word = 0xFF45;
pub const BGP_ADDR: Word = 0xFF47;
pub const OBP0_ADDR: Word = 0xFF48;
pub const OBP1_ADDR: Word = 0xFF49;
pub const WY_ADDR: Word = 0xFF4A;
pub const WX_ADDR: Word = 0xFF4B;
pub const VBK_ADDR: Word = 0xFF4F;
pub const BGPI_ADDR: Word = 0xFF68;
pub const BGPD_ADDR: Word = 0xFF69;
pub const OBPI_ADDR: Word = 0xFF6A;
pub const OBPD_ADDR: Word = 0xFF6B;

/// Palette RAM address bits of BGPI/OBPI
const PALETTE_INDEX_MASK: Byte = 0x3F;

impl Ppu {
    /// Bus read
    pub fn read(&mut self, address: Word) -> Result<Byte, PpuError> {
        let cgb = self.config.model.is_cgb();

        let value = match address {
            0x8000..=0x9FFF => self.vram.read(address),
            0xFE00..=0xFEFF => {
                self.glitched_oam_access(address, true);
                self.oam.read(address)
            }
            LCDC_ADDR => self.lcd.lcdc(),
            // Bit 7 is unused and reads as 1
            STAT_ADDR => 0x80 | self.lcd.stat,
            SCY_ADDR => self.lcd.scy,
            SCX_ADDR => self.lcd.scx,
            LY_ADDR => self.lcd.ly,
            LYC_ADDR => self.lcd.lyc,
            BGP_ADDR => self.lcd.bgp,
            OBP0_ADDR => self.lcd.obp[0],
            OBP1_ADDR => self.lcd.obp[1],
            WY_ADDR => self.lcd.wy,
            WX_ADDR => self.lcd.wx,
            VBK_ADDR if cgb => self.vram.bank_number() | 0xFE,
            BGPI_ADDR if cgb => self.bgpi,
            BGPD_ADDR if cgb => self.bg_palette[(self.bgpi & PALETTE_INDEX_MASK) as usize],
            OBPI_ADDR if cgb => self.obpi,
            OBPD_ADDR if cgb => self.obj_palette[(self.obpi & PALETTE_INDEX_MASK) as usize],
            VBK_ADDR | BGPI_ADDR | BGPD_ADDR | OBPI_ADDR | OBPD_ADDR => 0xFF,
            _ => {
                error!("PPU: read from unmapped address {:#06X}", address);
                return Err(PpuError::UnmappedRegister(address));
            }
        };

        Ok(value)
    }

    /// Bus write
    pub fn write(
        &mut self,
        address: Word,
        value: Byte,
        sink: &mut dyn InterruptSink,
    ) -> Result<(), PpuError> {
        let cgb = self.config.model.is_cgb();

        match address {
            0x8000..=0x9FFF => self.vram.write(address, value),
            0xFE00..=0xFEFF => {
                self.glitched_oam_access(address, false);
                self.oam.write(address, value);
            }
            LCDC_ADDR => {
                self.lcd.set_lcdc(value);
                if self.lcd.control().enabled {
                    self.enable(sink);
                } else {
                    self.disable();
                }
            }
            STAT_ADDR => {
                // Writing STAT in mode 0 or 1 raises a spurious interrupt (DMG bug)
                let mode = self.lcd.mode();
                if !self.stat_line && matches!(mode, PpuMode::HBlank | PpuMode::VBlank) {
                    sink.request_interrupt(InterruptType::LcdStat);
                }
                self.lcd.write_stat(value);
                self.check_stat_interrupt(sink);
            }
            SCY_ADDR => self.lcd.scy = value,
            SCX_ADDR => self.lcd.scx = value,
            // Read-only
            LY_ADDR => {}
            LYC_ADDR => {
                self.lcd.lyc = value;
                // STAT is frozen while the LCD is off
                if self.active {
                    self.check_stat_interrupt(sink);
                }
            }
            BGP_ADDR => self.lcd.bgp = value,
            OBP0_ADDR => self.lcd.obp[0] = value,
            OBP1_ADDR => self.lcd.obp[1] = value,
            WY_ADDR => self.lcd.wy = value,
            WX_ADDR => self.lcd.wx = value,
            VBK_ADDR | BGPI_ADDR | BGPD_ADDR | OBPI_ADDR | OBPD_ADDR if !cgb => {}
            VBK_ADDR => self.vram.set_bank(value),
            BGPI_ADDR => self.bgpi = value,
            BGPD_ADDR => palette_write(&mut self.bg_palette, &mut self.bgpi, value),
            OBPI_ADDR => self.obpi = value,
            OBPD_ADDR => palette_write(&mut self.obj_palette, &mut self.obpi, value),
            _ => {
                error!("PPU: write {:#04X} to unmapped address {:#06X}", value, address);
                return Err(PpuError::UnmappedRegister(address));
            }
        }

        Ok(())
    }
}

/// Store through a palette index register, auto-incrementing when bit 7 is set
fn palette_write(ram: &mut [Byte; 64], index: &mut Byte, value: Byte) {
    let address = *index & PALETTE_INDEX_MASK;
    ram[address as usize] = value;

    if bit(*index, 7) {
        *index = 0x80 | (address.wrapping_add(1) & PALETTE_INDEX_MASK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interrupts::InterruptFlags;
    use crate::ppu::{Model, PpuConfig};
    use proptest::prelude::*;

    fn cgb_ppu() -> Ppu {
        Ppu::new(PpuConfig { model: Model::Cgb, dmg_compatibility: false }).unwrap()
    }

    #[test]
    fn test_register_round_trip() {
        let mut ppu = Ppu::new(PpuConfig::default()).unwrap();
        let mut flags = InterruptFlags::new();

        for (address, value) in [
            (SCY_ADDR, 0x12),
            (SCX_ADDR, 0x34),
            (LYC_ADDR, 0x56),
            (BGP_ADDR, 0xE4),
            (OBP0_ADDR, 0xD2),
            (OBP1_ADDR, 0x1B),
            (WY_ADDR, 0x40),
            (WX_ADDR, 0x07),
        ] {
            ppu.write(address, value, &mut flags).unwrap();
            assert_eq!(ppu.read(address).unwrap(), value);
        }

        ppu.write(0x8123, 0xAB, &mut flags).unwrap();
        assert_eq!(ppu.read(0x8123).unwrap(), 0xAB);
        ppu.write(0xFE10, 0xCD, &mut flags).unwrap();
        assert_eq!(ppu.read(0xFE10).unwrap(), 0xCD);
    }

    #[test]
    fn test_stat_read_sets_bit_7() {
        let mut ppu = Ppu::new(PpuConfig::default()).unwrap();
        assert_eq!(ppu.read(STAT_ADDR).unwrap(), 0x84);

        ppu.write(STAT_ADDR, 0xFF, &mut InterruptFlags::new()).unwrap();
        assert_eq!(ppu.read(STAT_ADDR).unwrap(), 0xFC);
    }

    #[test]
    fn test_spurious_stat_interrupt() {
        let mut ppu = Ppu::new(PpuConfig::default()).unwrap();
        let mut flags = InterruptFlags::new();
        ppu.write(STAT_ADDR, 0x00, &mut flags).unwrap();
        assert!(flags.pending(InterruptType::LcdStat));

        // Not in mode 2 or 3
        let mut ppu = Ppu::new(PpuConfig::default()).unwrap();
        let mut flags = InterruptFlags::new();
        ppu.lcd.set_mode(PpuMode::Drawing);
        ppu.write(STAT_ADDR, 0x00, &mut flags).unwrap();
        assert!(!flags.pending(InterruptType::LcdStat));
    }

    #[test]
    fn test_lyc_write_while_off() {
        let mut ppu = Ppu::new(PpuConfig::default()).unwrap();
        let mut flags = InterruptFlags::new();
        assert!(ppu.lcd.lyc_flag());

        ppu.write(LYC_ADDR, 5, &mut flags).unwrap();
        // Coincidence flag is not refreshed
        assert!(ppu.lcd.lyc_flag());
        assert_eq!(flags.flags, 0);
    }

    #[test]
    fn test_unmapped_registers() {
        let mut ppu = Ppu::new(PpuConfig::default()).unwrap();
        let mut flags = InterruptFlags::new();

        assert_eq!(ppu.read(0xFF46), Err(PpuError::UnmappedRegister(0xFF46)));
        assert_eq!(
            ppu.write(0xFF46, 0xC0, &mut flags),
            Err(PpuError::UnmappedRegister(0xFF46))
        );
        assert_eq!(ppu.read(0xC000), Err(PpuError::UnmappedRegister(0xC000)));
        assert_eq!(ppu.read(0xFF4C), Err(PpuError::UnmappedRegister(0xFF4C)));
    }

    #[test]
    fn test_cgb_registers_on_dmg() {
        let mut ppu = Ppu::new(PpuConfig::default()).unwrap();
        let mut flags = InterruptFlags::new();

        for address in [VBK_ADDR, BGPI_ADDR, BGPD_ADDR, OBPI_ADDR, OBPD_ADDR] {
            ppu.write(address, 0x01, &mut flags).unwrap();
            assert_eq!(ppu.read(address).unwrap(), 0xFF);
        }
        assert_eq!(ppu.vram.bank_number(), 0);
    }

    #[test]
    fn test_vram_bank_select() {
        let mut ppu = cgb_ppu();
        let mut flags = InterruptFlags::new();

        assert_eq!(ppu.read(VBK_ADDR).unwrap(), 0xFE);
        ppu.write(0x9800, 0x11, &mut flags).unwrap();
        ppu.write(VBK_ADDR, 0x01, &mut flags).unwrap();
        assert_eq!(ppu.read(VBK_ADDR).unwrap(), 0xFF);
        assert_eq!(ppu.read(0x9800).unwrap(), 0x00);
        ppu.write(0x9800, 0x22, &mut flags).unwrap();

        ppu.write(VBK_ADDR, 0x00, &mut flags).unwrap();
        assert_eq!(ppu.read(0x9800).unwrap(), 0x11);
    }

    #[test]
    fn test_palette_data_without_increment() {
        let mut ppu = cgb_ppu();
        let mut flags = InterruptFlags::new();

        ppu.write(OBPI_ADDR, 0x05, &mut flags).unwrap();
        ppu.write(OBPD_ADDR, 0xAA, &mut flags).unwrap();
        ppu.write(OBPD_ADDR, 0xBB, &mut flags).unwrap();
        assert_eq!(ppu.read(OBPI_ADDR).unwrap(), 0x05);
        assert_eq!(ppu.read(OBPD_ADDR).unwrap(), 0xBB);
        assert_eq!(ppu.obj_palette[5], 0xBB);
    }

    #[test]
    fn test_lcdc_decode_on_write() {
        let mut ppu = Ppu::new(PpuConfig::default()).unwrap();
        let mut flags = InterruptFlags::new();

        ppu.write(LCDC_ADDR, 0x7F, &mut flags).unwrap();
        assert!(!ppu.is_active());
        assert!(ppu.lcd.control().window_enabled);
        assert_eq!(ppu.read(LCDC_ADDR).unwrap(), 0x7F);

        ppu.write(LCDC_ADDR, 0xFF, &mut flags).unwrap();
        assert!(ppu.is_active());
    }

    proptest! {
        #[test]
        fn prop_palette_auto_increment(start in 0u8..64, data in prop::collection::vec(any::<u8>(), 64)) {
            let mut ppu = cgb_ppu();
            let mut flags = InterruptFlags::new();

            ppu.write(BGPI_ADDR, 0x80 | start, &mut flags).unwrap();
            for &value in &data {
                ppu.write(BGPD_ADDR, value, &mut flags).unwrap();
            }

            // 64 writes wrap back to the start index
            prop_assert_eq!(ppu.read(BGPI_ADDR).unwrap(), 0x80 | start);
            for (i, &value) in data.iter().enumerate() {
                let address = (start as usize + i) % 64;
                prop_assert_eq!(ppu.bg_palette[address], value);
            }
        }

        #[test]
        fn prop_ly_is_read_only(value in any::<u8>(), ticks in 0i32..70224) {
            let mut ppu = Ppu::new(PpuConfig::default()).unwrap();
            let mut flags = InterruptFlags::new();
            ppu.skip_dmg_boot();
            ppu.tick(ticks, &mut flags);

            let ly = ppu.read(LY_ADDR).unwrap();
            ppu.write(LY_ADDR, value, &mut flags).unwrap();
            prop_assert_eq!(ppu.read(LY_ADDR).unwrap(), ly);
        }
    }
}
