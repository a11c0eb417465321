//! Object Attribute Memory
//!
//! 40 objects of 4 bytes each at 0xFE00-0xFE9F, scanned by the PPU as 20 rows
//! of 8 bytes during mode 2.
//!
//! On the DMG, a bus access to the OAM range while the PPU is reading a row
//! corrupts that row (and sometimes its neighbours). The corruption depends
//! only on which kind of access raced the scan and on which row was being
//! read, never on the value the CPU read or wrote. Rows are treated as four
//! little-endian words.

use crate::common::{Byte, Word};
use crate::ppu::vram::TileAttributes;

pub const OAM_START: Word = 0xFE00;
pub const OAM_SIZE: usize = 0xA0;
/// Bytes per scanned row (two objects)
pub const OAM_ROW_SIZE: usize = 8;
/// Rows read during mode 2
pub const OAM_ROWS: u8 = 20;
/// Hardware object limit per line
pub const OBJS_PER_LINE: usize = 10;
/// Object Y coordinates are offset by 16
pub const OBJ_Y_OFFSET: u8 = 16;
/// Object X coordinates are offset by 8
pub const OBJ_X_OFFSET: u8 = 8;

/// One OAM entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Object {
    /// Y position (minus 16)
    pub y: Byte,
    /// X position (minus 8)
    pub x: Byte,
    /// Tile index
    pub tile: Byte,
    /// Flags (priority, flip, palette, bank)
    pub attrs: TileAttributes,
    /// Position in OAM (0-39)
    pub index: u8,
}

impl Object {
    /// Whether this object covers line `ly` for the given object height
    pub fn on_line(&self, ly: u8, height: u8) -> bool {
        let line = ly as u16 + OBJ_Y_OFFSET as u16;
        let top = self.y as u16;
        top <= line && line < top + height as u16
    }

    /// Whether this object covers screen column `x`
    pub fn covers(&self, x: u8) -> bool {
        let column = x as u16 + OBJ_X_OFFSET as u16;
        let left = self.x as u16;
        left <= column && column < left + 8
    }
}

/// Kind of bus access racing the OAM scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OamRace {
    Read,
    Write,
    ReadWrite,
}

/// Object attribute memory with bus access locking
#[derive(Debug, Clone)]
pub struct Oam {
    data: [Byte; OAM_SIZE],
    /// Bus reads return 0xFF while set
    pub read_disabled: bool,
    /// Bus writes are dropped while set
    pub write_disabled: bool,
    bugged_read: bool,
    bugged_write: bool,
    bugged_row: u8,
}

impl Default for Oam {
    fn default() -> Self {
        Self::new()
    }
}

impl Oam {
    pub fn new() -> Self {
        Self {
            data: [0; OAM_SIZE],
            read_disabled: false,
            write_disabled: false,
            bugged_read: false,
            bugged_write: false,
            bugged_row: 0,
        }
    }

    /// Bus read. The unusable area 0xFEA0-0xFEFF reads as 0x00.
    pub fn read(&self, address: Word) -> Byte {
        if self.read_disabled {
            return 0xFF;
        }
        let offset = address.wrapping_sub(OAM_START) as usize;
        self.data.get(offset).copied().unwrap_or(0x00)
    }

    /// Bus write. Writes to the unusable area are ignored.
    pub fn write(&mut self, address: Word, value: Byte) {
        if self.write_disabled {
            return;
        }
        let offset = address.wrapping_sub(OAM_START) as usize;
        if let Some(byte) = self.data.get_mut(offset) {
            *byte = value;
        }
    }

    /// Raw contents
    pub fn bytes(&self) -> &[Byte; OAM_SIZE] {
        &self.data
    }

    pub fn bytes_mut(&mut self) -> &mut [Byte; OAM_SIZE] {
        &mut self.data
    }

    /// Get OAM entry at index
    pub fn object(&self, index: usize) -> Object {
        let offset = (index % 40) * 4;
        Object {
            y: self.data[offset],
            x: self.data[offset + 1],
            tile: self.data[offset + 2],
            attrs: TileAttributes(self.data[offset + 3]),
            index: (index % 40) as u8,
        }
    }

    /// Select the objects on line `ly`: the first ten matches in OAM order
    pub fn search(&self, ly: u8, height: u8, objects: &mut Vec<Object>) {
        objects.clear();
        for index in 0..40 {
            if objects.len() >= OBJS_PER_LINE {
                break;
            }
            let object = self.object(index);
            if object.on_line(ly, height) {
                objects.push(object);
            }
        }
    }

    // ========== Corruption ==========

    /// Record a bus access that raced the scan of `row`
    pub fn flag_race(&mut self, row: u8, read: bool) {
        self.bugged_row = row;
        if read {
            self.bugged_read = true;
        } else {
            self.bugged_write = true;
        }
    }

    /// Race recorded since the last call, if any
    pub fn take_race(&mut self) -> Option<(OamRace, u8)> {
        let race = match (self.bugged_read, self.bugged_write) {
            (true, true) => Some(OamRace::ReadWrite),
            (true, false) => Some(OamRace::Read),
            (false, true) => Some(OamRace::Write),
            (false, false) => None,
        };
        self.bugged_read = false;
        self.bugged_write = false;
        race.map(|race| (race, self.bugged_row))
    }

    /// Apply the corruption pattern of `race` at `row`
    pub fn corrupt(&mut self, race: OamRace, row: u8) {
        let row = row as usize;
        if row == 0 || row >= OAM_ROWS as usize {
            return;
        }

        match race {
            OamRace::Write => self.corrupt_row(row, |a, b, c| ((a ^ c) & (b ^ c)) ^ c),
            OamRace::Read => self.corrupt_row(row, |a, b, c| b | (a & c)),
            OamRace::ReadWrite => {
                // Skipped for the first four rows and the last one
                if (4..OAM_ROWS as usize - 1).contains(&row) {
                    let a = self.word(row - 2, 0);
                    let b = self.word(row - 1, 0);
                    let c = self.word(row, 0);
                    let d = self.word(row - 1, 2);
                    self.set_word(row - 1, 0, (b & (a | c | d)) | (a & c & d));
                    self.copy_row(row - 1, row);
                    self.copy_row(row - 1, row - 2);
                }
                self.corrupt_row(row, |a, b, c| b | (a & c));
            }
        }
    }

    /// First word of `row` becomes `glitch(row[0], prev[0], prev[2])`, the
    /// other three are copied from the preceding row.
    fn corrupt_row(&mut self, row: usize, glitch: impl Fn(u16, u16, u16) -> u16) {
        let value = glitch(self.word(row, 0), self.word(row - 1, 0), self.word(row - 1, 2));
        self.set_word(row, 0, value);
        for word in 1..4 {
            let copied = self.word(row - 1, word);
            self.set_word(row, word, copied);
        }
    }

    fn copy_row(&mut self, from: usize, to: usize) {
        self.data.copy_within(
            from * OAM_ROW_SIZE..(from + 1) * OAM_ROW_SIZE,
            to * OAM_ROW_SIZE,
        );
    }

    fn word(&self, row: usize, word: usize) -> u16 {
        let offset = row * OAM_ROW_SIZE + word * 2;
        u16::from_le_bytes([self.data[offset], self.data[offset + 1]])
    }

    fn set_word(&mut self, row: usize, word: usize, value: u16) {
        let offset = row * OAM_ROW_SIZE + word * 2;
        self.data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Oam {
        let mut oam = Oam::new();
        for (i, byte) in oam.bytes_mut().iter_mut().enumerate() {
            *byte = (i as u8).wrapping_mul(7).wrapping_add(3);
        }
        oam
    }

    fn row(oam: &Oam, row: usize) -> [Byte; 8] {
        let mut bytes = [0; 8];
        bytes.copy_from_slice(&oam.bytes()[row * 8..row * 8 + 8]);
        bytes
    }

    #[test]
    fn test_oam_read_write() {
        let mut oam = Oam::new();

        oam.write(0xFE00, 0x10);
        assert_eq!(oam.read(0xFE00), 0x10);

        oam.write(0xFE9F, 0x20);
        assert_eq!(oam.read(0xFE9F), 0x20);

        oam.write(0xFEA0, 0x30);
        assert_eq!(oam.read(0xFEA0), 0x00);
    }

    #[test]
    fn test_oam_locking() {
        let mut oam = Oam::new();
        oam.write(0xFE04, 0x10);
        oam.read_disabled = true;
        oam.write_disabled = true;
        oam.write(0xFE04, 0x20);
        assert_eq!(oam.read(0xFE04), 0xFF);
        assert_eq!(oam.read(0xFEA0), 0xFF);

        oam.read_disabled = false;
        assert_eq!(oam.read(0xFE04), 0x10);
    }

    #[test]
    fn test_object_entry() {
        let mut oam = Oam::new();
        oam.bytes_mut()[4..8].copy_from_slice(&[32, 16, 5, 0b1111_0000]);

        let object = oam.object(1);
        assert_eq!(object.y, 32);
        assert_eq!(object.x, 16);
        assert_eq!(object.tile, 5);
        assert_eq!(object.index, 1);
        assert!(object.attrs.bg_priority());
        assert!(object.attrs.y_flip());
        assert!(object.attrs.x_flip());
        assert_eq!(object.attrs.dmg_palette(), 1);
    }

    #[test]
    fn test_search_limit_and_order() {
        let mut oam = Oam::new();
        // Every object sits on lines 0-7
        for index in 0..40 {
            oam.bytes_mut()[index * 4] = 16;
            oam.bytes_mut()[index * 4 + 1] = 100 - index as u8;
        }
        // Object 2 moved out of the way
        oam.bytes_mut()[8] = 40;

        let mut objects = Vec::new();
        oam.search(3, 8, &mut objects);
        let indices: Vec<u8> = objects.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![0, 1, 3, 4, 5, 6, 7, 8, 9, 10]);

        oam.search(8, 8, &mut objects);
        assert_eq!(objects.len(), 0);
        oam.search(8, 16, &mut objects);
        assert_eq!(objects.len(), 10);
    }

    #[test]
    fn test_object_spans() {
        let object = Object { y: 16, x: 8, ..Default::default() };
        assert!(object.on_line(0, 8));
        assert!(object.on_line(7, 8));
        assert!(!object.on_line(8, 8));
        assert!(object.on_line(15, 16));
        assert!(object.covers(0));
        assert!(object.covers(7));
        assert!(!object.covers(8));

        let edge = Object { x: 250, ..Default::default() };
        assert!(!edge.covers(159));
    }

    #[test]
    fn test_race_flags_combine() {
        let mut oam = Oam::new();
        assert_eq!(oam.take_race(), None);

        oam.flag_race(5, true);
        oam.flag_race(5, false);
        assert_eq!(oam.take_race(), Some((OamRace::ReadWrite, 5)));
        assert_eq!(oam.take_race(), None);

        oam.flag_race(3, false);
        assert_eq!(oam.take_race(), Some((OamRace::Write, 3)));
    }

    #[test]
    fn test_write_corruption_golden() {
        let mut oam = snapshot();
        oam.corrupt(OamRace::Write, 5);
        assert_eq!(row(&oam, 5), [0xFB, 0x22, 0xF1, 0xF8, 0xFF, 0x06, 0x0D, 0x14]);
        assert_eq!(row(&oam, 4), row(&snapshot(), 4));
        assert_eq!(row(&oam, 6), row(&snapshot(), 6));
    }

    #[test]
    fn test_read_corruption_golden() {
        let mut oam = snapshot();
        oam.corrupt(OamRace::Read, 5);
        assert_eq!(row(&oam, 5), [0xFB, 0xEA, 0xF1, 0xF8, 0xFF, 0x06, 0x0D, 0x14]);
    }

    #[test]
    fn test_read_write_corruption_golden() {
        let mut oam = snapshot();
        oam.corrupt(OamRace::ReadWrite, 5);

        let expected = [0xEB, 0xA2, 0xF1, 0xF8, 0xFF, 0x06, 0x0D, 0x14];
        assert_eq!(row(&oam, 3), expected);
        assert_eq!(row(&oam, 4), expected);
        assert_eq!(row(&oam, 5), expected);

        let untouched = snapshot();
        for r in (0..3).chain(6..20) {
            assert_eq!(row(&oam, r), row(&untouched, r));
        }
    }

    #[test]
    fn test_read_write_corruption_edge_rows() {
        // Rows 1-3 and 19 only get the read pattern
        let mut combined = snapshot();
        let mut read = snapshot();
        combined.corrupt(OamRace::ReadWrite, 19);
        read.corrupt(OamRace::Read, 19);
        assert_eq!(combined.bytes(), read.bytes());

        let mut first = snapshot();
        first.corrupt(OamRace::Write, 0);
        assert_eq!(first.bytes(), snapshot().bytes());
    }
}
