//! Common types and utilities for the PPU
//!
//! Type aliases matching the Game Boy bus widths, bit helpers shared by the
//! register surface and the renderer, and the fixed screen geometry.

/// 8-bit unsigned integer (Game Boy byte)
pub type Byte = u8;

/// 16-bit unsigned integer (Game Boy word)
pub type Word = u16;

/// Visible pixels per line
pub const SCREEN_WIDTH: usize = 160;
/// Visible lines per frame
pub const SCREEN_HEIGHT: usize = 144;
/// Dots in one scan line
pub const LINE_DOTS: i32 = 456;
/// Lines per frame, including VBlank
pub const LINES_PER_FRAME: u8 = 154;
/// Dots in one frame
pub const FRAME_DOTS: i32 = LINE_DOTS * LINES_PER_FRAME as i32;

/// Check if a specific bit is set in a byte value
///
/// # Arguments
/// * `value` - The byte value to check
/// * `n` - The bit position (0-7)
#[inline]
pub fn bit(value: Byte, n: u8) -> bool {
    (value & (1 << n)) != 0
}

/// Set or clear a specific bit in a byte value
#[inline]
pub fn bit_set(value: &mut Byte, n: u8, on: bool) {
    if on {
        *value |= 1 << n;
    } else {
        *value &= !(1 << n);
    }
}

/// Check if a value is within a range (inclusive)
#[inline]
pub fn between(value: Word, low: Word, high: Word) -> bool {
    value >= low && value <= high
}
