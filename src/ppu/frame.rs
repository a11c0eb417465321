//! Frame buffers
//!
//! The renderer writes only into the back buffer. At the start of VBlank the
//! back buffer becomes the front, the old front is kept as the previous frame
//! and a blank buffer takes the back position.

use crate::common::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// One completed frame: DMG shades (0-3) or CGB RGB555 values
pub type Frame = [[u16; SCREEN_WIDTH]; SCREEN_HEIGHT];

/// Blank pixel on the DMG (shade 0)
pub const DMG_BLANK: u16 = 0x0000;
/// Blank pixel on the CGB (white)
pub const CGB_BLANK: u16 = 0x7FFF;

#[derive(Debug, Clone)]
pub struct FrameBuffers {
    front: Box<Frame>,
    back: Box<Frame>,
    previous: Box<Frame>,
    blank: u16,
}

impl FrameBuffers {
    pub fn new(blank: u16) -> Self {
        Self {
            front: Box::new([[blank; SCREEN_WIDTH]; SCREEN_HEIGHT]),
            back: Box::new([[blank; SCREEN_WIDTH]; SCREEN_HEIGHT]),
            previous: Box::new([[blank; SCREEN_WIDTH]; SCREEN_HEIGHT]),
            blank,
        }
    }

    /// Rotate back -> front -> previous and clear the new back buffer
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.front);
        std::mem::swap(&mut self.front, &mut self.back);
        // The old previous frame is recycled as the new back buffer
        for row in self.back.iter_mut() {
            row.fill(self.blank);
        }
    }

    /// Latest completed frame and the one before it
    pub fn frame(&self) -> (&Frame, &Frame) {
        (&self.front, &self.previous)
    }

    /// Row `ly` of the frame being drawn
    pub fn line_mut(&mut self, ly: u8) -> &mut [u16; SCREEN_WIDTH] {
        &mut self.back[ly as usize % SCREEN_HEIGHT]
    }

    pub fn back(&self) -> &Frame {
        &self.back
    }

    pub fn blank(&self) -> u16 {
        self.blank
    }
}

/// Convert a frame pixel to ARGB8888 for presentation
pub fn to_argb(pixel: u16, cgb: bool) -> u32 {
    if cgb {
        let expand = |c: u16| {
            let c = (c & 0x1F) as u32;
            (c << 3) | (c >> 2)
        };
        let r = expand(pixel);
        let g = expand(pixel >> 5);
        let b = expand(pixel >> 10);
        0xFF00_0000 | (r << 16) | (g << 8) | b
    } else {
        // Classic Game Boy green palette
        match pixel & 0x03 {
            0 => 0xFF9BBC0F, // Lightest
            1 => 0xFF8BAC0F,
            2 => 0xFF306230,
            _ => 0xFF0F380F, // Darkest
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_rotation() {
        let mut buffers = FrameBuffers::new(DMG_BLANK);
        buffers.line_mut(0)[0] = 3;
        buffers.swap();
        assert_eq!(buffers.frame().0[0][0], 3);
        assert_eq!(buffers.back()[0][0], DMG_BLANK);

        buffers.line_mut(0)[0] = 2;
        buffers.swap();
        let (front, previous) = buffers.frame();
        assert_eq!(front[0][0], 2);
        assert_eq!(previous[0][0], 3);
    }

    #[test]
    fn test_cgb_blank_fill() {
        let mut buffers = FrameBuffers::new(CGB_BLANK);
        assert_eq!(buffers.frame().0[143][159], CGB_BLANK);
        buffers.line_mut(10)[5] = 0x001F;
        buffers.swap();
        buffers.swap();
        assert_eq!(buffers.back()[10][5], CGB_BLANK);
    }

    #[test]
    fn test_color_to_argb() {
        assert_eq!(to_argb(0, false), 0xFF9BBC0F);
        assert_eq!(to_argb(3, false), 0xFF0F380F);
        assert_eq!(to_argb(0x7FFF, true), 0xFFFFFFFF);
        assert_eq!(to_argb(0x001F, true), 0xFFFF0000);
        assert_eq!(to_argb(0x7C00, true), 0xFF0000FF);
    }
}
