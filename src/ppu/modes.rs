//! PPU Modes
//!
//! The internal state machine driving a line. Each state has side effects
//! applied once on entry, a length in dots, and a successor.
//!
//! Line timing (normal line):
//! - OAM scan: 20 rows of 4 dots; STAT reports mode 2 from the second row on
//! - 4 dots of transition, then drawing (mode 3): 172 dots plus penalties
//! - HBlank (mode 0): until the line reaches 456 dots
//!
//! Lines 144-153 are VBlank (mode 1), each split into a 4-dot start and the
//! remaining 452 dots.
//!
//! Memory locking follows the internal state rather than STAT: OAM reads are
//! blocked 4 dots before mode 2 is reported, and OAM writes are briefly
//! allowed again between the last scanned row and mode 3.

use std::fmt;

use super::Ppu;
use crate::common::{LINES_PER_FRAME, LINE_DOTS};
use crate::interrupts::{InterruptSink, InterruptType};
use crate::lcd::PpuMode;
use crate::ppu::oam::OAM_ROWS;
use crate::ppu::pipeline::DRAWING_DOTS;

/// Length of mode 2 (and of the glitched first scan)
pub const OAM_SCAN_DOTS: i32 = 80;
/// Length of one OAM row read
const ROW_DOTS: i32 = 4;
/// First visible line of VBlank
pub const VBLANK_LINE: u8 = 144;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeState {
    /// First line after the LCD is switched on: no OAM scan, STAT stays 0
    GlitchedOamScan,
    /// Reading OAM row `row` (0-19)
    OamScan { row: u8 },
    OamScanToDrawing,
    Drawing,
    HBlank,
    /// First 4 dots of a VBlank line
    VBlankStart,
    VBlank,
}

impl ModeState {
    /// Apply the side effects of entering this state
    pub fn enter(self, ppu: &mut Ppu, sink: &mut dyn InterruptSink) {
        match self {
            ModeState::GlitchedOamScan => {
                // The PPU starts 4 dots into the line
                ppu.dots += 4;

                ppu.interrupt_mode = None;
                ppu.lcd.set_mode(PpuMode::HBlank);
                ppu.check_stat_interrupt(sink);
            }
            ModeState::OamScan { row } => {
                if ppu.lcd.wy == ppu.lcd.ly {
                    ppu.window_triggered = true;
                }

                match row {
                    0 => {
                        // STAT still shows HBlank
                        ppu.lcd.set_lyc_flag(false);
                        ppu.oam.read_disabled = true;
                    }
                    1 => {
                        ppu.oam.read_disabled = true;
                        ppu.oam.write_disabled = true;

                        ppu.interrupt_mode = Some(PpuMode::OamScan);
                        ppu.lcd.set_mode(PpuMode::OamScan);
                        ppu.check_stat_interrupt(sink);

                        let height = ppu.lcd.control().obj_height();
                        ppu.oam.search(ppu.lcd.ly, height, &mut ppu.objects);
                    }
                    _ => {}
                }
            }
            ModeState::OamScanToDrawing => {
                ppu.oam.write_disabled = false;
                ppu.vram.read_disabled = true;
            }
            ModeState::Drawing => {
                ppu.oam.read_disabled = true;
                ppu.oam.write_disabled = true;
                ppu.vram.read_disabled = true;
                ppu.vram.write_disabled = true;

                ppu.interrupt_mode = Some(PpuMode::Drawing);
                ppu.lcd.set_mode(PpuMode::Drawing);
                ppu.check_stat_interrupt(sink);

                ppu.line_penalty = ppu.render_line();
            }
            ModeState::HBlank => {
                ppu.oam.read_disabled = false;
                ppu.oam.write_disabled = false;
                ppu.vram.read_disabled = false;
                ppu.vram.write_disabled = false;

                ppu.interrupt_mode = Some(PpuMode::HBlank);
                ppu.lcd.set_mode(PpuMode::HBlank);
                ppu.check_stat_interrupt(sink);

                sink.on_hblank();
            }
            ModeState::VBlankStart => {
                ppu.lcd.set_lyc_flag(false);
            }
            ModeState::VBlank => {
                if ppu.lcd.ly != VBLANK_LINE {
                    ppu.check_stat_interrupt(sink);
                    return;
                }

                // The mode 2 source also fires at the start of line 144
                ppu.interrupt_mode = Some(PpuMode::OamScan);
                ppu.check_stat_interrupt(sink);

                ppu.interrupt_mode = Some(PpuMode::VBlank);
                ppu.lcd.set_mode(PpuMode::VBlank);
                ppu.check_stat_interrupt(sink);

                ppu.window_line = 0;
                sink.request_interrupt(InterruptType::VBlank);

                ppu.frames.swap();
                ppu.window_triggered = false;

                sink.on_vblank();
            }
        }
    }

    /// Successor state. Line transitions advance LY here.
    pub fn next(self, ppu: &mut Ppu) -> ModeState {
        match self {
            ModeState::GlitchedOamScan => ModeState::Drawing,
            ModeState::OamScan { row } if row + 1 >= OAM_ROWS => ModeState::OamScanToDrawing,
            ModeState::OamScan { row } => ModeState::OamScan { row: row + 1 },
            ModeState::OamScanToDrawing => ModeState::Drawing,
            ModeState::Drawing => ModeState::HBlank,
            ModeState::HBlank => {
                ppu.lcd.ly += 1;
                ppu.dots -= LINE_DOTS;

                if ppu.lcd.ly == VBLANK_LINE {
                    ModeState::VBlankStart
                } else {
                    ModeState::OamScan { row: 0 }
                }
            }
            ModeState::VBlankStart => ModeState::VBlank,
            ModeState::VBlank => {
                ppu.lcd.ly += 1;
                ppu.dots -= LINE_DOTS;

                if ppu.lcd.ly == LINES_PER_FRAME {
                    ppu.lcd.ly = 0;
                    ModeState::OamScan { row: 0 }
                } else {
                    ModeState::VBlankStart
                }
            }
        }
    }

    /// Length in dots, evaluated right after `enter`
    pub fn duration(self, ppu: &Ppu) -> i32 {
        match self {
            ModeState::GlitchedOamScan => OAM_SCAN_DOTS,
            ModeState::OamScan { .. } | ModeState::OamScanToDrawing | ModeState::VBlankStart => {
                ROW_DOTS
            }
            ModeState::Drawing => DRAWING_DOTS + ppu.line_penalty,
            // Dots at the exact boundary, independent of tick granularity
            ModeState::HBlank => LINE_DOTS - (ppu.dots + ppu.countdown),
            ModeState::VBlank => LINE_DOTS - ROW_DOTS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ModeState::GlitchedOamScan => "Glitch OamScan",
            ModeState::OamScan { .. } => "OamScan",
            ModeState::OamScanToDrawing => "OamScan -> Drawing",
            ModeState::Drawing => "Drawing",
            ModeState::HBlank => "HBlank",
            ModeState::VBlankStart => "VBlank Start",
            ModeState::VBlank => "VBlank",
        }
    }
}

impl fmt::Display for ModeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeState::OamScan { row } => write!(f, "{} (row {})", self.name(), row),
            _ => f.write_str(self.name()),
        }
    }
}
