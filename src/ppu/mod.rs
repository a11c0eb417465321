//! PPU Module
//!
//! This module implements the Pixel Processing Unit (PPU) of the Game Boy and
//! Game Boy Color: the per-dot mode state machine, the scan-line renderer,
//! VRAM/OAM with their access restrictions, and the DMG OAM corruption bug.
//!
//! The PPU is driven by [`Ppu::tick`] with the number of elapsed dots and
//! accessed through [`Ppu::read`]/[`Ppu::write`]. Interrupt requests leave
//! through the [`InterruptSink`] passed to each call.

pub mod boot;
pub mod frame;
pub mod io;
pub mod modes;
pub mod oam;
pub mod palette;
pub mod pipeline;
pub mod vram;

use log::{debug, trace};

use crate::cart::RomImage;
use crate::common::{between, Byte, Word};
use crate::error::PpuError;
use crate::interrupts::{InterruptSink, InterruptType};
use crate::lcd::{Lcd, PpuMode};

use frame::{Frame, FrameBuffers, CGB_BLANK, DMG_BLANK};
use modes::ModeState;
use oam::{Object, Oam, OAM_START, OBJS_PER_LINE};
use vram::Vram;

/// Last address of the OAM bus range (unusable area included)
const OAM_RANGE_END: Word = 0xFEFF;

/// Hardware variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Model {
    /// Monochrome Game Boy
    #[default]
    Dmg,
    /// Game Boy Color
    Cgb,
}

impl Model {
    pub fn is_cgb(&self) -> bool {
        *self == Model::Cgb
    }
}

/// PPU construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PpuConfig {
    pub model: Model,
    /// CGB running a DMG-only cartridge
    pub dmg_compatibility: bool,
}

impl PpuConfig {
    /// Configuration for running `rom` on `model`
    pub fn for_cartridge(model: Model, rom: &RomImage) -> Self {
        Self {
            model,
            dmg_compatibility: model.is_cgb() && !rom.header.supports_cgb(),
        }
    }

    fn validate(&self) -> Result<(), PpuError> {
        if self.dmg_compatibility && !self.model.is_cgb() {
            return Err(PpuError::InvalidConfig(
                "DMG compatibility mode requires a CGB model",
            ));
        }
        Ok(())
    }
}

/// Pixel Processing Unit
#[derive(Debug, Clone)]
pub struct Ppu {
    config: PpuConfig,
    /// Register bank
    pub lcd: Lcd,
    /// Video RAM (two banks on CGB)
    pub vram: Vram,
    /// Object Attribute Memory
    pub oam: Oam,
    /// Objects found by the last OAM scan, in OAM order
    objects: Vec<Object>,
    frames: FrameBuffers,

    /// Internal state and dots left in it
    state: ModeState,
    countdown: i32,
    /// Length the current state was entered with
    state_duration: i32,
    /// Dots elapsed on the current line
    dots: i32,
    /// Penalty of the line being drawn
    line_penalty: i32,
    /// Mode feeding the STAT interrupt line (None on the glitched first line)
    interrupt_mode: Option<PpuMode>,
    /// Level of the shared STAT interrupt line
    stat_line: bool,
    /// LCDC bit 7 as seen by the state machine
    active: bool,

    /// CGB palette index registers (BGPI/OBPI)
    bgpi: Byte,
    obpi: Byte,
    /// CGB palette RAM, 8 palettes of 4 colors each
    bg_palette: [Byte; 64],
    obj_palette: [Byte; 64],

    /// Window internal line counter
    window_line: u8,
    /// Set once WY matched LY this frame
    window_triggered: bool,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::with_model(PpuConfig::default())
    }
}

impl Ppu {
    /// Create a new PPU with the LCD off
    pub fn new(config: PpuConfig) -> Result<Self, PpuError> {
        config.validate()?;
        Ok(Self::with_model(config))
    }

    fn with_model(config: PpuConfig) -> Self {
        let blank = if config.model.is_cgb() { CGB_BLANK } else { DMG_BLANK };

        Self {
            config,
            lcd: Lcd::new(),
            vram: Vram::new(),
            oam: Oam::new(),
            objects: Vec::with_capacity(OBJS_PER_LINE),
            frames: FrameBuffers::new(blank),
            state: ModeState::HBlank,
            countdown: 0,
            state_duration: 0,
            dots: 0,
            line_penalty: 0,
            interrupt_mode: Some(PpuMode::HBlank),
            stat_line: false,
            active: false,
            bgpi: 0,
            obpi: 0,
            bg_palette: [0; 64],
            obj_palette: [0; 64],
            window_line: 0,
            window_triggered: false,
        }
    }

    /// Advance by `ticks` dots
    pub fn tick(&mut self, ticks: i32, sink: &mut dyn InterruptSink) {
        if !self.active {
            return;
        }

        if let Some((race, row)) = self.oam.take_race() {
            trace!("PPU: OAM corruption ({:?}) at row {}", race, row);
            self.oam.corrupt(race, row);
        }

        self.countdown -= ticks;
        self.dots += ticks;

        while self.countdown <= 0 {
            let next = self.state.next(self);
            self.set_state(next, sink);
        }
    }

    fn set_state(&mut self, state: ModeState, sink: &mut dyn InterruptSink) {
        self.state = state;
        state.enter(self, sink);

        self.state_duration = state.duration(self);
        self.countdown += self.state_duration;
    }

    /// Recompute the STAT interrupt line and request on a rising edge
    fn check_stat_interrupt(&mut self, sink: &mut dyn InterruptSink) {
        if !self.active {
            return;
        }

        let line = self.lcd.stat_line(self.interrupt_mode);
        if line && !self.stat_line {
            sink.request_interrupt(InterruptType::LcdStat);
        }
        self.stat_line = line;
    }

    /// LCDC bit 7 rising edge
    fn enable(&mut self, sink: &mut dyn InterruptSink) {
        if self.active {
            return;
        }
        debug!("PPU: LCD on");

        self.active = true;
        self.dots = 0;
        self.countdown = 0;
        self.objects.clear();

        self.set_state(ModeState::GlitchedOamScan, sink);
        self.check_stat_interrupt(sink);
    }

    /// LCDC bit 7 falling edge
    fn disable(&mut self) {
        if !self.active {
            return;
        }
        debug!("PPU: LCD off");

        self.active = false;
        self.lcd.set_mode(PpuMode::HBlank);
        self.lcd.ly = 0;
        self.dots = 0;
        self.countdown = 0;
        self.state_duration = 0;

        self.oam.read_disabled = false;
        self.oam.write_disabled = false;
        self.vram.read_disabled = false;
        self.vram.write_disabled = false;
        // A race pending from the last scan dies with the LCD
        let _ = self.oam.take_race();
    }

    /// Report a CPU access to the OAM range. Besides reads and writes, the
    /// CPU reports 16-bit increments/decrements of a register pointing there
    /// as writes.
    pub fn glitched_oam_access(&mut self, address: Word, read: bool) {
        // Fixed on the CGB
        if self.config.model.is_cgb() || !self.active {
            return;
        }
        if !between(address, OAM_START, OAM_RANGE_END) {
            return;
        }

        if let ModeState::OamScan { row } = self.state {
            if row >= 1 {
                self.oam.flag_race(row, read);
            }
        }
    }

    /// Native CGB rendering (attributes, color palettes, master priority)
    fn native_cgb(&self) -> bool {
        self.config.model.is_cgb() && !self.config.dmg_compatibility
    }

    // ========== Inspection ==========

    pub fn config(&self) -> &PpuConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mode reported in STAT
    pub fn mode(&self) -> PpuMode {
        self.lcd.mode()
    }

    pub fn ly(&self) -> Byte {
        self.lcd.ly
    }

    /// Internal state, `None` while the LCD is off
    pub fn state(&self) -> Option<ModeState> {
        self.active.then_some(self.state)
    }

    /// Dots left in the current state
    pub fn countdown(&self) -> i32 {
        self.countdown
    }

    /// Length the current state was entered with
    pub fn state_duration(&self) -> i32 {
        self.state_duration
    }

    pub fn window_line(&self) -> u8 {
        self.window_line
    }

    /// Objects selected by the last OAM scan
    pub fn objects_on_line(&self) -> &[Object] {
        &self.objects
    }

    /// Latest completed frame and the one before it
    pub fn frame(&self) -> (&Frame, &Frame) {
        self.frames.frame()
    }
}
