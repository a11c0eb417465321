//! SDL2 User Interface
//!
//! A minimal viewer: runs the PPU one frame of dots per host frame and shows
//! the latest completed frame. Without a CPU nothing is drawn beyond what the
//! boot state leaves in VRAM (the logo after a DMG boot skip).

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;
use std::time::{Duration, Instant};

use log::info;

use crate::common::{FRAME_DOTS, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::interrupts::{InterruptFlags, InterruptType};
use crate::ppu::frame::to_argb;
use crate::ppu::Ppu;

/// Scale factor for the window
pub const SCALE: u32 = 4;

/// SDL2 UI wrapper
pub struct Ui {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    texture_creator: TextureCreator<WindowContext>,
}

impl Ui {
    /// Create a new UI instance
    pub fn new(title: &str) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(
                title,
                SCREEN_WIDTH as u32 * SCALE,
                SCREEN_HEIGHT as u32 * SCALE,
            )
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window
            .into_canvas()
            .software()
            .build()
            .map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        Ok(Self {
            canvas,
            event_pump,
            texture_creator,
        })
    }

    /// Run the PPU until the window is closed
    pub fn run(&mut self, ppu: &mut Ppu) -> Result<(), String> {
        let mut texture = self
            .texture_creator
            .create_texture_streaming(
                PixelFormatEnum::ARGB8888,
                SCREEN_WIDTH as u32,
                SCREEN_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        let frame_duration = Duration::from_secs_f64(1.0 / 60.0);
        let cgb = ppu.config().model.is_cgb();
        let mut flags = InterruptFlags::new();
        let mut pixels = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 4];
        let mut frames: u64 = 0;

        'running: loop {
            let frame_start = Instant::now();

            for event in self.event_pump.poll_iter() {
                match event {
                    Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => break 'running,
                    _ => {}
                }
            }

            ppu.tick(FRAME_DOTS, &mut flags);
            if flags.pending(InterruptType::VBlank) {
                flags.clear(InterruptType::VBlank);
                frames += 1;
            }
            flags.clear(InterruptType::LcdStat);

            let (front, _) = ppu.frame();
            for (i, pixel) in front.iter().flatten().enumerate() {
                pixels[i * 4..i * 4 + 4].copy_from_slice(&to_argb(*pixel, cgb).to_ne_bytes());
            }
            texture
                .update(None, &pixels, SCREEN_WIDTH * 4)
                .map_err(|e| e.to_string())?;

            self.canvas.clear();
            self.canvas.copy(&texture, None, None)?;
            self.canvas.present();

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            }
        }

        info!("Viewer closed after {} frames", frames);
        Ok(())
    }
}
