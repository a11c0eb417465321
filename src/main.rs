//! Game Boy PPU Viewer - Entry Point
//!
//! Loads a ROM header, puts the PPU in its post-boot state and shows the
//! output in an SDL2 window.

use gbppu::cart::RomImage;
use gbppu::ppu::{Model, Ppu, PpuConfig};
use gbppu::ui::Ui;
use std::env;
use std::process;

fn run(rom_path: &str, model: Model) -> Result<(), String> {
    let rom = RomImage::load(rom_path).map_err(|e| format!("Failed to load ROM: {}", e))?;

    println!("Loaded ROM: {}", rom.header.title);
    if !RomImage::validate_checksum(&rom.rom) {
        eprintln!("Warning: header checksum mismatch");
    }

    let config = PpuConfig::for_cartridge(model, &rom);
    let mut ppu = Ppu::new(config).map_err(|e| e.to_string())?;

    if model.is_cgb() {
        let checksum = ppu.skip_cgb_boot(&rom);
        println!("Title checksum: 0x{:02X}", checksum);
        if config.dmg_compatibility {
            println!("Running in DMG compatibility mode");
        }
    } else {
        ppu.skip_dmg_boot();
    }

    let mut ui = Ui::new(&format!("gbppu - {}", rom.header.title))?;
    ui.run(&mut ppu)
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <rom_file> [--cgb]", args[0]);
        process::exit(1);
    }

    let model = if args.iter().skip(2).any(|a| a == "--cgb") {
        Model::Cgb
    } else {
        Model::Dmg
    };

    if let Err(e) = run(&args[1], model) {
        eprintln!("Viewer error: {}", e);
        process::exit(1);
    }
}
