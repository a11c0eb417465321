//! Scan-line renderer
//!
//! Draws one full line into the back buffer when the PPU enters mode 3 and
//! reports how many extra dots the line costs on top of the base 172.
//!
//! Background and window are fetched one 8-pixel tile row at a time. Objects
//! are composited per column in OAM-scan order: the first object with an opaque
//! pixel at a column decides that column.

use super::Ppu;
use crate::common::{Word, SCREEN_WIDTH};
use crate::ppu::oam::{Object, OBJS_PER_LINE, OBJ_X_OFFSET, OBJ_Y_OFFSET};
use crate::ppu::palette::{CgbPalette, DmgPalette, Palette};
use crate::ppu::vram::{bg_tile_address, TileAttributes, TILE_SIZE, VRAM_START};

/// Base mode 3 length
pub const DRAWING_DOTS: i32 = 172;
/// Dots lost while the fetcher restarts on the window
const WINDOW_PENALTY: i32 = 6;
/// Dots lost fetching each object tile
const OBJ_FETCH_PENALTY: i32 = 6;
/// Objects at or beyond this X are never fetched
const OBJ_X_LIMIT: u8 = 168;
/// Tiles an object's leftmost pixel can fall in (X up to 167 plus SCX & 7)
const PENALTY_TILES: usize = ((167 + 7) >> 3) + 1;

/// An object selected for this line with its decoded pixel row
type ObjectRow = (Object, [u8; 8]);

impl Ppu {
    /// Render line LY and return the penalty dots of mode 3
    pub(super) fn render_line(&mut self) -> i32 {
        let ly = self.lcd.ly;
        let scx = self.lcd.scx;
        let line_y = self.lcd.scy.wrapping_add(ly);
        let control = *self.lcd.control();
        let native_cgb = self.native_cgb();

        // On CGB LCDC.0 is the master priority bit and BG always draws
        let draw_bg = control.bg_window_enabled || native_cgb;
        let rows = self.object_rows(ly, control.obj_height());

        let mut penalty = (scx & 0x07) as i32;
        let mut map = control.bg_tile_map;
        let mut tile_x = scx >> 3;
        let mut tile_y = line_y >> 3;
        let mut row = line_y & 0x07;
        let mut skip = (scx & 0x07) as usize;
        let mut window_x = if control.window_enabled && self.window_triggered {
            self.lcd.wx as i32 - 7
        } else {
            SCREEN_WIDTH as i32
        };

        let mut line = *self.frames.line_mut(ly);
        let mut x = 0;

        'line: while x < SCREEN_WIDTH {
            let map_address = map + (tile_y as Word & 0x1F) * 32 + (tile_x as Word & 0x1F);
            tile_x = tile_x.wrapping_add(1);
            let (pixels, attrs) = self.bg_tile_row(map_address, row, control.unsigned_tile_data);

            for &bg_id in &pixels[skip..] {
                if x >= SCREEN_WIDTH {
                    break 'line;
                }

                let mut bg_index = 0;
                if draw_bg {
                    if x as i32 >= window_x {
                        // Restart the fetcher on the window map
                        map = control.window_tile_map;
                        tile_x = 0;
                        tile_y = self.window_line >> 3;
                        row = self.window_line & 0x07;
                        self.window_line = self.window_line.wrapping_add(1);
                        penalty += WINDOW_PENALTY;
                        window_x = SCREEN_WIDTH as i32;
                        skip = 0;
                        continue 'line;
                    }

                    bg_index = bg_id;
                    line[x] = self.bg_color(bg_id, attrs);
                }

                if control.obj_enabled {
                    if let Some(color) =
                        self.object_pixel(&rows, x, bg_index, attrs, control.bg_window_enabled)
                    {
                        line[x] = color;
                    }
                }

                x += 1;
            }

            skip = 0;
        }

        *self.frames.line_mut(ly) = line;
        penalty + self.object_penalty(scx)
    }

    /// Pixel row of the BG/window tile referenced by a map entry
    fn bg_tile_row(&self, map_address: Word, row: u8, unsigned: bool) -> ([u8; 8], TileAttributes) {
        let (tile, attrs) = self.vram.map_entry(map_address);
        // Attributes only exist for CGB games
        let attrs = if self.native_cgb() { attrs } else { TileAttributes::default() };

        let row = if attrs.y_flip() { 7 - row } else { row };
        let pixels = self.vram.tile_row(
            attrs.vram_bank(),
            bg_tile_address(tile, unsigned),
            row,
            attrs.x_flip(),
        );
        (pixels, attrs)
    }

    /// Decode the current row of every object found by the OAM scan
    fn object_rows(&self, ly: u8, height: u8) -> Vec<ObjectRow> {
        let mut rows = Vec::with_capacity(OBJS_PER_LINE);
        for object in &self.objects {
            let mut row = ly.wrapping_add(OBJ_Y_OFFSET).wrapping_sub(object.y) & (height - 1);
            if object.attrs.y_flip() {
                row = height - 1 - row;
            }

            let tile = if height == 16 { object.tile & 0xFE } else { object.tile };
            // Second half of a tall object lives in the next tile
            let address = VRAM_START + (tile as Word + (row as Word >> 3)) * TILE_SIZE as Word;
            let bank = if self.native_cgb() { object.attrs.vram_bank() } else { 0 };

            let pixels = self.vram.tile_row(bank, address, row, object.attrs.x_flip());
            rows.push((*object, pixels));
        }
        rows
    }

    /// Color of the winning object at column `x`, if it is drawn over the BG
    fn object_pixel(
        &self,
        rows: &[ObjectRow],
        x: usize,
        bg_index: u8,
        bg_attrs: TileAttributes,
        master_priority: bool,
    ) -> Option<u16> {
        let (object, pixels) = rows.iter().find(|(object, pixels)| {
            object.covers(x as u8)
                && pixels[x + OBJ_X_OFFSET as usize - object.x as usize] != 0
        })?;
        let id = pixels[x + OBJ_X_OFFSET as usize - object.x as usize];

        let visible = if self.native_cgb() {
            bg_index == 0
                || !master_priority
                || (!bg_attrs.bg_priority() && !object.attrs.bg_priority())
        } else {
            bg_index == 0 || !object.attrs.bg_priority()
        };

        visible.then(|| self.obj_color(id, object))
    }

    fn bg_color(&self, id: u8, attrs: TileAttributes) -> u16 {
        let bgp = DmgPalette(self.lcd.bgp);
        if !self.config.model.is_cgb() {
            bgp.color(id)
        } else if self.config.dmg_compatibility {
            bgp.to_cgb(&self.bg_palette[0..8]).color(id)
        } else {
            CgbPalette::from_ram(&self.bg_palette, attrs.cgb_palette()).color(id)
        }
    }

    fn obj_color(&self, id: u8, object: &Object) -> u16 {
        let number = object.attrs.dmg_palette();
        let obp = DmgPalette(self.lcd.obp[number]);
        if !self.config.model.is_cgb() {
            obp.color(id)
        } else if self.config.dmg_compatibility {
            obp.to_cgb(&self.obj_palette[8 * number..8 * number + 8]).color(id)
        } else {
            CgbPalette::from_ram(&self.obj_palette, object.attrs.cgb_palette()).color(id)
        }
    }

    /// Dots lost to object fetches, rounded down to a whole M-cycle
    fn object_penalty(&self, scx: u8) -> i32 {
        let mut tiles_seen = [false; PENALTY_TILES];
        let mut penalty = 0;

        for object in self.objects.iter().filter(|o| o.x < OBJ_X_LIMIT) {
            let obj_x = object.x + (scx & 0x07);
            let tile = (obj_x >> 3) as usize;

            // Waiting for the BG fetch to finish, once per tile
            if !tiles_seen[tile] {
                tiles_seen[tile] = true;
                penalty += (5 - (obj_x & 0x07) as i32).max(0);
            }
            penalty += OBJ_FETCH_PENALTY;
        }

        penalty & !3
    }
}
