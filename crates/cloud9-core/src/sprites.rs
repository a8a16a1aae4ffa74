use crate::framebuffer::Frame;
use crate::palette::PaletteTable;

pub const SPRITE_COUNT: usize = 20;
pub const SPRITE_RAM_SIZE: usize = 0x80;

// Sprite RAM layout: one byte per sprite in each table.
const Y_TABLE: usize = 0x00;
const TILE_TABLE: usize = 0x20;
const ATTR_TABLE: usize = 0x40;
const X_TABLE: usize = 0x60;

// Sprite Y is stored counting up from the bottom of the screen.
const Y_ORIGIN: i32 = 240;

pub const TILE_SIZE: usize = 16;
pub const TILE_PIXELS: usize = TILE_SIZE * TILE_SIZE;
/// Packed 4bpp tile length.
pub const TILE_BYTES: usize = TILE_PIXELS / 2;

const COLORS_PER_BANK: usize = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpriteAttributes {
    pub flip_x: bool,
    pub flip_y: bool,
    pub blank_right: bool,
    pub blank_left: bool,
}

impl SpriteAttributes {
    pub const fn from_byte(attr: u8) -> Self {
        Self {
            flip_x: attr & 0x80 != 0,
            flip_y: attr & 0x40 != 0,
            blank_right: attr & 0x20 != 0,
            blank_left: attr & 0x10 != 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteDescriptor {
    pub tile: u8,
    pub attributes: SpriteAttributes,
    pub x: i32,
    pub y: i32,
}

impl SpriteDescriptor {
    /// Decode sprite `index` from sprite RAM. Bytes missing from a short
    /// slice read as zero.
    pub fn decode(sprite_ram: &[u8], index: usize) -> Self {
        let byte = |table: usize| sprite_ram.get(table + index).copied().unwrap_or(0);
        Self {
            tile: byte(TILE_TABLE),
            attributes: SpriteAttributes::from_byte(byte(ATTR_TABLE)),
            x: byte(X_TABLE) as i32,
            y: Y_ORIGIN - byte(Y_TABLE) as i32,
        }
    }
}

/// All sprites of a frame, in draw order.
pub fn decode_all(sprite_ram: &[u8]) -> [SpriteDescriptor; SPRITE_COUNT] {
    std::array::from_fn(|i| SpriteDescriptor::decode(sprite_ram, i))
}

/// Draws one gfx tile onto a raster.
pub trait TileRenderer {
    /// Draw `tile` with its top-left corner at (x, y) using 16-colour
    /// palette bank `palette_bank`. Pixels whose pen equals
    /// `transparent_pen` are skipped.
    #[allow(clippy::too_many_arguments)]
    fn draw_tile(
        &self,
        output: &mut Frame,
        palette: &PaletteTable,
        tile: u8,
        palette_bank: usize,
        flip_x: bool,
        flip_y: bool,
        x: i32,
        y: i32,
        transparent_pen: u8,
    );
}

/// Decoded 16x16 sprite tiles, one pen (0-15) per pixel.
#[derive(Clone, Default)]
pub struct SpriteGfx {
    tiles: Vec<[u8; TILE_PIXELS]>,
}

impl SpriteGfx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tiles(tiles: Vec<[u8; TILE_PIXELS]>) -> Self {
        Self { tiles }
    }

    /// Unpack 4bpp tile data: 128 bytes per tile, row-major, low nibble is
    /// the left pixel. A trailing partial tile is dropped.
    pub fn from_packed(data: &[u8]) -> Self {
        let tiles = data
            .chunks_exact(TILE_BYTES)
            .map(|chunk| {
                let mut pens = [0u8; TILE_PIXELS];
                for (i, &byte) in chunk.iter().enumerate() {
                    pens[i * 2] = byte & 0x0F;
                    pens[i * 2 + 1] = byte >> 4;
                }
                pens
            })
            .collect();
        Self { tiles }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, index: usize) -> Option<&[u8; TILE_PIXELS]> {
        if self.tiles.is_empty() {
            return None;
        }
        // Tile numbers wrap around the loaded set like a partially
        // populated gfx region.
        self.tiles.get(index % self.tiles.len())
    }
}

impl TileRenderer for SpriteGfx {
    fn draw_tile(
        &self,
        output: &mut Frame,
        palette: &PaletteTable,
        tile: u8,
        palette_bank: usize,
        flip_x: bool,
        flip_y: bool,
        x: i32,
        y: i32,
        transparent_pen: u8,
    ) {
        let Some(pens) = self.tile(tile as usize) else {
            return;
        };
        let base = palette_bank * COLORS_PER_BANK;
        for row in 0..TILE_SIZE {
            let src_row = if flip_y { TILE_SIZE - 1 - row } else { row };
            let sy = y + row as i32;
            if !(0..output.height() as i32).contains(&sy) {
                continue;
            }
            for col in 0..TILE_SIZE {
                let src_col = if flip_x { TILE_SIZE - 1 - col } else { col };
                let pen = pens[src_row * TILE_SIZE + src_col];
                if pen == transparent_pen {
                    continue;
                }
                let sx = x + col as i32;
                if !(0..output.width() as i32).contains(&sx) {
                    continue;
                }
                let color = palette.color(base + pen as usize);
                output.plot(sx as usize, sy as usize, color.to_u32());
            }
        }
    }
}
