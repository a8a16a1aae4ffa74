#![allow(dead_code)]

use cloud9_core::{
    bitmap::{BankId, VideoBank},
    framebuffer::Frame,
    sprites::{SpriteGfx, TILE_PIXELS, TILE_SIZE},
    video::Cloud9Video,
};
use once_cell::sync::Lazy;

/// Tile 0 is fully transparent, tile 1 is solid pen 1 and tile 2 has
/// pen = column (transparent left edge).
pub static TEST_GFX: Lazy<SpriteGfx> = Lazy::new(|| {
    let blank = [0u8; TILE_PIXELS];
    let solid = [1u8; TILE_PIXELS];
    let columns: [u8; TILE_PIXELS] = std::array::from_fn(|i| (i % TILE_SIZE) as u8);
    SpriteGfx::from_tiles(vec![blank, solid, columns])
});

/// Place sprite `index` in zeroed sprite RAM.
pub fn place_sprite(ram: &mut [u8; 0x80], index: usize, tile: u8, attr: u8, x: u8, raw_y: u8) {
    ram[index] = raw_y;
    ram[0x20 + index] = tile;
    ram[0x40 + index] = attr;
    ram[0x60 + index] = x;
}

pub fn bank_checksum(bank: &VideoBank) -> u64 {
    bank.storage()
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &b)| acc.wrapping_mul(31).wrapping_add(b as u64 ^ i as u64))
}

pub fn checksums(video: &Cloud9Video) -> (u64, u64) {
    (
        bank_checksum(video.bank(BankId::Bank0)),
        bank_checksum(video.bank(BankId::Bank1)),
    )
}

pub fn render(video: &mut Cloud9Video) -> Frame {
    let mut out = Frame::new();
    video.render_frame(&mut out, &[], &SpriteGfx::new());
    out
}
