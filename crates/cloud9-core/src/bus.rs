use log::trace;

use crate::{hardware::Region, video::Cloud9Video};

/// CPU-side view of the video board.
///
/// The host machine forwards every memory access here first; `None` /
/// `false` means the address belongs to some other device.
pub struct VideoBus {
    pub video: Cloud9Video,
}

impl VideoBus {
    pub fn new() -> Self {
        Self {
            video: Cloud9Video::new(),
        }
    }

    pub fn read_byte(&self, addr: u32) -> Option<u8> {
        let value = match Region::decode(addr)? {
            Region::BitmapRegs(reg) => self.video.read_register(reg),
            Region::VideoWindow(offset) => self.video.read_direct(offset),
            Region::Palette(offset) => self.video.read_palette_register(offset),
            Region::Latch(latch) => self.video.read_latch(latch),
            Region::Bank1Window(offset) => self.video.read_bank1_direct(offset),
        };
        Some(value)
    }

    pub fn write_byte(&mut self, addr: u32, val: u8) -> bool {
        let Some(region) = Region::decode(addr) else {
            return false;
        };
        match region {
            Region::BitmapRegs(reg) => self.video.write_register(reg, val),
            Region::VideoWindow(offset) => self.video.write_direct(offset, val),
            Region::Palette(offset) => self.video.set_palette_register(offset, val),
            Region::Latch(latch) => self.video.write_latch(latch, val),
            Region::Bank1Window(offset) => {
                trace!("host bank 1 store {addr:05X} <- {val:02X}");
                self.video.write_bank1_direct(offset, val);
            }
        }
        true
    }
}

impl Default for VideoBus {
    fn default() -> Self {
        Self::new()
    }
}
