use log::trace;

use crate::{
    bitmap::{self, BankId, FIRST_BACKED_ROW, Nibble, VideoBank, WINDOW_BASE, WINDOW_SIZE},
    framebuffer::Frame,
    hardware::Latch,
    palette::PaletteTable,
    registers::{BitmapRegisters, ControlLatches, WriteMode},
    snapshot::VideoSnapshot,
    sprites::{self, TileRenderer},
};

#[cfg(feature = "video-trace")]
macro_rules! video_trace {
    ($($arg:tt)*) => {
        log::trace!(target: "cloud9::video", $($arg)*);
    };
}
#[cfg(not(feature = "video-trace"))]
macro_rules! video_trace {
    ($($arg:tt)*) => {};
}

const REG_X: u8 = 0;
const REG_Y: u8 = 1;
const REG_PIXEL: u8 = 2;

const SPRITE_TRANSPARENT_PEN: u8 = 0;

/// The Cloud 9 bitmap video board.
///
/// Owns both packed video banks, palette, bitmap port registers, the control
/// latches and the working bitmap that mirrors what the banks look like
/// under the current palette.
pub struct Cloud9Video {
    banks: [VideoBank; 2],
    palette: PaletteTable,
    regs: BitmapRegisters,
    latches: ControlLatches,
    working: Frame,
    /// Working bitmap must be repainted before the next frame.
    dirty: bool,
    rebuilds: u64,
    frames: u64,
}

impl Cloud9Video {
    pub fn new() -> Self {
        Self {
            banks: [VideoBank::new(), VideoBank::new()],
            palette: PaletteTable::new(),
            regs: BitmapRegisters::default(),
            latches: ControlLatches::default(),
            working: Frame::new(),
            dirty: false,
            rebuilds: 0,
            frames: 0,
        }
    }

    /// Palette RAM write (`offset` 0x00-0x7F).
    pub fn set_palette_register(&mut self, offset: u8, data: u8) {
        self.palette.write(offset, data);
        video_trace!("palette {offset:02X} <- {data:02X}");
        self.dirty = true;
    }

    pub fn read_palette_register(&self, offset: u8) -> u8 {
        self.palette.read_raw(offset)
    }

    pub fn write_latch(&mut self, latch: Latch, value: u8) {
        video_trace!("latch {latch:?} <- {value:02X}");
        self.latches.write(latch, value);
    }

    pub fn read_latch(&self, latch: Latch) -> u8 {
        self.latches.read(latch)
    }

    /// Read one of the bitmap port registers (offset 0-2).
    pub fn read_register(&self, offset: u8) -> u8 {
        match offset & 0x03 {
            REG_X => self.regs.x,
            REG_Y => self.regs.y,
            REG_PIXEL => {
                let (x, y) = (self.regs.x, self.regs.y);
                if y < FIRST_BACKED_ROW {
                    trace!("bitmap read from unbacked row {y:02X} (x {x:02X})");
                    return 0;
                }
                let loc = bitmap::locate(x, y);
                self.banks[loc.bank.index()].read_nibble(loc.address, loc.nibble)
            }
            _ => 0xFF,
        }
    }

    /// Write one of the bitmap port registers (offset 0-2).
    ///
    /// Only the pixel register changes the bitmap; X and Y just move the
    /// cursor.
    pub fn write_register(&mut self, offset: u8, data: u8) {
        match offset & 0x03 {
            REG_X => self.regs.x = data,
            REG_Y => self.regs.y = data,
            REG_PIXEL => self.write_pixel(data),
            _ => {}
        }
    }

    fn write_pixel(&mut self, data: u8) {
        let (x, y) = (self.regs.x, self.regs.y);
        self.regs.pixel = data;
        let value = data & 0x0F;

        // The top rows have no RAM behind them but still reach the screen.
        if y >= FIRST_BACKED_ROW {
            let loc = bitmap::locate(x, y);
            self.banks[loc.bank.index()].write_nibble(loc.address, loc.nibble, value);
        }
        video_trace!("pixel ({x:02X},{y:02X}) <- {value:X}");

        let color = self.background_color(value);
        self.working.plot(x as usize, y as usize, color);

        if self.latches.x_increments() {
            self.regs.x = x.wrapping_add(1);
        }
        if self.latches.y_increments() {
            self.regs.y = y.wrapping_add(1);
        }
    }

    /// Direct window write (`offset` = host address - 0x600).
    pub fn write_direct(&mut self, offset: u16, data: u8) {
        let offset = offset as usize;
        if offset >= WINDOW_SIZE {
            return;
        }
        let mode = self.latches.write_mode();
        let address = offset + WINDOW_BASE;
        match mode {
            WriteMode::BothBanks => {
                self.banks[0].write(address, data);
                self.banks[1].write(address, data);
            }
            WriteMode::Bank1 => self.banks[1].write(address, data),
            WriteMode::Bank0 => self.banks[0].write(address, data),
        }
        video_trace!("direct {offset:04X} <- {data:02X} ({mode:?})");
        self.paint_direct(offset, data, mode);
    }

    /// Direct window read: the window is backed by bank 0.
    pub fn read_direct(&self, offset: u16) -> u8 {
        let offset = offset as usize;
        if offset >= WINDOW_SIZE {
            return 0xFF;
        }
        self.banks[0].read(offset + WINDOW_BASE)
    }

    /// Host-internal raw store into bank 1. The working bitmap is repainted
    /// on the next frame.
    pub fn write_bank1_direct(&mut self, offset: u16, data: u8) {
        let offset = offset as usize;
        if offset >= WINDOW_SIZE {
            return;
        }
        self.banks[1].write(offset + WINDOW_BASE, data);
        self.dirty = true;
    }

    pub fn read_bank1_direct(&self, offset: u16) -> u8 {
        let offset = offset as usize;
        if offset >= WINDOW_SIZE {
            return 0xFF;
        }
        self.banks[1].read(offset + WINDOW_BASE)
    }

    /// Paint the screen pixels a window byte covers in `mode`. Does not
    /// touch bank memory.
    fn paint_direct(&mut self, offset: usize, data: u8, mode: WriteMode) {
        let (x, y) = bitmap::direct_origin(offset);
        let lo = self.background_color(Nibble::Low.extract(data));
        let hi = self.background_color(Nibble::High.extract(data));
        match mode {
            WriteMode::BothBanks => {
                self.working.plot(x, y, lo);
                self.working.plot(x + 1, y, hi);
                self.working.plot(x + 2, y, lo);
                self.working.plot(x + 3, y, hi);
            }
            WriteMode::Bank1 => {
                self.working.plot(x + 2, y, lo);
                self.working.plot(x + 3, y, hi);
            }
            WriteMode::Bank0 => {
                self.working.plot(x, y, lo);
                self.working.plot(x + 1, y, hi);
            }
        }
    }

    fn background_color(&self, pen: u8) -> u32 {
        let index = self.latches.background_color_base() + (pen & 0x0F) as usize;
        self.palette.color(index).to_u32()
    }

    /// Repaint the working bitmap from both banks under the current palette.
    fn rebuild_working_bitmap(&mut self) {
        for offset in 0..WINDOW_SIZE {
            let address = offset + WINDOW_BASE;
            let b0 = self.banks[0].read(address);
            let b1 = self.banks[1].read(address);
            self.paint_direct(offset, b0, WriteMode::Bank0);
            self.paint_direct(offset, b1, WriteMode::Bank1);
        }
        self.rebuilds += 1;
        trace!("working bitmap rebuilt ({} total)", self.rebuilds);
    }

    /// Produce one video frame: background bitmap plus sprites.
    pub fn render_frame<R: TileRenderer + ?Sized>(
        &mut self,
        output: &mut Frame,
        sprite_ram: &[u8],
        gfx: &R,
    ) {
        if self.dirty {
            self.rebuild_working_bitmap();
            self.dirty = false;
        }

        output.copy_from(&self.working);

        let bank = self.latches.sprite_palette_bank();
        for sprite in sprites::decode_all(sprite_ram) {
            gfx.draw_tile(
                output,
                &self.palette,
                sprite.tile,
                bank,
                sprite.attributes.flip_x,
                sprite.attributes.flip_y,
                sprite.x,
                sprite.y,
                SPRITE_TRANSPARENT_PEN,
            );
        }
        self.frames += 1;
    }

    /// Number of full working-bitmap rebuilds so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Number of frames rendered since power on.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn needs_rebuild(&self) -> bool {
        self.dirty
    }

    pub fn registers(&self) -> BitmapRegisters {
        self.regs
    }

    pub fn latches(&self) -> ControlLatches {
        self.latches
    }

    pub fn palette(&self) -> &PaletteTable {
        &self.palette
    }

    pub fn bank(&self, bank: BankId) -> &VideoBank {
        &self.banks[bank.index()]
    }

    pub fn working_bitmap(&self) -> &Frame {
        &self.working
    }

    /// Capture every piece of authoritative state.
    pub fn snapshot(&self) -> VideoSnapshot {
        VideoSnapshot {
            vram: [
                self.banks[0].storage().to_vec(),
                self.banks[1].storage().to_vec(),
            ],
            palette_ram: self.palette.raw().to_vec(),
            palette_sources: self.palette.sources().to_vec(),
            regs: self.regs,
            latches: self.latches,
        }
    }

    /// Restore captured state. Short buffers leave the remaining bytes
    /// zeroed. The working bitmap is cleared to black and rebuilt on the
    /// next frame, so rows above the window come out black.
    pub fn restore(&mut self, snapshot: &VideoSnapshot) {
        for (bank, src) in self.banks.iter_mut().zip(snapshot.vram.iter()) {
            let mut storage = [0u8; bitmap::BANK_STORAGE_SIZE];
            let len = src.len().min(storage.len());
            storage[..len].copy_from_slice(&src[..len]);
            bank.load(&storage);
        }
        self.palette = PaletteTable::load(&snapshot.palette_ram, &snapshot.palette_sources);
        self.regs = snapshot.regs;
        self.latches = snapshot.latches;
        self.working.fill(0);
        self.dirty = true;
    }
}

impl Default for Cloud9Video {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprites::SpriteGfx;

    #[test]
    fn unbacked_row_read_returns_zero() {
        let mut video = Cloud9Video::new();
        video.write_register(REG_X, 0x10);
        video.write_register(REG_Y, 0x0B);
        video.write_register(REG_PIXEL, 0x0F);
        assert_eq!(video.read_register(REG_PIXEL), 0);
    }

    #[test]
    fn pixel_register_keeps_last_value() {
        let mut video = Cloud9Video::new();
        video.write_register(REG_Y, 0x40);
        video.write_register(REG_PIXEL, 0xA7);
        assert_eq!(video.registers().pixel, 0xA7);
        assert_eq!(video.read_register(REG_PIXEL), 0x07);
    }

    #[test]
    fn unused_register_reads_open_bus() {
        let video = Cloud9Video::new();
        assert_eq!(video.read_register(3), 0xFF);
    }

    #[test]
    fn rebuild_replays_bank_layout() {
        let mut video = Cloud9Video::new();
        video.write_direct(0, 0x21);
        video.write_latch(Latch::VramBank, 0x80);
        video.write_direct(0, 0x43);
        for pen in 0..5u8 {
            video.set_palette_register(pen, !(pen << 2));
        }
        let mut out = Frame::new();
        video.render_frame(&mut out, &[], &SpriteGfx::new());
        let expect = |pen: usize| video.palette().color(pen).to_u32();
        assert_eq!(out.pixel(0, 0x18), Some(expect(1)));
        assert_eq!(out.pixel(1, 0x18), Some(expect(2)));
        assert_eq!(out.pixel(2, 0x18), Some(expect(3)));
        assert_eq!(out.pixel(3, 0x18), Some(expect(4)));
    }

    #[test]
    fn write_outside_window_is_ignored() {
        let mut video = Cloud9Video::new();
        video.write_direct(WINDOW_SIZE as u16, 0xFF);
        assert_eq!(video.read_direct(WINDOW_SIZE as u16), 0xFF);
        assert!(video.bank(BankId::Bank0).storage().iter().all(|&b| b == 0));
    }
}
