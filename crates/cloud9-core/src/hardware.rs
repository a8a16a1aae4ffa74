// Bitmap port: X, Y and pixel data registers.
pub const BITMAP_REGS_START: u32 = 0x0000;
pub const BITMAP_REGS_END: u32 = 0x0002;

// Direct-mapped bitmap window (bank selected by the latches).
pub const VIDEO_WINDOW_START: u32 = 0x0600;
pub const VIDEO_WINDOW_END: u32 = 0x3FFF;

// Palette RAM; bit 6 of the offset carries the low blue bit.
pub const PALETTE_START: u32 = 0x5500;
pub const PALETTE_END: u32 = 0x557F;

// Control latches. Only bit 7 of each is significant.
pub const AUTO_INC_X: u32 = 0x5580;
pub const AUTO_INC_Y: u32 = 0x5581;
pub const BOTH_BANKS: u32 = 0x5584;
pub const VRAM_BANK: u32 = 0x5586;
pub const COLOR_BANK: u32 = 0x5587;

// Host-internal view of bank 1, laid out like the direct window.
pub const BANK1_WINDOW_START: u32 = 0x1_0600;
pub const BANK1_WINDOW_END: u32 = 0x1_3FFF;

/// Control latch selected by a write to the 0x558x block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Latch {
    AutoIncX,
    AutoIncY,
    BothBanks,
    VramBank,
    ColorBank,
}

/// A decoded video-board address.
///
/// Offsets are relative to the start of their region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    BitmapRegs(u8),
    VideoWindow(u16),
    Palette(u8),
    Latch(Latch),
    Bank1Window(u16),
}

impl Region {
    /// Decode a host address. Returns `None` for addresses the video board
    /// does not respond to.
    pub const fn decode(addr: u32) -> Option<Self> {
        match addr {
            BITMAP_REGS_START..=BITMAP_REGS_END => {
                Some(Region::BitmapRegs((addr - BITMAP_REGS_START) as u8))
            }
            VIDEO_WINDOW_START..=VIDEO_WINDOW_END => {
                Some(Region::VideoWindow((addr - VIDEO_WINDOW_START) as u16))
            }
            PALETTE_START..=PALETTE_END => Some(Region::Palette((addr - PALETTE_START) as u8)),
            AUTO_INC_X => Some(Region::Latch(Latch::AutoIncX)),
            AUTO_INC_Y => Some(Region::Latch(Latch::AutoIncY)),
            BOTH_BANKS => Some(Region::Latch(Latch::BothBanks)),
            VRAM_BANK => Some(Region::Latch(Latch::VramBank)),
            COLOR_BANK => Some(Region::Latch(Latch::ColorBank)),
            BANK1_WINDOW_START..=BANK1_WINDOW_END => {
                Some(Region::Bank1Window((addr - BANK1_WINDOW_START) as u16))
            }
            _ => None,
        }
    }
}
