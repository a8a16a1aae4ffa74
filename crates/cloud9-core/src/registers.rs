use crate::hardware::Latch;

const LATCH_BIT: u8 = 0x80;
const COLOR_BANK_OFFSET: usize = 0x20;

/// The X/Y/pixel registers behind the indexed bitmap port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitmapRegisters {
    pub x: u8,
    pub y: u8,
    /// Last value written to the pixel register.
    pub pixel: u8,
}

/// Raw control latch bytes. Only bit 7 of each is wired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlLatches {
    pub auto_inc_x: u8,
    pub auto_inc_y: u8,
    pub both_banks: u8,
    pub vram_bank: u8,
    pub color_bank: u8,
}

impl Default for ControlLatches {
    fn default() -> Self {
        // Power on with auto-increment off and bank 0 selected.
        Self {
            auto_inc_x: LATCH_BIT,
            auto_inc_y: LATCH_BIT,
            both_banks: 0,
            vram_bank: 0,
            color_bank: 0,
        }
    }
}

impl ControlLatches {
    pub fn write(&mut self, latch: Latch, value: u8) {
        *self.slot(latch) = value;
    }

    pub fn read(&self, latch: Latch) -> u8 {
        match latch {
            Latch::AutoIncX => self.auto_inc_x,
            Latch::AutoIncY => self.auto_inc_y,
            Latch::BothBanks => self.both_banks,
            Latch::VramBank => self.vram_bank,
            Latch::ColorBank => self.color_bank,
        }
    }

    fn slot(&mut self, latch: Latch) -> &mut u8 {
        match latch {
            Latch::AutoIncX => &mut self.auto_inc_x,
            Latch::AutoIncY => &mut self.auto_inc_y,
            Latch::BothBanks => &mut self.both_banks,
            Latch::VramBank => &mut self.vram_bank,
            Latch::ColorBank => &mut self.color_bank,
        }
    }

    // Auto-increment latches are active low.
    pub const fn x_increments(&self) -> bool {
        self.auto_inc_x < LATCH_BIT
    }

    pub const fn y_increments(&self) -> bool {
        self.auto_inc_y < LATCH_BIT
    }

    pub const fn both_banks(&self) -> bool {
        self.both_banks & LATCH_BIT != 0
    }

    pub const fn bank1_selected(&self) -> bool {
        self.vram_bank & LATCH_BIT != 0
    }

    pub const fn color_bank(&self) -> bool {
        self.color_bank & LATCH_BIT != 0
    }

    /// Palette index of background pen 0.
    pub const fn background_color_base(&self) -> usize {
        if self.color_bank() {
            COLOR_BANK_OFFSET
        } else {
            0
        }
    }

    /// 16-colour palette bank used by sprites: 1, or 3 with the colour bank.
    pub const fn sprite_palette_bank(&self) -> usize {
        1 + if self.color_bank() { 2 } else { 0 }
    }

    /// Which bank(s) a direct window write targets.
    pub const fn write_mode(&self) -> WriteMode {
        if self.both_banks() {
            WriteMode::BothBanks
        } else if self.bank1_selected() {
            WriteMode::Bank1
        } else {
            WriteMode::Bank0
        }
    }
}

/// Bank routing for the direct window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    Bank0,
    Bank1,
    BothBanks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_increment_is_active_low() {
        let mut latches = ControlLatches::default();
        assert!(!latches.x_increments());
        latches.write(Latch::AutoIncX, 0x7F);
        assert!(latches.x_increments());
        latches.write(Latch::AutoIncX, 0x80);
        assert!(!latches.x_increments());
        latches.write(Latch::AutoIncY, 0x00);
        assert!(latches.y_increments());
    }

    #[test]
    fn both_banks_overrides_bank_select() {
        let mut latches = ControlLatches::default();
        assert_eq!(latches.write_mode(), WriteMode::Bank0);
        latches.write(Latch::VramBank, 0x80);
        assert_eq!(latches.write_mode(), WriteMode::Bank1);
        latches.write(Latch::BothBanks, 0xFF);
        assert_eq!(latches.write_mode(), WriteMode::BothBanks);
        latches.write(Latch::BothBanks, 0x7F);
        assert_eq!(latches.write_mode(), WriteMode::Bank1);
    }

    #[test]
    fn color_bank_shifts_background_and_sprites_differently() {
        let mut latches = ControlLatches::default();
        assert_eq!(latches.background_color_base(), 0);
        assert_eq!(latches.sprite_palette_bank(), 1);
        latches.write(Latch::ColorBank, 0x80);
        assert_eq!(latches.background_color_base(), 0x20);
        assert_eq!(latches.sprite_palette_bank(), 3);
        assert_eq!(latches.read(Latch::ColorBank), 0x80);
    }
}
