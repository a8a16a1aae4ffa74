//! The two packed video banks.
//!
//! Each bank stores one 4-bit pixel per nibble, low nibble first. Storage is
//! indexed by *bitmap address* `(y << 6) | (x >> 2)`; the CPU's direct
//! window starts at bitmap address 0x600, so window offset `o` lands at
//! `o + 0x600`. Within a 4-pixel column group, pixels 0 and 1 live in bank 0
//! and pixels 2 and 3 in bank 1.

pub const BANK_STORAGE_SIZE: usize = 0x4000;
pub const WINDOW_BASE: usize = 0x0600;
pub const WINDOW_SIZE: usize = BANK_STORAGE_SIZE - WINDOW_BASE;

/// Rows above this are not backed by video RAM.
pub const FIRST_BACKED_ROW: u8 = 0x0C;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BankId {
    Bank0,
    Bank1,
}

impl BankId {
    pub const fn index(self) -> usize {
        match self {
            BankId::Bank0 => 0,
            BankId::Bank1 => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nibble {
    Low,
    High,
}

impl Nibble {
    pub const fn extract(self, byte: u8) -> u8 {
        match self {
            Nibble::Low => byte & 0x0F,
            Nibble::High => byte >> 4,
        }
    }

    /// Replace this nibble of `byte` with the low nibble of `value`.
    pub const fn merge(self, byte: u8, value: u8) -> u8 {
        match self {
            Nibble::Low => (byte & 0xF0) | (value & 0x0F),
            Nibble::High => (byte & 0x0F) | (value << 4),
        }
    }
}

/// Where the indexed port stores the pixel at (x, y).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelLocation {
    pub bank: BankId,
    pub address: usize,
    pub nibble: Nibble,
}

/// Coordinate mapping used by the X/Y bitmap port (two pixels per byte).
pub const fn locate(x: u8, y: u8) -> PixelLocation {
    let address = ((y as usize) << 6) | ((x as usize) >> 2);
    let bank = if x & 0x02 != 0 {
        BankId::Bank1
    } else {
        BankId::Bank0
    };
    let nibble = if x & 0x01 != 0 {
        Nibble::High
    } else {
        Nibble::Low
    };
    PixelLocation {
        bank,
        address,
        nibble,
    }
}

/// Coordinate mapping used by the direct window: the leftmost of the four
/// screen pixels a window byte can cover.
pub const fn direct_origin(offset: usize) -> (usize, usize) {
    let address = offset + WINDOW_BASE;
    let y = address >> 6;
    let x = (address & 0x3F) << 2;
    (x, y)
}

/// One packed 4bpp video bank.
#[derive(Clone)]
pub struct VideoBank {
    data: Box<[u8; BANK_STORAGE_SIZE]>,
}

impl VideoBank {
    pub fn new() -> Self {
        Self {
            data: Box::new([0; BANK_STORAGE_SIZE]),
        }
    }

    pub fn read(&self, address: usize) -> u8 {
        self.data[address & (BANK_STORAGE_SIZE - 1)]
    }

    pub fn write(&mut self, address: usize, value: u8) {
        self.data[address & (BANK_STORAGE_SIZE - 1)] = value;
    }

    pub fn read_nibble(&self, address: usize, nibble: Nibble) -> u8 {
        nibble.extract(self.read(address))
    }

    /// Store a pixel value into one nibble, keeping the other one.
    pub fn write_nibble(&mut self, address: usize, nibble: Nibble, value: u8) {
        let byte = self.read(address);
        self.write(address, nibble.merge(byte, value));
    }

    /// The CPU-visible direct window (0x3A00 bytes).
    pub fn window(&self) -> &[u8] {
        &self.data[WINDOW_BASE..]
    }

    pub fn storage(&self) -> &[u8; BANK_STORAGE_SIZE] {
        &self.data
    }

    pub fn load(&mut self, src: &[u8; BANK_STORAGE_SIZE]) {
        self.data.copy_from_slice(src);
    }

    /// Copy `src` into the direct window. Extra bytes are ignored.
    pub fn load_window(&mut self, src: &[u8]) {
        let len = src.len().min(WINDOW_SIZE);
        self.data[WINDOW_BASE..WINDOW_BASE + len].copy_from_slice(&src[..len]);
    }
}

impl Default for VideoBank {
    fn default() -> Self {
        Self::new()
    }
}
