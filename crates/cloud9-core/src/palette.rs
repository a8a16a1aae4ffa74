pub const PALETTE_RAM_SIZE: usize = 0x80;
pub const PALETTE_ENTRIES: usize = 0x40;

/// Source marker for a slot the CPU has not written since power on.
pub const UNWRITTEN: u8 = 0xFF;

const SLOT_MASK: u8 = 0x3F;
const BLUE_LSB_BIT: u8 = 0x40;

// Resistor ladder weights for the three bits of each gun.
const WEIGHTS: [u8; 3] = [0x21, 0x47, 0x97];

/// An 8-bit-per-channel colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs the colour as 0x00RRGGBB.
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Weights three already-inverted bits, `b0` being the least significant.
fn ladder(b0: u8, b1: u8, b2: u8) -> u8 {
    // The weights sum to 0xFF, so this never overflows.
    WEIGHTS[0] * (b0 & 1) + WEIGHTS[1] * (b1 & 1) + WEIGHTS[2] * (b2 & 1)
}

/// Decode a palette RAM write.
///
/// The hardware drives the DAC with inverted data, so every bit is
/// complemented before weighting. Bit 6 of `offset` supplies the most
/// significant blue bit.
pub fn decode_color(offset: u8, data: u8) -> Rgb {
    let inv = !data;
    let blue_msb = u8::from(offset & BLUE_LSB_BIT == 0);

    let r = ladder(inv >> 5, inv >> 6, inv >> 7);
    let g = ladder(inv >> 2, inv >> 3, inv >> 4);
    let b = ladder(inv, inv >> 1, blue_msb);
    Rgb { r, g, b }
}

/// The 64-entry hardware palette plus the raw RAM behind it.
///
/// Each slot is reachable through two RAM offsets (`k` and `k | 0x40`); the
/// slot shows whichever of the two the CPU wrote last, so that choice is
/// tracked alongside the RAM.
#[derive(Clone)]
pub struct PaletteTable {
    ram: [u8; PALETTE_RAM_SIZE],
    colors: [Rgb; PALETTE_ENTRIES],
    sources: [u8; PALETTE_ENTRIES],
}

impl PaletteTable {
    pub fn new() -> Self {
        Self {
            ram: [0; PALETTE_RAM_SIZE],
            colors: [Rgb::BLACK; PALETTE_ENTRIES],
            sources: [UNWRITTEN; PALETTE_ENTRIES],
        }
    }

    /// Rebuild a table from raw RAM and the offset last written per slot.
    ///
    /// Missing RAM bytes read as zero. [`UNWRITTEN`] slots stay black. A
    /// slot with no recorded source, or one that does not alias it, decodes
    /// from its upper alias.
    pub fn load(ram: &[u8], sources: &[u8]) -> Self {
        let mut table = Self::new();
        let len = ram.len().min(PALETTE_RAM_SIZE);
        table.ram[..len].copy_from_slice(&ram[..len]);
        for slot in 0..PALETTE_ENTRIES {
            let offset = match sources.get(slot) {
                Some(&UNWRITTEN) => continue,
                Some(&src) if src < 0x80 && (src & SLOT_MASK) as usize == slot => src,
                _ => slot as u8 | BLUE_LSB_BIT,
            };
            table.sources[slot] = offset;
            table.colors[slot] = decode_color(offset, table.ram[offset as usize]);
        }
        table
    }

    /// Store a CPU write and re-decode the affected slot. Returns the slot.
    pub fn write(&mut self, offset: u8, data: u8) -> usize {
        let offset = offset & (PALETTE_RAM_SIZE as u8 - 1);
        self.ram[offset as usize] = data;
        let slot = (offset & SLOT_MASK) as usize;
        self.colors[slot] = decode_color(offset, data);
        self.sources[slot] = offset;
        slot
    }

    pub fn read_raw(&self, offset: u8) -> u8 {
        self.ram[(offset as usize) & (PALETTE_RAM_SIZE - 1)]
    }

    pub fn raw(&self) -> &[u8; PALETTE_RAM_SIZE] {
        &self.ram
    }

    /// RAM offset each slot was last written through, or [`UNWRITTEN`].
    pub fn sources(&self) -> &[u8; PALETTE_ENTRIES] {
        &self.sources
    }

    /// Colour for a palette index. Indices past the table are clamped.
    pub fn color(&self, index: usize) -> Rgb {
        self.colors[index.min(PALETTE_ENTRIES - 1)]
    }

    pub fn colors(&self) -> &[Rgb; PALETTE_ENTRIES] {
        &self.colors
    }
}

impl Default for PaletteTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(offset: u8, data: u8) -> Rgb {
        let bit = |v: u8, n: u8| ((!v) >> n) & 1;
        let w = |b0: u8, b1: u8, b2: u8| 0x21 * b0 as u32 + 0x47 * b1 as u32 + 0x97 * b2 as u32;
        let blue = offset & 0x40;
        Rgb {
            r: w(bit(data, 5), bit(data, 6), bit(data, 7)) as u8,
            g: w(bit(data, 2), bit(data, 3), bit(data, 4)) as u8,
            b: w(bit(data, 0), bit(data, 1), u8::from(blue == 0)) as u8,
        }
    }

    #[test]
    fn every_write_matches_ladder_formula() {
        let mut table = PaletteTable::new();
        for offset in 0..0x80u8 {
            for data in 0..=0xFFu8 {
                let slot = table.write(offset, data);
                assert_eq!(slot, (offset & 0x3F) as usize);
                assert_eq!(table.color(slot), reference(offset, data));
                // Same inputs, same result.
                table.write(offset, data);
                assert_eq!(table.color(slot), reference(offset, data));
            }
        }
    }

    #[test]
    fn all_zero_data_is_white() {
        let mut table = PaletteTable::new();
        table.write(0x00, 0x00);
        assert_eq!(table.color(0), Rgb::new(0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn all_ones_data_leaves_only_offset_blue_bit() {
        assert_eq!(decode_color(0x00, 0xFF), Rgb::new(0, 0, 0x97));
        assert_eq!(decode_color(0x40, 0xFF), Rgb::BLACK);
    }

    #[test]
    fn upper_offset_aliases_same_slot() {
        let mut table = PaletteTable::new();
        table.write(0x05, 0x00);
        table.write(0x45, 0x00);
        assert_eq!(table.color(5), Rgb::new(0xFF, 0xFF, 0x68));
        assert_eq!(table.read_raw(0x05), 0x00);
        assert_eq!(table.read_raw(0x45), 0x00);
    }

    #[test]
    fn load_decodes_from_last_written_alias() {
        let mut table = PaletteTable::new();
        table.write(0x45, 0xFF);
        table.write(0x05, 0x00);
        assert_eq!(table.sources()[5], 0x05);

        let loaded = PaletteTable::load(table.raw(), table.sources());
        assert_eq!(loaded.color(5), Rgb::new(0xFF, 0xFF, 0xFF));
        assert_eq!(loaded.colors(), table.colors());
        assert_eq!(loaded.raw(), table.raw());
    }

    #[test]
    fn load_without_sources_uses_upper_alias() {
        let mut ram = [0u8; PALETTE_RAM_SIZE];
        ram[0x05] = 0x00;
        ram[0x45] = 0xFF;
        let loaded = PaletteTable::load(&ram, &[]);
        assert_eq!(loaded.color(5), Rgb::BLACK);
        assert_eq!(loaded.sources()[5], 0x45);
    }

    #[test]
    fn load_keeps_unwritten_slots_black() {
        let mut table = PaletteTable::new();
        table.write(0x02, 0x00);
        let loaded = PaletteTable::load(table.raw(), table.sources());
        assert_eq!(loaded.color(0), Rgb::BLACK);
        assert_eq!(loaded.sources()[0], UNWRITTEN);
        assert_eq!(loaded.color(2), Rgb::new(0xFF, 0xFF, 0xFF));
    }

    #[test]
    fn color_index_is_clamped() {
        let mut table = PaletteTable::new();
        table.write(0x3F, 0x00);
        assert_eq!(table.color(0x1000), table.color(0x3F));
    }
}
