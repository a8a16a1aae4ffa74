use crate::registers::{BitmapRegisters, ControlLatches};

/// Authoritative video board state.
///
/// The working bitmap is not captured; it is derived from the banks and
/// palette and gets rebuilt after a restore.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoSnapshot {
    /// Full bank storage, indexed by bitmap address.
    pub vram: [Vec<u8>; 2],
    pub palette_ram: Vec<u8>,
    /// Palette RAM offset each slot was last written through. Empty means
    /// every slot decodes from its upper alias.
    pub palette_sources: Vec<u8>,
    pub regs: BitmapRegisters,
    pub latches: ControlLatches,
}

impl VideoSnapshot {
    pub fn vram_bank(&self, bank: usize) -> &[u8] {
        match bank {
            0 => &self.vram[0],
            _ => &self.vram[1],
        }
    }
}
