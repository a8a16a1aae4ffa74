pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 256;

/// A 256x256 raster of 0x00RRGGBB pixels.
///
/// Used both for the compositor's working bitmap and for the per-frame
/// output handed to the display.
#[derive(Clone)]
pub struct Frame {
    pixels: Vec<u32>,
}

impl Frame {
    pub fn new() -> Self {
        Self {
            pixels: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    pub const fn width(&self) -> usize {
        SCREEN_WIDTH
    }

    pub const fn height(&self) -> usize {
        SCREEN_HEIGHT
    }

    #[inline]
    pub fn plot(&mut self, x: usize, y: usize, color: u32) {
        if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
            self.pixels[y * SCREEN_WIDTH + x] = color;
        }
    }

    /// Pixel at (x, y), or `None` when outside the raster.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < SCREEN_WIDTH && y < SCREEN_HEIGHT).then(|| self.pixels[y * SCREEN_WIDTH + x])
    }

    pub fn copy_from(&mut self, other: &Frame) {
        self.pixels.copy_from_slice(&other.pixels);
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Packed RGB888 bytes for a horizontal band of rows, top to bottom.
    pub fn to_rgb_rows(&self, first_row: usize, rows: usize) -> Vec<u8> {
        let first = first_row.min(SCREEN_HEIGHT);
        let last = (first + rows).min(SCREEN_HEIGHT);
        let band = &self.pixels[first * SCREEN_WIDTH..last * SCREEN_WIDTH];
        let mut out = Vec::with_capacity(band.len() * 3);
        for &px in band {
            out.push(((px >> 16) & 0xFF) as u8);
            out.push(((px >> 8) & 0xFF) as u8);
            out.push((px & 0xFF) as u8);
        }
        out
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_plots_are_dropped() {
        let mut frame = Frame::new();
        frame.plot(SCREEN_WIDTH, 0, 0xFFFFFF);
        frame.plot(0, SCREEN_HEIGHT, 0xFFFFFF);
        assert!(frame.pixels().iter().all(|&p| p == 0));
        assert_eq!(frame.pixel(SCREEN_WIDTH, 0), None);
    }

    #[test]
    fn rgb_rows_unpack_channels() {
        let mut frame = Frame::new();
        frame.plot(1, 2, 0x00123456);
        let rgb = frame.to_rgb_rows(2, 1);
        assert_eq!(rgb.len(), SCREEN_WIDTH * 3);
        assert_eq!(&rgb[3..6], &[0x12, 0x34, 0x56]);
    }
}
