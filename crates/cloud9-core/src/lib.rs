//! Atari Cloud 9 bitmap video emulation core.
//!
//! This crate contains the platform-agnostic video board logic: palette
//! decoding, the two packed 4bpp video banks, the indexed X/Y bitmap port,
//! the direct-mapped bitmap window and the per-frame compositor. Frontends
//! drive it through [`bus::VideoBus`] (CPU memory map) or directly through
//! [`video::Cloud9Video`].

/// Packed video banks and the two coordinate mappings.
pub mod bitmap;

/// CPU memory-map dispatch for the video board.
pub mod bus;

/// Output raster and the working bitmap.
pub mod framebuffer;

/// Memory-map constants and address decoding.
pub mod hardware;

/// Palette RAM and colour decoding.
pub mod palette;

/// Bitmap X/Y/pixel registers and the control latches.
pub mod registers;

/// Capture/restore of the authoritative video state.
pub mod snapshot;

/// Sprite RAM decoding and the sprite tile renderer.
pub mod sprites;

/// The video board facade tying everything together.
pub mod video;
