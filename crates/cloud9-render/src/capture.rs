//! PNG screenshots of rendered frames.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use cloud9_core::framebuffer::Frame;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to create {}: {source}", .path.display())]
    Create {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("png encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Nearest-neighbour upscale of the top `rows` rows to packed RGB888.
pub fn scaled_rgb(frame: &Frame, rows: usize, scale: u32) -> (u32, u32, Vec<u8>) {
    let scale = scale.max(1) as usize;
    let rows = rows.min(frame.height());
    let src = frame.to_rgb_rows(0, rows);
    let src_width = frame.width();
    let width = src_width * scale;
    let height = rows * scale;

    let mut out = Vec::with_capacity(width * height * 3);
    for row in src.chunks_exact(src_width * 3) {
        let mut line = Vec::with_capacity(width * 3);
        for px in row.chunks_exact(3) {
            for _ in 0..scale {
                line.extend_from_slice(px);
            }
        }
        for _ in 0..scale {
            out.extend_from_slice(&line);
        }
    }
    (width as u32, height as u32, out)
}

/// Save the top `rows` rows of `frame` as an RGB PNG.
pub fn save_screenshot(
    frame: &Frame,
    rows: usize,
    scale: u32,
    path: &Path,
) -> Result<(), CaptureError> {
    let (width, height, rgb) = scaled_rgb(frame, rows, scale);

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| CaptureError::Create {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = fs::File::create(path).map_err(|source| CaptureError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let w = BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&rgb)?;
    Ok(())
}
