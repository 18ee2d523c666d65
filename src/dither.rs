//! Error diffusion from 8-bit RGB to 2-bit ink levels.
//!
//! Every channel is inverted (`255 - value`) to get an ink amount, then
//! quantized to four levels by keeping the top two bits. The remainder is
//! pushed forward with the classic four neighbor kernel:
//!
//! ```text
//!          *    7/16
//!   3/16  5/16  1/16
//! ```
//!
//! Rows are scanned top to bottom, left to right. Terms falling outside the
//! image are dropped. The whole image is dithered in one pass because the
//! error crosses band boundaries.

use log::debug;

use crate::raster::{QuantizedRaster, Raster};

const LEVEL_MASK: i32 = 0xC0;

/// Quantize `raster` to 2 bits per channel.
pub fn disperse(raster: &Raster) -> QuantizedRaster {
    let w = raster.width() as usize;
    let h = raster.height() as usize;

    // sums can run past 255, keep them wide
    let mut ink: Vec<[i32; 3]> = raster
        .as_bytes()
        .chunks_exact(3)
        .map(|p| [255 - p[0] as i32, 255 - p[1] as i32, 255 - p[2] as i32])
        .collect();
    let mut samples = Vec::with_capacity(w * h);

    for y in 0..h {
        for x in 0..w {
            let here = y * w + x;
            let mut dots = [0u8; 3];

            for c in 0..3 {
                let old = ink[here][c].max(0).min(255);
                let new = old & LEVEL_MASK;
                let error = old - new;

                if x + 1 < w {
                    ink[here + 1][c] += error * 7 / 16;
                }
                if y + 1 < h {
                    if x > 0 {
                        ink[here + w - 1][c] += error * 3 / 16;
                    }
                    ink[here + w][c] += error * 5 / 16;
                    if x + 1 < w {
                        ink[here + w + 1][c] += error / 16;
                    }
                }
                dots[c] = (new >> 6) as u8;
            }
            samples.push(dots);
        }
    }

    debug!("dithered {}x{} raster", w, h);
    QuantizedRaster::new(raster.width(), raster.height(), samples)
}
