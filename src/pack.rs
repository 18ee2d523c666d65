//! Bit-plane packing and two row weaving.

use std::ops::Range;

use crate::raster::{Channel, QuantizedRaster};

/// Pack 2-bit samples four to a byte, first sample in the high bits.
///
/// Only whole groups of four are packed: a trailing group of one to three
/// samples is dropped, so `n` samples give `n / 4` bytes. Pad the raster
/// width to a multiple of four to keep every dot.
pub fn pack_row<I>(samples: I) -> Vec<u8>
where
    I: IntoIterator<Item = u8>,
{
    let mut packed = Vec::new();
    let mut byte = 0u8;
    let mut count = 0;

    for s in samples {
        byte = (byte << 2) | (s & 0b11);
        count += 1;
        if count == 4 {
            packed.push(byte);
            byte = 0;
            count = 0;
        }
    }
    packed
}

/// Packed scanlines of one channel for the rows in `rows`.
pub fn pack_plane(raster: &QuantizedRaster, channel: Channel, rows: Range<u32>) -> Vec<Vec<u8>> {
    rows.map(|y| pack_row(raster.row(y).iter().map(|s| s[channel.index()])))
        .collect()
}

/// Scanlines of one band split between the two nozzle rows of the head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weave {
    /// Rows 0, 2, 4, ... concatenated.
    pub even: Vec<u8>,
    /// Rows 1, 3, 5, ... concatenated.
    pub odd: Vec<u8>,
    pub even_rows: usize,
    pub odd_rows: usize,
}

/// Split packed scanlines into even and odd transfers.
///
/// The two nozzle rows of the head sit one scanline apart, so the printer
/// takes even and odd lines as separate raster commands.
pub fn weave(rows: &[Vec<u8>]) -> Weave {
    let mut even = Vec::new();
    let mut odd = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        if i % 2 == 0 {
            even.extend_from_slice(row);
        } else {
            odd.extend_from_slice(row);
        }
    }

    Weave {
        even,
        odd,
        even_rows: (rows.len() + 1) / 2,
        odd_rows: rows.len() / 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_msb_first() {
        assert_eq!(pack_row(vec![0, 1, 2, 3]), vec![0x1B]);
        assert_eq!(pack_row(vec![3, 3, 3, 3, 0, 0, 0, 1]), vec![0xFF, 0x01]);
    }

    #[test]
    fn drops_partial_group() {
        assert_eq!(pack_row(vec![3, 2, 1, 0, 3]), vec![0xE4]);
        assert_eq!(pack_row(vec![1, 2, 3]), Vec::<u8>::new());
        assert_eq!(pack_row(Vec::new()), Vec::<u8>::new());
    }

    #[test]
    fn plane_uses_requested_channel() {
        let samples = vec![
            [0, 3, 1],
            [1, 3, 1],
            [2, 3, 1],
            [3, 3, 1],
            [3, 0, 2],
            [3, 0, 2],
            [3, 0, 2],
            [3, 0, 2],
        ];
        let q = QuantizedRaster::new(4, 2, samples);
        assert_eq!(pack_plane(&q, Channel::Red, 0..2), vec![vec![0x1B], vec![0xFF]]);
        assert_eq!(pack_plane(&q, Channel::Green, 0..2), vec![vec![0xFF], vec![0x00]]);
        assert_eq!(pack_plane(&q, Channel::Blue, 1..2), vec![vec![0xAA]]);
    }

    #[test]
    fn weave_partitions_rows() {
        let rows: Vec<Vec<u8>> = (0..5u8).map(|i| vec![i, i]).collect();
        let w = weave(&rows);
        assert_eq!(w.even, vec![0, 0, 2, 2, 4, 4]);
        assert_eq!(w.odd, vec![1, 1, 3, 3]);
        assert_eq!(w.even_rows, 3);
        assert_eq!(w.odd_rows, 2);
        assert_eq!(w.even_rows + w.odd_rows, rows.len());
    }

    #[test]
    fn weave_single_row_leaves_odd_empty() {
        let w = weave(&[vec![7, 8]]);
        assert_eq!(w.even, vec![7, 8]);
        assert!(w.odd.is_empty());
        assert_eq!(w.odd_rows, 0);
    }
}
