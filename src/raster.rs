//! Raster buffers handed between the pipeline stages.

use bitflags::bitflags;

use crate::error::Error;

/// Color channel of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Channel {
    pub fn index(self) -> usize {
        self as usize
    }
}

bitflags! {
    /// Color selector of the `ESC i` raster command.
    pub struct InkMask: u8 {
        const MAGENTA = 0b0000_0001;
        const CYAN    = 0b0000_0010;
        const YELLOW  = 0b0000_0100;
        /// Second pass of a two row weave.
        const WEAVE   = 0b0100_0000;
    }
}

/// One color plane as sent to the printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plane {
    pub ink: InkMask,
    pub channel: Channel,
}

/// Order in which the head lays down ink: cyan, magenta, then yellow.
///
/// Each ink is the inverse of one RGB channel, so the planes are sent as
/// device color bits 1, 0, 2.
pub const EMISSION_ORDER: [Plane; 3] = [
    Plane {
        ink: InkMask::CYAN,
        channel: Channel::Red,
    },
    Plane {
        ink: InkMask::MAGENTA,
        channel: Channel::Green,
    },
    Plane {
        ink: InkMask::YELLOW,
        channel: Channel::Blue,
    },
];

/// Decoded 8-bit RGB image, already scaled to the print size.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Wrap an interleaved RGB buffer of `width * height * 3` bytes.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self, Error> {
        if width == 0 || height == 0 || data.len() != (width as usize) * (height as usize) * 3 {
            return Err(Error::InvalidImage { width, height });
        }
        Ok(Raster {
            width,
            height,
            data,
        })
    }

    /// Raster of a single color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self, Error> {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * 3)
            .collect();
        Self::from_rgb(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = ((y as usize) * (self.width as usize) + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Raster of 2-bit ink levels, one `[u8; 3]` per pixel indexed by `Channel`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedRaster {
    width: u32,
    height: u32,
    samples: Vec<[u8; 3]>,
}

impl QuantizedRaster {
    pub(crate) fn new(width: u32, height: u32, samples: Vec<[u8; 3]>) -> Self {
        debug_assert_eq!(samples.len(), (width as usize) * (height as usize));
        QuantizedRaster {
            width,
            height,
            samples,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn row(&self, y: u32) -> &[[u8; 3]] {
        let w = self.width as usize;
        let start = (y as usize) * w;
        &self.samples[start..start + w]
    }

    pub fn sample(&self, x: u32, y: u32, channel: Channel) -> u8 {
        self.row(y)[x as usize][channel.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_mismatched_buffers() {
        assert!(matches!(
            Raster::from_rgb(0, 4, vec![]),
            Err(Error::InvalidImage {
                width: 0,
                height: 4
            })
        ));
        assert!(matches!(
            Raster::from_rgb(4, 0, vec![]),
            Err(Error::InvalidImage { .. })
        ));
        assert!(matches!(
            Raster::from_rgb(2, 2, vec![0; 11]),
            Err(Error::InvalidImage { .. })
        ));
    }

    #[test]
    fn pixel_lookup() {
        let data: Vec<u8> = (0..2 * 2 * 3).collect();
        let raster = Raster::from_rgb(2, 2, data).unwrap();
        assert_eq!(raster.pixel(0, 0), [0, 1, 2]);
        assert_eq!(raster.pixel(1, 1), [9, 10, 11]);
    }

    #[test]
    fn emission_order_is_cyan_magenta_yellow() {
        let bits: Vec<u8> = EMISSION_ORDER.iter().map(|p| p.ink.bits()).collect();
        assert_eq!(bits, vec![1 << 1, 1 << 0, 1 << 2]);
        let channels: Vec<Channel> = EMISSION_ORDER.iter().map(|p| p.channel).collect();
        assert_eq!(channels, vec![Channel::Red, Channel::Green, Channel::Blue]);
    }
}
