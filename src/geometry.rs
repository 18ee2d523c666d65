use log::debug;

use crate::{
    config::{Config, Dpi, BASE_UNIT},
    error::Error,
    raster::Raster,
};

const MM_PER_INCH: f32 = 25.4;

/// Convert millimeters to device dots at `dpi`.
pub fn mm_to_dots(mm: f32, dpi: u16) -> u32 {
    (dpi as f32 * mm / MM_PER_INCH).round() as u32
}

/// Pixel size an image of `width` x `height` must be scaled to so that it
/// fills the bed width, keeping its aspect ratio.
pub fn plan_size(config: &Config, width: u32, height: u32) -> Result<(u32, u32), Error> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidImage { width, height });
    }
    config.validate()?;

    let dpi = config.get_dpi();
    let bed_in = config.get_bed_width() / MM_PER_INCH;
    let w = (dpi.horizontal as f32 * bed_in).round() as u32;
    let h = (height as f32 / width as f32 * dpi.vertical as f32 * bed_in).round() as u32;

    debug!("scale {}x{} to {}x{}", width, height, w, h);
    Ok((w, h))
}

/// Parameters of `ESC ( U`, in 1/1440 inch steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionUnit {
    pub page: u8,
    pub vertical: u8,
    pub horizontal: u8,
    pub base: u16,
}

impl ResolutionUnit {
    pub fn from_dpi(dpi: Dpi) -> Self {
        ResolutionUnit {
            page: (BASE_UNIT / dpi.vertical) as u8,
            vertical: (BASE_UNIT / dpi.vertical) as u8,
            horizontal: (BASE_UNIT / dpi.horizontal) as u8,
            base: BASE_UNIT,
        }
    }
}

/// Page layout of one job, fixed once the raster is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobGeometry {
    pub width: u32,
    pub height: u32,
    pub margin_left: u32,
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub band_rows: u32,
    pub unit: ResolutionUnit,
}

impl JobGeometry {
    pub fn new(config: &Config, raster: &Raster) -> Result<Self, Error> {
        config.validate()?;

        let dpi = config.get_dpi();
        let margins = config.get_margins();
        let geometry = JobGeometry {
            width: raster.width(),
            height: raster.height(),
            margin_left: mm_to_dots(margins.left, dpi.horizontal),
            margin_right: mm_to_dots(margins.right, dpi.horizontal),
            margin_top: mm_to_dots(margins.top, dpi.vertical),
            margin_bottom: mm_to_dots(margins.bottom, dpi.vertical),
            band_rows: config.get_band_rows(),
            unit: ResolutionUnit::from_dpi(dpi),
        };
        // ESC ( C and ESC ( c carry 32-bit line counts
        geometry.page_length()?;
        debug!("{:?}", geometry);
        Ok(geometry)
    }

    /// Top margin, image and bottom margin, in dots.
    pub fn page_length(&self) -> Result<u32, Error> {
        self.page_bottom()?
            .checked_add(self.margin_bottom)
            .ok_or(Error::EncodingOverflow("page length"))
    }

    /// Last printable line of the page.
    pub fn page_bottom(&self) -> Result<u32, Error> {
        self.margin_top
            .checked_add(self.height)
            .ok_or(Error::EncodingOverflow("page bottom"))
    }

    /// Bytes per packed scanline; partial groups of four dots are dropped.
    pub fn row_bytes(&self) -> usize {
        self.width as usize / 4
    }

    pub fn bands(&self) -> usize {
        let full = self.height / self.band_rows;
        (full + (self.height % self.band_rows != 0) as u32) as usize
    }
}
