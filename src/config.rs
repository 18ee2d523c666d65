use log::debug;

use crate::{error::Error, rle::Compression};

/// Reference unit of the `ESC ( U` command, in units per inch.
pub const BASE_UNIT: u16 = 1440;

/// Number of raster lines sent per band.
pub const BAND_ROWS: u32 = 180;

/// Print margins in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Margins {
            left: 0.0,
            right: 0.0,
            top: 1.0,
            bottom: 15.0,
        }
    }
}

/// Device resolution in dots per inch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dpi {
    pub horizontal: u16,
    pub vertical: u16,
}

impl Default for Dpi {
    fn default() -> Self {
        Dpi {
            horizontal: 360,
            vertical: 180,
        }
    }
}

/// Job configuration.
///
#[derive(Debug, Clone)]
pub struct Config {
    bed_width: f32,
    margins: Margins,
    dpi: Dpi,
    auto_cutter: bool,
    compression: Compression,
    band_rows: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Initialize configuration data with default values.
    ///
    /// The defaults match the 58 mm roll of the TM-C600: 55 mm of printable
    /// bed, 1 mm top and 15 mm bottom margin, 360x180 dpi, compressed raster
    /// data and the auto cutter disabled.
    ///
    /// # Example
    ///
    /// ```
    /// use tmc_label::{Config, Margins};
    ///
    /// let config = Config::new()
    ///     .bed_width(55.0)
    ///     .margins(Margins { left: 0.0, right: 0.0, top: 1.0, bottom: 15.0 })
    ///     .auto_cutter(true);
    /// assert!(config.validate().is_ok());
    /// ```
    ///
    pub fn new() -> Config {
        Config {
            bed_width: 55.0,
            margins: Margins::default(),
            dpi: Dpi::default(),
            auto_cutter: false,
            compression: Compression::PackBits,
            band_rows: BAND_ROWS,
        }
    }

    /// Physical print width of the media path in millimeters.
    pub fn bed_width(self, mm: f32) -> Self {
        Config {
            bed_width: mm,
            ..self
        }
    }

    pub fn margins(self, margins: Margins) -> Self {
        Config { margins, ..self }
    }

    pub fn dpi(self, horizontal: u16, vertical: u16) -> Self {
        Config {
            dpi: Dpi {
                horizontal,
                vertical,
            },
            ..self
        }
    }

    /// Cut the label once the job is finished.
    pub fn auto_cutter(self, flag: bool) -> Self {
        Config {
            auto_cutter: flag,
            ..self
        }
    }

    pub fn compress(self, flag: bool) -> Self {
        Config {
            compression: if flag {
                Compression::PackBits
            } else {
                Compression::None
            },
            ..self
        }
    }

    /// Raster lines per band. Each band is fed forward by this many dots.
    pub fn band_rows(self, rows: u32) -> Self {
        Config {
            band_rows: rows,
            ..self
        }
    }

    pub fn get_bed_width(&self) -> f32 {
        self.bed_width
    }

    pub fn get_margins(&self) -> Margins {
        self.margins
    }

    pub fn get_dpi(&self) -> Dpi {
        self.dpi
    }

    pub fn is_auto_cutter(&self) -> bool {
        self.auto_cutter
    }

    pub fn get_compression(&self) -> Compression {
        self.compression
    }

    pub fn get_band_rows(&self) -> u32 {
        self.band_rows
    }

    /// Check that every value can be expressed by the device protocol.
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.bed_width.is_finite() && self.bed_width > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "bed width must be positive, got {}",
                self.bed_width
            )));
        }

        let m = self.margins;
        for (name, value) in [
            ("left", m.left),
            ("right", m.right),
            ("top", m.top),
            ("bottom", m.bottom),
        ]
        .iter()
        {
            if !(value.is_finite() && *value >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} margin must not be negative, got {}",
                    name, value
                )));
            }
        }

        // ESC ( U carries each step as a single byte
        for (name, dpi) in [
            ("horizontal", self.dpi.horizontal),
            ("vertical", self.dpi.vertical),
        ]
        .iter()
        {
            if *dpi == 0 || *dpi > BASE_UNIT || BASE_UNIT / *dpi > u8::MAX as u16 {
                return Err(Error::InvalidConfig(format!(
                    "{} resolution {} dpi is not supported",
                    name, dpi
                )));
            }
        }

        // the even half of a band goes into the 16-bit line count of ESC i
        let even_rows = self.band_rows - self.band_rows / 2;
        if even_rows == 0 || even_rows > u16::MAX as u32 {
            return Err(Error::InvalidConfig(format!(
                "band of {} rows is not supported",
                self.band_rows
            )));
        }

        debug!("{:?}", self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.get_bed_width(), 55.0);
        assert_eq!(config.get_margins(), Margins::default());
        assert_eq!(
            config.get_dpi(),
            Dpi {
                horizontal: 360,
                vertical: 180
            }
        );
        assert!(!config.is_auto_cutter());
        assert_eq!(config.get_compression(), Compression::PackBits);
        assert_eq!(config.get_band_rows(), 180);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let config = Config::new()
            .auto_cutter(true)
            .compress(false)
            .dpi(720, 360)
            .band_rows(90);
        assert!(config.is_auto_cutter());
        assert_eq!(config.get_band_rows(), 90);
        assert_eq!(config.get_compression(), Compression::None);
        assert_eq!(config.get_dpi().horizontal, 720);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::new().bed_width(0.0).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new().dpi(0, 180).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new().dpi(360, 5).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new().band_rows(0).validate(),
            Err(Error::InvalidConfig(_))
        ));
        let margins = Margins {
            top: -1.0,
            ..Margins::default()
        };
        assert!(matches!(
            Config::new().margins(margins).validate(),
            Err(Error::InvalidConfig(_))
        ));
    }
}
