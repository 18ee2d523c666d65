use log::{debug, info};
use std::io::Write;

use crate::{
    command::{Command, RasterHeader},
    config::Config,
    dither::disperse,
    error::Error,
    geometry::JobGeometry,
    pack::{pack_plane, weave},
    raster::{InkMask, QuantizedRaster, Raster, EMISSION_ORDER},
    rle::compress,
};

/// Renders print jobs into any byte sink.
///
/// # Example
///
/// ```
/// use tmc_label::{Config, Printer, Raster};
///
/// let raster = Raster::filled(8, 8, [128, 128, 128]).unwrap();
/// let mut printer = Printer::new(Vec::new(), Config::new().auto_cutter(true));
/// printer.print(&raster).unwrap();
/// let stream = printer.into_inner();
/// assert_eq!(stream.last(), Some(&0x00));
/// ```
pub struct Printer<W: Write> {
    sink: W,
    config: Config,
    frames: usize,
}

impl<W: Write> Printer<W> {
    pub fn new(sink: W, config: Config) -> Self {
        Printer {
            sink,
            config,
            frames: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Print one image, already scaled to the bed.
    ///
    /// The raster is dithered once as a whole, then sent in bands.
    pub fn print(&mut self, raster: &Raster) -> Result<(), Error> {
        let geometry = self.prepare(raster)?;
        self.render(&geometry, raster)?;
        self.finish()?;
        Ok(())
    }

    /// Each frame is built completely before it is written.
    fn send(&mut self, command: Command) -> Result<(), Error> {
        let buf = command.to_bytes()?;
        self.sink.write_all(&buf)?;
        self.frames += 1;
        Ok(())
    }

    /// Initialize the printer and set up the page for `raster`.
    pub fn prepare(&mut self, raster: &Raster) -> Result<JobGeometry, Error> {
        let geometry = JobGeometry::new(&self.config, raster)?;
        info!(
            "start job {}x{} dots in {} bands, page length {}",
            geometry.width,
            geometry.height,
            geometry.bands(),
            geometry.page_length()?
        );

        self.send(Command::exit_packet_mode())?;
        self.send(Command::enter_ejl())?;
        self.send(Command::reset())?;
        self.send(Command::reset())?;

        self.send(Command::enter_remote())?;
        self.send(Command::media_position())?;
        self.send(Command::auto_cutter(self.config.is_auto_cutter()))?;
        self.send(Command::exit_remote())?;

        self.send(Command::graphics_mode())?;
        self.send(Command::unit(geometry.unit))?;
        self.send(Command::paper_load())?;
        self.send(Command::page_length(geometry.page_length()?))?;
        self.send(Command::page_format(
            geometry.margin_top,
            geometry.page_bottom()?,
        ))?;

        Ok(geometry)
    }

    /// Dither `raster` and send it band by band, then eject the page.
    ///
    /// `geometry` must come from `prepare` with a raster of the same size.
    pub fn render(&mut self, geometry: &JobGeometry, raster: &Raster) -> Result<(), Error> {
        if geometry.width != raster.width() || geometry.height != raster.height() {
            debug!(
                "geometry {}x{} does not fit raster",
                geometry.width, geometry.height
            );
            return Err(Error::InvalidImage {
                width: raster.width(),
                height: raster.height(),
            });
        }

        let dots = disperse(raster);
        let rows = geometry.band_rows;

        // Go to the top margin
        self.send(Command::vertical_feed(geometry.margin_top))?;

        let mut y = 0;
        while y < geometry.height {
            let lines = rows.min(geometry.height - y);
            info!(
                "Printing page, {}% complete",
                100 * y as u64 / geometry.height as u64
            );

            self.render_band(geometry, &dots, y, lines)?;
            if lines == rows {
                self.send(Command::vertical_feed(lines))?;
            }
            y += lines;
        }

        self.send(Command::form_feed())?;
        debug!("{} frames sent", self.frames);
        Ok(())
    }

    fn render_band(
        &mut self,
        geometry: &JobGeometry,
        dots: &QuantizedRaster,
        y: u32,
        lines: u32,
    ) -> Result<(), Error> {
        let compression = self.config.get_compression();

        for plane in EMISSION_ORDER.iter() {
            let scanlines = pack_plane(dots, plane.channel, y..y + lines);
            let woven = weave(&scanlines);
            let row_bytes = geometry.row_bytes();

            if geometry.margin_left > 0 {
                self.send(Command::horizontal_position(geometry.margin_left))?;
            }
            let header = RasterHeader::new(plane.ink, compression, row_bytes, woven.even_rows)?;
            self.send(Command::raster(header, compress(compression, &woven.even)))?;

            // Back to the left margin for the second nozzle row
            self.send(Command::horizontal_position(geometry.margin_left))?;
            let header = RasterHeader::new(
                plane.ink | InkMask::WEAVE,
                compression,
                row_bytes,
                woven.odd_rows,
            )?;
            self.send(Command::raster(header, compress(compression, &woven.odd)))?;

            self.send(Command::carriage_return())?;
        }
        Ok(())
    }

    /// Reset the printer and close the job.
    pub fn finish(&mut self) -> Result<(), Error> {
        self.send(Command::reset())?;
        self.send(Command::reset())?;
        self.send(Command::enter_remote())?;
        self.send(Command::load_defaults())?;
        self.send(Command::job_end())?;
        self.send(Command::exit_remote())?;
        self.sink.flush()?;

        info!("job finished, {} frames", self.frames);
        self.frames = 0;
        Ok(())
    }
}
