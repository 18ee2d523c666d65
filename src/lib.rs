//! TM-C600 Printer Driver
//!
//! This crate turns an RGB image into the ESC/P2 command stream understood by
//! Epson TM-C600 series color label printers: the image is dithered to four
//! ink levels per channel, packed two bits per dot, split into the even and
//! odd scanlines of the head, PackBits compressed and framed in bands of 180
//! lines.
//!
//! # Example
//!
//! ```rust,no_run
//! use tmc_label::{plan_size, Config, Printer, Raster, UsbSink, EPSON_VENDOR_ID};
//!
//! let config = Config::new().auto_cutter(true);
//! let (width, height) = plan_size(&config, 640, 480).unwrap();
//! // scale the image to width x height, then
//! let raster = Raster::filled(width, height, [255, 0, 0]).unwrap();
//!
//! let pid: u16 = 0x0000; // product id reported by lsusb
//! let sink = UsbSink::open(EPSON_VENDOR_ID, pid, "serial").unwrap();
//! let mut printer = Printer::new(sink, config);
//! printer.print(&raster).unwrap();
//! ```

mod command;
mod config;
mod dither;
mod error;
mod geometry;
mod pack;
mod printer;
mod raster;
mod rle;
mod usb;

pub use crate::{
    command::{Command, RasterHeader, BITS_PER_DOT},
    config::{Config, Dpi, Margins, BAND_ROWS, BASE_UNIT},
    dither::disperse,
    error::Error,
    geometry::{mm_to_dots, plan_size, JobGeometry, ResolutionUnit},
    pack::{pack_plane, pack_row, weave, Weave},
    printer::Printer,
    raster::{Channel, InkMask, Plane, QuantizedRaster, Raster, EMISSION_ORDER},
    rle::{compress, decompress, Compression},
    usb::{UsbSink, EPSON_VENDOR_ID},
};
