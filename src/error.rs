//! Error types for TM-C600 job rendering and output.
//!
//! This module defines all possible errors that can occur while planning a
//! job, encoding its command stream and writing it to a sink.

use thiserror::Error;

/// Main error type for printer job operations.
///
/// This enum encompasses all possible errors that can occur when using
/// the driver, from invalid input images to USB communication issues.
#[derive(Error, Debug)]
pub enum Error {
    /// The source raster is empty or its buffer does not match its size.
    ///
    /// Zero-width or zero-height images must be rejected before any
    /// geometry is computed from them.
    #[error("Invalid image: {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    /// Invalid configuration parameter provided.
    ///
    /// This error occurs when bed size, margins or resolution are out of
    /// the range the device protocol can express.
    #[error("Invalid configuration parameter: {0}")]
    InvalidConfig(String),

    /// A framing field cannot hold its value.
    ///
    /// Lengths, row byte widths and line counts are sent as fixed-size
    /// little-endian integers; running past them is an internal bug.
    #[error("Encoding overflow in {0}")]
    EncodingOverflow(&'static str),

    /// Malformed run-length data handed to the decoder.
    #[error("Corrupt run-length data at offset {0}")]
    CorruptRunLength(usize),

    /// The output sink rejected a write. The job cannot be resumed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// USB communication error.
    ///
    /// Wraps underlying rusb errors for device communication issues,
    /// timeouts, or permission problems.
    #[error(transparent)]
    UsbError(#[from] rusb::Error),

    /// Printer device is not connected or not responding.
    #[error("Device is offline")]
    DeviceOffline,

    #[error("Can't read device list, permission issue ?")]
    DeviceListNotReadable,

    #[error("Device is missing endpoint")]
    MissingEndpoint,

    #[error("Short write to printer: {0} bytes")]
    InvalidResponse(usize),
}
