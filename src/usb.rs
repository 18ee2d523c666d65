//! USB bulk transport to the printer.

use log::{debug, info};
use rusb::{Context, Device, DeviceDescriptor, DeviceHandle, Direction, TransferType, UsbContext};
use std::{io, time::Duration};

use crate::error::Error;

/// Seiko Epson Corp.
pub const EPSON_VENDOR_ID: u16 = 0x04B8;

const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
struct Endpoint {
    config: u8,
    iface: u8,
    setting: u8,
    address: u8,
}

/// Bulk OUT endpoint of a USB printer, usable as a `Write` sink.
pub struct UsbSink {
    handle: Box<DeviceHandle<Context>>,
    endpoint_out: Endpoint,
}

impl UsbSink {
    /// Open the printer with `pid` and serial number `serial`.
    pub fn open(vid: u16, pid: u16, serial: &str) -> Result<Self, Error> {
        let mut context = Context::new()?;
        let found = Self::open_device(&mut context, vid, pid, serial);
        let (device, device_desc, mut handle) = match found {
            Ok(found) => found,
            Err(err) => {
                debug!("{:?}", err);
                return Err(Error::DeviceOffline);
            }
        };
        handle.reset()?;

        let endpoint_out =
            Self::find_endpoint(&device, &device_desc).ok_or(Error::MissingEndpoint)?;

        // Some models bind usblp to the printer interface
        handle.set_auto_detach_kernel_driver(true)?;
        let has_kernel_driver = matches!(handle.kernel_driver_active(endpoint_out.iface), Ok(true));
        info!(" Kernel driver support is {}", has_kernel_driver);
        handle.set_active_configuration(endpoint_out.config)?;
        handle.claim_interface(endpoint_out.iface)?;
        handle.set_alternate_setting(endpoint_out.iface, endpoint_out.setting)?;

        Ok(UsbSink {
            handle: Box::new(handle),
            endpoint_out,
        })
    }

    fn open_device(
        context: &mut Context,
        vid: u16,
        pid: u16,
        serial: &str,
    ) -> Result<(Device<Context>, DeviceDescriptor, DeviceHandle<Context>), Error> {
        let devices = context.devices()?;

        if devices.is_empty() {
            debug!("Failed to read device list");
            return Err(Error::DeviceListNotReadable);
        }
        for device in devices.iter() {
            let device_desc = match device.device_descriptor() {
                Ok(d) => d,
                Err(err) => {
                    debug!("{:?}", err);
                    continue;
                }
            };

            if device_desc.vendor_id() != vid || device_desc.product_id() != pid {
                continue;
            }
            debug!("{:?}", device_desc);

            let handle = match device.open() {
                Ok(handle) => handle,
                Err(err) => {
                    debug!("Failed to open device: {:?}", err);
                    continue;
                }
            };

            let timeout = Duration::from_secs(1);
            let languages = handle.read_languages(timeout)?;
            let language = match languages.first() {
                Some(language) => *language,
                None => continue,
            };
            match handle.read_serial_number_string(language, &device_desc, timeout) {
                Ok(s) if s == serial => return Ok((device, device_desc, handle)),
                Ok(_) => continue,
                Err(err) => {
                    debug!("Failed to read serial number string: {:?}", err);
                    continue;
                }
            }
        }
        debug!("No device match with this serial: {:?}", serial);
        Err(Error::DeviceOffline)
    }

    /// First bulk OUT endpoint of any configuration.
    fn find_endpoint(device: &Device<Context>, device_desc: &DeviceDescriptor) -> Option<Endpoint> {
        (0..device_desc.num_configurations())
            .filter_map(|n| device.config_descriptor(n).ok())
            .find_map(|config_desc| {
                config_desc
                    .interfaces()
                    .flat_map(|interface| interface.descriptors())
                    .find_map(|interface_desc| {
                        interface_desc
                            .endpoint_descriptors()
                            .find(|ep| {
                                ep.direction() == Direction::Out
                                    && ep.transfer_type() == TransferType::Bulk
                            })
                            .map(|ep| Endpoint {
                                config: config_desc.number(),
                                iface: interface_desc.interface_number(),
                                setting: interface_desc.setting_number(),
                                address: ep.address(),
                            })
                    })
            })
    }
}

impl io::Write for UsbSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self
            .handle
            .write_bulk(self.endpoint_out.address, buf, WRITE_TIMEOUT)
        {
            Ok(0) if !buf.is_empty() => {
                debug!("write error: no bytes accepted, possibly timeout ?");
                Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    Error::InvalidResponse(0),
                ))
            }
            Ok(n) => Ok(n),
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for UsbSink {
    fn drop(&mut self) {
        if let Err(err) = self.handle.release_interface(self.endpoint_out.iface) {
            debug!("Failed to release interface: {:?}", err);
        }
    }
}
