//! ESC/P2 command frames for the TM-C600.
//!
//! Three framings are used on the wire:
//!
//! | Kind       | Bytes                                         |
//! |------------|-----------------------------------------------|
//! | `ESC`      | `1B code... data...`                          |
//! | `ESC (`    | `1B 28 code len_lo len_hi data...`            |
//! | Remote     | `c1 c2 len_lo len_hi [00 data...]`            |
//!
//! Remote sub-commands are only valid between `ESC ( R ... REMOTE1` and
//! `ESC 00 00 00`. Multi-byte integers are little-endian unless noted.

use std::convert::TryFrom;

use crate::{error::Error, geometry::ResolutionUnit, raster::InkMask, rle::Compression};

pub const ESC: u8 = 0x1B;
pub const CR: u8 = 0x0D;
pub const FF: u8 = 0x0C;

/// Bits per dot of the raster data, four dot sizes.
pub const BITS_PER_DOT: u8 = 2;

/// A single self-contained unit of the command stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bytes sent as-is.
    Raw(Vec<u8>),
    /// `ESC` + code; the data length is implied by the code.
    Esc { code: Vec<u8>, data: Vec<u8> },
    /// `ESC (` + code + 16-bit length + data.
    EscParen { code: u8, data: Vec<u8> },
    /// Remote mode sub-command.
    Remote { code: [u8; 2], data: Option<Vec<u8>> },
}

fn u16_len(len: usize, what: &'static str) -> Result<[u8; 2], Error> {
    u16::try_from(len)
        .map(u16::to_le_bytes)
        .map_err(|_| Error::EncodingOverflow(what))
}

impl Command {
    /// Append the wire form of this command to `buf`.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        match self {
            Command::Raw(bytes) => buf.extend_from_slice(bytes),
            Command::Esc { code, data } => {
                buf.push(ESC);
                buf.extend_from_slice(code);
                buf.extend_from_slice(data);
            }
            Command::EscParen { code, data } => {
                let len = u16_len(data.len(), "ESC ( length")?;
                buf.extend_from_slice(&[ESC, b'(', *code]);
                buf.extend_from_slice(&len);
                buf.extend_from_slice(data);
            }
            Command::Remote { code, data } => {
                buf.extend_from_slice(code);
                match data {
                    Some(data) => {
                        let len = u16_len(data.len() + 1, "remote length")?;
                        buf.extend_from_slice(&len);
                        buf.push(0x00);
                        buf.extend_from_slice(data);
                    }
                    None => buf.extend_from_slice(&[0x00, 0x00]),
                }
            }
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        self.encode(&mut buf)?;
        Ok(buf)
    }

    fn esc(code: &[u8], data: &[u8]) -> Self {
        Command::Esc {
            code: code.to_vec(),
            data: data.to_vec(),
        }
    }

    fn esc_paren(code: u8, data: &[u8]) -> Self {
        Command::EscParen {
            code,
            data: data.to_vec(),
        }
    }

    fn remote(code: &[u8; 2], data: Option<&[u8]>) -> Self {
        Command::Remote {
            code: *code,
            data: data.map(<[u8]>::to_vec),
        }
    }

    /// Leave USB packet mode.
    pub fn exit_packet_mode() -> Self {
        Command::Raw(vec![0x00, 0x00, 0x00])
    }

    /// ESC 01 @EJL : switch to EJL / IEEE 1284.4 control.
    pub fn enter_ejl() -> Self {
        Self::esc(&[0x01], b"@EJL 1284.4\n@EJL     \n")
    }

    /// ESC @ : Initialize printer
    pub fn reset() -> Self {
        Self::esc(b"@", &[])
    }

    /// ESC ( R : Enter remote mode
    pub fn enter_remote() -> Self {
        Self::esc_paren(b'R', b"\x00REMOTE1")
    }

    /// ESC 00 00 00 : Exit remote mode
    pub fn exit_remote() -> Self {
        Self::esc(&[0x00], &[0x00, 0x00])
    }

    /// EX : Media position, the argument is a big-endian word.
    pub fn media_position() -> Self {
        let mut data = 5u32.to_be_bytes().to_vec();
        data.push(0x00);
        Self::remote(b"EX", Some(data.as_slice()))
    }

    /// AC : Enable or disable the auto cutter
    pub fn auto_cutter(enable: bool) -> Self {
        Self::remote(b"AC", Some(&[enable as u8][..]))
    }

    /// LD : Load power-on defaults
    pub fn load_defaults() -> Self {
        Self::remote(b"LD", None)
    }

    /// JE : End of job
    pub fn job_end() -> Self {
        Self::remote(b"JE", Some(&[0x00][..]))
    }

    /// ESC ( G : Select graphics mode
    pub fn graphics_mode() -> Self {
        Self::esc_paren(b'G', &[0x01])
    }

    /// ESC ( U : Set unit
    pub fn unit(unit: ResolutionUnit) -> Self {
        let mut data = vec![unit.page, unit.vertical, unit.horizontal];
        data.extend_from_slice(&unit.base.to_le_bytes());
        Self::esc_paren(b'U', &data)
    }

    /// ESC 19 : Paper loading / ejection
    pub fn paper_load() -> Self {
        Self::esc(&[0x19], b"1")
    }

    /// ESC ( C : Set page length in dots
    pub fn page_length(dots: u32) -> Self {
        Self::esc_paren(b'C', &dots.to_le_bytes())
    }

    /// ESC ( c : Set top and bottom of the printable area
    pub fn page_format(top: u32, bottom: u32) -> Self {
        let mut data = top.to_le_bytes().to_vec();
        data.extend_from_slice(&bottom.to_le_bytes());
        Self::esc_paren(b'c', &data)
    }

    /// ESC ( v : Relative vertical move
    pub fn vertical_feed(dots: u32) -> Self {
        Self::esc_paren(b'v', &dots.to_le_bytes())
    }

    /// ESC ( $ : Absolute horizontal position
    pub fn horizontal_position(dots: u32) -> Self {
        Self::esc_paren(b'$', &dots.to_le_bytes())
    }

    /// ESC i : Transfer raster image
    pub fn raster(header: RasterHeader, data: Vec<u8>) -> Self {
        let mut payload = header.to_bytes().to_vec();
        payload.extend(data);
        Command::Esc {
            code: vec![b'i'],
            data: payload,
        }
    }

    pub fn carriage_return() -> Self {
        Command::Raw(vec![CR])
    }

    pub fn form_feed() -> Self {
        Command::Raw(vec![FF])
    }
}

/// Parameters of an `ESC i` raster transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterHeader {
    pub ink: InkMask,
    pub compression: Compression,
    pub bits_per_dot: u8,
    pub row_bytes: u16,
    pub lines: u16,
}

impl RasterHeader {
    pub fn new(
        ink: InkMask,
        compression: Compression,
        row_bytes: usize,
        lines: usize,
    ) -> Result<Self, Error> {
        Ok(RasterHeader {
            ink,
            compression,
            bits_per_dot: BITS_PER_DOT,
            row_bytes: u16::try_from(row_bytes)
                .map_err(|_| Error::EncodingOverflow("raster row width"))?,
            lines: u16::try_from(lines).map_err(|_| Error::EncodingOverflow("raster lines"))?,
        })
    }

    pub fn to_bytes(&self) -> [u8; 7] {
        let w = self.row_bytes.to_le_bytes();
        let l = self.lines.to_le_bytes();
        [
            self.ink.bits(),
            self.compression.mode(),
            self.bits_per_dot,
            w[0],
            w[1],
            l[0],
            l[1],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(cmd: Command) -> Vec<u8> {
        cmd.to_bytes().unwrap()
    }

    #[test]
    fn escape_frames() {
        assert_eq!(bytes(Command::reset()), vec![0x1B, b'@']);
        assert_eq!(bytes(Command::exit_remote()), vec![0x1B, 0x00, 0x00, 0x00]);
        assert_eq!(bytes(Command::paper_load()), vec![0x1B, 0x19, b'1']);

        let ejl = bytes(Command::enter_ejl());
        assert_eq!(&ejl[..2], &[0x1B, 0x01]);
        assert_eq!(&ejl[2..], b"@EJL 1284.4\n@EJL     \n");
    }

    #[test]
    fn paren_frames_carry_length() {
        assert_eq!(
            bytes(Command::enter_remote()),
            b"\x1b(R\x08\x00\x00REMOTE1".to_vec()
        );
        assert_eq!(
            bytes(Command::graphics_mode()),
            vec![0x1B, b'(', b'G', 0x01, 0x00, 0x01]
        );
        assert_eq!(
            bytes(Command::page_format(7, 107)),
            vec![0x1B, b'(', b'c', 8, 0, 7, 0, 0, 0, 107, 0, 0, 0]
        );
        assert_eq!(
            bytes(Command::vertical_feed(180)),
            vec![0x1B, b'(', b'v', 4, 0, 180, 0, 0, 0]
        );
    }

    #[test]
    fn unit_frame() {
        let unit = ResolutionUnit {
            page: 8,
            vertical: 8,
            horizontal: 4,
            base: 1440,
        };
        assert_eq!(
            bytes(Command::unit(unit)),
            vec![0x1B, b'(', b'U', 5, 0, 8, 8, 4, 0xA0, 0x05]
        );
    }

    #[test]
    fn remote_frames() {
        assert_eq!(
            bytes(Command::media_position()),
            b"EX\x06\x00\x00\x00\x00\x00\x05\x00".to_vec()
        );
        assert_eq!(bytes(Command::auto_cutter(true)), b"AC\x02\x00\x00\x01".to_vec());
        assert_eq!(bytes(Command::auto_cutter(false)), b"AC\x02\x00\x00\x00".to_vec());
        assert_eq!(bytes(Command::load_defaults()), b"LD\x00\x00".to_vec());
        assert_eq!(bytes(Command::job_end()), b"JE\x02\x00\x00\x00".to_vec());
    }

    #[test]
    fn raster_frame() {
        let header = RasterHeader::new(
            InkMask::CYAN | InkMask::WEAVE,
            Compression::PackBits,
            90,
            2,
        )
        .unwrap();
        assert_eq!(
            bytes(Command::raster(header, vec![0xFE, 0x00])),
            vec![0x1B, b'i', 0x42, 1, 2, 90, 0, 2, 0, 0xFE, 0x00]
        );
    }

    #[test]
    fn overflowing_fields_are_rejected() {
        assert!(matches!(
            RasterHeader::new(InkMask::YELLOW, Compression::None, 70_000, 1),
            Err(Error::EncodingOverflow(_))
        ));
        let huge = Command::EscParen {
            code: b'x',
            data: vec![0; 65_536],
        };
        assert!(matches!(huge.to_bytes(), Err(Error::EncodingOverflow(_))));
    }
}
