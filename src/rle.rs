//! PackBits style run-length coding of raster data.
//!
//! A control byte `n` in 0..=127 is followed by `n + 1` literal bytes. A
//! control byte in 129..=255 is followed by one byte repeated `257 - n`
//! times. 128 is never produced.

use crate::error::Error;

const MAX_BLOCK: usize = 128;

/// Compression mode byte of the `ESC i` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None = 0,
    PackBits = 1,
}

impl Compression {
    pub fn mode(self) -> u8 {
        self as u8
    }
}

/// Encode `data` with `mode`. `Compression::None` returns it unchanged.
pub fn compress(mode: Compression, data: &[u8]) -> Vec<u8> {
    match mode {
        Compression::None => data.to_vec(),
        Compression::PackBits => pack_bits(data),
    }
}

fn flush_literal(out: &mut Vec<u8>, literal: &mut Vec<u8>) {
    if literal.is_empty() {
        return;
    }
    debug_assert!(literal.len() <= MAX_BLOCK);
    out.push((literal.len() - 1) as u8);
    out.append(literal);
}

fn pack_bits(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / MAX_BLOCK + 1);
    let mut literal: Vec<u8> = Vec::with_capacity(MAX_BLOCK);
    let mut i = 0;

    while i < data.len() {
        let value = data[i];
        let mut run = 1;
        while run < MAX_BLOCK && i + run < data.len() && data[i + run] == value {
            run += 1;
        }

        // a run of two costs as much as two literals
        if run > 2 {
            flush_literal(&mut out, &mut literal);
            out.push((257 - run) as u8);
            out.push(value);
            i += run;
        } else {
            literal.push(value);
            i += 1;
            if literal.len() == MAX_BLOCK {
                flush_literal(&mut out, &mut literal);
            }
        }
    }
    flush_literal(&mut out, &mut literal);

    out
}

/// Decode a PackBits stream produced by `compress`.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut i = 0;

    while i < data.len() {
        let control = data[i] as usize;
        match control {
            0..=127 => {
                let end = i + 1 + control + 1;
                if end > data.len() {
                    return Err(Error::CorruptRunLength(i));
                }
                out.extend_from_slice(&data[i + 1..end]);
                i = end;
            }
            128 => return Err(Error::CorruptRunLength(i)),
            _ => {
                let value = *data.get(i + 1).ok_or(Error::CorruptRunLength(i))?;
                out.extend(std::iter::repeat(value).take(257 - control));
                i += 2;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(data: &[u8]) {
        let packed = compress(Compression::PackBits, data);
        assert_eq!(decompress(&packed).unwrap(), data);
        let bound = data.len() + (data.len() + MAX_BLOCK - 1) / MAX_BLOCK;
        assert!(
            packed.len() <= bound,
            "{} bytes packed to {} (bound {})",
            data.len(),
            packed.len(),
            bound
        );
    }

    #[test]
    fn passthrough() {
        let data = vec![1, 1, 1, 1, 2, 3];
        assert_eq!(compress(Compression::None, &data), data);
    }

    #[test]
    fn empty_and_single() {
        assert!(compress(Compression::PackBits, &[]).is_empty());
        assert_eq!(compress(Compression::PackBits, &[0x42]), vec![0x00, 0x42]);
        round_trip(&[]);
        round_trip(&[0x42]);
    }

    #[test]
    fn pairs_stay_literal() {
        assert_eq!(
            compress(Compression::PackBits, &[5, 5, 6, 6]),
            vec![0x03, 5, 5, 6, 6]
        );
    }

    #[test]
    fn three_repeat() {
        assert_eq!(
            compress(Compression::PackBits, &[1, 2, 7, 7, 7, 3]),
            vec![0x01, 1, 2, 254, 7, 0x00, 3]
        );
    }

    #[test]
    fn long_run_is_split_at_128() {
        let data = vec![0xAA; 300];
        let packed = compress(Compression::PackBits, &data);
        // 128 + 128 + 44
        assert_eq!(packed, vec![129, 0xAA, 129, 0xAA, 213, 0xAA]);
        assert!(!packed.iter().step_by(2).any(|&c| c == 128));
        round_trip(&data);
    }

    #[test]
    fn long_literal_is_split_at_128() {
        let data: Vec<u8> = (0..300).map(|i| (i % 251) as u8).collect();
        let packed = compress(Compression::PackBits, &data);
        assert_eq!(packed[0], 127);
        assert_eq!(packed[129], 127);
        assert_eq!(packed[258], 43);
        assert_eq!(packed.len(), 300 + 3);
        round_trip(&data);
    }

    #[test]
    fn mixed_content_round_trips() {
        let mut data = Vec::new();
        for i in 0..40u32 {
            data.extend(std::iter::repeat((i * 7) as u8).take((i % 5) as usize + 1));
            data.extend((0..i % 9).map(|j| (i + j) as u8));
        }
        data.extend(vec![0u8; 129]);
        data.push(1);
        round_trip(&data);
    }

    #[test]
    fn decoder_rejects_bad_input() {
        assert!(matches!(decompress(&[128, 0]), Err(Error::CorruptRunLength(0))));
        assert!(matches!(decompress(&[2, 1]), Err(Error::CorruptRunLength(0))));
        assert!(matches!(decompress(&[0, 1, 200]), Err(Error::CorruptRunLength(2))));
    }
}
