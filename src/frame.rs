//! Self-delimiting bit framing.
//!
//! Every technique embeds the same frame layout:
//!
//! ```text
//! [32 bits] payload length in bits (big-endian u32)
//! [N bits ] payload, most-significant bit first per byte
//! ```
//!
//! Extraction reads the length field first and then consumes exactly the
//! declared number of bits, so no out-of-band length is ever needed.

use thiserror::Error;

/// Width of the length field in bits.
pub const LENGTH_PREFIX_BITS: usize = 32;

/// Largest payload (in bits) the length field can describe.
pub const MAX_PAYLOAD_BITS: u64 = u32::MAX as u64;

/// Upper bound for the up-front allocation when decoding a declared length.
/// A corrupted prefix may claim gigabits; the vector grows only as bits arrive.
const PREALLOC_LIMIT: usize = 1 << 16;

/// Errors raised while framing or unframing a bit stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    #[error("payload of {bits} bits exceeds the {max}-bit limit of the length field")]
    PayloadTooLarge { bits: u64, max: u64 },

    #[error("truncated length prefix: need 32 bits, found {available}")]
    TruncatedPrefix { available: usize },

    #[error("length prefix declares {declared} payload bits but only {available} follow it")]
    Truncated { declared: u64, available: usize },

    #[error("declared payload of {bits} bits is not a whole number of bytes")]
    PartialByte { bits: u64 },
}

/// Total number of framed bits for a payload of `payload_bits` bits.
pub fn framed_len(payload_bits: usize) -> usize {
    LENGTH_PREFIX_BITS + payload_bits
}

/// Expands bytes into bits, most-significant bit first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1 == 1);
        }
    }
    bits
}

/// Packs bits back into bytes, most-significant bit first.
/// A trailing partial byte is zero-padded on the right.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << (7 - i)))
        })
        .collect()
}

/// Builds the 32-bit length field for a payload of `bits` bits.
pub fn length_prefix(bits: u64) -> Result<[bool; LENGTH_PREFIX_BITS], FramingError> {
    if bits > MAX_PAYLOAD_BITS {
        return Err(FramingError::PayloadTooLarge {
            bits,
            max: MAX_PAYLOAD_BITS,
        });
    }

    let value = bits as u32;
    let mut prefix = [false; LENGTH_PREFIX_BITS];
    for (i, slot) in prefix.iter_mut().enumerate() {
        *slot = (value >> (LENGTH_PREFIX_BITS - 1 - i)) & 1 == 1;
    }
    Ok(prefix)
}

/// Frames an arbitrary bit sequence: length prefix followed by the bits.
pub fn frame_bits(payload: &[bool]) -> Result<Vec<bool>, FramingError> {
    let prefix = length_prefix(payload.len() as u64)?;

    let mut framed = Vec::with_capacity(framed_len(payload.len()));
    framed.extend_from_slice(&prefix);
    framed.extend_from_slice(payload);
    Ok(framed)
}

/// Frames a byte payload.
pub fn encode(payload: &[u8]) -> Result<Vec<bool>, FramingError> {
    frame_bits(&bytes_to_bits(payload))
}

/// Reads a framed stream and returns exactly the declared payload bits.
///
/// The input is consumed lazily; bits after the declared payload are never
/// read, so callers may pass an iterator over every unit of a stego text.
pub fn unframe_bits<I>(bits: I) -> Result<Vec<bool>, FramingError>
where
    I: IntoIterator<Item = bool>,
{
    let mut iter = bits.into_iter();

    let mut declared: u64 = 0;
    for read in 0..LENGTH_PREFIX_BITS {
        match iter.next() {
            Some(bit) => declared = (declared << 1) | bit as u64,
            None => return Err(FramingError::TruncatedPrefix { available: read }),
        }
    }

    let mut payload = Vec::with_capacity((declared as usize).min(PREALLOC_LIMIT));
    while (payload.len() as u64) < declared {
        match iter.next() {
            Some(bit) => payload.push(bit),
            None => {
                return Err(FramingError::Truncated {
                    declared,
                    available: payload.len(),
                })
            }
        }
    }

    Ok(payload)
}

/// Reads a framed stream and returns the payload bytes.
pub fn decode<I>(bits: I) -> Result<Vec<u8>, FramingError>
where
    I: IntoIterator<Item = bool>,
{
    let payload = unframe_bits(bits)?;
    if payload.len() % 8 != 0 {
        return Err(FramingError::PartialByte {
            bits: payload.len() as u64,
        });
    }
    Ok(bits_to_bytes(&payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_bits_msb_first() {
        assert_eq!(
            bytes_to_bits(&[0x05]),
            vec![false, false, false, false, false, true, false, true]
        );
        assert_eq!(bits_to_bytes(&bytes_to_bits(&[0xA5, 0x3C])), vec![0xA5, 0x3C]);
    }

    #[test]
    fn test_single_byte_frame_layout() {
        let framed = encode(&[0x05]).unwrap();
        assert_eq!(framed.len(), 40);

        // Length field is 8, big-endian.
        let prefix: Vec<bool> = framed[..32].to_vec();
        let expected_prefix = length_prefix(8).unwrap();
        assert_eq!(prefix, expected_prefix.to_vec());
        assert!(framed[28]);
        assert_eq!(framed[..28].iter().filter(|b| **b).count(), 0);

        assert_eq!(decode(framed).unwrap(), vec![0x05]);
    }

    #[test]
    fn test_empty_payload() {
        let framed = encode(&[]).unwrap();
        assert_eq!(framed, vec![false; 32]);
        assert_eq!(decode(framed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_trailing_bits_are_ignored() {
        let mut framed = encode(b"hi").unwrap();
        framed.extend([true, false, true, true]);
        assert_eq!(decode(framed).unwrap(), b"hi".to_vec());
    }

    #[test]
    fn test_truncated_payload() {
        let mut framed = encode(b"abc").unwrap();
        framed.truncate(framed.len() - 1);

        assert_eq!(
            decode(framed),
            Err(FramingError::Truncated {
                declared: 24,
                available: 23
            })
        );
    }

    #[test]
    fn test_truncated_prefix() {
        assert_eq!(
            unframe_bits(vec![false; 10]),
            Err(FramingError::TruncatedPrefix { available: 10 })
        );
    }

    #[test]
    fn test_partial_byte_rejected_by_byte_decode() {
        let framed = frame_bits(&[true, false, true]).unwrap();
        assert_eq!(unframe_bits(framed.clone()).unwrap(), vec![true, false, true]);
        assert_eq!(decode(framed), Err(FramingError::PartialByte { bits: 3 }));
    }

    #[test]
    fn test_max_length_field() {
        let prefix = length_prefix(MAX_PAYLOAD_BITS).unwrap();
        assert!(prefix.iter().all(|b| *b));

        // A maximal declaration with nothing behind it fails without allocating gigabits.
        assert_eq!(
            unframe_bits(prefix),
            Err(FramingError::Truncated {
                declared: MAX_PAYLOAD_BITS,
                available: 0
            })
        );

        assert_eq!(
            length_prefix(MAX_PAYLOAD_BITS + 1),
            Err(FramingError::PayloadTooLarge {
                bits: MAX_PAYLOAD_BITS + 1,
                max: MAX_PAYLOAD_BITS
            })
        );
    }

    #[test]
    fn test_large_payload_roundtrip() {
        let payload: Vec<u8> = (0..64 * 1024).map(|i| (i * 31 % 251) as u8).collect();
        let framed = encode(&payload).unwrap();
        assert_eq!(framed.len(), framed_len(payload.len() * 8));
        assert_eq!(decode(framed).unwrap(), payload);
    }
}
