// src/utils.rs
use crate::error::{NfcError, Result};

/// Decodes the 1-3 byte UTF-8 subset used by NDEF well-known records.
///
/// A UTF-8 BOM at the start of the buffer is skipped. A multi-byte sequence
/// truncated at the end of the buffer fails the whole decode.
pub fn decode_utf8(bytes: &[u8]) -> Result<String> {
    let mut result = String::new();
    let mut i = 0;

    // BOM check
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        i = 3;
    }

    while i < bytes.len() {
        let c = bytes[i];

        let code_point = if c < 0x80 {
            i += 1;
            c as u32
        } else if (0xC0..=0xDF).contains(&c) {
            if i + 1 >= bytes.len() {
                return Err(truncated());
            }
            let c2 = bytes[i + 1];
            i += 2;
            (((c & 0x1F) as u32) << 6) | ((c2 & 0x3F) as u32)
        } else {
            if i + 2 >= bytes.len() {
                return Err(truncated());
            }
            let c2 = bytes[i + 1];
            let c3 = bytes[i + 2];
            i += 3;
            (((c & 0x0F) as u32) << 12) | (((c2 & 0x3F) as u32) << 6) | ((c3 & 0x3F) as u32)
        };

        let ch = char::from_u32(code_point)
            .ok_or_else(|| NfcError::Decode(format!("invalid code point {:#06x}", code_point)))?;
        result.push(ch);
    }

    Ok(result)
}

/// Encodes a string as UTF-8, the inverse of [`decode_utf8`].
///
/// Code points above U+FFFF take the standard 4-byte form, which is outside
/// the subset the decoder handles.
pub fn encode_utf8(input: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(input.len());
    for ch in input.chars() {
        let c = ch as u32;
        if c < 0x80 {
            bytes.push(c as u8);
        } else if c < 0x800 {
            bytes.push(((c >> 6) | 0xC0) as u8);
            bytes.push(((c & 0x3F) | 0x80) as u8);
        } else if c < 0x10000 {
            bytes.push(((c >> 12) | 0xE0) as u8);
            bytes.push((((c >> 6) & 0x3F) | 0x80) as u8);
            bytes.push(((c & 0x3F) | 0x80) as u8);
        } else {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        }
    }
    bytes
}

fn truncated() -> NfcError {
    NfcError::Decode("UTF-8 stream truncated".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_roundtrip() {
        let encoded = encode_utf8("hello world");
        assert_eq!(encoded, b"hello world");
        assert_eq!(decode_utf8(&encoded).unwrap(), "hello world");
    }

    #[test]
    fn two_byte_roundtrip() {
        let encoded = encode_utf8("café");
        assert_eq!(encoded, "café".as_bytes());
        assert_eq!(decode_utf8(&encoded).unwrap(), "café");
    }

    #[test]
    fn three_byte_roundtrip() {
        let text = "日本語";
        let encoded = encode_utf8(text);
        assert_eq!(encoded, text.as_bytes());
        assert_eq!(decode_utf8(&encoded).unwrap(), text);
    }

    #[test]
    fn bom_is_skipped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"tag");
        assert_eq!(decode_utf8(&bytes).unwrap(), "tag");
    }

    #[test]
    fn truncated_two_byte_sequence_fails() {
        let err = decode_utf8(&[b'a', 0xC3]).unwrap_err();
        assert!(matches!(err, NfcError::Decode(_)));
    }

    #[test]
    fn truncated_three_byte_sequence_fails() {
        let err = decode_utf8(&[0xE6, 0x97]).unwrap_err();
        assert!(matches!(err, NfcError::Decode(_)));
    }

    #[test]
    fn empty_input() {
        assert_eq!(decode_utf8(&[]).unwrap(), "");
        assert_eq!(encode_utf8(""), Vec::<u8>::new());
    }
}
