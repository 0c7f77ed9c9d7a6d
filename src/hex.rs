// Hexadecimal text <-> bytes.
//
// Containers arrive either as raw bytes or as their hex encoding; everything
// downstream works on bytes, so hex input is canonicalized here first. Dumps
// are often wrapped (`xxd -p`) or byte-spaced, so ASCII whitespace anywhere
// in the text is ignored.

pub use ::hex::FromHexError;

/// Lowercase hex encoding of `bytes`.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    ::hex::encode(bytes)
}

/// Decode hex text into bytes, skipping ASCII whitespace.
pub fn decode(text: impl AsRef<[u8]>) -> Result<Vec<u8>, FromHexError> {
    let digits: Vec<u8> = text
        .as_ref()
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    ::hex::decode(digits)
}

/// True when `bytes`, ignoring ASCII whitespace, is non-empty and consists
/// only of hex digits.
pub fn looks_like_hex(bytes: &[u8]) -> bool {
    let mut digits = bytes.iter().filter(|b| !b.is_ascii_whitespace()).peekable();
    digits.peek().is_some() && digits.all(u8::is_ascii_hexdigit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_lowercase() {
        assert_eq!(encode([0x00u8, 0xAB, 0x7F, 0xFF]), "00ab7fff");
        assert_eq!(encode([0u8; 0]), "");
    }

    #[test]
    fn decode_accepts_mixed_case() {
        assert_eq!(decode("dC22"), Ok(vec![0xDC, 0x22]));
        assert_eq!(decode(""), Ok(vec![]));
    }

    #[test]
    fn decode_skips_interior_whitespace() {
        assert_eq!(decode("d7 00 00 00"), Ok(vec![0xD7, 0x00, 0x00, 0x00]));
        assert_eq!(decode("  d700\n0000\r\n\tff\n"), Ok(vec![0xD7, 0x00, 0x00, 0x00, 0xFF]));
    }

    #[test]
    fn decode_errors() {
        assert_eq!(decode("abc"), Err(FromHexError::OddLength));
        assert_eq!(
            decode("0g"),
            Err(FromHexError::InvalidHexCharacter { c: 'g', index: 1 })
        );
    }

    #[test]
    fn hex_detection() {
        assert!(looks_like_hex(b"d7000000ffffff07\n"));
        assert!(looks_like_hex(b"d7000000\nffffff07\n"));
        assert!(looks_like_hex(b"d7 00 00 00"));
        assert!(!looks_like_hex(b"   "));
        assert!(!looks_like_hex(b"d7 00 zz"));
        assert!(!looks_like_hex(&[0xD7, 0x00, 0x00, 0x00]));
    }
}
