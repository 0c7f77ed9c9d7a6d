// Protobuf-style base-128 variable-length integers.
//
// Little-endian: least-significant 7-bit group first. Each byte has bit 7
// set except the final byte. Signed values are NOT zigzag encoded: a negative
// integer is written as the full 64-bit two's-complement pattern (10 bytes)
// and recovered by masking to the requested width.

/// Maximum encoded length for a 64-bit value (ceil(64/7) = 10).
pub const MAX_VARINT_LEN: usize = 10;

// ---------------------------------------------------------------------------
// Width
// ---------------------------------------------------------------------------

/// Bit width a decoded varint is masked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    W32,
    W64,
}

impl Width {
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Width::W32 => 32,
            Width::W64 => 64,
        }
    }

    #[inline]
    const fn mask(self) -> u64 {
        match self {
            Width::W32 => u32::MAX as u64,
            Width::W64 => u64::MAX,
        }
    }
}

// ---------------------------------------------------------------------------
// Decoded value
// ---------------------------------------------------------------------------

/// Result of a width-masked decode, tagged with the requested signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintValue {
    Unsigned(u64),
    Signed(i64),
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VarintError {
    /// The buffer ended before a terminating byte was found.
    #[error("varint truncated (no terminating byte before end of input)")]
    Truncated,
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Accumulate the raw 64-bit value of the varint starting at `pos`.
///
/// Groups beyond bit 63 are discarded rather than rejected, so over-long
/// encodings still terminate cleanly. Returns `(value, bytes_consumed)`.
fn read_raw(data: &[u8], pos: usize) -> Result<(u64, usize), VarintError> {
    let tail = data.get(pos..).ok_or(VarintError::Truncated)?;
    let mut val: u64 = 0;
    let mut shift: u32 = 0;
    for (i, &byte) in tail.iter().enumerate() {
        if shift < u64::BITS {
            val |= u64::from(byte & 0x7F) << shift;
        }
        if byte & 0x80 == 0 {
            return Ok((val, i + 1));
        }
        shift = shift.saturating_add(7);
    }
    Err(VarintError::Truncated)
}

/// Decode an unsigned varint at `pos`, masked to `width` bits.
pub fn decode_unsigned(data: &[u8], pos: usize, width: Width) -> Result<(u64, usize), VarintError> {
    let (raw, len) = read_raw(data, pos)?;
    Ok((raw & width.mask(), len))
}

/// Decode a varint at `pos` as a two's-complement integer of `width` bits.
pub fn decode_signed(data: &[u8], pos: usize, width: Width) -> Result<(i64, usize), VarintError> {
    let (raw, len) = read_raw(data, pos)?;
    let val = match width {
        Width::W32 => i64::from(raw as u32 as i32),
        Width::W64 => raw as i64,
    };
    Ok((val, len))
}

/// Decode a varint at `pos` with the given width and signedness.
pub fn decode_varint(
    data: &[u8],
    pos: usize,
    width: Width,
    signed: bool,
) -> Result<(VarintValue, usize), VarintError> {
    if signed {
        decode_signed(data, pos, width).map(|(v, len)| (VarintValue::Signed(v), len))
    } else {
        decode_unsigned(data, pos, width).map(|(v, len)| (VarintValue::Unsigned(v), len))
    }
}

/// Decode a 32-bit length field at `pos`.
#[inline]
pub fn read_length(data: &[u8], pos: usize) -> Result<(u32, usize), VarintError> {
    let (val, len) = decode_unsigned(data, pos, Width::W32)?;
    Ok((val as u32, len))
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a `u64` into `buf`, least-significant group first.
/// Returns the number of bytes written (1..=10).
#[inline]
pub fn encode_u64(mut num: u64, buf: &mut [u8; MAX_VARINT_LEN]) -> usize {
    let mut i = 0;
    loop {
        let byte = (num & 0x7F) as u8;
        num >>= 7;
        if num == 0 {
            buf[i] = byte;
            return i + 1;
        }
        buf[i] = byte | 0x80;
        i += 1;
    }
}

/// Encode an `i64` as its 64-bit two's-complement pattern.
/// Negative values always take 10 bytes.
#[inline]
pub fn encode_i64(num: i64, buf: &mut [u8; MAX_VARINT_LEN]) -> usize {
    encode_u64(num as u64, buf)
}

/// Encode a `u64` and append it to `out`.
pub fn push_u64(out: &mut Vec<u8>, num: u64) {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let len = encode_u64(num, &mut buf);
    out.extend_from_slice(&buf[..len]);
}

/// Return the encoded byte-length of a `u64` value.
#[inline]
pub fn encoded_len(num: u64) -> usize {
    let bits = 64 - num.leading_zeros();
    bits.max(1).div_ceil(7) as usize
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
