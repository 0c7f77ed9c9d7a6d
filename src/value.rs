// On-demand reinterpretation of raw value bytes.
//
// A container does not record value types, so a stored span can only be
// read back under an interpretation the caller picks. Every function here is
// pure and takes nothing but the span.
//
// Failure tiers:
//   - integer and float interpretations fail hard (`ReinterpretError`) when
//     the span cannot hold the requested type
//   - bool, string and bytes interpretations never fail; they return a
//     sentinel (`None`, or an empty remainder) instead

use std::fmt;
use std::str::FromStr;

use crate::container::varint::{self, Width};
use crate::hex;

/// Size of a little-endian IEEE-754 double.
pub const FLOAT64_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Interpretation kinds
// ---------------------------------------------------------------------------

/// How to read a raw value span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interpretation {
    #[default]
    HexString,
    Utf8String,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Bytes,
    Float64,
    Bool,
}

impl Interpretation {
    /// All kinds, in rotation order.
    pub const ALL: [Interpretation; 9] = [
        Interpretation::HexString,
        Interpretation::Utf8String,
        Interpretation::Int32,
        Interpretation::UInt32,
        Interpretation::Int64,
        Interpretation::UInt64,
        Interpretation::Bytes,
        Interpretation::Float64,
        Interpretation::Bool,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Interpretation::HexString => "hex",
            Interpretation::Utf8String => "string",
            Interpretation::Int32 => "int32",
            Interpretation::UInt32 => "uint32",
            Interpretation::Int64 => "int64",
            Interpretation::UInt64 => "uint64",
            Interpretation::Bytes => "bytes",
            Interpretation::Float64 => "float64",
            Interpretation::Bool => "bool",
        }
    }

    /// The following kind in rotation order, wrapping after the last.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interpretation '{0}'")]
pub struct UnknownInterpretation(pub String);

impl FromStr for Interpretation {
    type Err = UnknownInterpretation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownInterpretation(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReinterpretError {
    /// The span does not contain a complete varint.
    #[error("no complete varint in {len}-byte value")]
    Truncated { len: usize },
    /// A fixed-width interpretation was applied to a span of the wrong size.
    #[error("{kind} needs exactly {expected} bytes, value has {actual}")]
    LengthMismatch {
        kind: Interpretation,
        expected: usize,
        actual: usize,
    },
}

// ---------------------------------------------------------------------------
// Reinterpretation functions
// ---------------------------------------------------------------------------

/// Lowercase hex of the raw span.
pub fn as_hex_string(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// `[0x01]` is true, `[0x00]` is false; anything else is unrecognized (`None`).
pub fn as_bool(bytes: &[u8]) -> Option<bool> {
    match bytes {
        [0x01] => Some(true),
        [0x00] => Some(false),
        _ => None,
    }
}

pub fn as_int32(bytes: &[u8]) -> Result<i32, ReinterpretError> {
    let (val, _) = varint::decode_signed(bytes, 0, Width::W32).map_err(|_| truncated(bytes))?;
    Ok(val as i32)
}

pub fn as_uint32(bytes: &[u8]) -> Result<u32, ReinterpretError> {
    let (val, _) = varint::decode_unsigned(bytes, 0, Width::W32).map_err(|_| truncated(bytes))?;
    Ok(val as u32)
}

pub fn as_int64(bytes: &[u8]) -> Result<i64, ReinterpretError> {
    let (val, _) = varint::decode_signed(bytes, 0, Width::W64).map_err(|_| truncated(bytes))?;
    Ok(val)
}

pub fn as_uint64(bytes: &[u8]) -> Result<u64, ReinterpretError> {
    let (val, _) = varint::decode_unsigned(bytes, 0, Width::W64).map_err(|_| truncated(bytes))?;
    Ok(val)
}

/// Little-endian IEEE-754 double. The span must be exactly 8 bytes.
pub fn as_float64(bytes: &[u8]) -> Result<f64, ReinterpretError> {
    let raw: [u8; FLOAT64_LEN] = bytes
        .try_into()
        .map_err(|_| ReinterpretError::LengthMismatch {
            kind: Interpretation::Float64,
            expected: FLOAT64_LEN,
            actual: bytes.len(),
        })?;
    Ok(f64::from_le_bytes(raw))
}

/// Strip the embedded length prefix and decode the rest as UTF-8.
///
/// Returns `None` when there is no decodable prefix or the remainder is not
/// valid UTF-8.
pub fn as_utf8_string(bytes: &[u8]) -> Option<&str> {
    let payload = strip_length_prefix(bytes)?;
    std::str::from_utf8(payload).ok()
}

/// Strip the embedded length prefix and return the rest verbatim.
///
/// A span with no decodable prefix yields an empty slice.
pub fn as_bytes(bytes: &[u8]) -> &[u8] {
    strip_length_prefix(bytes).unwrap_or_default()
}

/// Remainder after the leading 32-bit length varint. The prefix value itself
/// is not checked against the remainder length.
fn strip_length_prefix(bytes: &[u8]) -> Option<&[u8]> {
    let (_, consumed) = varint::read_length(bytes, 0).ok()?;
    bytes.get(consumed..)
}

fn truncated(bytes: &[u8]) -> ReinterpretError {
    ReinterpretError::Truncated { len: bytes.len() }
}

// ---------------------------------------------------------------------------
// Tagged view
// ---------------------------------------------------------------------------

/// A reinterpreted value.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<'a> {
    Hex(String),
    /// `None` when the payload is not valid UTF-8.
    Utf8(Option<&'a str>),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Bytes(&'a [u8]),
    Float64(f64),
    /// `None` when the span is neither `0x00` nor `0x01`.
    Bool(Option<bool>),
}

impl fmt::Display for Decoded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoded::Hex(s) => f.write_str(s),
            Decoded::Utf8(Some(s)) => f.write_str(s),
            Decoded::Utf8(None) => f.write_str("<undecodable>"),
            Decoded::Int32(v) => write!(f, "{v}"),
            Decoded::UInt32(v) => write!(f, "{v}"),
            Decoded::Int64(v) => write!(f, "{v}"),
            Decoded::UInt64(v) => write!(f, "{v}"),
            Decoded::Bytes(b) => write!(f, "{}", b.escape_ascii()),
            Decoded::Float64(v) => write!(f, "{v}"),
            Decoded::Bool(Some(v)) => write!(f, "{v}"),
            Decoded::Bool(None) => f.write_str("<unrecognized>"),
        }
    }
}

/// A raw value span paired with the interpretation to read it under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueView<'a> {
    bytes: &'a [u8],
    kind: Interpretation,
}

impl<'a> ValueView<'a> {
    pub fn new(bytes: &'a [u8], kind: Interpretation) -> Self {
        Self { bytes, kind }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn kind(&self) -> Interpretation {
        self.kind
    }

    /// The same span under the next interpretation in rotation order.
    pub fn rotate(self) -> Self {
        Self {
            kind: self.kind.next(),
            ..self
        }
    }

    pub fn with_kind(self, kind: Interpretation) -> Self {
        Self { kind, ..self }
    }

    pub fn decode(&self) -> Result<Decoded<'a>, ReinterpretError> {
        let b = self.bytes;
        Ok(match self.kind {
            Interpretation::HexString => Decoded::Hex(as_hex_string(b)),
            Interpretation::Utf8String => Decoded::Utf8(as_utf8_string(b)),
            Interpretation::Int32 => Decoded::Int32(as_int32(b)?),
            Interpretation::UInt32 => Decoded::UInt32(as_uint32(b)?),
            Interpretation::Int64 => Decoded::Int64(as_int64(b)?),
            Interpretation::UInt64 => Decoded::UInt64(as_uint64(b)?),
            Interpretation::Bytes => Decoded::Bytes(as_bytes(b)),
            Interpretation::Float64 => Decoded::Float64(as_float64(b)?),
            Interpretation::Bool => Decoded::Bool(as_bool(b)),
        })
    }
}

/// Renders the decoded value, or the failure in angle brackets.
impl fmt::Display for ValueView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.decode() {
            Ok(decoded) => write!(f, "{decoded}"),
            Err(e) => write!(f, "<{e}>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
