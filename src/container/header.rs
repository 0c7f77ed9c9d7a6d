// Container prelude: declared size plus an opaque trailer.
//
// The first four bytes are a little-endian u32 giving the declared size,
// which bounds the record scan in absolute buffer offsets. What follows the
// size field differs between observed container versions, so the layout is
// chosen by the caller (see `HeaderLayout`).

use std::fmt;
use std::str::FromStr;

use super::varint::{self, Width};

/// Length of the little-endian declared-size field.
pub const SIZE_FIELD_LEN: usize = 4;

/// Scan bound used when the declared size was never populated (zero).
pub const DEFAULT_FALLBACK_BOUND: usize = u32::MAX as usize;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// On-disk shape of the prelude that precedes the first record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeaderLayout {
    /// Size field followed by a single varint (commonly `ff ff ff 07`).
    #[default]
    SizeThenVarint,
    /// Size field followed by opaque bytes, `n` bytes in total.
    Fixed(usize),
}

impl fmt::Display for HeaderLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeThenVarint => f.write_str("size-varint"),
            Self::Fixed(n) => write!(f, "fixed{n}"),
        }
    }
}

impl FromStr for HeaderLayout {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("size-varint") {
            return Ok(Self::SizeThenVarint);
        }
        let len = s
            .strip_prefix("fixed")
            .and_then(|n| n.parse::<usize>().ok())
            .ok_or_else(|| HeaderError::UnknownLayout(s.to_string()))?;
        if len < SIZE_FIELD_LEN {
            return Err(HeaderError::InvalidLayout(len));
        }
        Ok(Self::Fixed(len))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    /// The buffer ends inside the prelude.
    #[error("container too short for header: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },
    /// A fixed layout shorter than the size field.
    #[error("header length {0} is shorter than the 4-byte size field")]
    InvalidLayout(usize),
    #[error("unknown header layout '{0}' (expected size-varint or fixedN)")]
    UnknownLayout(String),
}

// ---------------------------------------------------------------------------
// Parsed header
// ---------------------------------------------------------------------------

/// Parsed container prelude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Declared container size; exclusive scan bound in absolute offsets.
    pub declared_size: u32,
    /// Bytes consumed by the prelude; the first record starts here.
    pub header_length: u32,
    /// The varint following the size field, for `SizeThenVarint` layouts.
    pub reserved: Option<u64>,
}

impl ContainerHeader {
    /// A zero declared size means the writer never filled the field in.
    #[inline]
    pub fn is_size_degenerate(&self) -> bool {
        self.declared_size == 0
    }

    /// Exclusive cursor bound for the record scan.
    #[inline]
    pub fn scan_bound(&self, fallback: usize) -> usize {
        if self.is_size_degenerate() {
            fallback
        } else {
            self.declared_size as usize
        }
    }
}

/// Read the prelude using the default layout.
pub fn read_header(buf: &[u8]) -> Result<ContainerHeader, HeaderError> {
    read_header_with(buf, HeaderLayout::default())
}

/// Read the prelude using an explicit layout.
pub fn read_header_with(buf: &[u8], layout: HeaderLayout) -> Result<ContainerHeader, HeaderError> {
    let size_bytes: [u8; SIZE_FIELD_LEN] = buf
        .get(..SIZE_FIELD_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or(HeaderError::Truncated {
            needed: SIZE_FIELD_LEN,
            available: buf.len(),
        })?;
    let declared_size = u32::from_le_bytes(size_bytes);

    let (header_length, reserved) = match layout {
        HeaderLayout::SizeThenVarint => {
            let (val, len) = varint::decode_unsigned(buf, SIZE_FIELD_LEN, Width::W64).map_err(
                |_| HeaderError::Truncated {
                    needed: buf.len() + 1,
                    available: buf.len(),
                },
            )?;
            (SIZE_FIELD_LEN + len, Some(val))
        }
        HeaderLayout::Fixed(len) => {
            if len < SIZE_FIELD_LEN {
                return Err(HeaderError::InvalidLayout(len));
            }
            if buf.len() < len {
                return Err(HeaderError::Truncated {
                    needed: len,
                    available: buf.len(),
                });
            }
            (len, None)
        }
    };

    let header_length =
        u32::try_from(header_length).map_err(|_| HeaderError::InvalidLayout(header_length))?;

    log::debug!(
        "header: declared_size={declared_size} header_length={header_length} layout={layout}"
    );

    Ok(ContainerHeader {
        declared_size,
        header_length,
        reserved,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
