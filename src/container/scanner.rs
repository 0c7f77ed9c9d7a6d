// Best-effort record scanner.
//
// Walks `<key len varint><key utf8><value len varint><value bytes>` records
// from the end of the prelude up to the header's scan bound. The scan never
// fails: truncation or a malformed key simply ends it, and everything decoded
// up to that point is kept.
//
// Two record shapes are special:
//   - a zero-length key is the end-of-log marker
//   - a value length encoded as the single byte 0x00 is a tombstone (the key
//     was removed); nothing is recorded for it

use super::header::{ContainerHeader, DEFAULT_FALLBACK_BOUND};
use super::store::DecodedStore;
use super::varint::{self, VarintError};

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Forward-only read position over a borrowed buffer.
#[derive(Debug, Clone)]
struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    #[inline]
    fn position(&self) -> usize {
        self.pos
    }

    /// Read a 32-bit length varint. Returns `(length, bytes_consumed)`.
    fn read_length(&mut self) -> Result<(u32, usize), VarintError> {
        let (len, consumed) = varint::read_length(self.buf, self.pos)?;
        self.pos += consumed;
        Ok((len, consumed))
    }

    /// Take exactly `n` bytes, or nothing if fewer remain.
    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let bytes = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }
}

// ---------------------------------------------------------------------------
// Records and outcome
// ---------------------------------------------------------------------------

/// One record observed during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record<'a> {
    /// A key/value write. `offset` is where the record starts.
    Entry {
        key: &'a str,
        value: &'a [u8],
        offset: usize,
    },
    /// A removal marker for `key`.
    Tombstone { key: &'a str, offset: usize },
}

impl<'a> Record<'a> {
    pub fn key(&self) -> &'a str {
        match *self {
            Record::Entry { key, .. } | Record::Tombstone { key, .. } => key,
        }
    }

    pub fn offset(&self) -> usize {
        match *self {
            Record::Entry { offset, .. } | Record::Tombstone { offset, .. } => offset,
        }
    }
}

/// Why a scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanOutcome {
    /// The cursor reached the scan bound.
    ReachedBound,
    /// A zero-length key marked the end of the log.
    EndMarker,
    /// The buffer ended inside a key length.
    TruncatedKeyLength,
    /// The buffer ended inside a key.
    TruncatedKey,
    /// A key was not valid UTF-8.
    InvalidKey,
    /// The buffer ended inside a value length.
    TruncatedValueLength,
    /// The buffer ended inside a value.
    TruncatedValue,
}

impl ScanOutcome {
    /// True for the two clean terminations.
    pub fn is_clean(self) -> bool {
        matches!(self, ScanOutcome::ReachedBound | ScanOutcome::EndMarker)
    }

    pub fn describe(self) -> &'static str {
        match self {
            ScanOutcome::ReachedBound => "reached declared size",
            ScanOutcome::EndMarker => "end-of-log marker",
            ScanOutcome::TruncatedKeyLength => "truncated key length",
            ScanOutcome::TruncatedKey => "truncated key",
            ScanOutcome::InvalidKey => "key is not valid UTF-8",
            ScanOutcome::TruncatedValueLength => "truncated value length",
            ScanOutcome::TruncatedValue => "truncated value",
        }
    }
}

impl std::fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

// ---------------------------------------------------------------------------
// Incremental scan
// ---------------------------------------------------------------------------

/// Lazy iterator over the records of a container.
///
/// Yields records until the scan stops; `outcome()` then reports why.
/// Dropping the iterator early abandons the scan.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    cursor: ByteCursor<'a>,
    bound: usize,
    outcome: Option<ScanOutcome>,
}

impl<'a> Records<'a> {
    pub fn new(buf: &'a [u8], header: &ContainerHeader, fallback_bound: usize) -> Self {
        Self {
            cursor: ByteCursor::new(buf, header.header_length as usize),
            bound: header.scan_bound(fallback_bound),
            outcome: None,
        }
    }

    /// Why the scan stopped, once it has.
    pub fn outcome(&self) -> Option<ScanOutcome> {
        self.outcome
    }

    /// Current cursor position (absolute offset).
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    fn stop(&mut self, outcome: ScanOutcome) -> Option<Record<'a>> {
        log::debug!(
            "scan stopped at offset {}: {outcome}",
            self.cursor.position()
        );
        self.outcome = Some(outcome);
        None
    }

    fn next_record(&mut self) -> Option<Record<'a>> {
        let offset = self.cursor.position();

        let Ok((key_len, _)) = self.cursor.read_length() else {
            return self.stop(ScanOutcome::TruncatedKeyLength);
        };
        let Some(key_bytes) = self.cursor.take(key_len as usize) else {
            return self.stop(ScanOutcome::TruncatedKey);
        };
        let Ok(key) = std::str::from_utf8(key_bytes) else {
            return self.stop(ScanOutcome::InvalidKey);
        };
        if key_len == 0 && key.is_empty() {
            return self.stop(ScanOutcome::EndMarker);
        }

        let Ok((value_len, consumed)) = self.cursor.read_length() else {
            return self.stop(ScanOutcome::TruncatedValueLength);
        };
        if value_len == 0 && consumed == 1 {
            log::trace!("offset {offset}: tombstone for '{key}'");
            return Some(Record::Tombstone { key, offset });
        }

        let Some(value) = self.cursor.take(value_len as usize) else {
            return self.stop(ScanOutcome::TruncatedValue);
        };
        log::trace!("offset {offset}: '{key}' = {} bytes", value.len());
        Some(Record::Entry { key, value, offset })
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.outcome.is_some() {
            return None;
        }
        if self.cursor.position() >= self.bound {
            return self.stop(ScanOutcome::ReachedBound);
        }
        self.next_record()
    }
}

impl std::iter::FusedIterator for Records<'_> {}

// ---------------------------------------------------------------------------
// Whole-buffer scan
// ---------------------------------------------------------------------------

/// Result of a full scan with bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub store: DecodedStore,
    pub outcome: ScanOutcome,
    /// Records appended to the store.
    pub entries: usize,
    /// Tombstones skipped.
    pub tombstones: usize,
    /// Cursor position when the scan stopped.
    pub end_offset: usize,
    /// Effective exclusive bound the scan ran against.
    pub bound: usize,
}

/// Scan `buf` into a fresh store, substituting the default fallback bound
/// for a zero declared size.
pub fn scan(buf: &[u8], header: &ContainerHeader) -> DecodedStore {
    scan_with_report(buf, header, DEFAULT_FALLBACK_BOUND).store
}

/// Scan `buf` and report how the scan went.
pub fn scan_with_report(buf: &[u8], header: &ContainerHeader, fallback_bound: usize) -> ScanReport {
    let mut records = Records::new(buf, header, fallback_bound);
    let mut store = DecodedStore::new();
    let mut entries = 0usize;
    let mut tombstones = 0usize;

    for record in records.by_ref() {
        match record {
            Record::Entry { key, value, .. } => {
                store.push(key, value);
                entries += 1;
            }
            Record::Tombstone { .. } => tombstones += 1,
        }
    }

    ScanReport {
        store,
        // A fused iterator that returned None has always recorded an outcome.
        outcome: records.outcome().unwrap_or(ScanOutcome::ReachedBound),
        entries,
        tombstones,
        end_offset: records.position(),
        bound: records.bound(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
