// Decode engine: ties the header reader to the scanner.
//
// Provides the one-call APIs most callers want:
//   - `decode_container` for a store with default options
//   - `inspect_container` for the header plus a full scan report

use crate::container::header::{
    self, ContainerHeader, DEFAULT_FALLBACK_BOUND, HeaderError, HeaderLayout,
};
use crate::container::scanner::{self, ScanReport};
use crate::container::store::DecodedStore;

// ---------------------------------------------------------------------------
// Scan options
// ---------------------------------------------------------------------------

/// Configuration for decoding a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Prelude shape preceding the first record.
    pub layout: HeaderLayout,
    /// Scan bound substituted when the declared size is zero.
    pub fallback_bound: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            layout: HeaderLayout::default(),
            fallback_bound: DEFAULT_FALLBACK_BOUND,
        }
    }
}

// ---------------------------------------------------------------------------
// High-level decode
// ---------------------------------------------------------------------------

/// Decode `bytes` into a store with default options.
///
/// Fails only when the buffer is too short to hold the prelude; any damage
/// past the prelude just shortens the result.
pub fn decode_container(bytes: &[u8]) -> Result<DecodedStore, HeaderError> {
    decode_container_with(bytes, &ScanOptions::default())
}

/// Decode with custom options.
pub fn decode_container_with(bytes: &[u8], opts: &ScanOptions) -> Result<DecodedStore, HeaderError> {
    inspect_container(bytes, opts).map(|(_, report)| report.store)
}

/// Read the header and scan, returning both.
pub fn inspect_container(
    bytes: &[u8],
    opts: &ScanOptions,
) -> Result<(ContainerHeader, ScanReport), HeaderError> {
    let hdr = header::read_header_with(bytes, opts.layout)?;
    if hdr.is_size_degenerate() {
        log::warn!(
            "declared size is zero; scanning up to offset {}",
            opts.fallback_bound
        );
    }
    let report = scanner::scan_with_report(bytes, &hdr, opts.fallback_bound);
    log::debug!(
        "scan: {} keys, {} entries, {} tombstones, stopped at {} ({})",
        report.store.len(),
        report.entries,
        report.tombstones,
        report.end_offset,
        report.outcome
    );
    Ok((hdr, report))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
