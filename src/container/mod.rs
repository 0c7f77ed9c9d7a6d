// MMKV container format.
//
// An MMKV file is a small prelude followed by an append-only log of
// length-prefixed key/value records. Every write appends; removal appends a
// tombstone. Reading the log front to back therefore yields the full history
// of every key.
//
// # Modules
//
// - `varint`  : Base-128 varints with width masking and two's-complement sign
// - `header`  : Prelude parsing and the scan bound
// - `scanner` : Best-effort record scan, incremental or into a store
// - `store`   : Ordered key -> value-history mapping
// - `builder` : Container writer for synthesizing inputs

pub mod builder;
pub mod header;
pub mod scanner;
pub mod store;
pub mod varint;

// Re-export key types for convenience.
pub use builder::ContainerBuilder;
pub use header::{
    ContainerHeader, DEFAULT_FALLBACK_BOUND, HeaderError, HeaderLayout, read_header,
    read_header_with,
};
pub use scanner::{Record, Records, ScanOutcome, ScanReport, scan, scan_with_report};
pub use store::DecodedStore;
pub use varint::{VarintError, VarintValue, Width, decode_varint};
