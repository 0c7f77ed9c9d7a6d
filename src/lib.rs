//! mmkv-reader: best-effort decoding of MMKV key-value containers.
//!
//! The crate provides:
//! - The container format itself: varints, the prelude and the record
//!   scanner (`container`)
//! - On-demand reinterpretation of untyped value bytes (`value`)
//! - One-call decode APIs (`engine`) and file intake (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use mmkv_reader::container::ContainerBuilder;
//! use mmkv_reader::engine::decode_container;
//! use mmkv_reader::value::{as_int32, as_utf8_string};
//!
//! let mut builder = ContainerBuilder::new();
//! builder.put_i32("count", 1).put_i32("count", -7).put_str("name", "mmkv");
//! let bytes = builder.finish();
//!
//! let store = decode_container(&bytes).unwrap();
//! let history = store.get("count").unwrap();
//! assert_eq!(as_int32(&history[0]).unwrap(), 1);
//! assert_eq!(as_int32(&history[1]).unwrap(), -7);
//! assert_eq!(as_utf8_string(&store.get("name").unwrap()[0]), Some("mmkv"));
//! ```

pub mod container;
pub mod engine;
pub mod hex;
pub mod io;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use container::{ContainerHeader, DecodedStore, HeaderLayout, ScanOutcome};
pub use engine::{ScanOptions, decode_container, decode_container_with, inspect_container};
pub use value::{Interpretation, ReinterpretError, ValueView};
