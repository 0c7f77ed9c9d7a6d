// File-level intake for containers.
//
// Reads a container from disk, canonicalizing hex-text dumps to raw bytes.
// Optionally computes a SHA-256 digest of the file as read (feature-gated
// behind `file-io`) so a dump can be tied back to the exact input.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

#[cfg(feature = "file-io")]
use sha2::Digest;

use crate::container::header::HeaderError;
use crate::hex::{self, FromHexError};

// ---------------------------------------------------------------------------
// Input format
// ---------------------------------------------------------------------------

/// How file contents should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Hex text if the file is entirely hex digits, raw bytes otherwise.
    #[default]
    Auto,
    Raw,
    Hex,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for container intake.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid hex input: {0}")]
    Hex(#[from] FromHexError),
    #[error("invalid container: {0}")]
    Header(#[from] HeaderError),
}

// ---------------------------------------------------------------------------
// Loaded container
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

/// A container read from disk.
#[derive(Debug, Clone)]
pub struct LoadedContainer {
    /// Canonical container bytes.
    pub bytes: Vec<u8>,
    /// Size of the file on disk.
    pub file_size: u64,
    /// Format the contents were read as (never `Auto`).
    pub format: InputFormat,
    /// SHA-256 of the file contents (if `file-io` feature is enabled).
    pub sha256: Option<[u8; 32]>,
}

/// Canonicalize file contents to container bytes.
pub fn canonicalize(
    contents: Vec<u8>,
    format: InputFormat,
) -> Result<(Vec<u8>, InputFormat), InputError> {
    let format = match format {
        InputFormat::Auto if hex::looks_like_hex(&contents) => InputFormat::Hex,
        InputFormat::Auto => InputFormat::Raw,
        other => other,
    };
    match format {
        InputFormat::Hex => Ok((hex::decode(&contents)?, format)),
        _ => Ok((contents, format)),
    }
}

/// Read and canonicalize the container at `path`.
pub fn load_container(path: &Path, format: InputFormat) -> Result<LoadedContainer, InputError> {
    let file = File::open(path)?;
    let file_size = file.metadata()?.len();
    let mut reader = BufReader::with_capacity(BUF_SIZE, file);
    let mut contents = Vec::with_capacity(usize::try_from(file_size).unwrap_or(0));
    reader.read_to_end(&mut contents)?;

    let sha256 = digest(&contents);
    let (bytes, format) = canonicalize(contents, format)?;
    log::debug!(
        "{}: {file_size} bytes on disk, {} container bytes ({format:?})",
        path.display(),
        bytes.len()
    );

    Ok(LoadedContainer {
        bytes,
        file_size,
        format,
        sha256,
    })
}

/// SHA-256 of `data`, when the `file-io` feature is enabled.
pub fn digest(data: &[u8]) -> Option<[u8; 32]> {
    #[cfg(feature = "file-io")]
    {
        Some(sha2::Sha256::digest(data).into())
    }
    #[cfg(not(feature = "file-io"))]
    {
        let _ = data;
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
