// SPDX-License-Identifier: MIT
//
// Unified error types for platecrop.

use thiserror::Error;

/// Top-level error type for all platecrop operations.
#[derive(Debug, Error)]
pub enum PlatecropError {
    // -- Image analysis errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("plate/scan size mismatch: plate is {plate_width}x{plate_height}, scan is {scan_width}x{scan_height}")]
    PlateSizeMismatch {
        plate_width: u32,
        plate_height: u32,
        scan_width: u32,
        scan_height: u32,
    },

    // -- Dimension probe errors --
    // Any of these indicates a corrupted batch and is fatal for the run.
    #[error("not a PNG: signature mismatch in {0}")]
    BadSignature(String),

    #[error("unexpected type for first PNG chunk: {0}")]
    UnexpectedChunk(String),

    #[error("unexpected IHDR length: {0}")]
    BadChunkLength(u32),

    // -- Interactive session errors --
    #[error("preview surface failed: {0}")]
    Surface(String),

    // -- Batch driver errors --
    #[error("plate image not found at {0}")]
    PlateMissing(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PlatecropError>;
