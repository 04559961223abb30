// SPDX-License-Identifier: MIT
//
// Cheap PNG dimension probe.
//
// Reads only the 8-byte signature and the IHDR chunk header, so the batch
// driver can decide whether a file still has the plate's uncropped size
// without decoding any pixel data.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use platecrop_core::{PlatecropError, Result};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

// IHDR must hold at least width and height (two big-endian u32s).
const MIN_IHDR_LENGTH: u32 = 8;

/// Read the encoded `(width, height)` from a PNG file's leading bytes.
///
/// Fails when the signature does not match, when the first chunk is not
/// IHDR, or when the declared IHDR length is too small to hold the
/// dimensions. Any such failure means the file is not a well-formed PNG and
/// the batch it belongs to should stop.
pub fn read_png_dimensions(path: impl AsRef<Path>) -> Result<(u32, u32)> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let mut signature = [0u8; 8];
    file.read_exact(&mut signature)?;
    if signature != PNG_SIGNATURE {
        return Err(PlatecropError::BadSignature(path.display().to_string()));
    }

    let ihdr_length = read_be_u32(&mut file)?;
    if ihdr_length < MIN_IHDR_LENGTH {
        return Err(PlatecropError::BadChunkLength(ihdr_length));
    }

    let mut chunk_type = [0u8; 4];
    file.read_exact(&mut chunk_type)?;
    if &chunk_type != b"IHDR" {
        return Err(PlatecropError::UnexpectedChunk(
            String::from_utf8_lossy(&chunk_type).into_owned(),
        ));
    }

    let width = read_be_u32(&mut file)?;
    let height = read_be_u32(&mut file)?;
    debug!(path = %path.display(), width, height, "PNG dimensions probed");
    Ok((width, height))
}

fn read_be_u32(reader: &mut impl Read) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}
