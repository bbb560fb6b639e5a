//! In-place rewrite of the UV0 block inside a mesh container.
//!
//! The export path keeps the rest of the file byte-identical and only
//! replaces the channel 0 texture coordinates, so the block is located by
//! walking the header fields rather than reparsing the whole mesh.

use glam::Vec2;
use strata_core::encode_half2;

use crate::error::{MeshError, Result};
use crate::reader::ByteReader;

/// Location of the UV0 data inside a mesh container byte image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UvBlock {
    /// Byte offset of the first packed UV word.
    pub offset: usize,
    /// Number of packed UV words in the block.
    pub count: usize,
}

/// Locate the UV0 block by skipping the preceding container fields.
///
/// Accepts format versions 1 and 2 (the layout up to the UV block is the
/// same in both).
pub fn locate_uv_block(bytes: &[u8]) -> Result<UvBlock> {
    let mut r = ByteReader::new(bytes);

    let magic = r.read_u32()?;
    if magic != 1 && magic != 2 {
        return Err(MeshError::UnsupportedVersion(magic));
    }

    let index_count = r.read_u32()? as usize;
    r.skip(index_count * 2)?;
    // Vertex coordinate scale and weights-per-vertex.
    r.skip(8)?;
    let position_count = r.read_u32()? as usize;
    r.skip(position_count * 6)?;

    let count = r.read_u32()? as usize;
    let offset = r.position();
    if r.remaining() < count * 4 {
        return Err(MeshError::UnexpectedEof {
            offset,
            needed: count * 4 - r.remaining(),
        });
    }
    Ok(UvBlock { offset, count })
}

/// Overwrite the UV0 block with new coordinates, packed as half floats.
///
/// The coordinate count must match the block exactly; everything outside
/// the block is left untouched.
pub fn write_uv_channel(bytes: &mut [u8], coords: &[Vec2]) -> Result<()> {
    let block = locate_uv_block(bytes)?;
    if coords.len() != block.count {
        return Err(MeshError::CountMismatch {
            expected: block.count,
            found: coords.len(),
        });
    }
    for (i, uv) in coords.iter().enumerate() {
        let word = encode_half2(*uv);
        let at = block.offset + i * 4;
        bytes[at..at + 4].copy_from_slice(&word.to_le_bytes());
    }
    Ok(())
}
