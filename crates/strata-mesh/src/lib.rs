//! Strata Mesh - Codec for the binary mesh container format
//!
//! This crate parses the little-endian `.mesh` container into a structured
//! [`MeshData`] (positions, UV channels, normals, tangents, bone weights,
//! LOD triangle lists) and supports the export path's in-place rewrite of
//! the UV0 block.
//!
//! Parsing is a single forward pass over a bounds-checked cursor; any short
//! read or validation failure is a typed error and no partial mesh escapes.

mod error;
mod mesh;
mod reader;
#[cfg(test)]
mod test_stream;
mod uv_export;

pub use error::{MeshError, Result};
pub use mesh::{BoneWeights, MeshData, Triangle, MAX_WEIGHTS_PER_VERTEX};
pub use reader::ByteReader;
pub use uv_export::{locate_uv_block, write_uv_channel, UvBlock};
