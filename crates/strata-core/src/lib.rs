//! Strata Core - Shared codec building blocks
//!
//! This crate provides the leaf utilities the other Strata crates depend on:
//! - Packed vertex-attribute decoders (SNORM16, UDEC3, packed half floats)
//! - sRGB compression for 8-bit color output
//! - A CRC-32C rolling hash used for content-addressed caching

mod color;
mod hash;
mod packed;

pub use color::srgb_compress;
pub use hash::{content_key, crc32c};
pub use packed::{decode_half2, decode_half4, decode_snorm16, decode_udec3, encode_half2};
