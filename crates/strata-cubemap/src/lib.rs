//! Strata Cubemap - Prefiltered cube map generation
//!
//! Takes a DDS/DX10 cube map stored as RGBA16F and rewrites it in place as
//! an 8-bit sRGB cube map with a prefiltered mip chain: mip 0 is a direct
//! copy, intermediate mips are GGX-weighted specular convolutions of the
//! whole cube, and the final mips are cosine-weighted diffuse irradiance.
//!
//! [`CubeMapFilter`] is the convolution itself; [`CubeMapCache`] memoizes
//! conversions by content hash so repeated loads of the same texture bytes
//! skip the filter entirely.
//!
//! Inputs that do not look like a matching cube map are left untouched and
//! reported by returning the original length, so callers can feed arbitrary
//! textures through without pre-checking.

mod cache;
mod dds;
mod filter;
#[cfg(test)]
mod test_dds;

pub use cache::CubeMapCache;
pub use dds::{DXGI_FORMAT_R16G16B16A16_FLOAT, DXGI_FORMAT_R8G8B8A8_UNORM_SRGB, HEADER_SIZE};
pub use filter::{CubeMapFilter, DEFAULT_OUTPUT_WIDTH};
