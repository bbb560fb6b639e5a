//! Test helper: builds synthetic RGBA16F DDS cube maps.

use crate::dds;

/// Half-float 0.0 in all four lanes.
pub const HALF_ZERO: u64 = 0;
/// Half-float 1.0 in all four lanes.
pub const HALF_ONE: u64 = 0x3C00_3C00_3C00_3C00;

fn header(width: usize) -> Vec<u8> {
    let mut buf = vec![0u8; dds::HEADER_SIZE];
    buf[0..4].copy_from_slice(&dds::DDS_MAGIC.to_le_bytes());
    buf[dds::OFFSET_HEIGHT..dds::OFFSET_HEIGHT + 4]
        .copy_from_slice(&(width as u32).to_le_bytes());
    buf[dds::OFFSET_WIDTH..dds::OFFSET_WIDTH + 4].copy_from_slice(&(width as u32).to_le_bytes());
    buf[dds::OFFSET_FOURCC..dds::OFFSET_FOURCC + 4].copy_from_slice(&dds::DX10_FOURCC.to_le_bytes());
    buf[dds::OFFSET_DXGI_FORMAT..dds::OFFSET_DXGI_FORMAT + 4]
        .copy_from_slice(&dds::DXGI_FORMAT_R16G16B16A16_FLOAT.to_le_bytes());
    buf
}

fn face_texels(width: usize, full_chain: bool) -> usize {
    if !full_chain {
        return width * width;
    }
    let mut total = 0;
    let mut w = width;
    while w > 0 {
        total += w * w;
        w >>= 1;
    }
    total
}

/// A cube map with every texel of every face set to `texel`.
pub fn uniform_cubemap(width: usize, full_chain: bool, texel: u64) -> Vec<u8> {
    let mut buf = header(width);
    let per_face = face_texels(width, full_chain);
    for _ in 0..6 * per_face {
        buf.extend_from_slice(&texel.to_le_bytes());
    }
    buf
}

/// A single-mip cube map where one face is `texel` and the rest are zero.
pub fn cubemap_with_face(width: usize, bright_face: usize, texel: u64) -> Vec<u8> {
    let mut buf = header(width);
    for face in 0..6 {
        let word = if face == bright_face { texel } else { HALF_ZERO };
        for _ in 0..width * width {
            buf.extend_from_slice(&word.to_le_bytes());
        }
    }
    buf
}
