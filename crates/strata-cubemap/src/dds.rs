//! Fixed-offset DDS/DX10 header plumbing.
//!
//! The filter only touches the handful of header fields it needs, at the
//! exact byte offsets existing DDS consumers expect; everything else in the
//! header passes through untouched.

/// Size of the DDS header plus the DX10 extension block.
pub const HEADER_SIZE: usize = 148;

/// "DDS " magic at offset 0.
pub const DDS_MAGIC: u32 = 0x2053_4444;
/// "DX10" fourCC at offset 84.
pub const DX10_FOURCC: u32 = 0x3031_5844;

pub const DXGI_FORMAT_R16G16B16A16_FLOAT: u32 = 0x0A;
pub const DXGI_FORMAT_R8G8B8A8_UNORM_SRGB: u32 = 0x1D;

pub const OFFSET_HEIGHT: usize = 12;
pub const OFFSET_WIDTH: usize = 16;
pub const OFFSET_FOURCC: usize = 84;
pub const OFFSET_DXGI_FORMAT: usize = 128;

pub fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(b)
}

pub fn read_u64(buf: &[u8], offset: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_le_bytes(b)
}

/// Patch the header for the converted output: 8-bit sRGB cube map of
/// `width` x `width` faces with `mip_count` mips.
pub fn patch_header(buf: &mut [u8], width: usize, mip_count: usize) {
    buf[10] |= 0x02; // DDSD_MIPMAPCOUNT
    buf[12] = (width & 0xFF) as u8;
    buf[13] = ((width >> 8) & 0xFF) as u8;
    buf[16] = (width & 0xFF) as u8;
    buf[17] = ((width >> 8) & 0xFF) as u8;
    // Pitch: 4 bytes per pixel.
    buf[20] = ((width * 4) & 0xFF) as u8;
    buf[21] = (((width * 4) >> 8) & 0xFF) as u8;
    buf[28] = mip_count as u8;
    buf[108] |= 0x08; // DDSCAPS_COMPLEX
    buf[113] |= 0xFE; // DDSCAPS2_CUBEMAP + all six faces
    buf[128] = DXGI_FORMAT_R8G8B8A8_UNORM_SRGB as u8;
}
