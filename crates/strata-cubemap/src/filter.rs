//! Cube map mip chain convolution.
//!
//! Face orientation of the coordinate tables:
//!   face 0: E,      -X = up,   +X = down, -Y = N,    +Y = S
//!   face 1: W,      -X = down, +X = up,   -Y = N,    +Y = S
//!   face 2: N,      -X = W,    +X = E,    -Y = down, +Y = up
//!   face 3: S,      -X = W,    +X = E,    -Y = up,   +Y = down
//!   face 4: top,    -X = W,    +X = E,    -Y = N,    +Y = S
//!   face 5: bottom, -X = E,    +X = W,    -Y = N,    +Y = S

use glam::{Vec3, Vec4};
use strata_core::{decode_half4, srgb_compress};

use crate::dds;

/// Output face resolution used when none is configured.
pub const DEFAULT_OUTPUT_WIDTH: usize = 256;

const MAX_THREADS: usize = 16;

/// In-place converter from an RGBA16F DDS cube map to a prefiltered 8-bit
/// sRGB mip chain.
pub struct CubeMapFilter {
    output_width: usize,
    input_format: u32,
}

impl Default for CubeMapFilter {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_WIDTH)
    }
}

/// Convolution kernel for one mip level of the output chain.
#[derive(Debug, Clone, Copy)]
enum Kernel {
    /// Mip 0: direct copy, no filtering.
    Copy,
    /// Intermediate mips: GGX-style weighted sum over the whole cube.
    Specular { roughness: f32 },
    /// Final mips: cosine-weighted irradiance.
    Diffuse,
}

impl CubeMapFilter {
    /// Create a filter producing faces of `output_width` pixels, expecting
    /// RGBA16F input.
    pub fn new(output_width: usize) -> Self {
        Self {
            output_width: output_width.max(1),
            input_format: dds::DXGI_FORMAT_R16G16B16A16_FLOAT,
        }
    }

    /// Convert a DDS cube map in place and return the new logical length.
    ///
    /// Inputs that do not match the expected header, face size or byte
    /// length are left untouched and the original length is returned. The
    /// caller truncates the buffer to the returned length.
    pub fn convert(&self, buf: &mut [u8]) -> usize {
        let len = buf.len();
        if len < dds::HEADER_SIZE {
            return len;
        }
        let w0 = dds::read_u32(buf, dds::OFFSET_WIDTH) as usize;
        let h0 = dds::read_u32(buf, dds::OFFSET_HEIGHT) as usize;
        if dds::read_u32(buf, 0) != dds::DDS_MAGIC
            || dds::read_u32(buf, dds::OFFSET_FOURCC) != dds::DX10_FOURCC
            || w0 != h0
            || w0 < self.output_width
            || w0 & (w0 - 1) != 0
            || dds::read_u32(buf, dds::OFFSET_DXGI_FORMAT) != self.input_format
        {
            tracing::debug!(len, w0, h0, "not a convertible cube map, passing through");
            return len;
        }

        // Walk the mip chain down to 1x1, sizing both accepted input
        // layouts: mip 0 only, or the full chain.
        let mut texels_single = 0usize;
        let mut texels_full = 0usize;
        let mut face_texels = 0usize;
        let mut mip_count = 0usize;
        let mut max_mip: isize = -1;
        let (mut w, mut h) = (w0, h0);
        loop {
            let (wm, hm) = (w.max(1), h.max(1));
            if mip_count == 0 {
                texels_single += wm * hm;
            }
            texels_full += wm * hm;
            if wm <= self.output_width && hm <= self.output_width {
                face_texels += wm * hm;
                max_mip += 1;
            }
            mip_count += 1;
            w = wm >> 1;
            h = hm >> 1;
            if w == 0 && h == 0 {
                break;
            }
        }
        if len != texels_single * 8 * 6 + dds::HEADER_SIZE
            && len != texels_full * 8 * 6 + dds::HEADER_SIZE
        {
            return len;
        }
        let face_data_size = face_texels * 4;
        let max_mip = max_mip as usize;

        // Decode mip 0 of every face to linear float, clamping out
        // negative and overflowing half-float encodings.
        let face_stride = (len - dds::HEADER_SIZE) / 6;
        let mut in_buf = vec![Vec4::ZERO; w0 * h0 * 6];
        let mut sum = Vec4::ZERO;
        for face in 0..6 {
            for i in 0..w0 * h0 {
                let src = dds::HEADER_SIZE + face * face_stride + i * 8;
                let c = decode_half4(dds::read_u64(buf, src))
                    .clamp(Vec4::ZERO, Vec4::splat(65536.0));
                in_buf[face * w0 * h0 + i] = c;
                sum += c;
            }
        }

        // Global auto exposure: normalize by the average R+G+B so wildly
        // bright HDR inputs stay in range. Deterministic for equal input.
        let mut level = sum.x + sum.y + sum.z;
        level = (15.0 / 3.0) * level / in_buf.len() as f32;
        let exposure = 1.0 / level.clamp(1.0, 65536.0);
        for c in &mut in_buf {
            *c *= exposure;
        }

        let max_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .clamp(1, MAX_THREADS);

        let mut mip_offset = 0usize;
        for m in 0..mip_count {
            let w = (w0 >> m).max(1);
            let h = (h0 >> m).max(1);
            if w <= self.output_width && h <= self.output_width {
                let coord_table = build_coord_table(w, h);
                let mip_index = (m as isize + max_mip as isize - (mip_count as isize - 1)) as usize;
                let kernel = select_kernel(mip_index, max_mip);
                fill_level(
                    buf,
                    &in_buf,
                    &coord_table,
                    kernel,
                    w,
                    h,
                    mip_offset,
                    face_data_size,
                    max_threads,
                );
                mip_offset += w * h * 4;
            }
            downsample(&mut in_buf, w, h);
        }

        dds::patch_header(buf, self.output_width, max_mip + 1);
        face_data_size * 6 + dds::HEADER_SIZE
    }
}

/// Fill one mip level of all six faces, splitting rows into horizontal
/// bands across worker threads. Workers only read the shared buffers and
/// write disjoint output bands; `std::thread::scope` joins them on every
/// exit path, so a worker panic surfaces after cleanup.
#[allow(clippy::too_many_arguments)]
fn fill_level(
    buf: &mut [u8],
    in_buf: &[Vec4],
    coord_table: &[Vec4],
    kernel: Kernel,
    w: usize,
    h: usize,
    mip_offset: usize,
    face_data_size: usize,
    max_threads: usize,
) {
    let threads = if h < 16 { 1 } else { max_threads.min(h >> 3) };

    let out = &mut buf[dds::HEADER_SIZE..dds::HEADER_SIZE + face_data_size * 6];
    let mut bands: Vec<Vec<&mut [u8]>> = (0..threads).map(|_| Vec::with_capacity(6)).collect();
    for face in out.chunks_mut(face_data_size).take(6) {
        let mut rest = &mut face[mip_offset..mip_offset + w * h * 4];
        for (i, face_bands) in bands.iter_mut().enumerate() {
            let rows = (i + 1) * h / threads - i * h / threads;
            let (band, tail) = std::mem::take(&mut rest).split_at_mut(rows * w * 4);
            face_bands.push(band);
            rest = tail;
        }
    }

    if threads == 1 {
        let bands = bands.pop().unwrap_or_default();
        fill_bands(bands, in_buf, coord_table, kernel, w, h, 0);
    } else {
        std::thread::scope(|s| {
            for (i, face_bands) in bands.into_iter().enumerate() {
                let y0 = i * h / threads;
                s.spawn(move || {
                    fill_bands(face_bands, in_buf, coord_table, kernel, w, h, y0);
                });
            }
        });
    }
}

fn select_kernel(mip_index: usize, max_mip: usize) -> Kernel {
    if mip_index == 0 {
        Kernel::Copy
    } else if (mip_index as isize) < max_mip as isize - 2 {
        let smoothness = (max_mip as f32 - 3.0 - mip_index as f32) / (max_mip as f32 - 3.0);
        Kernel::Specular {
            roughness: 1.0 - smoothness.sqrt(),
        }
    } else {
        Kernel::Diffuse
    }
}

/// Write the texels of one row band for all six faces. `bands[face]` is the
/// contiguous output slice for rows `y0..` of that face.
fn fill_bands(
    mut bands: Vec<&mut [u8]>,
    in_buf: &[Vec4],
    coord_table: &[Vec4],
    kernel: Kernel,
    w: usize,
    h: usize,
    y0: usize,
) {
    for (face, band) in bands.iter_mut().enumerate() {
        let rows = band.len() / (w * 4);
        for row in 0..rows {
            let y = y0 + row;
            for x in 0..w {
                let idx = (face * h + y) * w + x;
                let rgba = match kernel {
                    Kernel::Copy => srgb_compress(in_buf[idx]),
                    Kernel::Specular { roughness } => {
                        convolve_specular(in_buf, coord_table, idx, roughness)
                    }
                    Kernel::Diffuse => convolve_diffuse(in_buf, coord_table, idx),
                };
                let at = (row * w + x) * 4;
                band[at..at + 4].copy_from_slice(&rgba);
            }
        }
    }
}

/// GGX-style importance weighting over every texel of the cube. The 4th
/// component of each table entry is the texel's solid-angle falloff.
fn convolve_specular(in_buf: &[Vec4], coord_table: &[Vec4], idx: usize, roughness: f32) -> [u8; 4] {
    let a = roughness * roughness;
    let a2 = a * a;
    let dir = coord_table[idx].truncate();
    let mut c = Vec4::ZERO;
    let mut total_weight = 0.0f32;
    for (j, v2) in coord_table.iter().enumerate() {
        let d = v2.truncate().dot(dir);
        if d > 0.0 {
            let g1 = d;
            let g2 = d * (2.0 - a) + a;
            let d = (d + 1.0) * (a2 - 1.0) + 2.0;
            let weight = g1 * v2.w / (g2 * d * d);
            c += in_buf[j] * weight;
            total_weight += weight;
        }
    }
    c /= total_weight;
    c.w = 1.0;
    srgb_compress(c)
}

/// Lambertian irradiance: cosine weighting over the positive hemisphere.
fn convolve_diffuse(in_buf: &[Vec4], coord_table: &[Vec4], idx: usize) -> [u8; 4] {
    let dir = coord_table[idx].truncate();
    let mut c = Vec4::ZERO;
    let mut total_weight = 0.0f32;
    for (j, v2) in coord_table.iter().enumerate() {
        let mut weight = v2.truncate().dot(dir);
        if weight > 0.0 {
            weight /= v2.w;
            c += in_buf[j] * weight;
            total_weight += weight;
        }
    }
    c /= total_weight;
    c.w = 1.0;
    srgb_compress(c)
}

/// Unit direction through the center of texel (x, y) of `face`, with the
/// solid-angle falloff term in w.
fn face_direction(x: usize, y: usize, w: usize, face: usize) -> Vec4 {
    let wf = w as f32;
    let x2 = (x * 2) as f32;
    let y2 = (y * 2) as f32;
    let v = match face {
        0 => Vec3::new(wf, wf - y2, wf - x2) + Vec3::new(-0.5, -0.5, -0.5),
        1 => Vec3::new(-wf, wf - y2, x2 - wf) + Vec3::new(0.5, -0.5, 0.5),
        2 => Vec3::new(x2 - wf, wf, y2 - wf) + Vec3::new(0.5, -0.5, 0.5),
        3 => Vec3::new(x2 - wf, -wf, wf - y2) + Vec3::new(0.5, 0.5, -0.5),
        4 => Vec3::new(x2 - wf, wf - y2, wf) + Vec3::new(0.5, -0.5, -0.5),
        _ => Vec3::new(wf - x2, wf - y2, -wf) + Vec3::new(-0.5, -0.5, 0.5),
    };
    let scale = 1.0 / v.length();
    (v * scale).extend(wf * scale)
}

fn build_coord_table(w: usize, h: usize) -> Vec<Vec4> {
    let mut table = vec![Vec4::ZERO; w * h * 6];
    for face in 0..6 {
        for y in 0..h {
            for x in 0..w {
                table[(face * h + y) * w + x] = face_direction(x, y, w, face);
            }
        }
    }
    table
}

/// Box-filter the working buffer down to half resolution in place,
/// clamping the 2x2 footprint at odd edges.
fn downsample(in_buf: &mut Vec<Vec4>, w: usize, h: usize) {
    let w2 = (w + 1) >> 1;
    let h2 = (h + 1) >> 1;
    for face in 0..6 {
        for y in 0..h2 {
            for x in 0..w2 {
                let x0 = x * 2;
                let x1 = if x0 + 1 < w { x0 + 1 } else { x0 };
                let y0 = y * 2;
                let y1 = if y0 + 1 < h { y0 + 1 } else { y0 };
                let c = (in_buf[face * w * h + y0 * w + x0]
                    + in_buf[face * w * h + y0 * w + x1]
                    + in_buf[face * w * h + y1 * w + x0]
                    + in_buf[face * w * h + y1 * w + x1])
                    * 0.25;
                in_buf[face * w2 * h2 + y * w2 + x] = c;
            }
        }
    }
    in_buf.truncate(w2 * h2 * 6);
}
