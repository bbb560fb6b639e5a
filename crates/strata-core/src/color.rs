//! Linear-to-sRGB compression for 8-bit color output.

use glam::Vec4;

/// Compress a linear RGBA color to 8-bit sRGB bytes.
///
/// RGB channels are clamped to [0, 1] and run through the standard piecewise
/// sRGB transfer curve; alpha stays linear. Byte order is R, G, B, A.
pub fn srgb_compress(c: Vec4) -> [u8; 4] {
    [
        to_srgb_byte(c.x),
        to_srgb_byte(c.y),
        to_srgb_byte(c.z),
        to_linear_byte(c.w),
    ]
}

fn to_srgb_byte(x: f32) -> u8 {
    let x = x.clamp(0.0, 1.0);
    let s = if x <= 0.003_130_8 {
        x * 12.92
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    };
    (s * 255.0).round() as u8
}

fn to_linear_byte(x: f32) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}
