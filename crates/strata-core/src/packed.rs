//! Decoders for packed vertex attribute formats.
//!
//! These are pure functions with no failure modes: malformed input produces
//! a defined but meaningless value, never a panic. Validation belongs to the
//! container parsers that call them.

use glam::{Vec2, Vec3, Vec4};
use half::f16;

/// Decode a signed-normalized 16-bit value to [-1, 1].
///
/// The scaling is asymmetric: negative codes divide by 32768, non-negative
/// codes by 32767, so both extremes map exactly to -1.0 and 1.0.
pub fn decode_snorm16(x: i16) -> f64 {
    if x < 0 {
        f64::from(x) / 32768.0
    } else {
        f64::from(x) / 32767.0
    }
}

/// Decode a packed X10Y10Z10 word into a signed unit-range vector plus the
/// 2-bit field's high bit.
///
/// Each 10-bit unsigned field maps linearly onto [-1, 1] (code 0 is -1.0,
/// code 1023 is slightly above 1.0). The vector is not renormalized. The
/// returned flag is bit 31, used by mesh tangents to record bitangent
/// handedness.
pub fn decode_udec3(word: u32) -> (Vec3, bool) {
    let x = (word & 0x3FF) as f32;
    let y = ((word >> 10) & 0x3FF) as f32;
    let z = ((word >> 20) & 0x3FF) as f32;
    let v = Vec3::new(x, y, z) / 511.5 - Vec3::ONE;
    (v, (word >> 31) & 1 != 0)
}

/// Decode two IEEE-754 half floats packed into one 32-bit word, low half
/// first.
pub fn decode_half2(word: u32) -> Vec2 {
    Vec2::new(
        f16::from_bits((word & 0xFFFF) as u16).to_f32(),
        f16::from_bits((word >> 16) as u16).to_f32(),
    )
}

/// Pack two floats as half precision into one 32-bit word. Inverse of
/// [`decode_half2`].
pub fn encode_half2(uv: Vec2) -> u32 {
    u32::from(f16::from_f32(uv.x).to_bits()) | (u32::from(f16::from_f32(uv.y).to_bits()) << 16)
}

/// Decode four half floats packed into one 64-bit word, low half first.
/// This is the RGBA16F texel layout used by cube map faces.
pub fn decode_half4(word: u64) -> Vec4 {
    Vec4::new(
        f16::from_bits((word & 0xFFFF) as u16).to_f32(),
        f16::from_bits(((word >> 16) & 0xFFFF) as u16).to_f32(),
        f16::from_bits(((word >> 32) & 0xFFFF) as u16).to_f32(),
        f16::from_bits((word >> 48) as u16).to_f32(),
    )
}
