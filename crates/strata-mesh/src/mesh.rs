//! Parser for the binary mesh container format.
//!
//! The container is a single little-endian stream with no section table:
//! fields are consumed strictly in order. Attribute counts (positions, UVs,
//! normals, tangents, weights) are read independently and are not required
//! to agree with each other.

use glam::{Vec2, Vec3, Vec4};
use strata_core::{decode_half2, decode_snorm16, decode_udec3};

use crate::error::{MeshError, Result};
use crate::reader::ByteReader;

/// A triangle as three 16-bit vertex indices.
pub type Triangle = [u16; 3];

/// Number of weight slots stored per vertex in memory. The stream carries
/// only `weights_per_vertex` pairs; the rest are zero-filled.
pub const MAX_WEIGHTS_PER_VERTEX: usize = 8;

/// Bone influences for one vertex: up to 8 (bone index, raw weight) pairs.
/// Raw weights are UNORM16; unused slots are (0, 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoneWeights {
    pub pairs: [(u16, u16); MAX_WEIGHTS_PER_VERTEX],
}

impl BoneWeights {
    /// Normalized weight of one slot in [0, 1].
    pub fn weight(&self, slot: usize) -> f32 {
        f32::from(self.pairs[slot].1) / 65535.0
    }
}

/// A fully decoded mesh: one load operation's worth of attribute arrays.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// LOD 0 triangle list.
    pub triangles: Vec<Triangle>,
    /// Additional LOD triangle lists, coarsest last.
    pub lods: Vec<Vec<Triangle>>,
    /// Vertex positions, SNORM16 components scaled by the file's scale.
    pub positions: Vec<Vec3>,
    /// UV channels 0 and 1. Both always present, possibly empty.
    pub coords: [Vec<Vec2>; 2],
    /// Vertex colors as RGBA in [0, 1]. Stream order is B, G, R, A.
    pub colors: Vec<Vec4>,
    /// Unit normals from packed UDEC3 words.
    pub normals: Vec<Vec3>,
    /// Tangents from packed UDEC3 words.
    pub tangents: Vec<Vec3>,
    /// Tangent xyz plus handedness sign in w (1.0 or -1.0), kept for export.
    pub tangents_basis: Vec<Vec4>,
    /// Derived: cross of normal and tangent, direction per handedness bit.
    pub bitangents: Vec<Vec3>,
    /// Per-vertex bone weights.
    pub weights: Vec<BoneWeights>,
    /// Active weight slots per vertex as declared by the file (0-8).
    pub weights_per_vertex: u32,
    /// Vertex coordinate scale from the file header.
    pub scale: f32,
}

impl MeshData {
    /// Parse a mesh container from raw bytes.
    ///
    /// Any short read or validation failure returns an error; the caller
    /// never observes a partially populated mesh.
    pub fn parse(bytes: &[u8]) -> Result<MeshData> {
        let mut r = ByteReader::new(bytes);
        let mut mesh = MeshData::default();

        let magic = r.read_u32()?;
        if magic != 1 {
            return Err(MeshError::BadMagic(magic));
        }

        let index_count = r.read_u32()?;
        mesh.triangles = read_triangles(&mut r, index_count)?;

        let scale = r.read_f32()?;
        if scale.is_nan() || scale <= 0.0 {
            return Err(MeshError::InvalidScale(scale));
        }
        mesh.scale = scale;

        mesh.weights_per_vertex = r.read_u32()?;

        let position_count = r.read_u32()?;
        mesh.positions.reserve(bounded(position_count, 6, r.remaining()));
        for _ in 0..position_count {
            let x = decode_snorm16(r.read_i16()?);
            let y = decode_snorm16(r.read_i16()?);
            let z = decode_snorm16(r.read_i16()?);
            mesh.positions
                .push(Vec3::new(x as f32, y as f32, z as f32) * scale);
        }

        for coords in &mut mesh.coords {
            let uv_count = r.read_u32()?;
            coords.reserve(bounded(uv_count, 4, r.remaining()));
            for _ in 0..uv_count {
                coords.push(decode_half2(r.read_u32()?));
            }
        }

        let color_count = r.read_u32()?;
        mesh.colors.reserve(bounded(color_count, 4, r.remaining()));
        for _ in 0..color_count {
            // Stream order is B, G, R, A.
            let bgra = [r.read_u8()?, r.read_u8()?, r.read_u8()?, r.read_u8()?];
            mesh.colors.push(
                Vec4::new(
                    f32::from(bgra[2]),
                    f32::from(bgra[1]),
                    f32::from(bgra[0]),
                    f32::from(bgra[3]),
                ) / 255.0,
            );
        }

        let normal_count = r.read_u32()?;
        mesh.normals.reserve(bounded(normal_count, 4, r.remaining()));
        for _ in 0..normal_count {
            let (n, _) = decode_udec3(r.read_u32()?);
            mesh.normals.push(n);
        }

        let tangent_count = r.read_u32()?;
        let tangent_reserve = bounded(tangent_count, 4, r.remaining());
        mesh.tangents.reserve(tangent_reserve);
        mesh.tangents_basis.reserve(tangent_reserve);
        mesh.bitangents.reserve(tangent_reserve);
        for i in 0..tangent_count as usize {
            let (tangent, invert) = decode_udec3(r.read_u32()?);
            mesh.tangents.push(tangent);
            mesh.tangents_basis
                .push(tangent.extend(if invert { 1.0 } else { -1.0 }));
            // Tangent and normal counts are not enforced to match; a missing
            // normal degrades to a zero bitangent.
            let normal = mesh.normals.get(i).copied().unwrap_or(Vec3::ZERO);
            mesh.bitangents.push(if invert {
                normal.cross(tangent)
            } else {
                tangent.cross(normal)
            });
        }

        let weight_count = r.read_u32()?;
        let weight_vertices = if mesh.weights_per_vertex > 0 {
            weight_count / mesh.weights_per_vertex
        } else {
            0
        };
        // The stream carries weights_per_vertex pairs per vertex (at most
        // 8); remaining in-memory slots stay zero.
        let stream_slots = (mesh.weights_per_vertex as usize).min(MAX_WEIGHTS_PER_VERTEX);
        mesh.weights
            .reserve(bounded(weight_vertices, 4 * stream_slots.max(1), r.remaining()));
        for _ in 0..weight_vertices {
            let mut w = BoneWeights::default();
            for slot in 0..stream_slots {
                let bone = r.read_u16()?;
                let weight = r.read_u16()?;
                w.pairs[slot] = (bone, weight);
            }
            mesh.weights.push(w);
        }

        let lod_count = r.read_u32()?;
        mesh.lods.reserve(bounded(lod_count, 4, r.remaining()));
        for _ in 0..lod_count {
            let lod_index_count = r.read_u32()?;
            mesh.lods.push(read_triangles(&mut r, lod_index_count)?);
        }

        tracing::debug!(
            vertices = mesh.positions.len(),
            triangles = mesh.triangles.len(),
            lods = mesh.lods.len(),
            "parsed mesh container"
        );
        Ok(mesh)
    }

    /// Number of positions parsed. Collaborators treat 0 as "no mesh".
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Reservation size for a declared element count, capped by what the
/// stream could actually hold. Keeps a hostile count field from forcing a
/// huge allocation before the short read is detected.
fn bounded(count: u32, elem_size: usize, remaining: usize) -> usize {
    (count as usize).min(remaining / elem_size)
}

fn read_triangles(r: &mut ByteReader<'_>, index_count: u32) -> Result<Vec<Triangle>> {
    let triangle_count = (index_count / 3) as usize;
    let mut triangles = Vec::with_capacity(triangle_count.min(r.remaining() / 6));
    for _ in 0..triangle_count {
        triangles.push([r.read_u16()?, r.read_u16()?, r.read_u16()?]);
    }
    Ok(triangles)
}
