//! Test helper: builds synthetic mesh container byte streams.

use glam::Vec2;
use strata_core::encode_half2;

use crate::mesh::Triangle;

/// Builder for a well-formed mesh stream with every block present (possibly
/// empty), in container field order.
pub struct MeshStreamBuilder {
    magic: u32,
    triangles: Vec<Triangle>,
    scale: f32,
    weights_per_vertex: u32,
    positions: Vec<(i16, i16, i16)>,
    uv0: Vec<Vec2>,
    uv1: Vec<Vec2>,
    colors: Vec<[u8; 4]>,
    normals: Vec<u32>,
    tangents: Vec<u32>,
    weight_count: u32,
    weight_pairs: Vec<(u16, u16)>,
    lods: Vec<Vec<Triangle>>,
}

impl MeshStreamBuilder {
    pub fn new() -> Self {
        Self {
            magic: 1,
            triangles: Vec::new(),
            scale: 1.0,
            weights_per_vertex: 0,
            positions: Vec::new(),
            uv0: Vec::new(),
            uv1: Vec::new(),
            colors: Vec::new(),
            normals: Vec::new(),
            tangents: Vec::new(),
            weight_count: 0,
            weight_pairs: Vec::new(),
            lods: Vec::new(),
        }
    }

    pub fn magic(mut self, magic: u32) -> Self {
        self.magic = magic;
        self
    }

    pub fn triangles(mut self, tris: &[Triangle]) -> Self {
        self.triangles = tris.to_vec();
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn positions_raw(mut self, positions: &[(i16, i16, i16)]) -> Self {
        self.positions = positions.to_vec();
        self
    }

    pub fn uvs(mut self, uv0: &[Vec2], uv1: &[Vec2]) -> Self {
        self.uv0 = uv0.to_vec();
        self.uv1 = uv1.to_vec();
        self
    }

    pub fn colors_raw(mut self, bgra: &[[u8; 4]]) -> Self {
        self.colors = bgra.to_vec();
        self
    }

    pub fn normals_raw(mut self, words: &[u32]) -> Self {
        self.normals = words.to_vec();
        self
    }

    pub fn tangents_raw(mut self, words: &[u32]) -> Self {
        self.tangents = words.to_vec();
        self
    }

    /// Sets weights_per_vertex and the flat pair stream; weight_count is the
    /// number of pairs (one scalar slot each).
    pub fn weights_raw(mut self, per_vertex: u32, pairs: &[(u16, u16)]) -> Self {
        self.weights_per_vertex = per_vertex;
        self.weight_count = pairs.len() as u32;
        self.weight_pairs = pairs.to_vec();
        self
    }

    /// Sets a nonzero weight count with weights_per_vertex left at 0 and no
    /// pair data in the stream.
    pub fn weight_count_only(mut self, count: u32) -> Self {
        self.weight_count = count;
        self
    }

    pub fn lods(mut self, lods: &[Vec<Triangle>]) -> Self {
        self.lods = lods.to_vec();
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.magic.to_le_bytes());

        write_triangles(&mut out, &self.triangles);
        out.extend_from_slice(&self.scale.to_le_bytes());
        out.extend_from_slice(&self.weights_per_vertex.to_le_bytes());

        out.extend_from_slice(&(self.positions.len() as u32).to_le_bytes());
        for (x, y, z) in &self.positions {
            out.extend_from_slice(&x.to_le_bytes());
            out.extend_from_slice(&y.to_le_bytes());
            out.extend_from_slice(&z.to_le_bytes());
        }

        for channel in [&self.uv0, &self.uv1] {
            out.extend_from_slice(&(channel.len() as u32).to_le_bytes());
            for uv in channel {
                out.extend_from_slice(&encode_half2(*uv).to_le_bytes());
            }
        }

        out.extend_from_slice(&(self.colors.len() as u32).to_le_bytes());
        for bgra in &self.colors {
            out.extend_from_slice(bgra);
        }

        for words in [&self.normals, &self.tangents] {
            out.extend_from_slice(&(words.len() as u32).to_le_bytes());
            for w in words {
                out.extend_from_slice(&w.to_le_bytes());
            }
        }

        out.extend_from_slice(&self.weight_count.to_le_bytes());
        for (bone, weight) in &self.weight_pairs {
            out.extend_from_slice(&bone.to_le_bytes());
            out.extend_from_slice(&weight.to_le_bytes());
        }

        out.extend_from_slice(&(self.lods.len() as u32).to_le_bytes());
        for lod in &self.lods {
            write_triangles(&mut out, lod);
        }

        out
    }
}

fn write_triangles(out: &mut Vec<u8>, tris: &[Triangle]) {
    out.extend_from_slice(&((tris.len() * 3) as u32).to_le_bytes());
    for tri in tris {
        for index in tri {
            out.extend_from_slice(&index.to_le_bytes());
        }
    }
}
