//! CPU-side mesh output, laid out as flat arrays ready for buffer upload.

use bytemuck::{Pod, Zeroable};

use crate::{
    parser::RawAttributes,
    vertex::{AttributePair, VertexTable},
};

/// Interleaved vertex with position/normal/uv. Values are in object space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle mesh as separate flat attribute arrays.
///
/// `positions` and `normals` hold 3 floats per vertex, `texcoords` 2 (with v
/// already flipped to `1 - v`), `indices` 3 per face.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelData {
    pub positions: Vec<f32>,
    pub texcoords: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    /// Largest distance from the origin of any vertex.
    pub bounding_radius: f32,
}

impl ModelData {
    /// Flatten a finished table. Every vertex must carry an attribute pair whose
    /// indices are valid for `attributes`.
    pub(crate) fn materialize(
        table: &VertexTable,
        attributes: &RawAttributes,
        indices: Vec<u32>,
    ) -> Self {
        let count = table.len();
        let mut positions = Vec::with_capacity(count * 3);
        let mut texcoords = Vec::with_capacity(count * 2);
        let mut normals = Vec::with_capacity(count * 3);
        let mut bounding_radius = 0.0f32;

        for vertex in table.vertices() {
            bounding_radius = bounding_radius.max(vertex.length());

            let pair = vertex.attributes().unwrap_or(AttributePair::DEFAULT);
            let uv = attributes.texcoords[pair.texcoord];
            let normal = attributes.normals[pair.normal];

            positions.extend_from_slice(&vertex.position().to_array());
            texcoords.extend_from_slice(&[uv.x, 1.0 - uv.y]);
            normals.extend_from_slice(&normal.to_array());
        }

        Self {
            positions,
            texcoords,
            normals,
            indices,
            bounding_radius,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.positions.is_empty() && !self.indices.is_empty()
    }

    /// Gather vertex `i` back into one record.
    pub fn vertex(&self, i: usize) -> Option<MeshVertex> {
        if i >= self.vertex_count() {
            return None;
        }
        let p = &self.positions[i * 3..i * 3 + 3];
        let n = &self.normals[i * 3..i * 3 + 3];
        let t = &self.texcoords[i * 2..i * 2 + 2];
        Some(MeshVertex::new([p[0], p[1], p[2]], [n[0], n[1], n[2]], [t[0], t[1]]))
    }

    /// Interleave the flat arrays for renderers that bind a single vertex buffer.
    pub fn interleaved(&self) -> Vec<MeshVertex> {
        (0..self.vertex_count()).filter_map(|i| self.vertex(i)).collect()
    }

    /// Raw bytes of [`Self::interleaved`], tightly packed (32 bytes per vertex).
    pub fn interleaved_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.interleaved()).to_vec()
    }
}
