//! Builds the GPU index stream from parsed faces.

use corelib::{AttributeKind, LoadError, LoadResult};

use crate::{
    parser::{Face, FaceVertex, RawAttributes},
    vertex::{AttributePair, Resolution, VertexTable},
};

/// Counters gathered while resolving faces, used for load diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub assigned: usize,
    pub reused: usize,
    pub split: usize,
}

/// Resolves face references against a [`VertexTable`], emitting one index per descriptor.
pub struct IndexBuilder {
    table: VertexTable,
    texcoord_count: usize,
    normal_count: usize,
    indices: Vec<u32>,
    stats: IndexStats,
}

impl IndexBuilder {
    pub fn new(attributes: &RawAttributes) -> Self {
        Self {
            table: VertexTable::from_positions(&attributes.positions),
            texcoord_count: attributes.texcoords.len(),
            normal_count: attributes.normals.len(),
            indices: Vec::new(),
            stats: IndexStats::default(),
        }
    }

    /// Resolve all three descriptors of `face`, in order.
    pub fn push_face(&mut self, face: &Face) -> LoadResult<()> {
        for &reference in &face.vertices {
            let index = self.resolve(face.line, reference)?;
            self.indices.push(index);
        }
        Ok(())
    }

    /// Range-check a 1-based reference and map it to an emitted vertex index.
    pub fn resolve(&mut self, line: usize, reference: FaceVertex) -> LoadResult<u32> {
        let position = to_zero_based(
            line,
            AttributeKind::Position,
            reference.position,
            self.table.root_count(),
        )?;
        let texcoord = to_zero_based(
            line,
            AttributeKind::TexCoord,
            reference.texcoord,
            self.texcoord_count,
        )?;
        let normal = to_zero_based(
            line,
            AttributeKind::Normal,
            reference.normal,
            self.normal_count,
        )?;

        let resolution = self
            .table
            .resolve(position, AttributePair::new(texcoord, normal));
        match resolution {
            Resolution::Assigned(_) => self.stats.assigned += 1,
            Resolution::Reused(_) => self.stats.reused += 1,
            Resolution::Split(_) => self.stats.split += 1,
        }

        u32::try_from(resolution.index()).map_err(|_| LoadError::TooManyVertices {
            line,
            count: self.table.len(),
        })
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn table(&self) -> &VertexTable {
        &self.table
    }

    #[inline]
    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    /// Hand back the finished table and index stream.
    pub fn finish(self) -> (VertexTable, Vec<u32>, IndexStats) {
        (self.table, self.indices, self.stats)
    }
}

fn to_zero_based(line: usize, kind: AttributeKind, index: usize, len: usize) -> LoadResult<usize> {
    match index.checked_sub(1) {
        Some(i) if i < len => Ok(i),
        _ => Err(LoadError::IndexOutOfRange {
            line,
            kind,
            index,
            len,
        }),
    }
}
