//! Per-position vertex state used while turning OBJ faces into a single index stream.
//!
//! Vertices live in one growable arena. Root vertices (one per `v` line) occupy
//! the first slots; split copies are appended on demand. Copies sharing a
//! position are linked through `duplicate`, an index into the same arena.

use glam::Vec3;

/// 0-based `(texcoord, normal)` indices assigned to a vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AttributePair {
    pub texcoord: usize,
    pub normal: usize,
}

impl AttributePair {
    /// Pair given to vertices no face ever referenced.
    pub const DEFAULT: Self = Self {
        texcoord: 0,
        normal: 0,
    };

    pub const fn new(texcoord: usize, normal: usize) -> Self {
        Self { texcoord, normal }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    index: usize,
    position: Vec3,
    length: f32,
    attributes: Option<AttributePair>,
    duplicate: Option<usize>,
}

impl Vertex {
    fn new(index: usize, position: Vec3) -> Self {
        Self {
            index,
            position,
            length: position.length(),
            attributes: None,
            duplicate: None,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Distance from the origin, computed once at creation.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    #[inline]
    pub fn attributes(&self) -> Option<AttributePair> {
        self.attributes
    }

    #[inline]
    pub fn duplicate(&self) -> Option<usize> {
        self.duplicate
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.attributes.is_some()
    }
}

/// How a face reference was satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// First use of an unset vertex.
    Assigned(usize),
    /// An existing vertex in the chain already carries the pair.
    Reused(usize),
    /// A new copy was appended to the end of the chain.
    Split(usize),
}

impl Resolution {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Resolution::Assigned(i) | Resolution::Reused(i) | Resolution::Split(i) => i,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexTable {
    vertices: Vec<Vertex>,
    roots: usize,
}

impl VertexTable {
    /// One unset root vertex per parsed position, in file order.
    pub fn from_positions(positions: &[Vec3]) -> Self {
        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| Vertex::new(i, p))
            .collect();
        Self {
            vertices,
            roots: positions.len(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of root vertices, i.e. parsed positions.
    #[inline]
    pub fn root_count(&self) -> usize {
        self.roots
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    /// Indices of `root` and every copy linked after it.
    pub fn chain(&self, root: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.vertices.get(root).map(|_| root), move |&i| {
            self.vertices[i].duplicate
        })
    }

    /// Find or create the vertex for `position` (a 0-based root index) carrying `pair`.
    ///
    /// Panics if `position` is not a root; callers range-check first.
    pub(crate) fn resolve(&mut self, position: usize, pair: AttributePair) -> Resolution {
        assert!(
            position < self.roots,
            "position {position} is not a root vertex (roots={})",
            self.roots
        );

        let root = &mut self.vertices[position];
        let Some(current) = root.attributes else {
            root.attributes = Some(pair);
            return Resolution::Assigned(position);
        };
        if current == pair {
            return Resolution::Reused(position);
        }

        let mut tail = position;
        while let Some(next) = self.vertices[tail].duplicate {
            if self.vertices[next].attributes == Some(pair) {
                return Resolution::Reused(next);
            }
            tail = next;
        }

        let index = self.vertices.len();
        let mut copy = Vertex::new(index, self.vertices[position].position);
        copy.attributes = Some(pair);
        self.vertices.push(copy);
        self.vertices[tail].duplicate = Some(index);
        Resolution::Split(index)
    }

    /// Give every still-unset vertex [`AttributePair::DEFAULT`]. Returns how many were unset.
    ///
    /// Such vertices keep their slot in the output even though no index refers
    /// to them; removing them would mean renumbering every emitted index.
    pub fn assign_defaults(&mut self) -> usize {
        let mut count = 0;
        for vertex in self.vertices.iter_mut().filter(|v| !v.is_set()) {
            vertex.attributes = Some(AttributePair::DEFAULT);
            count += 1;
        }
        count
    }

    /// Number of vertices still waiting for their first face reference.
    pub fn unset_count(&self) -> usize {
        self.vertices.iter().filter(|v| !v.is_set()).count()
    }
}
