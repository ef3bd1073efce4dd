//! Asset loading: triangle OBJ meshes flattened into GPU-ready arrays.
//!
//! [`obj`] is the entry point. [`parser`] reads lines, [`vertex`] and
//! [`index`] split positions that are shared by several attribute pairs, and
//! [`mesh`] holds the flat output.

pub mod index;
pub mod mesh;
pub mod obj;
pub mod parser;
pub mod vertex;

pub use corelib::{AttributeKind, LoadError, LoadResult};
pub use mesh::{MeshVertex, ModelData};
pub use obj::{
    DEFAULT_RES_DIR, load_obj_from_path, load_obj_from_reader, load_obj_from_str,
    load_obj_resource,
};
