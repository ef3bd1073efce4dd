//! Triangle-only OBJ loader producing a single indexed vertex buffer.
//!
//! OBJ faces index positions, texture coordinates and normals independently.
//! A GPU buffer needs one index per attribute combination, so a position used
//! with several `(texcoord, normal)` pairs is split into one vertex per pair.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use corelib::{AttributeKind, LoadError, LoadResult};

use crate::{
    index::IndexBuilder,
    mesh::ModelData,
    parser::{ParsedObj, parse_obj},
};

/// Directory searched by [`load_obj_resource`] callers that have no better idea.
pub const DEFAULT_RES_DIR: &str = "res";

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> LoadResult<ModelData> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Loading OBJ from {}", path.display());
    // `file` is dropped on return, whether or not parsing succeeded.
    load(BufReader::new(file), path)
}

/// Load `<res_dir>/<name>.obj`. `name` is given without its extension.
pub fn load_obj_resource(res_dir: impl AsRef<Path>, name: &str) -> LoadResult<ModelData> {
    load_obj_from_path(resource_path(res_dir, name))
}

/// Path [`load_obj_resource`] reads for `name`.
pub fn resource_path(res_dir: impl AsRef<Path>, name: &str) -> PathBuf {
    res_dir.as_ref().join(format!("{name}.obj"))
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> LoadResult<ModelData> {
    load(reader, Path::new("<reader>"))
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> LoadResult<ModelData> {
    load(io::Cursor::new(contents), Path::new("<string>"))
}

fn load<R: BufRead>(reader: R, origin: &Path) -> LoadResult<ModelData> {
    let parsed = parse_obj(reader, origin)?;
    build_model(&parsed)
}

/// Resolve every face of `parsed` and flatten the result.
pub fn build_model(parsed: &ParsedObj) -> LoadResult<ModelData> {
    let attributes = &parsed.attributes;
    let mut builder = IndexBuilder::new(attributes);
    for face in &parsed.faces {
        builder.push_face(face)?;
    }
    let (mut table, indices, stats) = builder.finish();

    let unused = table.unset_count();
    if unused > 0 {
        // The default pair points at slot 0 of both lists.
        if attributes.texcoords.is_empty() {
            return Err(default_pair_missing(AttributeKind::TexCoord));
        }
        if attributes.normals.is_empty() {
            return Err(default_pair_missing(AttributeKind::Normal));
        }
        log::warn!("{unused} position(s) never referenced by a face; kept as unindexed vertices");
        table.assign_defaults();
    }

    let data = ModelData::materialize(&table, attributes, indices);
    log::info!(
        "Loaded OBJ: {} vertices ({} positions, {} splits), {} faces, radius {:.3}",
        data.vertex_count(),
        table.root_count(),
        stats.split,
        data.face_count(),
        data.bounding_radius
    );
    Ok(data)
}

fn default_pair_missing(kind: AttributeKind) -> LoadError {
    LoadError::IndexOutOfRange {
        line: 0,
        kind,
        index: 1,
        len: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = r#"
        v 0.0 0.0 0.0
        v 1.0 0.0 0.0
        v 0.0 1.0 0.0
        vt 0.0 0.0
        vt 1.0 0.0
        vt 0.0 1.0
        vn 0.0 0.0 1.0
        f 1/1/1 2/2/1 3/3/1
    "#;

    #[test]
    fn parse_simple_triangle() {
        let mesh = load_obj_from_str(TRIANGLE).expect("parse triangle");
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.bounding_radius, 1.0);
        assert_eq!(mesh.texcoords, vec![0.0, 1.0, 1.0, 1.0, 0.0, 0.0]);
        assert!(mesh.is_valid());
    }

    #[test]
    fn unreferenced_position_keeps_default_slot() {
        let src = format!("{TRIANGLE}\n");
        let src = src.replacen("v 0.0 1.0 0.0", "v 0.0 1.0 0.0\nv 0.0 0.0 9.0", 1);
        let mesh = load_obj_from_str(&src).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.bounding_radius, 9.0);
        assert_eq!(&mesh.texcoords[6..8], &[0.0, 1.0]);
    }

    #[test]
    fn unreferenced_position_without_normals_fails() {
        let err = load_obj_from_str("v 0 0 0\nvt 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::IndexOutOfRange {
                kind: AttributeKind::Normal,
                ..
            }
        ));
    }

    #[test]
    fn unreferenced_position_without_texcoords_fails() {
        let err = load_obj_from_str("v 0 0 0\nvn 0 0 1\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::IndexOutOfRange {
                line: 0,
                kind: AttributeKind::TexCoord,
                index: 1,
                len: 0
            }
        ));
    }

    #[test]
    fn unreadable_stream_is_file_access_error() {
        let bytes: &[u8] = b"v 0 0 0\n\xc3\x28 broken\n";
        let err = load_obj_from_reader(bytes).unwrap_err();
        assert!(matches!(
            &err,
            LoadError::FileAccess { path, source }
                if path == Path::new("<reader>") && source.kind() == io::ErrorKind::InvalidData
        ));
    }

    #[test]
    fn empty_input_gives_empty_model() {
        let mesh = load_obj_from_str("# nothing here\n").unwrap();
        assert_eq!(mesh, ModelData::default());
    }

    #[test]
    fn resource_path_appends_extension() {
        assert_eq!(
            resource_path(DEFAULT_RES_DIR, "tree"),
            Path::new("res").join("tree.obj")
        );
    }

    #[test]
    fn missing_file_is_file_access_error() {
        let err = load_obj_resource("definitely/not/here", "ghost").unwrap_err();
        assert!(matches!(err, LoadError::FileAccess { .. }));
    }
}
