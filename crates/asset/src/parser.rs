//! Line-level OBJ parsing: `v`, `vt`, `vn` and triangular `f` records.
//!
//! All attribute lines are expected before the first face line. Once a face
//! has been seen, later attribute lines are skipped.

use std::{io::BufRead, path::Path};

use corelib::{LoadError, LoadResult};
use glam::{Vec2, Vec3};

/// One `pos/tex/normal` descriptor of a face, still 1-based as written in the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceVertex {
    pub position: usize,
    pub texcoord: usize,
    pub normal: usize,
}

/// Triangle face together with the (1-based) line it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub line: usize,
    pub vertices: [FaceVertex; 3],
}

/// Classified line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Record {
    Position(Vec3),
    TexCoord(Vec2),
    Normal(Vec3),
    Face(Face),
    Ignored,
}

/// Attribute lists exactly as they appear in the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawAttributes {
    pub positions: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    pub normals: Vec<Vec3>,
}

/// Output of the parsing pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedObj {
    pub attributes: RawAttributes,
    pub faces: Vec<Face>,
}

/// Parse a whole OBJ stream. `origin` only labels I/O errors.
pub fn parse_obj<R: BufRead>(reader: R, origin: &Path) -> LoadResult<ParsedObj> {
    let mut parsed = ParsedObj::default();
    let mut in_faces = false;
    let mut skipped = 0usize;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| LoadError::FileAccess {
            path: origin.to_path_buf(),
            source,
        })?;
        let line_no = line_idx + 1;

        match parse_line(line_no, &line)? {
            Record::Face(face) => {
                if !in_faces {
                    log::debug!(
                        "Face section starts at line {line_no} ({} positions, {} texcoords, {} normals)",
                        parsed.attributes.positions.len(),
                        parsed.attributes.texcoords.len(),
                        parsed.attributes.normals.len()
                    );
                    in_faces = true;
                }
                parsed.faces.push(face);
            }
            Record::Ignored => {}
            _ if in_faces => skipped += 1,
            Record::Position(p) => parsed.attributes.positions.push(p),
            Record::TexCoord(t) => parsed.attributes.texcoords.push(t),
            Record::Normal(n) => parsed.attributes.normals.push(n),
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} attribute line(s) after the face section began");
    }

    Ok(parsed)
}

/// Classify and parse a single line. `line_no` is 1-based and only used in errors.
pub fn parse_line(line_no: usize, line: &str) -> LoadResult<Record> {
    let trimmed = line.trim();
    let mut parts = trimmed.split_whitespace();

    // A tag with nothing after it (a bare `v` or `f`) is not a record.
    let (Some(tag), Some(_)) = (parts.next(), parts.clone().next()) else {
        return Ok(Record::Ignored);
    };

    let record = match tag {
        "v" => Record::Position(Vec3::new(
            parse_f32(parts.next(), line_no, trimmed, "x coordinate")?,
            parse_f32(parts.next(), line_no, trimmed, "y coordinate")?,
            parse_f32(parts.next(), line_no, trimmed, "z coordinate")?,
        )),
        // Anything past `u v` (e.g. a `w` component) is ignored.
        "vt" => Record::TexCoord(Vec2::new(
            parse_f32(parts.next(), line_no, trimmed, "u coordinate")?,
            parse_f32(parts.next(), line_no, trimmed, "v coordinate")?,
        )),
        "vn" => Record::Normal(Vec3::new(
            parse_f32(parts.next(), line_no, trimmed, "nx coordinate")?,
            parse_f32(parts.next(), line_no, trimmed, "ny coordinate")?,
            parse_f32(parts.next(), line_no, trimmed, "nz coordinate")?,
        )),
        "f" => {
            let tokens: Vec<&str> = parts.collect();
            if tokens.len() != 3 {
                return Err(LoadError::malformed(
                    line_no,
                    format!("expected 3 face vertices, found {}", tokens.len()),
                    trimmed,
                ));
            }
            Record::Face(Face {
                line: line_no,
                vertices: [
                    parse_face_vertex(tokens[0], line_no, trimmed)?,
                    parse_face_vertex(tokens[1], line_no, trimmed)?,
                    parse_face_vertex(tokens[2], line_no, trimmed)?,
                ],
            })
        }
        // Comments, o/g/s/usemtl/mtllib and blank lines.
        _ => Record::Ignored,
    };

    Ok(record)
}

fn parse_f32(value: Option<&str>, line_no: usize, text: &str, what: &str) -> LoadResult<f32> {
    let token = value.ok_or_else(|| LoadError::malformed(line_no, format!("missing {what}"), text))?;
    token
        .parse::<f32>()
        .map_err(|e| LoadError::malformed(line_no, format!("invalid {what} '{token}': {e}"), text))
}

fn parse_face_vertex(token: &str, line_no: usize, text: &str) -> LoadResult<FaceVertex> {
    let mut split = token.split('/');
    let position = parse_index(split.next(), token, line_no, text, "position")?;
    let texcoord = parse_index(split.next(), token, line_no, text, "texture coordinate")?;
    let normal = parse_index(split.next(), token, line_no, text, "normal")?;

    if split.next().is_some() {
        return Err(LoadError::malformed(
            line_no,
            format!("face vertex '{token}' has more than 3 components"),
            text,
        ));
    }

    Ok(FaceVertex {
        position,
        texcoord,
        normal,
    })
}

fn parse_index(
    value: Option<&str>,
    token: &str,
    line_no: usize,
    text: &str,
    what: &str,
) -> LoadResult<usize> {
    let raw = match value {
        Some(v) if !v.is_empty() => v,
        _ => {
            return Err(LoadError::malformed(
                line_no,
                format!("face vertex '{token}' is missing its {what} index"),
                text,
            ));
        }
    };

    let index = raw.parse::<usize>().map_err(|e| {
        LoadError::malformed(line_no, format!("invalid {what} index '{raw}': {e}"), text)
    })?;
    if index == 0 {
        return Err(LoadError::malformed(
            line_no,
            format!("{what} indices are 1-based; found 0"),
            text,
        ));
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn parse(src: &str) -> LoadResult<ParsedObj> {
        parse_obj(Cursor::new(src), Path::new("test.obj"))
    }

    #[test]
    fn classifies_each_record_kind() {
        assert_eq!(
            parse_line(1, "v 1.0 -2.5 3").unwrap(),
            Record::Position(Vec3::new(1.0, -2.5, 3.0))
        );
        assert_eq!(
            parse_line(1, "vt 0.25 0.75 0.0").unwrap(),
            Record::TexCoord(Vec2::new(0.25, 0.75))
        );
        assert_eq!(
            parse_line(1, "vn 0 1 0").unwrap(),
            Record::Normal(Vec3::Y)
        );
        assert_eq!(parse_line(1, "# comment").unwrap(), Record::Ignored);
        assert_eq!(parse_line(1, "usemtl stone").unwrap(), Record::Ignored);
        assert_eq!(parse_line(1, "").unwrap(), Record::Ignored);
        assert_eq!(parse_line(1, "v").unwrap(), Record::Ignored);
        assert_eq!(parse_line(1, "  f \r").unwrap(), Record::Ignored);
        assert_eq!(parse_line(1, "vn").unwrap(), Record::Ignored);
    }

    #[test]
    fn face_keeps_one_based_indices() {
        let Record::Face(face) = parse_line(4, "f 1/2/3 4/5/6 7/8/9\r").unwrap() else {
            panic!("expected a face");
        };
        assert_eq!(face.line, 4);
        assert_eq!(
            face.vertices[2],
            FaceVertex {
                position: 7,
                texcoord: 8,
                normal: 9
            }
        );
    }

    #[test]
    fn quad_face_is_rejected() {
        let err = parse_line(9, "f 1/1/1 2/2/1 3/3/1 4/4/1").unwrap_err();
        assert!(matches!(err, LoadError::MalformedLine { line: 9, .. }));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(matches!(
            parse_line(2, "v 1.0 nope 3.0"),
            Err(LoadError::MalformedLine { line: 2, .. })
        ));
        assert!(matches!(
            parse_line(2, "vn 1.0 0.0"),
            Err(LoadError::MalformedLine { .. })
        ));
        assert!(matches!(
            parse_line(2, "f 1/1/1 2//1 3/3/1"),
            Err(LoadError::MalformedLine { .. })
        ));
        assert!(matches!(
            parse_line(2, "f -1/1/1 2/2/1 3/3/1"),
            Err(LoadError::MalformedLine { .. })
        ));
        assert!(matches!(
            parse_line(2, "f 0/1/1 2/2/1 3/3/1"),
            Err(LoadError::MalformedLine { .. })
        ));
    }

    #[test]
    fn bare_tags_do_not_abort_parsing() {
        let parsed = parse("v\nv 0 0 0\nvt 0 0\nvn 0 0 1\nf\nf 1/1/1 1/1/1 1/1/1\n").unwrap();
        assert_eq!(parsed.attributes.positions, vec![Vec3::ZERO]);
        assert_eq!(parsed.faces.len(), 1);
        assert_eq!(parsed.faces[0].line, 6);
    }

    #[test]
    fn invalid_utf8_is_file_access_error() {
        let bytes: &[u8] = b"v 0 0 0\nv \xff\xfe 0 0\n";
        let err = parse_obj(bytes, Path::new("<reader>")).unwrap_err();
        match err {
            LoadError::FileAccess { path, source } => {
                assert_eq!(path, Path::new("<reader>"));
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn attributes_after_faces_are_skipped() {
        let parsed = parse(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\n\
             f 1/1/1 2/1/1 3/1/1\nv 5 5 5\ng trailing\nf 3/1/1 2/1/1 1/1/1\n",
        )
        .unwrap();
        assert_eq!(parsed.attributes.positions.len(), 3);
        assert_eq!(parsed.faces.len(), 2);
        assert_eq!(parsed.faces[1].line, 9);
    }
}
