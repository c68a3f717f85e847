//! Wavefront OBJ mesh loading into the pending polygon buffer.
//!
//! Only `v` and `f` records are interpreted; faces with more than three
//! vertices are fan-triangulated. Vertex indices may be 1-based or negative
//! (relative to the end of the vertex list), and `v/vt/vn` index groups keep
//! only the vertex part.

use std::path::{Path, PathBuf};

use glam::DVec3;

use crate::{
    foundation::error::{ScanlineError, ScanlineResult},
    geometry::primitives::PolygonBuffer,
};

/// Loads `file` and appends its triangles to `buf`.
///
/// A bare name with no extension is resolved as `<name>.obj`.
pub fn add_mesh(buf: &mut PolygonBuffer, file: &str) -> ScanlineResult<()> {
    let path = resolve_mesh_path(file);
    let src = std::fs::read_to_string(&path).map_err(|e| {
        ScanlineError::render(format!("failed to read mesh '{}': {e}", path.display()))
    })?;
    parse_obj(buf, &src, &path)
}

fn resolve_mesh_path(file: &str) -> PathBuf {
    let path = PathBuf::from(file);
    if path.extension().is_none() {
        path.with_extension("obj")
    } else {
        path
    }
}

fn parse_obj(buf: &mut PolygonBuffer, src: &str, path: &Path) -> ScanlineResult<()> {
    let mut vertices: Vec<DVec3> = Vec::new();

    for (idx, line) in src.lines().enumerate() {
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let mut coord = |what: &str| -> ScanlineResult<f64> {
                    tokens
                        .next()
                        .and_then(|t| t.parse::<f64>().ok())
                        .ok_or_else(|| {
                            ScanlineError::render(format!(
                                "{}:{line_no}: bad vertex {what}",
                                path.display()
                            ))
                        })
                };
                let x = coord("x")?;
                let y = coord("y")?;
                let z = coord("z")?;
                vertices.push(DVec3::new(x, y, z));
            }
            Some("f") => {
                let corners = tokens
                    .map(|t| face_vertex(t, &vertices, path, line_no))
                    .collect::<ScanlineResult<Vec<_>>>()?;
                if corners.len() < 3 {
                    return Err(ScanlineError::render(format!(
                        "{}:{line_no}: face needs at least 3 vertices",
                        path.display()
                    )));
                }
                for i in 1..corners.len() - 1 {
                    buf.push(corners[0], corners[i], corners[i + 1]);
                }
            }
            _ => {} // vt, vn, comments, groups, materials
        }
    }

    Ok(())
}

fn face_vertex(
    token: &str,
    vertices: &[DVec3],
    path: &Path,
    line_no: usize,
) -> ScanlineResult<DVec3> {
    let index_part = token.split('/').next().unwrap_or(token);
    let raw: i64 = index_part.parse().map_err(|_| {
        ScanlineError::render(format!(
            "{}:{line_no}: bad face index '{token}'",
            path.display()
        ))
    })?;

    let idx = if raw > 0 {
        (raw - 1) as usize
    } else if raw < 0 {
        let back = (-raw) as usize;
        if back > vertices.len() {
            return Err(ScanlineError::render(format!(
                "{}:{line_no}: face index {raw} out of range",
                path.display()
            )));
        }
        vertices.len() - back
    } else {
        return Err(ScanlineError::render(format!(
            "{}:{line_no}: face index 0 is not valid",
            path.display()
        )));
    };

    vertices.get(idx).copied().ok_or_else(|| {
        ScanlineError::render(format!(
            "{}:{line_no}: face index {raw} out of range",
            path.display()
        ))
    })
}
