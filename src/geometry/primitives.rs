//! Shape generators for the interpreter's pending-geometry buffers.
//!
//! Generators append counterclockwise-wound triangles (outward normals) or
//! bare edges; the interpreter transforms the buffer by the stack top,
//! rasterizes it, and clears it before the next command.

use glam::{DMat4, DVec3};

/// Tessellation resolution for curved primitives (sphere, torus).
pub const CURVE_STEPS: usize = 100;

/// Transient triangle buffer, cleared after every drawing command.
#[derive(Clone, Debug, Default)]
pub struct PolygonBuffer {
    pub tris: Vec<[DVec3; 3]>,
}

impl PolygonBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, a: DVec3, b: DVec3, c: DVec3) {
        self.tris.push([a, b, c]);
    }

    fn push_quad(&mut self, a: DVec3, b: DVec3, c: DVec3, d: DVec3) {
        self.push(a, b, c);
        self.push(a, c, d);
    }

    pub fn transform(&mut self, m: &DMat4) {
        for tri in &mut self.tris {
            for p in tri {
                *p = m.transform_point3(*p);
            }
        }
    }

    pub fn clear(&mut self) {
        self.tris.clear();
    }

    pub fn len(&self) -> usize {
        self.tris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tris.is_empty()
    }
}

/// Transient edge buffer for line drawing.
#[derive(Clone, Debug, Default)]
pub struct EdgeBuffer {
    pub edges: Vec<[DVec3; 2]>,
}

impl EdgeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, start: DVec3, end: DVec3) {
        self.edges.push([start, end]);
    }

    pub fn transform(&mut self, m: &DMat4) {
        for edge in &mut self.edges {
            for p in edge {
                *p = m.transform_point3(*p);
            }
        }
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Axis-aligned box. `corner` is the top-left-front vertex; the box extends
/// `width` along +x, `height` along -y, and `depth` along -z.
pub fn add_box(buf: &mut PolygonBuffer, corner: DVec3, width: f64, height: f64, depth: f64) {
    let (x0, y0, z0) = (corner.x, corner.y, corner.z);
    let (x1, y1, z1) = (x0 + width, y0 - height, z0 - depth);

    let tl0 = DVec3::new(x0, y0, z0);
    let bl0 = DVec3::new(x0, y1, z0);
    let br0 = DVec3::new(x1, y1, z0);
    let tr0 = DVec3::new(x1, y0, z0);
    let tl1 = DVec3::new(x0, y0, z1);
    let bl1 = DVec3::new(x0, y1, z1);
    let br1 = DVec3::new(x1, y1, z1);
    let tr1 = DVec3::new(x1, y0, z1);

    buf.push_quad(tl0, bl0, br0, tr0); // front (+z)
    buf.push_quad(tr1, br1, bl1, tl1); // back (-z)
    buf.push_quad(tr0, br0, br1, tr1); // right (+x)
    buf.push_quad(tl1, bl1, bl0, tl0); // left (-x)
    buf.push_quad(tl1, tl0, tr0, tr1); // top (+y)
    buf.push_quad(bl0, bl1, br1, br0); // bottom (-y)
}

/// Latitude/longitude sphere tessellation with the y axis as polar axis.
pub fn add_sphere(buf: &mut PolygonBuffer, center: DVec3, radius: f64, steps: usize) {
    let lat_steps = (steps / 2).max(2);
    let lon_steps = steps.max(3);

    let vertex = |lat: usize, lon: usize| -> DVec3 {
        let theta = std::f64::consts::PI * lat as f64 / lat_steps as f64;
        let phi = std::f64::consts::TAU * lon as f64 / lon_steps as f64;
        center
            + radius
                * DVec3::new(
                    theta.sin() * phi.cos(),
                    theta.cos(),
                    theta.sin() * phi.sin(),
                )
    };

    for lat in 0..lat_steps {
        for lon in 0..lon_steps {
            let a = vertex(lat, lon);
            let b = vertex(lat + 1, lon);
            let c = vertex(lat + 1, (lon + 1) % lon_steps);
            let d = vertex(lat, (lon + 1) % lon_steps);

            if lat + 1 < lat_steps {
                buf.push(a, c, b);
            }
            if lat > 0 {
                buf.push(a, d, c);
            }
        }
    }
}

/// Torus in the xz plane. `tube_radius` is the cross-section radius,
/// `ring_radius` the distance from `center` to the tube's core circle.
pub fn add_torus(
    buf: &mut PolygonBuffer,
    center: DVec3,
    tube_radius: f64,
    ring_radius: f64,
    steps: usize,
) {
    let steps = steps.max(3);

    let vertex = |ring: usize, tube: usize| -> DVec3 {
        let phi = std::f64::consts::TAU * ring as f64 / steps as f64;
        let theta = std::f64::consts::TAU * tube as f64 / steps as f64;
        let spoke = tube_radius * theta.cos() + ring_radius;
        center + DVec3::new(phi.cos() * spoke, tube_radius * theta.sin(), -phi.sin() * spoke)
    };

    for ring in 0..steps {
        for tube in 0..steps {
            let a = vertex(ring, tube);
            let b = vertex(ring, (tube + 1) % steps);
            let c = vertex((ring + 1) % steps, (tube + 1) % steps);
            let d = vertex((ring + 1) % steps, tube);
            buf.push_quad(a, d, c, b);
        }
    }
}

pub fn add_edge(buf: &mut EdgeBuffer, start: DVec3, end: DVec3) {
    buf.push(start, end);
}
