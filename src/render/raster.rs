//! Visibility-correct rasterization: z-buffered scanline polygon fill with
//! flat shading, and z-interpolated line drawing.

use glam::DVec3;

use crate::{
    geometry::primitives::{EdgeBuffer, PolygonBuffer},
    render::screen::{Rgb, Screen},
    script::symbols::{Reflectance, SymbolTable},
};

const SPECULAR_EXP: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub location: DVec3,
    pub color: DVec3,
}

/// View and light parameters, fixed for the duration of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct Lighting {
    pub view: DVec3,
    pub ambient: DVec3,
    pub lights: Vec<PointLight>,
}

impl Lighting {
    /// Default view/ambient plus one built-in point light, extended with
    /// every `light` symbol in the table.
    pub fn from_symbols(symbols: &SymbolTable) -> Self {
        let mut lights = vec![PointLight {
            location: DVec3::new(0.5, 0.75, 1.0),
            color: DVec3::new(255.0, 255.0, 255.0),
        }];
        lights.extend(
            symbols
                .lights()
                .into_iter()
                .map(|(location, color)| PointLight { location, color }),
        );

        Self {
            view: DVec3::new(0.0, 0.0, 1.0),
            ambient: DVec3::new(50.0, 50.0, 50.0),
            lights,
        }
    }
}

/// Rasterizes every triangle in `buf` as a filled, flat-shaded polygon.
/// Triangles facing away from the view vector are culled.
pub fn draw_polygons(
    buf: &PolygonBuffer,
    screen: &mut Screen,
    lighting: &Lighting,
    reflect: &Reflectance,
) {
    for tri in &buf.tris {
        let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
        if normal.dot(lighting.view) <= 0.0 {
            continue;
        }
        let color = shade(normal, lighting, reflect);
        fill_triangle(screen, tri, color);
    }
}

/// Rasterizes every edge in `buf` with a single color.
pub fn draw_lines(buf: &EdgeBuffer, screen: &mut Screen, color: Rgb) {
    for edge in &buf.edges {
        draw_line(screen, edge[0], edge[1], color);
    }
}

/// Flat ambient + diffuse + specular shading for one polygon normal.
fn shade(normal: DVec3, lighting: &Lighting, reflect: &Reflectance) -> Rgb {
    let n = normal.normalize();
    let v = lighting.view.normalize();

    let mut color = lighting.ambient * reflect.ambient;
    for light in &lighting.lights {
        let l = light.location.normalize();
        let n_dot_l = n.dot(l).max(0.0);
        color += light.color * reflect.diffuse * n_dot_l;

        let reflected = 2.0 * n * n_dot_l - l;
        let highlight = reflected.dot(v).max(0.0).powi(SPECULAR_EXP);
        color += light.color * reflect.specular * highlight;
    }

    Rgb::new(
        color.x.clamp(0.0, 255.0) as u8,
        color.y.clamp(0.0, 255.0) as u8,
        color.z.clamp(0.0, 255.0) as u8,
    )
}

/// Classic bottom-to-top scanline fill with z interpolation.
fn fill_triangle(screen: &mut Screen, tri: &[DVec3; 3], color: Rgb) {
    let mut v = *tri;
    v.sort_by(|a, b| a.y.total_cmp(&b.y));
    let [bot, mid, top] = v;

    if (top.y - bot.y).abs() < f64::EPSILON {
        return; // degenerate: no vertical extent
    }

    let y_start = bot.y.ceil() as i64;
    let y_end = top.y.floor() as i64;
    for y in y_start..=y_end {
        let yf = y as f64;
        let (xa, za) = edge_at(bot, top, yf);
        let (xb, zb) = if yf < mid.y {
            edge_at(bot, mid, yf)
        } else {
            edge_at(mid, top, yf)
        };
        draw_span(screen, y, xa, za, xb, zb, color);
    }
}

/// Point on the edge `p -> q` at scanline `y`.
fn edge_at(p: DVec3, q: DVec3, y: f64) -> (f64, f64) {
    let dy = q.y - p.y;
    if dy.abs() < f64::EPSILON {
        return (p.x, p.z);
    }
    let t = (y - p.y) / dy;
    (p.x + t * (q.x - p.x), p.z + t * (q.z - p.z))
}

fn draw_span(screen: &mut Screen, y: i64, x0: f64, z0: f64, x1: f64, z1: f64, color: Rgb) {
    let (x0, z0, x1, z1) = if x0 <= x1 {
        (x0, z0, x1, z1)
    } else {
        (x1, z1, x0, z0)
    };

    let start = x0.ceil() as i64;
    let end = x1.floor() as i64;
    let dx = x1 - x0;
    for x in start..=end {
        let t = if dx.abs() < f64::EPSILON {
            0.0
        } else {
            (x as f64 - x0) / dx
        };
        screen.plot(x, y, z0 + t * (z1 - z0), color);
    }
}

/// DDA line with z interpolation.
fn draw_line(screen: &mut Screen, p0: DVec3, p1: DVec3, color: Rgb) {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let steps = dx.abs().max(dy.abs()).ceil() as i64;
    if steps == 0 {
        screen.plot(p0.x.round() as i64, p0.y.round() as i64, p0.z, color);
        return;
    }

    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        screen.plot(
            (p0.x + t * dx).round() as i64,
            (p0.y + t * dy).round() as i64,
            p0.z + t * (p1.z - p0.z),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::add_edge;

    fn lit() -> Lighting {
        Lighting::from_symbols(&SymbolTable::new())
    }

    fn coverage(screen: &Screen) -> usize {
        let mut n = 0;
        for y in 0..screen.height() {
            for x in 0..screen.width() {
                if screen.pixel(x, y) != Rgb::BLACK {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn front_facing_triangle_fills_pixels() {
        let mut screen = Screen::with_size(40, 40);
        let mut buf = PolygonBuffer::new();
        buf.push(
            DVec3::new(5.0, 5.0, 0.0),
            DVec3::new(35.0, 5.0, 0.0),
            DVec3::new(20.0, 35.0, 0.0),
        );
        draw_polygons(&buf, &mut screen, &lit(), &Reflectance::NEUTRAL);
        assert!(coverage(&screen) > 100);
    }

    #[test]
    fn back_facing_triangle_is_culled() {
        let mut screen = Screen::with_size(40, 40);
        let mut buf = PolygonBuffer::new();
        // Clockwise winding: the normal points along -z, away from the view.
        buf.push(
            DVec3::new(5.0, 5.0, 0.0),
            DVec3::new(20.0, 35.0, 0.0),
            DVec3::new(35.0, 5.0, 0.0),
        );
        draw_polygons(&buf, &mut screen, &lit(), &Reflectance::NEUTRAL);
        assert_eq!(coverage(&screen), 0);
    }

    #[test]
    fn nearer_surface_occludes_farther_one() {
        let mut screen = Screen::with_size(40, 40);
        let far = Reflectance {
            diffuse: DVec3::new(1.0, 0.0, 0.0),
            ..Reflectance::NEUTRAL
        };
        let near = Reflectance {
            diffuse: DVec3::new(0.0, 1.0, 0.0),
            ..Reflectance::NEUTRAL
        };

        let mut buf = PolygonBuffer::new();
        buf.push(
            DVec3::new(5.0, 5.0, -10.0),
            DVec3::new(35.0, 5.0, -10.0),
            DVec3::new(20.0, 35.0, -10.0),
        );
        draw_polygons(&buf, &mut screen, &lit(), &far);

        buf.clear();
        buf.push(
            DVec3::new(5.0, 5.0, 10.0),
            DVec3::new(35.0, 5.0, 10.0),
            DVec3::new(20.0, 35.0, 10.0),
        );
        draw_polygons(&buf, &mut screen, &lit(), &near);

        let c = screen.pixel(20, 10);
        assert!(c.g > c.r, "near (green) surface should win: {c:?}");
    }

    #[test]
    fn shade_clamps_channels() {
        let hot = Reflectance {
            ambient: DVec3::splat(10.0),
            diffuse: DVec3::splat(10.0),
            specular: DVec3::splat(10.0),
        };
        let c = shade(DVec3::new(0.0, 0.0, 1.0), &lit(), &hot);
        assert_eq!(c, Rgb::WHITE);

        let dark = Reflectance {
            ambient: DVec3::ZERO,
            diffuse: DVec3::ZERO,
            specular: DVec3::ZERO,
        };
        let c = shade(DVec3::new(0.0, 0.0, 1.0), &lit(), &dark);
        assert_eq!(c, Rgb::BLACK);
    }

    #[test]
    fn lines_plot_their_endpoints() {
        let mut screen = Screen::with_size(20, 20);
        let mut buf = EdgeBuffer::new();
        add_edge(
            &mut buf,
            DVec3::new(2.0, 3.0, 0.0),
            DVec3::new(15.0, 11.0, 0.0),
        );
        draw_lines(&buf, &mut screen, Rgb::WHITE);
        assert_eq!(screen.pixel(2, 3), Rgb::WHITE);
        assert_eq!(screen.pixel(15, 11), Rgb::WHITE);
    }
}
