use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ScanlineError, ScanlineResult};

pub const XRES: usize = 500;
pub const YRES: usize = 500;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Per-frame color buffer plus z-buffer.
///
/// Plot coordinates are y-up with the origin at the bottom-left; rows are
/// stored top-down so the buffer can be handed to the PNG writer as-is.
/// Depth starts at negative infinity and larger z wins (the view vector
/// points along +z).
#[derive(Clone, Debug)]
pub struct Screen {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    depth: Vec<f64>,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self::with_size(XRES, YRES)
    }

    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
            depth: vec![f64::NEG_INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn plot(&mut self, x: i64, y: i64, z: f64, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let row = self.height - 1 - y as usize;
        let idx = row * self.width + x as usize;
        if z > self.depth[idx] {
            self.pixels[idx] = color;
            self.depth[idx] = z;
        }
    }

    /// Color at plot coordinates (y-up), mainly for tests.
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        let row = self.height - 1 - y;
        self.pixels[row * self.width + x]
    }

    pub fn save_png(&self, path: &Path) -> ScanlineResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
        }

        let mut raw = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            raw.extend_from_slice(&[p.r, p.g, p.b]);
        }
        let img = image::RgbImage::from_raw(self.width as u32, self.height as u32, raw)
            .ok_or_else(|| ScanlineError::render("frame buffer size mismatch (bug)"))?;
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| ScanlineError::render(format!("failed to write '{}': {e}", path.display())))
    }

    /// Presents the frame through the system `display` viewer.
    ///
    /// A missing viewer is a degraded environment, not a script error: we log
    /// a warning and continue so headless runs still complete.
    pub fn display(&self) -> ScanlineResult<()> {
        let path = std::env::temp_dir().join(format!(
            "scanline_display_{}_{}.png",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ));
        self.save_png(&path)?;

        let status = std::process::Command::new("display").arg(&path).status();
        match status {
            Ok(s) if !s.success() => {
                tracing::warn!(status = %s, "display viewer exited with an error");
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not launch the 'display' viewer; skipping");
            }
            Ok(_) => {}
        }

        let _ = std::fs::remove_file(&path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_respects_depth_and_bounds() {
        let mut s = Screen::with_size(4, 4);
        s.plot(1, 1, 0.0, Rgb::WHITE);
        assert_eq!(s.pixel(1, 1), Rgb::WHITE);

        // A nearer plot wins, a farther one does not.
        s.plot(1, 1, 5.0, Rgb::new(10, 20, 30));
        assert_eq!(s.pixel(1, 1), Rgb::new(10, 20, 30));
        s.plot(1, 1, -1.0, Rgb::WHITE);
        assert_eq!(s.pixel(1, 1), Rgb::new(10, 20, 30));

        // Out-of-bounds plots are dropped silently.
        s.plot(-1, 0, 0.0, Rgb::WHITE);
        s.plot(0, 4, 0.0, Rgb::WHITE);
    }

    #[test]
    fn rows_are_stored_top_down() {
        let mut s = Screen::with_size(2, 2);
        s.plot(0, 0, 0.0, Rgb::WHITE); // bottom-left in plot space
        assert_eq!(s.pixels[2], Rgb::WHITE); // second stored row
    }

    #[test]
    fn save_png_writes_a_decodable_file() {
        let dir = std::path::PathBuf::from("target").join("screen_png_test");
        let path = dir.join("out.png");
        let _ = std::fs::remove_file(&path);

        let mut s = Screen::with_size(8, 8);
        s.plot(3, 4, 0.0, Rgb::new(200, 100, 50));
        s.save_png(&path).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (8, 8));
        assert_eq!(img.get_pixel(3, 3).0, [200, 100, 50]); // y flipped on save
    }
}
