//! Animation assembly: numbered frame PNGs into one looping GIF.

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};

use crate::foundation::error::{ScanlineError, ScanlineResult};

const FRAME_DELAY_MS: u32 = 66; // ~15 fps, close to a classic preview rate

/// Path of frame `f` for `basename`, shared with the orchestrator so the
/// assembler always finds what was saved.
pub fn frame_path(dir: &Path, basename: &str, frame: u32) -> PathBuf {
    dir.join(format!("{basename}{frame:03}.png"))
}

/// Reads frames `0..num_frames` for `basename` out of `dir` and encodes
/// `<dir>/<basename>.gif`, looping forever.
pub fn assemble_gif(dir: &Path, basename: &str, num_frames: u32) -> ScanlineResult<PathBuf> {
    if num_frames == 0 {
        return Err(ScanlineError::animation(
            "cannot assemble an animation with zero frames",
        ));
    }

    let out_path = dir.join(format!("{basename}.gif"));
    let file = File::create(&out_path)
        .with_context(|| format!("failed to create animation '{}'", out_path.display()))?;
    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), 10);
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| ScanlineError::render(format!("failed to configure gif encoder: {e}")))?;

    for f in 0..num_frames {
        let path = frame_path(dir, basename, f);
        let img = image::open(&path)
            .with_context(|| format!("failed to read frame '{}'", path.display()))?
            .to_rgba8();
        let frame = image::Frame::from_parts(
            img,
            0,
            0,
            image::Delay::from_numer_denom_ms(FRAME_DELAY_MS, 1),
        );
        encoder
            .encode_frame(frame)
            .map_err(|e| ScanlineError::render(format!("failed to encode frame {f}: {e}")))?;
    }

    Ok(out_path)
}
