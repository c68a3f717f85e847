//! Animation analysis: metadata extraction and the per-frame knob schedule.
//!
//! Both passes run to completion before any frame is rendered, so every
//! fatal inconsistency aborts the run with no output files written.

use std::collections::BTreeMap;

use crate::{
    foundation::error::{ScanlineError, ScanlineResult},
    script::command::Command,
};

/// Base name used when `frames` is present but `basename` is not.
pub const DEFAULT_BASENAME: &str = "frame";

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AnimationMeta {
    pub basename: String,
    pub num_frames: u32,
}

impl AnimationMeta {
    pub fn is_animated(&self) -> bool {
        self.num_frames > 1
    }
}

/// Single scan over the command list for animation directives.
///
/// Order-independent; repeated `frames`/`basename` directives keep the
/// last-seen value. `vary` without `frames` is fatal; `frames` without
/// `basename` degrades to [`DEFAULT_BASENAME`] with a warning.
pub fn extract_metadata(commands: &[Command]) -> ScanlineResult<AnimationMeta> {
    let mut num_frames = 1u32;
    let mut saw_frames = false;
    let mut saw_vary = false;
    let mut basename: Option<&str> = None;

    for command in commands {
        match command {
            Command::Frames { count } => {
                num_frames = *count;
                saw_frames = true;
            }
            Command::Vary { .. } => saw_vary = true,
            Command::Basename { name } => basename = Some(name),
            _ => {}
        }
    }

    if saw_vary && !saw_frames {
        return Err(ScanlineError::animation(
            "vary command present without a frames command",
        ));
    }
    if saw_frames && num_frames == 0 {
        return Err(ScanlineError::animation("frame count must be at least 1"));
    }

    let basename = match basename {
        Some(name) => name.to_string(),
        None => {
            if saw_frames {
                tracing::warn!(
                    default = DEFAULT_BASENAME,
                    "animation present but basename was not set; using default"
                );
            }
            DEFAULT_BASENAME.to_string()
        }
    };

    Ok(AnimationMeta {
        basename,
        num_frames,
    })
}

/// Interpolated knob values, one map per frame.
///
/// A knob only has an entry for frames inside some `vary` range that names
/// it; callers must treat absence as "leave the live value alone", not as
/// zero.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct KnobSchedule {
    frames: Vec<BTreeMap<String, f64>>,
}

impl KnobSchedule {
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, f: usize) -> &BTreeMap<String, f64> {
        &self.frames[f]
    }
}

/// Builds the knob schedule from every `vary` command.
///
/// Values are linear between the endpoints and exact at both. Overlapping
/// `vary` ranges on the same knob overwrite in input order (last write
/// wins); any range violation is fatal and names the offending knob.
pub fn build_schedule(commands: &[Command], num_frames: u32) -> ScanlineResult<KnobSchedule> {
    let mut frames = vec![BTreeMap::new(); num_frames as usize];

    for command in commands {
        let Command::Vary {
            knob,
            start_frame,
            end_frame,
            start_value,
            end_value,
        } = command
        else {
            continue;
        };

        let (s, e) = (*start_frame, *end_frame);
        if s < 0 || e >= i64::from(num_frames) || e <= s {
            return Err(ScanlineError::animation(format!(
                "invalid vary range [{s}, {e}] for knob '{knob}' ({num_frames} frames)"
            )));
        }

        let delta = (end_value - start_value) / (e - s) as f64;
        for f in s..=e {
            let value = if f == s {
                *start_value
            } else {
                start_value + delta * (f - s) as f64
            };
            frames[f as usize].insert(knob.clone(), value);
        }
    }

    Ok(KnobSchedule { frames })
}
