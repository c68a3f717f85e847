//! Frame orchestration: the run entry point that ties the analysis passes,
//! the per-frame interpreter, and the output collaborators together.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    anim::schedule::{build_schedule, extract_metadata},
    encode::gif::{assemble_gif, frame_path},
    engine::interpreter::{FrameState, exec_commands},
    foundation::error::ScanlineResult,
    render::raster::Lighting,
    script::command::Command,
    script::parse::parse_file,
    script::symbols::SymbolTable,
};

#[derive(Clone, Debug)]
pub struct RunOpts {
    /// Directory for numbered animation frames and the assembled GIF.
    pub out_dir: PathBuf,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("anim"),
        }
    }
}

/// What a completed run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_rendered: u32,
    pub frame_paths: Vec<PathBuf>,
    pub animation: Option<PathBuf>,
}

/// Parses and runs a script file.
pub fn run_script(path: &Path, opts: &RunOpts) -> ScanlineResult<RunSummary> {
    let (commands, mut symbols) = parse_file(path)?;
    run(&commands, &mut symbols, opts)
}

/// Renders every frame of a parsed program.
///
/// Both analysis passes complete before the first frame, so a fatal
/// animation error produces no output files. Per-frame state is rebuilt from
/// scratch each iteration; the symbol table is shared across frames and only
/// its knob values change.
#[tracing::instrument(skip_all, fields(commands = commands.len()))]
pub fn run(
    commands: &[Command],
    symbols: &mut SymbolTable,
    opts: &RunOpts,
) -> ScanlineResult<RunSummary> {
    let meta = extract_metadata(commands)?;
    let schedule = build_schedule(commands, meta.num_frames)?;
    let lighting = Lighting::from_symbols(symbols);
    let animated = meta.is_animated();

    if animated {
        std::fs::create_dir_all(&opts.out_dir).with_context(|| {
            format!(
                "failed to create output directory '{}'",
                opts.out_dir.display()
            )
        })?;
    }

    let mut summary = RunSummary::default();
    for f in 0..meta.num_frames {
        if animated {
            for (knob, value) in schedule.frame(f as usize) {
                symbols.set_knob(knob, *value)?;
                tracing::info!(frame = f, knob = %knob, value, "knob applied");
            }
        }

        let mut state = FrameState::new();
        exec_commands(commands, &mut state, symbols, &lighting)?;

        if animated {
            let path = frame_path(&opts.out_dir, &meta.basename, f);
            state.screen.save_png(&path)?;
            tracing::info!(frame = f, path = %path.display(), "saved frame");
            summary.frame_paths.push(path);
        }
        summary.frames_rendered += 1;
    }

    if animated {
        let gif = assemble_gif(&opts.out_dir, &meta.basename, meta.num_frames)?;
        tracing::info!(path = %gif.display(), "assembled animation");
        summary.animation = Some(gif);
    }

    Ok(summary)
}
