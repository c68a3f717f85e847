//! Scanline is a script-driven 3D renderer and animator.
//!
//! A scene script is a flat sequence of drawing, transform, and animation
//! statements. Rendering a script runs in three stages:
//!
//! 1. **Analyze**: [`extract_metadata`] validates the animation directives
//!    and yields the frame count and output base name; [`build_schedule`]
//!    precomputes every varying knob's value for every frame.
//! 2. **Interpret**: for each frame, [`exec_commands`] replays the command
//!    sequence against a fresh transform stack and frame/z buffer,
//!    rasterizing shapes with the z-buffered scanline backend.
//! 3. **Assemble**: animated runs save one PNG per frame
//!    (`<basename><frame:03>.png`) and combine them into a looping GIF;
//!    single-frame runs only honor explicit `save`/`display` statements.
//!
//! [`run_script`] drives all three stages end to end.
#![forbid(unsafe_code)]

pub mod anim;
pub mod encode;
pub mod engine;
pub mod foundation;
pub mod geometry;
pub mod math;
pub mod render;
pub mod script;

pub use anim::schedule::{
    AnimationMeta, DEFAULT_BASENAME, KnobSchedule, build_schedule, extract_metadata,
};
pub use encode::gif::{assemble_gif, frame_path};
pub use engine::interpreter::{FrameState, TransformStack, exec_commands};
pub use engine::orchestrator::{RunOpts, RunSummary, run, run_script};
pub use foundation::error::{ScanlineError, ScanlineResult};
pub use geometry::primitives::{CURVE_STEPS, EdgeBuffer, PolygonBuffer};
pub use render::raster::{Lighting, PointLight};
pub use render::screen::{Rgb, Screen, XRES, YRES};
pub use script::command::{Axis, Command};
pub use script::parse::{parse_file, parse_script};
pub use script::symbols::{Reflectance, Symbol, SymbolTable};
