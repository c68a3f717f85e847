use std::path::PathBuf;

use glam::DVec3;

/// Rotation axis for the `rotate` command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// One parsed script statement.
///
/// Commands are immutable once produced by the parser. Animation directives
/// (`Frames`, `Basename`, `Vary`) carry metadata consumed by the analysis
/// passes and are no-ops during per-frame interpretation; everything else is
/// executed in program order against one frame's transform stack.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum Command {
    Frames {
        count: u32,
    },
    Basename {
        name: String,
    },
    Vary {
        knob: String,
        start_frame: i64,
        end_frame: i64,
        start_value: f64,
        end_value: f64,
    },
    Box {
        constants: Option<String>,
        corner: DVec3,
        width: f64,
        height: f64,
        depth: f64,
    },
    Sphere {
        constants: Option<String>,
        center: DVec3,
        radius: f64,
    },
    Torus {
        constants: Option<String>,
        center: DVec3,
        tube_radius: f64,
        ring_radius: f64,
    },
    Line {
        start: DVec3,
        end: DVec3,
    },
    Mesh {
        constants: Option<String>,
        file: String,
    },
    Move {
        delta: DVec3,
        knob: Option<String>,
    },
    Scale {
        factors: DVec3,
        knob: Option<String>,
    },
    Rotate {
        axis: Axis,
        degrees: f64,
        knob: Option<String>,
    },
    Push,
    Pop,
    Display,
    Save {
        path: PathBuf,
    },
}
