//! Transform-stack interpreter: executes one command sequence against one
//! frame's mutable state, in program order, with no look-ahead.

use glam::DMat4;

use crate::{
    foundation::error::{ScanlineError, ScanlineResult},
    geometry::mesh::add_mesh,
    geometry::primitives::{
        CURVE_STEPS, EdgeBuffer, PolygonBuffer, add_box, add_edge, add_sphere, add_torus,
    },
    math::matrix,
    render::raster::{Lighting, draw_lines, draw_polygons},
    render::screen::{Rgb, Screen},
    script::command::Command,
    script::symbols::{Reflectance, SymbolTable},
};

/// Stack of cumulative transform matrices.
///
/// Never empty: the bottom entry is the frame's base identity, and `pop`
/// refuses to remove it.
#[derive(Clone, Debug)]
pub struct TransformStack {
    mats: Vec<DMat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            mats: vec![matrix::identity()],
        }
    }

    pub fn depth(&self) -> usize {
        self.mats.len()
    }

    pub fn top(&self) -> &DMat4 {
        self.mats.last().expect("transform stack is never empty")
    }

    /// Duplicates the top. `DMat4` is a value type, so the copy is
    /// independent of the original.
    pub fn push_dup(&mut self) {
        let top = *self.top();
        self.mats.push(top);
    }

    pub fn pop(&mut self) -> ScanlineResult<()> {
        if self.mats.len() == 1 {
            return Err(ScanlineError::render(
                "pop would remove the frame's base transform (unbalanced push/pop)",
            ));
        }
        self.mats.pop();
        Ok(())
    }

    /// Right-multiplies `m` into the top, replacing it in place.
    pub fn apply(&mut self, m: DMat4) {
        let top = self.mats.last_mut().expect("transform stack is never empty");
        *top = matrix::compose(*top, m);
    }
}

/// One frame's mutable interpreter state, rebuilt from scratch per frame.
#[derive(Clone, Debug)]
pub struct FrameState {
    pub stack: TransformStack,
    pub screen: Screen,
    pub polygons: PolygonBuffer,
    pub edges: EdgeBuffer,
    pub edge_color: Rgb,
}

impl Default for FrameState {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameState {
    pub fn new() -> Self {
        Self {
            stack: TransformStack::new(),
            screen: Screen::new(),
            polygons: PolygonBuffer::new(),
            edges: EdgeBuffer::new(),
            edge_color: Rgb::WHITE,
        }
    }
}

/// Executes the full command sequence against `state`.
///
/// The symbol table is read-only here; knob values were written by the
/// orchestrator before the frame started.
pub fn exec_commands(
    commands: &[Command],
    state: &mut FrameState,
    symbols: &SymbolTable,
    lighting: &Lighting,
) -> ScanlineResult<()> {
    for command in commands {
        exec_command(command, state, symbols, lighting)?;
    }
    Ok(())
}

fn exec_command(
    command: &Command,
    state: &mut FrameState,
    symbols: &SymbolTable,
    lighting: &Lighting,
) -> ScanlineResult<()> {
    match command {
        // Animation directives are consumed by the analysis passes.
        Command::Frames { .. } | Command::Basename { .. } | Command::Vary { .. } => {}

        Command::Box {
            constants,
            corner,
            width,
            height,
            depth,
        } => {
            add_box(&mut state.polygons, *corner, *width, *height, *depth);
            flush_polygons(state, symbols, lighting, constants.as_deref())?;
        }
        Command::Sphere {
            constants,
            center,
            radius,
        } => {
            add_sphere(&mut state.polygons, *center, *radius, CURVE_STEPS);
            flush_polygons(state, symbols, lighting, constants.as_deref())?;
        }
        Command::Torus {
            constants,
            center,
            tube_radius,
            ring_radius,
        } => {
            add_torus(
                &mut state.polygons,
                *center,
                *tube_radius,
                *ring_radius,
                CURVE_STEPS,
            );
            flush_polygons(state, symbols, lighting, constants.as_deref())?;
        }
        Command::Mesh { constants, file } => {
            add_mesh(&mut state.polygons, file)?;
            flush_polygons(state, symbols, lighting, constants.as_deref())?;
        }
        Command::Line { start, end } => {
            add_edge(&mut state.edges, *start, *end);
            state.edges.transform(state.stack.top());
            draw_lines(&state.edges, &mut state.screen, state.edge_color);
            state.edges.clear();
        }

        Command::Move { delta, knob } => {
            let k = knob_multiplier(symbols, knob.as_deref())?;
            state.stack.apply(matrix::translation(*delta * k));
        }
        Command::Scale { factors, knob } => {
            let k = knob_multiplier(symbols, knob.as_deref())?;
            state.stack.apply(matrix::scaling(*factors * k));
        }
        Command::Rotate {
            axis,
            degrees,
            knob,
        } => {
            let k = knob_multiplier(symbols, knob.as_deref())?;
            state.stack.apply(matrix::rotation(*axis, *degrees * k));
        }

        Command::Push => state.stack.push_dup(),
        Command::Pop => state.stack.pop()?,
        Command::Display => state.screen.display()?,
        Command::Save { path } => state.screen.save_png(path)?,
    }
    Ok(())
}

/// Transform, shade, and rasterize the pending polygons, then clear the
/// buffer. The command's material applies to this draw only; with no
/// constants reference the neutral default is used.
fn flush_polygons(
    state: &mut FrameState,
    symbols: &SymbolTable,
    lighting: &Lighting,
    constants: Option<&str>,
) -> ScanlineResult<()> {
    let reflect = match constants {
        Some(name) => symbols.constants(name)?,
        None => Reflectance::NEUTRAL,
    };
    state.polygons.transform(state.stack.top());
    draw_polygons(&state.polygons, &mut state.screen, lighting, &reflect);
    state.polygons.clear();
    Ok(())
}

fn knob_multiplier(symbols: &SymbolTable, knob: Option<&str>) -> ScanlineResult<f64> {
    match knob {
        Some(name) => symbols.knob(name),
        None => Ok(1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::command::Axis;
    use glam::DVec3;

    const EPS: f64 = 1e-9;

    fn exec(commands: &[Command], symbols: &SymbolTable) -> ScanlineResult<FrameState> {
        let mut state = FrameState::new();
        let lighting = Lighting::from_symbols(symbols);
        exec_commands(commands, &mut state, symbols, &lighting)?;
        Ok(state)
    }

    #[test]
    fn push_move_pop_restores_the_previous_top() {
        let symbols = SymbolTable::new();
        let commands = vec![
            Command::Move {
                delta: DVec3::new(3.0, 4.0, 5.0),
                knob: None,
            },
            Command::Push,
            Command::Move {
                delta: DVec3::new(100.0, 0.0, 0.0),
                knob: None,
            },
            Command::Pop,
        ];
        let state = exec(&commands, &symbols).unwrap();
        assert_eq!(state.stack.depth(), 1);
        assert!(
            state
                .stack
                .top()
                .abs_diff_eq(matrix::translation(DVec3::new(3.0, 4.0, 5.0)), EPS)
        );
    }

    #[test]
    fn push_duplicates_independently() {
        let symbols = SymbolTable::new();
        let commands = vec![
            Command::Push,
            Command::Scale {
                factors: DVec3::splat(2.0),
                knob: None,
            },
        ];
        let state = exec(&commands, &symbols).unwrap();
        assert_eq!(state.stack.depth(), 2);
        // Mutating the new top left the old one untouched.
        assert!(state.stack.mats[0].abs_diff_eq(matrix::identity(), EPS));
    }

    #[test]
    fn pop_on_base_transform_is_fatal() {
        let symbols = SymbolTable::new();
        let err = exec(&[Command::Pop], &symbols).unwrap_err();
        assert!(err.to_string().contains("pop"));
    }

    #[test]
    fn move_and_rotate_with_zero_knob_compose_identity() {
        let mut symbols = SymbolTable::new();
        symbols.declare_knob("k"); // value 0.0
        let commands = vec![
            Command::Move {
                delta: DVec3::new(10.0, 20.0, 30.0),
                knob: Some("k".to_string()),
            },
            Command::Rotate {
                axis: Axis::Y,
                degrees: 90.0,
                knob: Some("k".to_string()),
            },
        ];
        let state = exec(&commands, &symbols).unwrap();
        assert!(state.stack.top().abs_diff_eq(matrix::identity(), EPS));
    }

    #[test]
    fn knob_scales_the_rotation_angle() {
        let mut symbols = SymbolTable::new();
        symbols.declare_knob("k");
        symbols.set_knob("k", 0.5).unwrap();
        let state = exec(
            &[Command::Rotate {
                axis: Axis::Z,
                degrees: 180.0,
                knob: Some("k".to_string()),
            }],
            &symbols,
        )
        .unwrap();
        assert!(
            state
                .stack
                .top()
                .abs_diff_eq(matrix::rotation(Axis::Z, 90.0), EPS)
        );
    }

    #[test]
    fn unknown_knob_reference_is_an_error() {
        let symbols = SymbolTable::new();
        let err = exec(
            &[Command::Move {
                delta: DVec3::ONE,
                knob: Some("ghost".to_string()),
            }],
            &symbols,
        )
        .unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn unknown_constants_reference_is_an_error() {
        let symbols = SymbolTable::new();
        let err = exec(
            &[Command::Box {
                constants: Some("ghost".to_string()),
                corner: DVec3::ZERO,
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            }],
            &symbols,
        )
        .unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn drawing_a_box_touches_the_screen_and_clears_the_buffer() {
        let symbols = SymbolTable::new();
        let commands = vec![
            Command::Move {
                delta: DVec3::new(200.0, 300.0, 0.0),
                knob: None,
            },
            Command::Box {
                constants: None,
                corner: DVec3::ZERO,
                width: 100.0,
                height: 100.0,
                depth: 100.0,
            },
        ];
        let state = exec(&commands, &symbols).unwrap();
        assert!(state.polygons.is_empty());
        assert_ne!(state.screen.pixel(250, 250), Rgb::BLACK);
    }

    #[test]
    fn line_uses_the_current_stack_top() {
        let symbols = SymbolTable::new();
        let commands = vec![
            Command::Move {
                delta: DVec3::new(10.0, 0.0, 0.0),
                knob: None,
            },
            Command::Line {
                start: DVec3::new(0.0, 5.0, 0.0),
                end: DVec3::new(0.0, 5.0, 0.0),
            },
        ];
        let state = exec(&commands, &symbols).unwrap();
        assert_eq!(state.screen.pixel(10, 5), Rgb::WHITE);
        assert_eq!(state.screen.pixel(0, 5), Rgb::BLACK);
    }
}
