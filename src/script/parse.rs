//! Line-oriented parser for scene scripts.
//!
//! Each non-empty line holds one statement. `//` and `#` start a comment that
//! runs to the end of the line. `constants` and `light` statements are
//! declarations and go straight into the symbol table; everything else
//! becomes a [`Command`]. Knob names referenced by `vary` or by transform
//! statements are registered as knob entries so the interpreter can resolve
//! them by name.

use std::path::Path;

use glam::DVec3;

use crate::{
    foundation::error::{ScanlineError, ScanlineResult},
    script::command::{Axis, Command},
    script::symbols::{Reflectance, Symbol, SymbolTable},
};

pub fn parse_file(path: &Path) -> ScanlineResult<(Vec<Command>, SymbolTable)> {
    let src = std::fs::read_to_string(path).map_err(|e| {
        ScanlineError::parse(format!("failed to read script '{}': {e}", path.display()))
    })?;
    parse_script(&src)
}

pub fn parse_script(src: &str) -> ScanlineResult<(Vec<Command>, SymbolTable)> {
    let mut commands = Vec::new();
    let mut symbols = SymbolTable::new();

    for (idx, raw) in src.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw);
        let mut args = Args::new(line, line_no);
        let Some(op) = args.next_opt() else {
            continue;
        };

        match op {
            "frames" => {
                let count = args.u32("frame count")?;
                commands.push(Command::Frames { count });
            }
            "basename" => {
                let name = args.name("base name")?.to_string();
                commands.push(Command::Basename { name });
            }
            "vary" => {
                let knob = args.name("knob name")?.to_string();
                let start_frame = args.i64("start frame")?;
                let end_frame = args.i64("end frame")?;
                let start_value = args.f64("start value")?;
                let end_value = args.f64("end value")?;
                symbols.declare_knob(&knob);
                commands.push(Command::Vary {
                    knob,
                    start_frame,
                    end_frame,
                    start_value,
                    end_value,
                });
            }
            "constants" => {
                let name = args.name("constants name")?.to_string();
                let mut k = [0.0f64; 9];
                for (i, slot) in k.iter_mut().enumerate() {
                    *slot = args.f64(&format!("coefficient {}", i + 1))?;
                }
                symbols.insert(
                    name,
                    Symbol::Constants(Reflectance {
                        ambient: DVec3::new(k[0], k[3], k[6]),
                        diffuse: DVec3::new(k[1], k[4], k[7]),
                        specular: DVec3::new(k[2], k[5], k[8]),
                    }),
                );
            }
            "light" => {
                let name = args.name("light name")?.to_string();
                let location = args.vec3("location")?;
                let color = args.vec3("color")?;
                symbols.insert(name, Symbol::Light { location, color });
            }
            "box" => {
                let constants = args.leading_name();
                let corner = args.vec3("corner")?;
                let width = args.f64("width")?;
                let height = args.f64("height")?;
                let depth = args.f64("depth")?;
                commands.push(Command::Box {
                    constants,
                    corner,
                    width,
                    height,
                    depth,
                });
            }
            "sphere" => {
                let constants = args.leading_name();
                let center = args.vec3("center")?;
                let radius = args.f64("radius")?;
                commands.push(Command::Sphere {
                    constants,
                    center,
                    radius,
                });
            }
            "torus" => {
                let constants = args.leading_name();
                let center = args.vec3("center")?;
                let tube_radius = args.f64("tube radius")?;
                let ring_radius = args.f64("ring radius")?;
                commands.push(Command::Torus {
                    constants,
                    center,
                    tube_radius,
                    ring_radius,
                });
            }
            "line" => {
                let start = args.vec3("start point")?;
                let end = args.vec3("end point")?;
                commands.push(Command::Line { start, end });
            }
            "mesh" => {
                let constants = args.leading_name_if_more();
                let file = args
                    .name("mesh file")?
                    .trim_start_matches(':')
                    .to_string();
                commands.push(Command::Mesh { constants, file });
            }
            "move" => {
                let delta = args.vec3("translation")?;
                let knob = args.trailing_knob(&mut symbols);
                commands.push(Command::Move { delta, knob });
            }
            "scale" => {
                let factors = args.vec3("scale factors")?;
                let knob = args.trailing_knob(&mut symbols);
                commands.push(Command::Scale { factors, knob });
            }
            "rotate" => {
                let axis = args.axis()?;
                let degrees = args.f64("angle")?;
                let knob = args.trailing_knob(&mut symbols);
                commands.push(Command::Rotate {
                    axis,
                    degrees,
                    knob,
                });
            }
            "push" => commands.push(Command::Push),
            "pop" => commands.push(Command::Pop),
            "display" => commands.push(Command::Display),
            "save" => {
                let path = args.name("output path")?.into();
                commands.push(Command::Save { path });
            }
            other => {
                return Err(ScanlineError::parse(format!(
                    "line {line_no}: unknown statement '{other}'"
                )));
            }
        }

        args.finish(op)?;
    }

    Ok((commands, symbols))
}

fn strip_comment(line: &str) -> &str {
    let end = line.find("//").unwrap_or(line.len());
    let end = line.find('#').map_or(end, |h| h.min(end));
    &line[..end]
}

/// Token cursor for one statement, carrying the line number for diagnostics.
struct Args<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
    line_no: usize,
}

impl<'a> Args<'a> {
    fn new(line: &'a str, line_no: usize) -> Self {
        Self {
            tokens: line.split_whitespace().collect(),
            pos: 0,
            line_no,
        }
    }

    fn next_opt(&mut self) -> Option<&'a str> {
        let tok = self.tokens.get(self.pos).copied()?;
        self.pos += 1;
        Some(tok)
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    fn name(&mut self, what: &str) -> ScanlineResult<&'a str> {
        self.next_opt().ok_or_else(|| {
            ScanlineError::parse(format!("line {}: missing {what}", self.line_no))
        })
    }

    fn f64(&mut self, what: &str) -> ScanlineResult<f64> {
        let tok = self.name(what)?;
        tok.parse::<f64>().map_err(|_| {
            ScanlineError::parse(format!(
                "line {}: expected a number for {what}, got '{tok}'",
                self.line_no
            ))
        })
    }

    fn i64(&mut self, what: &str) -> ScanlineResult<i64> {
        let tok = self.name(what)?;
        tok.parse::<i64>().map_err(|_| {
            ScanlineError::parse(format!(
                "line {}: expected an integer for {what}, got '{tok}'",
                self.line_no
            ))
        })
    }

    fn u32(&mut self, what: &str) -> ScanlineResult<u32> {
        let tok = self.name(what)?;
        tok.parse::<u32>().map_err(|_| {
            ScanlineError::parse(format!(
                "line {}: expected a non-negative integer for {what}, got '{tok}'",
                self.line_no
            ))
        })
    }

    fn vec3(&mut self, what: &str) -> ScanlineResult<DVec3> {
        Ok(DVec3::new(
            self.f64(what)?,
            self.f64(what)?,
            self.f64(what)?,
        ))
    }

    fn axis(&mut self) -> ScanlineResult<Axis> {
        let tok = self.name("rotation axis")?;
        match tok {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            "z" | "Z" => Ok(Axis::Z),
            _ => Err(ScanlineError::parse(format!(
                "line {}: expected rotation axis x, y, or z, got '{tok}'",
                self.line_no
            ))),
        }
    }

    /// Consumes the next token as a constants name when it is not numeric.
    fn leading_name(&mut self) -> Option<String> {
        let tok = self.peek()?;
        if tok.parse::<f64>().is_ok() {
            return None;
        }
        self.pos += 1;
        Some(tok.to_string())
    }

    /// Like [`Args::leading_name`], but only when another token follows it.
    fn leading_name_if_more(&mut self) -> Option<String> {
        if self.remaining() < 2 {
            return None;
        }
        self.leading_name()
    }

    /// Consumes a trailing knob name, registering it in the symbol table.
    fn trailing_knob(&mut self, symbols: &mut SymbolTable) -> Option<String> {
        let tok = self.next_opt()?;
        symbols.declare_knob(tok);
        Some(tok.to_string())
    }

    fn finish(&self, op: &str) -> ScanlineResult<()> {
        if self.pos < self.tokens.len() {
            return Err(ScanlineError::parse(format!(
                "line {}: unexpected trailing arguments for '{op}'",
                self.line_no
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_animation_directives() {
        let (commands, symbols) = parse_script(
            "frames 10\n\
             basename spin\n\
             vary turn 0 9 0.0 360.0\n",
        )
        .unwrap();

        assert_eq!(commands[0], Command::Frames { count: 10 });
        assert_eq!(
            commands[1],
            Command::Basename {
                name: "spin".to_string()
            }
        );
        assert_eq!(
            commands[2],
            Command::Vary {
                knob: "turn".to_string(),
                start_frame: 0,
                end_frame: 9,
                start_value: 0.0,
                end_value: 360.0,
            }
        );
        // vary registers the knob so the interpreter can resolve it.
        assert_eq!(symbols.knob("turn").unwrap(), 0.0);
    }

    #[test]
    fn shape_constants_are_optional() {
        let (commands, _) = parse_script(
            "box 0 0 0 10 20 30\n\
             box shiny 0 0 0 10 20 30\n",
        )
        .unwrap();

        let Command::Box { constants, .. } = &commands[0] else {
            panic!("expected box");
        };
        assert!(constants.is_none());

        let Command::Box { constants, .. } = &commands[1] else {
            panic!("expected box");
        };
        assert_eq!(constants.as_deref(), Some("shiny"));
    }

    #[test]
    fn transform_knobs_are_optional_and_registered() {
        let (commands, symbols) = parse_script(
            "move 1 2 3\n\
             scale 2 2 2 grow\n\
             rotate y 90 turn\n",
        )
        .unwrap();

        assert_eq!(
            commands[0],
            Command::Move {
                delta: DVec3::new(1.0, 2.0, 3.0),
                knob: None,
            }
        );
        assert_eq!(
            commands[1],
            Command::Scale {
                factors: DVec3::new(2.0, 2.0, 2.0),
                knob: Some("grow".to_string()),
            }
        );
        assert_eq!(
            commands[2],
            Command::Rotate {
                axis: Axis::Y,
                degrees: 90.0,
                knob: Some("turn".to_string()),
            }
        );
        assert!(symbols.knob("grow").is_ok());
        assert!(symbols.knob("turn").is_ok());
    }

    #[test]
    fn constants_statement_populates_symbol_table() {
        let (commands, symbols) = parse_script(
            "constants shiny 0.1 0.2 0.3 0.4 0.5 0.6 0.7 0.8 0.9\n",
        )
        .unwrap();
        assert!(commands.is_empty());

        let r = symbols.constants("shiny").unwrap();
        assert_eq!(r.ambient, DVec3::new(0.1, 0.4, 0.7));
        assert_eq!(r.diffuse, DVec3::new(0.2, 0.5, 0.8));
        assert_eq!(r.specular, DVec3::new(0.3, 0.6, 0.9));
    }

    #[test]
    fn mesh_accepts_colon_prefix_and_constants() {
        let (commands, _) = parse_script(
            "mesh :teapot.obj\n\
             mesh shiny :teapot.obj\n",
        )
        .unwrap();

        assert_eq!(
            commands[0],
            Command::Mesh {
                constants: None,
                file: "teapot.obj".to_string(),
            }
        );
        assert_eq!(
            commands[1],
            Command::Mesh {
                constants: Some("shiny".to_string()),
                file: "teapot.obj".to_string(),
            }
        );
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let (commands, _) = parse_script(
            "// full line comment\n\
             \n\
             push // trailing comment\n\
             pop # another style\n",
        )
        .unwrap();
        assert_eq!(commands, vec![Command::Push, Command::Pop]);
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = parse_script("push\nfrobnicate\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));

        let err = parse_script("move 1 two 3\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert!(parse_script("push extra\n").is_err());
        assert!(parse_script("line 0 0 0 1 1 1 1\n").is_err());
    }
}
