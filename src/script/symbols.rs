use std::collections::BTreeMap;

use glam::DVec3;

use crate::foundation::error::{ScanlineError, ScanlineResult};

/// Per-channel reflectance coefficients for lighting.
///
/// Each field holds the (red, green, blue) coefficient for one lighting
/// contribution.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Reflectance {
    pub ambient: DVec3,
    pub diffuse: DVec3,
    pub specular: DVec3,
}

impl Reflectance {
    /// Neutral material used when a shape names no constants.
    pub const NEUTRAL: Self = Self {
        ambient: DVec3::new(0.2, 0.2, 0.2),
        diffuse: DVec3::new(0.5, 0.5, 0.5),
        specular: DVec3::new(0.5, 0.5, 0.5),
    };
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum Symbol {
    Constants(Reflectance),
    Knob(f64),
    Light { location: DVec3, color: DVec3 },
}

/// Name -> symbol map shared across all frames of a run.
///
/// Entry identities are stable for the duration of a run; only knob values
/// are overwritten (once per frame, by the orchestrator).
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct SymbolTable {
    entries: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.entries.insert(name.into(), symbol);
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.entries.get(name)
    }

    /// Registers `name` as a knob with value 0.0 unless it already exists.
    pub fn declare_knob(&mut self, name: &str) {
        self.entries
            .entry(name.to_string())
            .or_insert(Symbol::Knob(0.0));
    }

    pub fn knob(&self, name: &str) -> ScanlineResult<f64> {
        match self.entries.get(name) {
            Some(Symbol::Knob(v)) => Ok(*v),
            Some(_) => Err(ScanlineError::render(format!(
                "symbol '{name}' is not a knob"
            ))),
            None => Err(ScanlineError::render(format!("unknown knob '{name}'"))),
        }
    }

    pub fn set_knob(&mut self, name: &str, value: f64) -> ScanlineResult<()> {
        match self.entries.get_mut(name) {
            Some(Symbol::Knob(v)) => {
                *v = value;
                Ok(())
            }
            Some(_) => Err(ScanlineError::render(format!(
                "symbol '{name}' is not a knob"
            ))),
            None => Err(ScanlineError::render(format!("unknown knob '{name}'"))),
        }
    }

    pub fn constants(&self, name: &str) -> ScanlineResult<Reflectance> {
        match self.entries.get(name) {
            Some(Symbol::Constants(r)) => Ok(*r),
            Some(_) => Err(ScanlineError::render(format!(
                "symbol '{name}' is not a constants entry"
            ))),
            None => Err(ScanlineError::render(format!(
                "unknown constants entry '{name}'"
            ))),
        }
    }

    /// All declared point lights, in name order.
    pub fn lights(&self) -> Vec<(DVec3, DVec3)> {
        self.entries
            .values()
            .filter_map(|s| match s {
                Symbol::Light { location, color } => Some((*location, *color)),
                _ => None,
            })
            .collect()
    }
}
