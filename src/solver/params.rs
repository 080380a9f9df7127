use crate::error::{Result, WaveError};
use crate::grid::MIN_GRID_SIZE;

/// Physical parameters of the wave field.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParameters {
    /// Cells per side.
    pub grid_size: usize,
    /// Coupling strength between a cell and its neighbours per step.
    pub wave_speed: f64,
    /// Per-step velocity retention in `[0, 1]`.
    pub damping: f64,
    /// Multiplier applied to a wall cell's own height each step (usually negative).
    pub wall_reflection: f64,
    /// Fraction of a cell's own height substituted for a blocked neighbour, in `[0, 1]`.
    pub diffraction_factor: f64,
    /// Velocity added by a pointer-triggered wave injection.
    pub wave_strength: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            grid_size: 100,
            wave_speed: 0.05,
            damping: 0.98,
            wall_reflection: -0.75,
            diffraction_factor: 0.2,
            wave_strength: 5.0,
        }
    }
}

impl SimulationParameters {
    /// Parameters the windowed demo starts with: finer grid, slower and longer-lived ripples.
    pub fn default_demo() -> Self {
        Self {
            grid_size: 125,
            wave_speed: 0.025,
            damping: 0.995,
            wall_reflection: -0.75,
            diffraction_factor: 0.2,
            wave_strength: 5.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_grid_size(self.grid_size)?;
        validate_finite("wave_speed", self.wave_speed)?;
        validate_unit("damping", self.damping)?;
        validate_finite("wall_reflection", self.wall_reflection)?;
        validate_unit("diffraction_factor", self.diffraction_factor)?;
        validate_finite("wave_strength", self.wave_strength)?;
        Ok(())
    }
}

pub(crate) fn validate_grid_size(n: usize) -> Result<()> {
    if n < MIN_GRID_SIZE {
        return Err(WaveError::invalid(
            "grid_size",
            format!("must be at least {MIN_GRID_SIZE}, got {n}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_finite(name: &'static str, v: f64) -> Result<()> {
    if !v.is_finite() {
        return Err(WaveError::invalid(name, format!("must be finite, got {v}")));
    }
    Ok(())
}

pub(crate) fn validate_unit(name: &'static str, v: f64) -> Result<()> {
    validate_finite(name, v)?;
    if !(0.0..=1.0).contains(&v) {
        return Err(WaveError::invalid(name, format!("must lie in [0, 1], got {v}")));
    }
    Ok(())
}
