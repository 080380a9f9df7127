mod stencil;
pub mod diagnostics;
mod params;

pub use params::SimulationParameters;

use log::{debug, info};

use crate::error::Result;
use crate::grid::Grid;
use crate::renderer::Palette;
use stencil::advance;
use params::{validate_finite, validate_grid_size, validate_unit};

/// Offset subtracted from a height before it is mapped from [-1, 1] onto [0, 1]
/// for colouring. Under review: the browser demo maps `(h + 1) / 2` before offsetting,
/// so a resting field shows at 0.5 there but at 0.25 here.
pub const DISPLAY_CENTRE_OFFSET: f64 = 0.5;

/// A discretised 2D wave field with paintable walls.
///
/// Owns three same-shaped grids (height, velocity, obstacle mask) plus the physical
/// parameters. The driver serialises all calls.
#[derive(Clone, Debug)]
pub struct WaveField {
    params: SimulationParameters,
    height: Grid<f64>,
    velocity: Grid<f64>,
    obstacle: Grid<bool>,
    /// Receives the next heights during a sweep, then swapped with `height`.
    scratch: Grid<f64>,
    steps: u64,
}

impl Default for WaveField {
    fn default() -> Self {
        let params = SimulationParameters::default();
        let n = params.grid_size;
        Self::allocate(params, n)
    }
}

impl WaveField {
    /// Build a resting field. Fails with `InvalidParameter` before allocating anything.
    pub fn new(params: SimulationParameters) -> Result<Self> {
        params.validate()?;
        let n = params.grid_size;
        Ok(Self::allocate(params, n))
    }

    /// Positional constructor mirroring the settings surface.
    pub fn create(
        grid_size: usize,
        wave_speed: f64,
        damping: f64,
        wall_reflection: f64,
        diffraction_factor: f64,
    ) -> Result<Self> {
        Self::new(SimulationParameters {
            grid_size,
            wave_speed,
            damping,
            wall_reflection,
            diffraction_factor,
            ..SimulationParameters::default()
        })
    }

    fn allocate(params: SimulationParameters, n: usize) -> Self {
        Self {
            params,
            height: Grid::new(n),
            velocity: Grid::new(n),
            obstacle: Grid::new(n),
            scratch: Grid::new(n),
            steps: 0,
        }
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn grid_size(&self) -> usize {
        self.params.grid_size
    }

    pub fn height(&self) -> &Grid<f64> {
        &self.height
    }

    pub fn velocity(&self) -> &Grid<f64> {
        &self.velocity
    }

    pub fn obstacle(&self) -> &Grid<bool> {
        &self.obstacle
    }

    /// Number of `step()` calls since construction, reset or resize.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_obstacle(&self, gx: i32, gy: i32) -> bool {
        self.obstacle.get(gx, gy).copied().unwrap_or(false)
    }

    /// Add `strength` to the velocity of a free interior cell.
    ///
    /// Border cells, wall cells and coordinates off the grid are ignored.
    /// Returns whether the wave was applied.
    pub fn inject_wave(&mut self, gx: i32, gy: i32, strength: f64) -> bool {
        if !self.height.is_interior(gx, gy) || self.is_obstacle(gx, gy) {
            return false;
        }
        self.velocity[(gx as usize, gy as usize)] += strength;
        debug!("wave {strength} injected at ({gx}, {gy})");
        true
    }

    /// `inject_wave` with the configured default strength.
    pub fn inject_default_wave(&mut self, gx: i32, gy: i32) -> bool {
        self.inject_wave(gx, gy, self.params.wave_strength)
    }

    /// Mark or clear a wall cell. Off-grid coordinates are ignored; existing
    /// height and velocity at the cell are left for `step()` to decay.
    pub fn set_obstacle(&mut self, gx: i32, gy: i32, present: bool) -> bool {
        match self.obstacle.get_mut(gx, gy) {
            Some(cell) => {
                *cell = present;
                true
            }
            None => false,
        }
    }

    /// Zero every grid at the current size. Parameters are kept.
    pub fn reset(&mut self) {
        let n = self.params.grid_size;
        self.height = Grid::new(n);
        self.velocity = Grid::new(n);
        self.obstacle = Grid::new(n);
        self.scratch = Grid::new(n);
        self.steps = 0;
        info!("field reset ({n}x{n})");
    }

    /// Discard all state and start a new simulation at `new_grid_size`.
    /// Rejected sizes leave the field untouched.
    pub fn resize(&mut self, new_grid_size: usize) -> Result<()> {
        validate_grid_size(new_grid_size)?;
        self.params.grid_size = new_grid_size;
        self.reset();
        Ok(())
    }

    pub fn set_wave_speed(&mut self, v: f64) -> Result<()> {
        validate_finite("wave_speed", v)?;
        self.params.wave_speed = v;
        Ok(())
    }

    pub fn set_damping(&mut self, v: f64) -> Result<()> {
        validate_unit("damping", v)?;
        self.params.damping = v;
        Ok(())
    }

    pub fn set_wall_reflection(&mut self, v: f64) -> Result<()> {
        validate_finite("wall_reflection", v)?;
        self.params.wall_reflection = v;
        Ok(())
    }

    pub fn set_diffraction_factor(&mut self, v: f64) -> Result<()> {
        validate_unit("diffraction_factor", v)?;
        self.params.diffraction_factor = v;
        Ok(())
    }

    pub fn set_wave_strength(&mut self, v: f64) -> Result<()> {
        validate_finite("wave_strength", v)?;
        self.params.wave_strength = v;
        Ok(())
    }

    /// Apply a whole parameter set. A different grid size starts a new simulation;
    /// otherwise the field keeps evolving with the new coefficients.
    pub fn set_params(&mut self, params: SimulationParameters) -> Result<()> {
        params.validate()?;
        let resized = params.grid_size != self.params.grid_size;
        self.params = params;
        if resized {
            self.reset();
        }
        Ok(())
    }

    /// Advance the field by one discrete time unit.
    pub fn step(&mut self) {
        self.scratch.clear();
        advance(&self.height, &mut self.scratch, &mut self.velocity, &self.obstacle, &self.params);
        std::mem::swap(&mut self.height, &mut self.scratch);
        self.steps += 1;
    }

    /// Height at `(x, y)` recentred and mapped into [0, 1] for colouring.
    pub fn display_value(&self, x: usize, y: usize) -> Option<f64> {
        self.height
            .get(x as i32, y as i32)
            .map(|&h| normalize_height(h))
    }

    /// Colour for the cell at `(x, y)` under `palette`. Wall cells are not special-cased;
    /// the renderer paints them with its own sentinel colour.
    pub fn sample_color(&self, x: usize, y: usize, palette: &Palette) -> Option<[u8; 4]> {
        self.display_value(x, y).map(|t| palette.map_to_rgba(t))
    }
}

/// `clamp((h - 0.5 + 1) / 2, 0, 1)`.
pub fn normalize_height(h: f64) -> f64 {
    ((h - DISPLAY_CENTRE_OFFSET + 1.0) / 2.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WaveError;
    use crate::renderer::ColorMap;

    fn scenario_field() -> WaveField {
        WaveField::create(5, 0.025, 0.995, -0.75, 0.2).unwrap()
    }

    fn assert_at_rest(field: &WaveField) {
        assert!(field.height().iter().all(|&h| h == 0.0));
        assert!(field.velocity().iter().all(|&v| v == 0.0));
        assert!(field.obstacle().iter().all(|&w| !w));
    }

    fn border_cells(n: usize) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for i in 0..n {
            cells.push((i, 0));
            cells.push((i, n - 1));
            cells.push((0, i));
            cells.push((n - 1, i));
        }
        cells
    }

    #[test]
    fn test_default_field() {
        let field = WaveField::default();
        assert_eq!(field.grid_size(), 100);
        assert_eq!(field.height().size(), 100);
        assert_eq!(field.velocity().size(), 100);
        assert_eq!(field.obstacle().size(), 100);
        assert_at_rest(&field);
    }

    #[test]
    fn test_create_rejects_small_grid() {
        for n in 0..3 {
            let err = WaveField::create(n, 0.05, 0.98, -0.75, 0.2).unwrap_err();
            assert!(matches!(err, WaveError::InvalidParameter { name: "grid_size", .. }));
        }
        assert!(WaveField::create(3, 0.05, 0.98, -0.75, 0.2).is_ok());
    }

    #[test]
    fn test_inject_wave_sets_velocity_only() {
        let mut field = scenario_field();
        assert!(field.inject_wave(2, 2, 5.0));
        assert_eq!(field.velocity()[(2, 2)], 5.0);
        assert!(field.height().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_inject_wave_accumulates() {
        let mut field = scenario_field();
        field.inject_wave(2, 2, 5.0);
        field.inject_wave(2, 2, 1.5);
        assert_eq!(field.velocity()[(2, 2)], 6.5);
    }

    #[test]
    fn test_inject_wave_on_border_is_noop() {
        let mut field = scenario_field();
        let before = field.clone();
        for (x, y) in border_cells(5) {
            assert!(!field.inject_wave(x as i32, y as i32, 5.0));
        }
        assert!(!field.inject_wave(-1, 2, 5.0));
        assert!(!field.inject_wave(2, 7, 5.0));
        assert_eq!(field.velocity(), before.velocity());
        assert_eq!(field.height(), before.height());
    }

    #[test]
    fn test_inject_wave_on_obstacle_is_noop() {
        let mut field = scenario_field();
        field.set_obstacle(2, 2, true);
        assert!(!field.inject_wave(2, 2, 5.0));
        assert_eq!(field.velocity()[(2, 2)], 0.0);
    }

    #[test]
    fn test_inject_default_wave_uses_strength() {
        let mut field = scenario_field();
        field.inject_default_wave(1, 1);
        assert_eq!(field.velocity()[(1, 1)], 5.0);
        field.set_wave_strength(2.0).unwrap();
        field.inject_default_wave(1, 1);
        assert_eq!(field.velocity()[(1, 1)], 7.0);
    }

    #[test]
    fn test_set_obstacle_in_and_out_of_range() {
        let mut field = scenario_field();
        assert!(field.set_obstacle(0, 0, true));
        assert!(field.set_obstacle(4, 4, true));
        assert!(field.is_obstacle(0, 0));
        assert!(field.set_obstacle(0, 0, false));
        assert!(!field.is_obstacle(0, 0));

        let before = field.obstacle().clone();
        assert!(!field.set_obstacle(-1, 0, true));
        assert!(!field.set_obstacle(5, 2, true));
        assert!(!field.set_obstacle(2, 5, true));
        assert_eq!(field.obstacle(), &before);
    }

    #[test]
    fn test_set_obstacle_keeps_height_and_velocity() {
        let mut field = scenario_field();
        field.inject_wave(2, 2, 5.0);
        field.step();
        let h = field.height()[(2, 2)];
        let v = field.velocity()[(2, 2)];
        field.set_obstacle(2, 2, true);
        assert_eq!(field.height()[(2, 2)], h);
        assert_eq!(field.velocity()[(2, 2)], v);
    }

    #[test]
    fn test_first_step_scenario() {
        let mut field = scenario_field();
        field.inject_wave(2, 2, 5.0);
        field.step();
        assert!((field.velocity()[(2, 2)] - 4.975).abs() < 1e-12);
        assert!((field.height()[(2, 2)] - 4.975).abs() < 1e-12);
        for (x, y) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            assert_eq!(field.height()[(x, y)], 0.0, "({x},{y}) moved on step 1");
            assert_eq!(field.velocity()[(x, y)], 0.0);
        }
    }

    #[test]
    fn test_second_step_reaches_neighbours() {
        let mut field = scenario_field();
        field.inject_wave(2, 2, 5.0);
        field.step();
        field.step();
        // laplacian at a neighbour = 4.975 (centre) - 0
        let expected = 4.975 * 0.025 * 0.995;
        for (x, y) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            assert!((field.velocity()[(x, y)] - expected).abs() < 1e-12);
            assert!((field.height()[(x, y)] - expected).abs() < 1e-12);
        }
        // centre: v = (4.975 + (-4 * 4.975) * 0.025) * 0.995
        let v_centre = (4.975 + (-4.0 * 4.975) * 0.025) * 0.995;
        assert!((field.velocity()[(2, 2)] - v_centre).abs() < 1e-12);
        assert!((field.height()[(2, 2)] - (4.975 + v_centre)).abs() < 1e-12);
    }

    #[test]
    fn test_obstacle_cell_scenario() {
        let mut field = scenario_field();
        field.inject_wave(2, 2, 5.0);
        field.step();
        let h0 = field.height()[(2, 2)];
        let v0 = field.velocity()[(2, 2)];
        field.set_obstacle(2, 2, true);
        field.step();
        assert!((field.height()[(2, 2)] - h0 * -0.75).abs() < 1e-12);
        assert!((field.velocity()[(2, 2)] - v0 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_obstacle_cell_ignores_neighbours_over_time() {
        let mut field = WaveField::create(7, 0.05, 0.98, -0.75, 0.2).unwrap();
        field.set_obstacle(3, 3, true);
        field.inject_wave(2, 3, 5.0);
        field.inject_wave(4, 3, -3.0);
        for _ in 0..20 {
            field.step();
            assert_eq!(field.height()[(3, 3)], 0.0);
            assert_eq!(field.velocity()[(3, 3)], 0.0);
        }
    }

    #[test]
    fn test_border_zero_after_every_step() {
        let mut field = WaveField::create(9, 0.05, 0.98, -0.75, 0.2).unwrap();
        field.inject_wave(1, 1, 5.0);
        field.inject_wave(7, 4, -4.0);
        field.set_obstacle(0, 4, true);
        field.set_obstacle(4, 8, true);
        for _ in 0..50 {
            field.step();
            for (x, y) in border_cells(9) {
                assert_eq!(field.height()[(x, y)], 0.0, "border ({x},{y}) nonzero");
            }
        }
    }

    #[test]
    fn test_rest_is_fixed_point() {
        let mut field = WaveField::create(10, 0.05, 0.98, -0.75, 0.2).unwrap();
        for _ in 0..10 {
            field.step();
        }
        assert_at_rest(&field);
        assert_eq!(field.steps(), 10);
    }

    #[test]
    fn test_step_preserves_dimensions_and_finiteness() {
        let mut field = WaveField::create(32, 0.05, 0.98, -0.75, 0.2).unwrap();
        for i in 5..27 {
            field.set_obstacle(16, i, true);
        }
        field.inject_wave(8, 16, 5.0);
        field.inject_wave(24, 10, -5.0);
        for _ in 0..500 {
            field.step();
        }
        assert_eq!(field.height().size(), 32);
        assert_eq!(field.velocity().size(), 32);
        assert_eq!(field.obstacle().size(), 32);
        assert!(field.height().iter().all(|h| h.is_finite()));
        assert!(field.velocity().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_waves_pass_through_gap_in_wall() {
        let mut field = WaveField::create(21, 0.05, 0.98, -0.75, 0.2).unwrap();
        for y in 1..20 {
            if y != 10 {
                field.set_obstacle(10, y, true);
            }
        }
        field.inject_wave(5, 10, 5.0);
        for _ in 0..60 {
            field.step();
        }
        let behind: f64 = (11..20).map(|x| field.height()[(x, 10)].abs()).sum();
        assert!(behind > 0.0, "energy should reach the far side of the gap");
    }

    #[test]
    fn test_reset_clears_state_keeps_params() {
        let mut field = scenario_field();
        field.inject_wave(2, 2, 5.0);
        field.set_obstacle(1, 1, true);
        field.step();
        field.reset();
        assert_at_rest(&field);
        assert_eq!(field.grid_size(), 5);
        assert_eq!(field.params().wave_speed, 0.025);
        assert_eq!(field.steps(), 0);
    }

    #[test]
    fn test_resize_reallocates() {
        let mut field = scenario_field();
        field.inject_wave(2, 2, 5.0);
        field.set_obstacle(3, 3, true);
        field.resize(12).unwrap();
        assert_eq!(field.grid_size(), 12);
        assert_eq!(field.height().size(), 12);
        assert_eq!(field.velocity().size(), 12);
        assert_eq!(field.obstacle().size(), 12);
        assert_at_rest(&field);
        assert_eq!(field.params().damping, 0.995);
    }

    #[test]
    fn test_resize_rejected_leaves_state() {
        let mut field = scenario_field();
        field.inject_wave(2, 2, 5.0);
        let err = field.resize(2).unwrap_err();
        assert!(matches!(err, WaveError::InvalidParameter { name: "grid_size", .. }));
        assert_eq!(field.grid_size(), 5);
        assert_eq!(field.velocity()[(2, 2)], 5.0);
    }

    #[test]
    fn test_setters_validate() {
        let mut field = scenario_field();
        assert!(field.set_damping(1.2).is_err());
        assert_eq!(field.params().damping, 0.995);
        assert!(field.set_diffraction_factor(-0.1).is_err());
        assert!(field.set_wave_speed(f64::NAN).is_err());
        assert!(field.set_wall_reflection(-0.5).is_ok());
        assert_eq!(field.params().wall_reflection, -0.5);
    }

    #[test]
    fn test_set_params_same_size_keeps_field() {
        let mut field = scenario_field();
        field.inject_wave(2, 2, 5.0);
        let mut p = field.params().clone();
        p.wave_speed = 0.04;
        field.set_params(p).unwrap();
        assert_eq!(field.velocity()[(2, 2)], 5.0);
        assert_eq!(field.params().wave_speed, 0.04);
    }

    #[test]
    fn test_set_params_new_size_resets() {
        let mut field = scenario_field();
        field.inject_wave(2, 2, 5.0);
        let p = SimulationParameters { grid_size: 8, ..field.params().clone() };
        field.set_params(p).unwrap();
        assert_eq!(field.grid_size(), 8);
        assert_at_rest(&field);
    }

    #[test]
    fn test_normalize_height_constant_offset() {
        // (h - 0.5 + 1) / 2
        assert!((normalize_height(0.0) - 0.25).abs() < 1e-12);
        assert!((normalize_height(0.5) - 0.5).abs() < 1e-12);
        assert!((normalize_height(1.5) - 1.0).abs() < 1e-12);
        assert_eq!(normalize_height(10.0), 1.0);
        assert_eq!(normalize_height(-10.0), 0.0);
    }

    #[test]
    fn test_display_value_and_sample_color() {
        let mut field = scenario_field();
        field.inject_wave(2, 2, 5.0);
        field.step();
        assert_eq!(field.display_value(2, 2), Some(1.0));
        assert_eq!(field.display_value(0, 0), Some(0.25));
        assert_eq!(field.display_value(5, 0), None);

        let palette = Palette::new(ColorMap::Jet).unwrap();
        let hot = field.sample_color(2, 2, &palette).unwrap();
        assert_eq!(hot, palette.map_to_rgba(1.0));
        assert!(field.sample_color(9, 9, &palette).is_none());
    }
}
