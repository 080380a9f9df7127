use crate::grid::Grid;

use super::WaveField;

/// Summary shown in the status bar.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldStats {
    pub energy: f64,
    pub peak: f64,
    pub walls: usize,
}

impl FieldStats {
    pub fn of(field: &WaveField) -> Self {
        Self {
            energy: compute_energy(field.height(), field.velocity()),
            peak: compute_peak(field.height()),
            walls: count_walls(field.obstacle()),
        }
    }
}

/// Field energy proxy: 0.5 * Σ(v² + h²) over every cell.
pub fn compute_energy(height: &Grid<f64>, velocity: &Grid<f64>) -> f64 {
    let kinetic: f64 = velocity.iter().map(|v| v * v).sum();
    let potential: f64 = height.iter().map(|h| h * h).sum();
    0.5 * (kinetic + potential)
}

/// Largest absolute height in the field.
pub fn compute_peak(height: &Grid<f64>) -> f64 {
    height.iter().fold(0.0_f64, |m, h| m.max(h.abs()))
}

pub fn count_walls(obstacle: &Grid<bool>) -> usize {
    obstacle.iter().filter(|&&w| w).count()
}
