use crate::grid::Grid;

use super::params::SimulationParameters;

/// Velocity retained by a wall cell each step.
pub(crate) const WALL_VELOCITY_RETENTION: f64 = 0.5;

/// Height a free cell reads from one neighbour. A wall neighbour is replaced by a
/// fraction of the centre height, which lets energy leak around thin walls.
#[inline(always)]
pub(crate) fn neighbour_contribution(neighbour_h: f64, neighbour_wall: bool, centre_h: f64, diffraction: f64) -> f64 {
    if neighbour_wall {
        centre_h * diffraction
    } else {
        neighbour_h
    }
}

/// Five-point laplacian at an interior cell with wall substitution.
/// Caller guarantees `1 <= x, y <= n-2`.
#[inline]
pub(crate) fn laplacian(height: &Grid<f64>, obstacle: &Grid<bool>, x: usize, y: usize, diffraction: f64) -> f64 {
    let h = height[(x, y)];
    let mut sum = 0.0;
    for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
        sum += neighbour_contribution(height[(nx, ny)], obstacle[(nx, ny)], h, diffraction);
    }
    sum - 4.0 * h
}

/// One synchronous sweep over the interior.
///
/// Reads only `height` (the previous step) and writes the new heights into `next`,
/// which must be zeroed on entry so the border stays at rest. `velocity` is updated
/// in place; since the laplacian never reads velocity, sweep order does not matter.
pub(crate) fn advance(
    height: &Grid<f64>,
    next: &mut Grid<f64>,
    velocity: &mut Grid<f64>,
    obstacle: &Grid<bool>,
    params: &SimulationParameters,
) {
    let n = height.size();
    for y in 1..n - 1 {
        for x in 1..n - 1 {
            let h = height[(x, y)];
            if obstacle[(x, y)] {
                next[(x, y)] = h * params.wall_reflection;
                velocity[(x, y)] *= WALL_VELOCITY_RETENTION;
                continue;
            }

            let lap = laplacian(height, obstacle, x, y, params.diffraction_factor);
            let v = (velocity[(x, y)] + lap * params.wave_speed) * params.damping;
            velocity[(x, y)] = v;
            next[(x, y)] = h + v;
        }
    }
}
