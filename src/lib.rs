//! Interactive 2D wave propagation on a square grid with paintable walls.

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod input;
pub mod overlay;
pub mod renderer;
pub mod solver;

pub use error::{Result, WaveError};
pub use solver::{SimulationParameters, WaveField};
