use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::renderer::ColorMap;
use crate::solver::SimulationParameters;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "wavarium.yaml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid_size: usize,
    pub wave_speed: f64,
    pub damping: f64,
    pub wall_reflection: f64,
    pub diffraction_factor: f64,
    pub wave_strength: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    pub target_fps: usize,
    pub steps_per_frame: usize,
    pub colormap: ColorMap,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationParameters::default_demo().into()
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 900,
            target_fps: 60,
            steps_per_frame: 1,
            colormap: ColorMap::Jet,
        }
    }
}

impl From<SimulationParameters> for SimulationConfig {
    fn from(p: SimulationParameters) -> Self {
        Self {
            grid_size: p.grid_size,
            wave_speed: p.wave_speed,
            damping: p.damping,
            wall_reflection: p.wall_reflection,
            diffraction_factor: p.diffraction_factor,
            wave_strength: p.wave_strength,
        }
    }
}

impl SimulationConfig {
    /// Parameters for the field. Invalid values fall back to the demo preset
    /// with a warning.
    pub fn to_params(&self) -> SimulationParameters {
        let params = SimulationParameters {
            grid_size: self.grid_size,
            wave_speed: self.wave_speed,
            damping: self.damping,
            wall_reflection: self.wall_reflection,
            diffraction_factor: self.diffraction_factor,
            wave_strength: self.wave_strength,
        };
        match params.validate() {
            Ok(()) => params,
            Err(e) => {
                warn!("{e}; using demo parameters");
                SimulationParameters::default_demo()
            }
        }
    }
}

/// Load the default config file, or defaults if it is absent.
pub fn load() -> Config {
    load_from(Path::new(DEFAULT_CONFIG_PATH))
}

/// Load config from `path`. A missing file yields defaults silently; a file
/// that cannot be read or parsed yields defaults with a warning.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("failed to read {}: {e}; using defaults", path.display());
            return Config::default();
        }
    };
    match serde_yaml::from_str(&contents) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            warn!("failed to parse {}: {e}; using defaults", path.display());
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.simulation.grid_size, 125);
        assert_eq!(cfg.simulation.wave_speed, 0.025);
        assert_eq!(cfg.simulation.damping, 0.995);
        assert_eq!(cfg.simulation.wall_reflection, -0.75);
        assert_eq!(cfg.simulation.diffraction_factor, 0.2);
        assert_eq!(cfg.simulation.wave_strength, 5.0);
        assert_eq!(cfg.display.width, 900);
        assert_eq!(cfg.display.height, 900);
        assert_eq!(cfg.display.target_fps, 60);
        assert_eq!(cfg.display.steps_per_frame, 1);
        assert_eq!(cfg.display.colormap, ColorMap::Jet);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "simulation:\n  damping: 0.99\ndisplay:\n  colormap: viridis\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.simulation.damping, 0.99);
        assert_eq!(cfg.simulation.grid_size, 125); // default
        assert_eq!(cfg.display.colormap, ColorMap::Viridis);
        assert_eq!(cfg.display.width, 900); // default
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
simulation:
  grid_size: 200
  wave_speed: 0.05
  damping: 0.98
  wall_reflection: -0.5
  diffraction_factor: 0.3
  wave_strength: 8.0
display:
  width: 640
  height: 480
  target_fps: 30
  steps_per_frame: 2
  colormap: plasma
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.simulation.grid_size, 200);
        assert_eq!(cfg.simulation.wave_speed, 0.05);
        assert_eq!(cfg.simulation.damping, 0.98);
        assert_eq!(cfg.simulation.wall_reflection, -0.5);
        assert_eq!(cfg.simulation.diffraction_factor, 0.3);
        assert_eq!(cfg.simulation.wave_strength, 8.0);
        assert_eq!(cfg.display.width, 640);
        assert_eq!(cfg.display.height, 480);
        assert_eq!(cfg.display.target_fps, 30);
        assert_eq!(cfg.display.steps_per_frame, 2);
        assert_eq!(cfg.display.colormap, ColorMap::Plasma);
    }

    #[test]
    fn test_unknown_colormap_rejected() {
        let yaml = "display:\n  colormap: rainbow\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_to_params_valid() {
        let cfg = SimulationConfig { grid_size: 64, ..SimulationConfig::default() };
        let p = cfg.to_params();
        assert_eq!(p.grid_size, 64);
        assert_eq!(p.wave_speed, 0.025);
    }

    #[test]
    fn test_to_params_invalid_falls_back() {
        let cfg = SimulationConfig { damping: 1.5, ..SimulationConfig::default() };
        assert_eq!(cfg.to_params(), SimulationParameters::default_demo());
    }

    #[test]
    fn test_load_missing_file() {
        let cfg = load_from(Path::new("no-such-dir/wavarium.yaml"));
        assert_eq!(cfg.simulation.grid_size, 125);
    }

    #[test]
    fn test_load_unparsable_file() {
        let path = std::env::temp_dir().join(format!("wavarium-bad-{}.yaml", std::process::id()));
        std::fs::write(&path, "simulation: [not, a, map]\n").unwrap();
        let cfg = load_from(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(cfg.display.width, 900);
    }
}
