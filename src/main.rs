use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use wavarium::config::{self, Config};
use wavarium::engine::{run_frame, FrameClock};
use wavarium::input::{self, Action, PointerRouter, PointerSample};
use wavarium::overlay::{self, OverlayState};
use wavarium::renderer::{self, ColorMap, Palette, RenderConfig};
use wavarium::solver::diagnostics::FieldStats;
use wavarium::solver::{SimulationParameters, WaveField};

struct Defaults;

impl Defaults {
    const TITLE: &'static str = "wavarium";
}

/// Interactive 2D wave propagation with paintable walls.
#[derive(Parser, Debug)]
#[command(name = "wavarium", version, about)]
struct Args {
    /// YAML config file (defaults to ./wavarium.yaml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Cells per side
    #[arg(short = 'n', long)]
    grid_size: Option<usize>,

    /// Colour scale: jet, viridis, plasma or turbo
    #[arg(short = 'm', long)]
    colormap: Option<ColorMap>,

    /// Field steps per rendered frame
    #[arg(short, long)]
    steps_per_frame: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => {
            if !path.exists() {
                warn!("config {} not found; using defaults", path.display());
            }
            config::load_from(path)
        }
        None => config::load(),
    };
    if let Some(m) = args.colormap {
        cfg.display.colormap = m;
    }
    if let Some(s) = args.steps_per_frame {
        cfg.display.steps_per_frame = s;
    }

    let mut params = cfg.simulation.to_params();
    if let Some(n) = args.grid_size {
        params.grid_size = n;
    }
    let field = WaveField::new(params).context("invalid simulation parameters")?;
    run_gui(field, &cfg)
}

fn format_status(params: &SimulationParameters, colormap: ColorMap, stats: &FieldStats, paused: bool, panel_visible: bool) -> String {
    if panel_visible {
        return "space=close  ud=nav  lr=adj  ,.=fine  r=reset".to_string();
    }
    let state = if paused { "paused  n=step" } else { "running" };
    format!(
        "n={} speed={:.3} damp={:.3} refl={:.2} diff={:.2} | {} | e={:.1} peak={:.2} walls={} | {} | space=params c=map p=pause ctrl+x=reset",
        params.grid_size,
        params.wave_speed,
        params.damping,
        params.wall_reflection,
        params.diffraction_factor,
        colormap,
        stats.energy,
        stats.peak,
        stats.walls,
        state,
    )
}

/// Push edited parameters into the field. A rejected set is reverted so the
/// panel keeps showing what the field runs with. Returns true if the grid was resized.
fn apply_params(field: &mut WaveField, edited: &mut SimulationParameters) -> bool {
    let resized = edited.grid_size != field.grid_size();
    if let Err(e) = field.set_params(edited.clone()) {
        warn!("{e}");
        *edited = field.params().clone();
        return false;
    }
    resized
}

/// Layout plus the two pixel buffers sized to it. Refit together so the
/// presented buffer always matches the layout the renderer wrote.
struct FrameBuffers {
    cfg: RenderConfig,
    rgba: Vec<u8>,
    argb: Vec<u32>,
}

impl FrameBuffers {
    fn fit(pixel_width: usize, pixel_height: usize, grid_size: usize) -> Self {
        let cfg = RenderConfig::fit(pixel_width, pixel_height, grid_size);
        let argb = vec![0u32; cfg.frame_width * cfg.frame_height];
        Self { cfg, rgba: Vec::new(), argb }
    }

    fn refit(&mut self, pixel_width: usize, pixel_height: usize, grid_size: usize) {
        self.cfg = RenderConfig::fit(pixel_width, pixel_height, grid_size);
        let (w, h) = self.size();
        self.argb = vec![0u32; w * h];
        self.rgba.clear();
    }

    fn size(&self) -> (usize, usize) {
        (self.cfg.frame_width, self.cfg.frame_height)
    }
}

fn run_gui(mut field: WaveField, cfg: &Config) -> Result<()> {
    let steps_per_frame = cfg.display.steps_per_frame.max(1);
    let mut palette = Palette::new(cfg.display.colormap)?;
    let mut current_params = field.params().clone();

    let mut frame = FrameBuffers::fit(cfg.display.width, cfg.display.height, field.grid_size());
    let (w, h) = frame.size();
    let mut window_size = (w, h);

    let mut window = Window::new(
        Defaults::TITLE,
        w,
        h,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )
    .context("failed to create window")?;
    window.set_target_fps(cfg.display.target_fps);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)).context("failed to set Ctrl+C handler")?;

    info!(
        "{}x{} grid in a {w}x{h} window, {} steps/frame, {} colormap",
        field.grid_size(),
        field.grid_size(),
        steps_per_frame,
        palette.map()
    );

    let mut overlay_state = OverlayState::new();
    let mut pointer = PointerRouter::new();
    let mut clock = FrameClock::new();

    'frame: while window.is_open() && running.load(Ordering::SeqCst) {
        let ctrl = window.is_key_down(Key::LeftCtrl) || window.is_key_down(Key::RightCtrl);

        // --- Keyboard handling ---
        for key in window.get_keys_pressed(KeyRepeat::Yes) {
            if !input::is_repeatable(key) && !window.is_key_pressed(key, KeyRepeat::No) {
                continue;
            }
            let Some(action) = input::key_action(key, ctrl, overlay_state.visible) else {
                continue;
            };
            match action {
                Action::Quit => break 'frame,
                Action::ToggleOverlay => overlay_state.toggle(),
                Action::CloseOverlay => overlay_state.visible = false,
                Action::Navigate(delta) => overlay_state.navigate(delta),
                Action::Adjust { delta, fine } => {
                    if overlay::adjust_param(&mut current_params, overlay_state.selected, delta, fine)
                        && apply_params(&mut field, &mut current_params)
                    {
                        frame.refit(window_size.0, window_size.1, field.grid_size());
                    }
                }
                Action::ResetParam => {
                    if overlay::reset_param(&mut current_params, overlay_state.selected)
                        && apply_params(&mut field, &mut current_params)
                    {
                        frame.refit(window_size.0, window_size.1, field.grid_size());
                    }
                }
                Action::CycleColormap => match Palette::new(palette.map().next()) {
                    Ok(p) => {
                        info!("colormap {}", p.map());
                        palette = p;
                    }
                    Err(e) => warn!("{e}"),
                },
                Action::TogglePause => {
                    clock.toggle_pause();
                    info!("{}", if clock.is_paused() { "paused" } else { "resumed" });
                }
                Action::StepOnce => {
                    if clock.is_paused() {
                        field.step();
                    }
                }
                Action::ResetField => field.reset(),
            }
        }

        // --- Pointer handling (the open panel covers the grid) ---
        let mut sample = PointerSample {
            pos: window.get_mouse_pos(MouseMode::Discard),
            left: window.get_mouse_down(MouseButton::Left),
            right: window.get_mouse_down(MouseButton::Right),
            ctrl,
        };
        if overlay_state.visible {
            sample = sample.without_buttons();
        }
        for cmd in pointer.route(&sample, &frame.cfg) {
            cmd.apply(&mut field);
        }

        // --- Check for window resize ---
        let new_size = window.get_size();
        if new_size != window_size {
            window_size = new_size;
            frame.refit(new_size.0, new_size.1, field.grid_size());
        }

        let (_, fps_sampled) = run_frame(&mut clock, &mut field, steps_per_frame, Instant::now());

        let stats = FieldStats::of(&field);
        let status_text = format_status(&current_params, palette.map(), &stats, clock.is_paused(), overlay_state.visible);
        renderer::render_into(&mut frame.rgba, &field, &frame.cfg, &palette);
        renderer::render_status(&mut frame.rgba, &frame.cfg, &status_text);
        overlay::render_overlay(
            &mut frame.rgba,
            frame.cfg.frame_width,
            frame.cfg.display_width,
            frame.cfg.display_height,
            &overlay_state,
            &current_params,
        );
        renderer::rgba_to_argb(&frame.rgba, &mut frame.argb);
        let (w, h) = frame.size();
        window.update_with_buffer(&frame.argb, w, h).context("failed to present frame")?;

        if fps_sampled {
            if let Some(fps) = clock.fps() {
                window.set_title(&format!("{} - {fps} fps", Defaults::TITLE));
            }
        }
    }

    info!("shutting down after {} steps", field.steps());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_status_running() {
        let p = SimulationParameters::default_demo();
        let stats = FieldStats { energy: 1.5, peak: 0.25, walls: 7 };
        let s = format_status(&p, ColorMap::Viridis, &stats, false, false);
        assert!(s.starts_with("n=125 speed=0.025 damp=0.995"));
        assert!(s.contains("| viridis |"));
        assert!(s.contains("e=1.5 peak=0.25 walls=7"));
        assert!(s.contains("running"));
    }

    #[test]
    fn test_format_status_paused_and_panel() {
        let p = SimulationParameters::default_demo();
        let stats = FieldStats::default();
        assert!(format_status(&p, ColorMap::Jet, &stats, true, false).contains("paused"));
        assert!(format_status(&p, ColorMap::Jet, &stats, false, true).starts_with("space=close"));
    }

    #[test]
    fn test_apply_params_resize_and_reject() {
        let mut field = WaveField::new(SimulationParameters::default_demo()).unwrap();
        let mut edited = field.params().clone();
        edited.grid_size = 60;
        assert!(apply_params(&mut field, &mut edited));
        assert_eq!(field.grid_size(), 60);

        edited.damping = 2.0;
        assert!(!apply_params(&mut field, &mut edited));
        assert_eq!(edited, *field.params(), "Rejected edit reverts to field params");
    }

    #[test]
    fn test_refit_after_grid_growth_matches_layout() {
        let mut field = WaveField::new(SimulationParameters::default_demo()).unwrap();
        let mut frame = FrameBuffers::fit(300, 300, field.grid_size());
        assert_eq!(frame.size(), (300, 300));

        let mut edited = field.params().clone();
        edited.grid_size = 400;
        assert!(apply_params(&mut field, &mut edited));
        frame.refit(300, 300, field.grid_size());

        let (w, h) = frame.size();
        assert_eq!(w, 400, "grid wider than the window widens the frame");
        assert_eq!(frame.argb.len(), w * h);

        let palette = Palette::new(ColorMap::Jet).unwrap();
        renderer::render_into(&mut frame.rgba, &field, &frame.cfg, &palette);
        assert_eq!(frame.rgba.len(), frame.argb.len() * 4);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["wavarium", "-n", "80", "--colormap", "plasma", "-s", "2"]);
        assert_eq!(args.grid_size, Some(80));
        assert_eq!(args.colormap, Some(ColorMap::Plasma));
        assert_eq!(args.steps_per_frame, Some(2));
        assert!(args.config.is_none());
    }
}
