use log::debug;
use minifb::Key;

use crate::renderer::RenderConfig;
use crate::solver::WaveField;

/// Keyboard command decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    ToggleOverlay,
    CloseOverlay,
    Navigate(isize),
    Adjust { delta: i32, fine: bool },
    ResetParam,
    CycleColormap,
    TogglePause,
    StepOnce,
    ResetField,
    Quit,
}

/// Decode a key press. Panel keys only apply while the panel is open.
pub fn key_action(key: Key, ctrl: bool, overlay_visible: bool) -> Option<Action> {
    let action = match key {
        Key::Space => Action::ToggleOverlay,
        Key::Escape if overlay_visible => Action::CloseOverlay,
        Key::Escape | Key::Q => Action::Quit,
        Key::X if ctrl => Action::ResetField,
        Key::C => Action::CycleColormap,
        Key::P => Action::TogglePause,
        Key::N => Action::StepOnce,
        _ if !overlay_visible => return None,
        Key::Up => Action::Navigate(-1),
        Key::Down => Action::Navigate(1),
        Key::Left => Action::Adjust { delta: -1, fine: false },
        Key::Right => Action::Adjust { delta: 1, fine: false },
        Key::Comma => Action::Adjust { delta: -1, fine: true },
        Key::Period => Action::Adjust { delta: 1, fine: true },
        Key::R => Action::ResetParam,
        _ => return None,
    };
    Some(action)
}

/// Keys that fire again while held; the rest act once per press.
pub fn is_repeatable(key: Key) -> bool {
    matches!(key, Key::Up | Key::Down | Key::Left | Key::Right | Key::Comma | Key::Period | Key::N)
}

/// Pointer state polled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    /// Window pixel position, `None` when the pointer is outside the window.
    pub pos: Option<(f32, f32)>,
    pub left: bool,
    pub right: bool,
    pub ctrl: bool,
}

impl PointerSample {
    /// Same position with every button released.
    pub fn without_buttons(self) -> Self {
        Self { left: false, right: false, ..self }
    }
}

/// Grid edit produced by pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerCommand {
    Inject { gx: i32, gy: i32 },
    Paint { gx: i32, gy: i32 },
    Erase { gx: i32, gy: i32 },
}

impl PointerCommand {
    /// Apply to the field. Returns true if the field changed.
    pub fn apply(self, field: &mut WaveField) -> bool {
        match self {
            PointerCommand::Inject { gx, gy } => field.inject_default_wave(gx, gy),
            PointerCommand::Paint { gx, gy } => field.set_obstacle(gx, gy, true),
            PointerCommand::Erase { gx, gy } => field.set_obstacle(gx, gy, false),
        }
    }
}

/// Turns polled pointer samples into grid edits.
///
/// A left press injects one wave at the press position. Holding the right
/// button paints walls (erases with ctrl) along the drag path; cells skipped
/// between two polls are filled by line stepping.
#[derive(Debug, Default)]
pub struct PointerRouter {
    left_down: bool,
    last_stroke: Option<(i32, i32)>,
}

impl PointerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a right-button stroke is in progress.
    pub fn is_stroking(&self) -> bool {
        self.last_stroke.is_some()
    }

    pub fn route(&mut self, sample: &PointerSample, cfg: &RenderConfig) -> Vec<PointerCommand> {
        let mut out = Vec::new();
        let cell = sample.pos.map(|(sx, sy)| cfg.screen_to_grid(sx, sy));

        if sample.left && !self.left_down {
            if let Some((gx, gy)) = cell {
                out.push(PointerCommand::Inject { gx, gy });
            }
        }
        self.left_down = sample.left;

        if !sample.right {
            self.last_stroke = None;
            return out;
        }
        let Some(to) = cell else {
            return out;
        };
        let from = self.last_stroke.unwrap_or(to);
        for (gx, gy) in line_cells(from, to) {
            // The start cell was already edited by the previous poll.
            if self.last_stroke == Some((gx, gy)) {
                continue;
            }
            out.push(if sample.ctrl {
                PointerCommand::Erase { gx, gy }
            } else {
                PointerCommand::Paint { gx, gy }
            });
        }
        debug!("stroke {:?} -> {:?} ({} cells)", from, to, out.len());
        self.last_stroke = Some(to);
        out
    }
}

/// Cells on the segment `from..=to` (Bresenham).
fn line_cells(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut cells = Vec::with_capacity((dx - dy) as usize + 1);
    loop {
        cells.push((x, y));
        if (x, y) == to {
            return cells;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
