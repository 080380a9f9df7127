use crate::renderer::{self, FONT_HEIGHT};
use crate::solver::SimulationParameters;

/// Number of adjustable parameters.
pub const PARAM_COUNT: usize = 6;

/// Index of the grid size row; changing it rebuilds the field.
pub const GRID_SIZE_PARAM: usize = 0;

const GAUGE_WIDTH: usize = 8;

/// Overlay panel state.
#[derive(Debug, Default)]
pub struct OverlayState {
    pub visible: bool,
    pub selected: usize,
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn navigate(&mut self, delta: isize) {
        let count = PARAM_COUNT as isize;
        self.selected = ((self.selected as isize + delta).rem_euclid(count)) as usize;
    }
}

/// Definition of an adjustable parameter.
pub struct ParamDef {
    pub name: &'static str,
    pub short: &'static str,
    pub desc: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub fine_step: f64,
    pub default: f64,
    pub get: fn(&SimulationParameters) -> f64,
    pub set: fn(&mut SimulationParameters, f64),
}

impl ParamDef {
    /// Value text with precision matching the coarse step.
    pub fn format(&self, v: f64) -> String {
        if self.step >= 1.0 {
            format!("{:.0}", v)
        } else if self.step >= 0.1 {
            format!("{:.2}", v)
        } else if self.step >= 0.001 {
            format!("{:.3}", v)
        } else {
            format!("{:.4}", v)
        }
    }

    fn ratio(&self, v: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() > f64::EPSILON {
            ((v - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Panel rows. Defaults are the interactive demo preset.
pub const PARAM_DEFS: [ParamDef; PARAM_COUNT] = [
    ParamDef {
        name: "grid",
        short: "grid size",
        desc: "cells per side, resets the field",
        min: 10.0,
        max: 400.0,
        step: 5.0,
        fine_step: 1.0,
        default: 125.0,
        get: |p| p.grid_size as f64,
        set: |p, v| p.grid_size = v.round() as usize,
    },
    ParamDef {
        name: "speed",
        short: "wave speed",
        desc: "laplacian coupling per step",
        min: 0.0,
        max: 0.25,
        step: 0.005,
        fine_step: 0.001,
        default: 0.025,
        get: |p| p.wave_speed,
        set: |p, v| p.wave_speed = v,
    },
    ParamDef {
        name: "damp",
        short: "damping",
        desc: "velocity retained each step",
        min: 0.9,
        max: 1.0,
        step: 0.001,
        fine_step: 0.0001,
        default: 0.995,
        get: |p| p.damping,
        set: |p, v| p.damping = v,
    },
    ParamDef {
        name: "refl",
        short: "wall refl",
        desc: "height multiplier on wall cells",
        min: -1.0,
        max: 1.0,
        step: 0.05,
        fine_step: 0.01,
        default: -0.75,
        get: |p| p.wall_reflection,
        set: |p, v| p.wall_reflection = v,
    },
    ParamDef {
        name: "diff",
        short: "diffraction",
        desc: "weight of wall neighbours",
        min: 0.0,
        max: 1.0,
        step: 0.05,
        fine_step: 0.01,
        default: 0.2,
        get: |p| p.diffraction_factor,
        set: |p, v| p.diffraction_factor = v,
    },
    ParamDef {
        name: "amp",
        short: "strength",
        desc: "height added by a click",
        min: 0.0,
        max: 20.0,
        step: 0.5,
        fine_step: 0.1,
        default: 5.0,
        get: |p| p.wave_strength,
        set: |p, v| p.wave_strength = v,
    },
];

/// Adjust a parameter by delta steps (positive = increase, negative = decrease).
/// If `fine` is true, use fine_step instead of step.
/// Returns true if the value actually changed.
pub fn adjust_param(params: &mut SimulationParameters, selected: usize, delta: i32, fine: bool) -> bool {
    let def = &PARAM_DEFS[selected];
    let old = (def.get)(params);
    let step = if fine { def.fine_step } else { def.step };
    (def.set)(params, (old + delta as f64 * step).clamp(def.min, def.max));
    ((def.get)(params) - old).abs() > f64::EPSILON
}

/// Reset a parameter to its default value. Returns true if the value changed.
pub fn reset_param(params: &mut SimulationParameters, selected: usize) -> bool {
    let def = &PARAM_DEFS[selected];
    let old = (def.get)(params);
    (def.set)(params, def.default);
    (old - def.default).abs() > f64::EPSILON
}

mod colors {
    pub const BORDER: [u8; 3] = [0x44, 0x44, 0x44];
    pub const HEADER: [u8; 3] = [0x00, 0xBB, 0xBB];
    pub const LABEL_NORMAL: [u8; 3] = [0x88, 0x88, 0x88];
    pub const LABEL_SELECTED: [u8; 3] = [0xFF, 0xFF, 0xFF];
    pub const VALUE: [u8; 3] = [0xCC, 0xCC, 0xCC];
    pub const DESC_NORMAL: [u8; 3] = [0x66, 0x66, 0x66];
    pub const DESC_SELECTED: [u8; 3] = [0xAA, 0xAA, 0xAA];
    pub const HINT: [u8; 3] = [0x44, 0x88, 0x88];
    pub const CURSOR: [u8; 3] = [0x00, 0xFF, 0xFF];
    pub const GAUGE_EMPTY: [u8; 3] = [0x22, 0x22, 0x22];
}

#[inline]
fn pixel_offset(buf: &[u8], frame_width: usize, x: usize, y: usize) -> Option<usize> {
    let off = (y * frame_width + x) * 4;
    (x < frame_width && off + 3 < buf.len()).then_some(off)
}

#[inline]
fn put(buf: &mut [u8], frame_width: usize, x: usize, y: usize, color: [u8; 3]) {
    if let Some(off) = pixel_offset(buf, frame_width, x, y) {
        buf[off..off + 3].copy_from_slice(&color);
        buf[off + 3] = 255;
    }
}

/// Darken a rectangular region of the buffer by multiplying RGB by `factor`.
fn darken_rect(buf: &mut [u8], frame_width: usize, x0: usize, y0: usize, w: usize, h: usize, factor: f64) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            if let Some(off) = pixel_offset(buf, frame_width, x, y) {
                for c in &mut buf[off..off + 3] {
                    *c = (*c as f64 * factor) as u8;
                }
            }
        }
    }
}

/// Draw a 1px border rectangle.
fn draw_rect_border(buf: &mut [u8], frame_width: usize, x0: usize, y0: usize, w: usize, h: usize, color: [u8; 3]) {
    if w == 0 || h == 0 {
        return;
    }
    for x in x0..x0 + w {
        put(buf, frame_width, x, y0, color);
        put(buf, frame_width, x, y0 + h - 1, color);
    }
    for y in y0..y0 + h {
        put(buf, frame_width, x0, y, color);
        put(buf, frame_width, x0 + w - 1, y, color);
    }
}

/// Draw a gauge bar with teal gradient fill.
fn draw_gauge(buf: &mut [u8], frame_width: usize, x: usize, y: usize, ratio: f64, total_px: usize, height: usize) {
    let filled_px = ((ratio * total_px as f64).round() as usize).min(total_px);
    for dx in 0..total_px {
        let color = if dx < filled_px {
            let level = (0x55 as f64 + dx as f64 / total_px as f64 * (0xCC - 0x55) as f64) as u8;
            [0, level, level]
        } else {
            colors::GAUGE_EMPTY
        };
        for dy in 0..height {
            put(buf, frame_width, x + dx, y + dy, color);
        }
    }
}

/// Render the overlay panel onto the frame buffer.
/// Does nothing if `state.visible` is false.
pub fn render_overlay(
    buf: &mut [u8],
    frame_width: usize,
    display_width: usize,
    display_height: usize,
    state: &OverlayState,
    params: &SimulationParameters,
) {
    if !state.visible {
        return;
    }

    // 7x9 glyphs, resized from the 5x7 font
    let cw: usize = 7;
    let ch: usize = 9;
    let sc = cw + cw / 5 + 1;
    let row_h = ch + 4;
    let pad = 10;

    // "> speed   ########  0.025  wave speed"
    let content_chars = 36;
    let panel_w = (content_chars * sc + pad * 2).min(display_width.saturating_sub(4));
    let panel_h = (pad + row_h + 4 + PARAM_COUNT * row_h + 6 + row_h + 4 + FONT_HEIGHT + 2 + pad)
        .min(display_height.saturating_sub(4));
    let px = display_width.saturating_sub(panel_w) / 2;
    let py = display_height.saturating_sub(panel_h) / 2;

    darken_rect(buf, frame_width, px, py, panel_w, panel_h, 0.15);
    draw_rect_border(buf, frame_width, px, py, panel_w, panel_h, colors::BORDER);

    let left = px + pad;
    let mut cy = py + pad;

    renderer::draw_text_sized(buf, frame_width, left, cy, "wave parameters", colors::HEADER, cw, ch);
    cy += row_h + 4;

    for (i, def) in PARAM_DEFS.iter().enumerate() {
        let is_sel = i == state.selected;
        let (label_color, desc_color) = if is_sel {
            (colors::LABEL_SELECTED, colors::DESC_SELECTED)
        } else {
            (colors::LABEL_NORMAL, colors::DESC_NORMAL)
        };

        if is_sel {
            renderer::draw_text_sized(buf, frame_width, left, cy, ">", colors::CURSOR, cw, ch);
        }
        renderer::draw_text_sized(buf, frame_width, left + 2 * sc, cy, def.name, label_color, cw, ch);

        let mut cx = left + 8 * sc;
        let val = (def.get)(params);
        draw_gauge(buf, frame_width, cx, cy, def.ratio(val), GAUGE_WIDTH * sc, ch);
        cx += (GAUGE_WIDTH + 1) * sc;

        cx = renderer::draw_text_sized(buf, frame_width, cx, cy, &def.format(val), colors::VALUE, cw, ch);
        renderer::draw_text_sized(buf, frame_width, cx + sc, cy, def.short, desc_color, cw, ch);

        cy += row_h;
    }

    cy += 6;
    let sel_def = &PARAM_DEFS[state.selected];
    renderer::draw_text_sized(buf, frame_width, left, cy, sel_def.desc, colors::DESC_SELECTED, cw, ch);
    cy += row_h + 4;

    renderer::draw_text(
        buf,
        frame_width,
        left,
        cy,
        "space=close  ud=nav  lr=adj  ,.=fine  r=reset",
        colors::HINT,
    );
}
