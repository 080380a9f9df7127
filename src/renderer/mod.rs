mod color;
mod font;

// Re-export public API
pub use color::{ColorMap, Palette};
pub use font::render_status;
pub(crate) use font::{draw_text, draw_text_sized, FONT_HEIGHT, FONT_WIDTH, STATUS_BAR_HEIGHT};

use crate::solver::WaveField;

/// Canvas background behind the grid.
pub const BACKGROUND: [u8; 3] = [0xFF, 0xFF, 0xFF];
/// Wall cell fill.
pub const WALL_FILL: [u8; 3] = [0x00, 0x00, 0x00];
/// Wall cell outline.
pub const WALL_OUTLINE: [u8; 3] = [0xFF, 0xFF, 0xFF];

/// Dynamic render layout computed from window pixel size.
///
/// The grid is drawn as square cells of side `cell_size`, centred in the
/// display area above the status bar.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub display_width: usize,
    pub display_height: usize,
    pub frame_width: usize,
    pub frame_height: usize,
    pub grid_size: usize,
    /// Pixels per grid cell along both axes.
    pub cell_size: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl RenderConfig {
    /// Compute layout to fit the given window pixel dimensions.
    /// The display area is clamped so that each cell is at least one pixel.
    pub fn fit(pixel_width: usize, pixel_height: usize, grid_size: usize) -> Self {
        let n = grid_size.max(1);
        let display_width = pixel_width.max(n);
        let display_height = pixel_height.saturating_sub(STATUS_BAR_HEIGHT).max(n);

        let cell_size = display_width.min(display_height) as f64 / n as f64;
        let extent = cell_size * n as f64;

        Self {
            display_width,
            display_height,
            frame_width: display_width,
            frame_height: display_height + STATUS_BAR_HEIGHT,
            grid_size: n,
            cell_size,
            offset_x: (display_width as f64 - extent) / 2.0,
            offset_y: (display_height as f64 - extent) / 2.0,
        }
    }

    /// Map a window pixel position to grid coordinates. Positions outside the
    /// drawn grid map to out-of-range (possibly negative) coordinates.
    pub fn screen_to_grid(&self, sx: f32, sy: f32) -> (i32, i32) {
        let gx = ((sx as f64 - self.offset_x) / self.cell_size).floor();
        let gy = ((sy as f64 - self.offset_y) / self.cell_size).floor();
        (gx as i32, gy as i32)
    }

    /// Pixel span `[x0, x1) x [y0, y1)` covered by cell `(x, y)`.
    /// Adjacent cells share edges so the grid tiles without gaps.
    pub fn cell_rect(&self, x: usize, y: usize) -> (usize, usize, usize, usize) {
        let edge = |offset: f64, i: usize| (offset + i as f64 * self.cell_size).floor().max(0.0) as usize;
        (
            edge(self.offset_x, x),
            edge(self.offset_y, y),
            edge(self.offset_x, x + 1).min(self.display_width),
            edge(self.offset_y, y + 1).min(self.display_height),
        )
    }
}

#[inline]
fn set_rgb(buf: &mut [u8], off: usize, color: [u8; 3]) {
    buf[off] = color[0];
    buf[off + 1] = color[1];
    buf[off + 2] = color[2];
    buf[off + 3] = 255;
}

fn fill_rect(buf: &mut [u8], frame_width: usize, rect: (usize, usize, usize, usize), color: [u8; 3]) {
    let (x0, y0, x1, y1) = rect;
    for y in y0..y1 {
        for x in x0..x1 {
            set_rgb(buf, (y * frame_width + x) * 4, color);
        }
    }
}

fn stroke_rect(buf: &mut [u8], frame_width: usize, rect: (usize, usize, usize, usize), color: [u8; 3]) {
    let (x0, y0, x1, y1) = rect;
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    for x in x0..x1 {
        set_rgb(buf, (y0 * frame_width + x) * 4, color);
        set_rgb(buf, ((y1 - 1) * frame_width + x) * 4, color);
    }
    for y in y0..y1 {
        set_rgb(buf, (y * frame_width + x0) * 4, color);
        set_rgb(buf, (y * frame_width + x1 - 1) * 4, color);
    }
}

/// Paint the field into an RGBA buffer sized to the frame. Open cells take their
/// palette colour; walls are filled black with a white outline.
pub fn render_into(buf: &mut Vec<u8>, field: &WaveField, cfg: &RenderConfig, palette: &Palette) {
    let fw = cfg.frame_width;
    buf.resize(fw * cfg.frame_height * 4, 0);
    fill_rect(buf, fw, (0, 0, fw, cfg.display_height), BACKGROUND);

    let n = field.grid_size().min(cfg.grid_size);
    for y in 0..n {
        for x in 0..n {
            let rect = cfg.cell_rect(x, y);
            if field.obstacle()[(x, y)] {
                fill_rect(buf, fw, rect, WALL_FILL);
                // Cells under 3px would be all outline.
                if cfg.cell_size >= 3.0 {
                    stroke_rect(buf, fw, rect, WALL_OUTLINE);
                }
            } else if let Some(rgba) = field.sample_color(x, y, palette) {
                fill_rect(buf, fw, rect, [rgba[0], rgba[1], rgba[2]]);
            }
        }
    }
}

/// Render the field to a new RGBA buffer (test convenience wrapper).
#[cfg(test)]
pub fn render(field: &WaveField, cfg: &RenderConfig, palette: &Palette) -> Vec<u8> {
    let mut buf = Vec::new();
    render_into(&mut buf, field, cfg, palette);
    buf
}

/// Convert an RGBA byte buffer into minifb's 0RGB pixels.
pub fn rgba_to_argb(rgba: &[u8], out: &mut [u32]) {
    for (px, chunk) in out.iter_mut().zip(rgba.chunks_exact(4)) {
        *px = (chunk[0] as u32) << 16 | (chunk[1] as u32) << 8 | chunk[2] as u32;
    }
}
