//! Pixel buffer drawing primitives
//!
//! A safe wrapper over the softbuffer back buffer so rendering code never
//! does raw index arithmetic. All coordinates are in pixels and all
//! operations clip to the buffer (and the optional clip rectangle).

use fontdue::Metrics;

/// Blend `fg` onto `bg` at the given ratio. Colors are 0xAARGGBB-packed;
/// the result is fully opaque.
#[inline]
pub fn blend_colors(bg: u32, fg: u32, alpha: f32) -> u32 {
    let bg_r = ((bg >> 16) & 0xFF) as f32;
    let bg_g = ((bg >> 8) & 0xFF) as f32;
    let bg_b = (bg & 0xFF) as f32;

    let fg_r = ((fg >> 16) & 0xFF) as f32;
    let fg_g = ((fg >> 8) & 0xFF) as f32;
    let fg_b = (fg & 0xFF) as f32;

    let r = (bg_r * (1.0 - alpha) + fg_r * alpha) as u32;
    let g = (bg_g * (1.0 - alpha) + fg_g * alpha) as u32;
    let b = (bg_b * (1.0 - alpha) + fg_b * alpha) as u32;

    0xFF000000 | (r << 16) | (g << 8) | b
}

/// Clipping rectangle (inclusive start, exclusive end)
#[derive(Clone, Copy, Debug)]
struct ClipRect {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

pub struct Frame<'a> {
    buffer: &'a mut [u32],
    width: usize,
    height: usize,
    clip: Option<ClipRect>,
}

impl<'a> Frame<'a> {
    /// Wrap a pixel buffer. A buffer shorter than width*height shrinks the
    /// effective height instead of risking out-of-bounds rows.
    pub fn new(buffer: &'a mut [u32], width: usize, height: usize) -> Self {
        let (width, height) = if buffer.len() < width * height && width > 0 {
            (width, buffer.len() / width)
        } else {
            (width, height)
        };
        Self {
            buffer,
            width,
            height,
            clip: None,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Constrain subsequent drawing to a rectangle
    pub fn set_clip(&mut self, x: usize, y: usize, w: usize, h: usize) {
        self.clip = Some(ClipRect {
            x0: x.min(self.width),
            y0: y.min(self.height),
            x1: (x + w).min(self.width),
            y1: (y + h).min(self.height),
        });
    }

    pub fn clear_clip(&mut self) {
        self.clip = None;
    }

    #[inline]
    fn min_x(&self) -> usize {
        self.clip.map_or(0, |c| c.x0)
    }

    #[inline]
    fn min_y(&self) -> usize {
        self.clip.map_or(0, |c| c.y0)
    }

    #[inline]
    fn max_x(&self) -> usize {
        self.clip.map_or(self.width, |c| c.x1)
    }

    #[inline]
    fn max_y(&self) -> usize {
        self.clip.map_or(self.height, |c| c.y1)
    }

    /// Flood the whole buffer (ignores the clip rectangle)
    #[inline]
    pub fn clear(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// Fill a rectangle with a solid color
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        let x0 = x.max(self.min_x());
        let y0 = y.max(self.min_y());
        let x1 = x.saturating_add(w).min(self.max_x());
        let y1 = y.saturating_add(h).min(self.max_y());
        if x0 >= x1 {
            return;
        }

        for py in y0..y1 {
            let row = py * self.width;
            self.buffer[row + x0..row + x1].fill(color);
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> u32 {
        if x < self.width && y < self.height {
            self.buffer[y * self.width + x]
        } else {
            0
        }
    }

    /// Blend a single coverage value onto a pixel
    #[inline]
    pub fn blend_pixel(&mut self, x: usize, y: usize, color: u32, alpha: f32) {
        if x < self.min_x() || x >= self.max_x() || y < self.min_y() || y >= self.max_y() {
            return;
        }
        let idx = y * self.width + x;
        if alpha >= 1.0 {
            self.buffer[idx] = color | 0xFF000000;
        } else if alpha > 0.0 {
            self.buffer[idx] = blend_colors(self.buffer[idx], color, alpha);
        }
    }

    /// Fill plus a 1px border, used for the popup menu
    pub fn draw_bordered_rect(
        &mut self,
        x: usize,
        y: usize,
        w: usize,
        h: usize,
        fill_color: u32,
        border_color: u32,
    ) {
        self.fill_rect(x, y, w, h, fill_color);
        self.fill_rect(x, y, w, 1, border_color);
        self.fill_rect(x, y + h.saturating_sub(1), w, 1, border_color);
        self.fill_rect(x, y, 1, h, border_color);
        self.fill_rect(x + w.saturating_sub(1), y, 1, h, border_color);
    }

    /// Blend a fontdue coverage bitmap with its top-left at (x, y), which
    /// may be negative for glyphs whose ink extends left of the pen.
    pub fn draw_alpha_bitmap(
        &mut self,
        x: isize,
        y: isize,
        metrics: &Metrics,
        bitmap: &[u8],
        color: u32,
    ) {
        for by in 0..metrics.height {
            let py = y + by as isize;
            if py < 0 {
                continue;
            }
            for bx in 0..metrics.width {
                let px = x + bx as isize;
                if px < 0 {
                    continue;
                }
                let idx = by * metrics.width + bx;
                if idx >= bitmap.len() {
                    continue;
                }
                let coverage = bitmap[idx];
                if coverage > 0 {
                    self.blend_pixel(
                        px as usize,
                        py as usize,
                        color,
                        coverage as f32 / 255.0,
                    );
                }
            }
        }
    }
}
