//! Grid Renderer - cell decorations for the five practice grid styles
//!
//! Each style is a fixed list of primitives anchored at the cell origin and
//! spanning `size` pixels. Coordinates are inclusive, so the outer rectangle
//! of a 90 px cell at the origin covers `[0, 0, 90, 90]`. The outer frame is
//! two pixels thick, drawn inward; every internal line is one pixel.

use crate::engine::config::{GridStyle, Rgb};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::image::{Rgb as RgbPixel, RgbImage};
use imageproc::rect::Rect;

const FRAME_WIDTH: u32 = 2;
const LINE_WIDTH: u32 = 1;

/// A single drawing instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Outline between two inclusive corners, `width` pixels thick inward
    Rect {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        width: u32,
    },
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        width: u32,
    },
}

/// Primitives making up one decorated cell
pub fn cell_primitives(x: i32, y: i32, size: u32, style: GridStyle) -> Vec<Primitive> {
    let s = size as i32;
    let (x2, y2) = (x + s, y + s);
    let mut prims = vec![Primitive::Rect {
        x0: x,
        y0: y,
        x1: x2,
        y1: y2,
        width: FRAME_WIDTH,
    }];

    let line = |x0, y0, x1, y1| Primitive::Line {
        x0,
        y0,
        x1,
        y1,
        width: LINE_WIDTH,
    };

    match style {
        GridStyle::Box => {}
        GridStyle::BoxCross => {
            prims.push(line(x + s / 2, y, x + s / 2, y2));
            prims.push(line(x, y + s / 2, x2, y + s / 2));
        }
        GridStyle::BoxDiagCross => {
            prims.push(line(x, y, x2, y2));
            prims.push(line(x2, y, x, y2));
            prims.push(line(x + s / 2, y, x + s / 2, y2));
            prims.push(line(x, y + s / 2, x2, y + s / 2));
        }
        GridStyle::NestedBox => {
            let margin = s / 6;
            for m in [margin, margin * 2] {
                prims.push(Primitive::Rect {
                    x0: x + m,
                    y0: y + m,
                    x1: x2 - m,
                    y1: y2 - m,
                    width: LINE_WIDTH,
                });
            }
        }
        GridStyle::Box3x3 => {
            let step = s / 3;
            for offset in [step, step * 2] {
                prims.push(line(x + offset, y, x + offset, y2));
            }
            for offset in [step, step * 2] {
                prims.push(line(x, y + offset, x2, y + offset));
            }
        }
    }

    prims
}

/// Rasterize primitives onto the surface
pub fn draw_primitives(surface: &mut RgbImage, prims: &[Primitive], color: Rgb) {
    let pixel = RgbPixel(color);
    for prim in prims {
        match *prim {
            Primitive::Rect {
                x0,
                y0,
                x1,
                y1,
                width,
            } => {
                for inset in 0..width as i32 {
                    let w = x1 - x0 + 1 - 2 * inset;
                    let h = y1 - y0 + 1 - 2 * inset;
                    if w <= 0 || h <= 0 {
                        break;
                    }
                    let rect = Rect::at(x0 + inset, y0 + inset).of_size(w as u32, h as u32);
                    draw_hollow_rect_mut(surface, rect, pixel);
                }
            }
            Primitive::Line {
                x0,
                y0,
                x1,
                y1,
                width,
            } => {
                // Thicken across the dominant axis
                let steep = (y1 - y0).abs() >= (x1 - x0).abs();
                for k in 0..width as i32 {
                    let (dx, dy) = if steep { (k, 0) } else { (0, k) };
                    draw_line_segment_mut(
                        surface,
                        ((x0 + dx) as f32, (y0 + dy) as f32),
                        ((x1 + dx) as f32, (y1 + dy) as f32),
                        pixel,
                    );
                }
            }
        }
    }
}

/// Draw one decorated cell at `(x, y)` spanning `size` pixels
pub fn draw_cell(surface: &mut RgbImage, x: i32, y: i32, size: u32, style: GridStyle, color: Rgb) {
    let prims = cell_primitives(x, y, size, style);
    draw_primitives(surface, &prims, color);
}
