//! Page Composer - rasterizes one worksheet page
//!
//! Grid decoration goes onto an opaque white canvas. Demonstration glyphs go
//! onto a separate transparent overlay which is alpha-composited over the
//! grid at the end, so glyphs never hide grid lines completely.

use crate::engine::config::{LayoutConfig, PageGeometry, Rgb};
use imageproc::image::{Pixel, Rgb as RgbPixel, RgbImage, Rgba, RgbaImage};

use super::font::{CoverageSink, FontHandle};
use super::grid::draw_cell;

const PAGE_BACKGROUND: RgbPixel<u8> = RgbPixel([255, 255, 255]);

/// Cell placement for a page: square cells, grid block centered on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub cell_size: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub columns: u32,
    pub rows: u32,
}

impl GridLayout {
    pub fn compute(page: &PageGeometry, layout: &LayoutConfig) -> Self {
        let columns = layout.columns.max(1);
        let rows = layout.rows.max(1);
        let usable_width = page.width.saturating_sub(page.margin_x.saturating_mul(2));
        let usable_height = page.height.saturating_sub(page.margin_y.saturating_mul(2));
        let cell_size = (usable_width / columns).min(usable_height / rows);

        let offset_x = (page.width as i64 - (cell_size * columns) as i64) / 2;
        let offset_y = (page.height as i64 - (cell_size * rows) as i64) / 2;

        Self {
            cell_size,
            offset_x: offset_x as i32,
            offset_y: offset_y as i32,
            columns,
            rows,
        }
    }

    /// Top-left pixel of a cell
    pub fn cell_origin(&self, row: u32, column: u32) -> (i32, i32) {
        (
            self.offset_x + (column * self.cell_size) as i32,
            self.offset_y + (row * self.cell_size) as i32,
        )
    }

    /// Glyph em size in whole pixels
    pub fn glyph_size(&self, page: &PageGeometry) -> f32 {
        (self.cell_size as f32 * page.glyph_scale).floor()
    }
}

/// Transparent glyph layer; keeps the strongest coverage per pixel
struct Overlay {
    image: RgbaImage,
    color: Rgb,
    alpha: u8,
}

impl CoverageSink for Overlay {
    fn plot(&mut self, x: i32, y: i32, coverage: f32) {
        if x < 0 || y < 0 || x as u32 >= self.image.width() || y as u32 >= self.image.height() {
            return;
        }
        let a = (self.alpha as f32 * coverage.clamp(0.0, 1.0)).round() as u8;
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        if a > pixel.0[3] {
            let [r, g, b] = self.color;
            *pixel = Rgba([r, g, b, a]);
        }
    }
}

/// Render one page. At most `layout.page_capacity()` characters are placed; surplus
/// cells and non-demonstration rows show grid lines only.
pub fn render_page(
    chars: &[String],
    layout: &LayoutConfig,
    page: &PageGeometry,
    font: &FontHandle,
) -> RgbImage {
    let grid = GridLayout::compute(page, layout);
    let mut canvas = RgbImage::from_pixel(page.width, page.height, PAGE_BACKGROUND);
    let mut overlay = Overlay {
        image: RgbaImage::new(page.width, page.height),
        color: layout.text_color.rgb(),
        alpha: layout.demo_alpha,
    };

    let grid_color = layout.grid_color.rgb();
    let budget = layout.page_capacity();
    let half = grid.cell_size as f32 / 2.0;
    let mut placed = 0usize;

    for row in 0..grid.rows {
        for column in 0..grid.columns {
            let (x, y) = grid.cell_origin(row, column);
            draw_cell(&mut canvas, x, y, grid.cell_size, layout.grid_style, grid_color);

            if !layout.show_demo || !layout.is_demo_row(row) {
                continue;
            }
            if placed >= chars.len() || placed >= budget {
                continue;
            }
            let ch = &chars[placed];
            placed += 1;
            font.draw_centered(ch, x as f32 + half, y as f32 + half, &mut overlay);
        }
    }

    composite(&mut canvas, &overlay.image);
    canvas
}

/// Alpha-composite an overlay onto an opaque canvas in place
pub fn composite(canvas: &mut RgbImage, overlay: &RgbaImage) {
    for (base, over) in canvas.pixels_mut().zip(overlay.pixels()) {
        if over.0[3] == 0 {
            continue;
        }
        let mut blended = base.to_rgba();
        blended.blend(over);
        *base = blended.to_rgb();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{GridStyle, InkColor};

    fn small_page() -> PageGeometry {
        PageGeometry {
            width: 200,
            height: 200,
            margin_x: 10,
            margin_y: 10,
            glyph_scale: 0.7,
        }
    }

    fn layout(columns: u32, rows: u32) -> LayoutConfig {
        LayoutConfig {
            grid_style: GridStyle::Box,
            grid_color: InkColor::Red,
            text_color: InkColor::Black,
            demo_alpha: 255,
            columns,
            rows,
            ..LayoutConfig::default()
        }
    }

    fn font_for(page: &PageGeometry, cfg: &LayoutConfig) -> FontHandle {
        let size = GridLayout::compute(page, cfg).glyph_size(page);
        FontHandle::builtin("", size)
    }

    fn chars(s: &str) -> Vec<String> {
        s.chars().map(|c| c.to_string()).collect()
    }

    /// Pixels in a cell that are neither background nor grid color
    fn glyph_pixels(img: &RgbImage, grid: &GridLayout, row: u32, column: u32) -> usize {
        let (x, y) = grid.cell_origin(row, column);
        let mut count = 0;
        for py in (y + 3)..(y + grid.cell_size as i32 - 2) {
            for px in (x + 3)..(x + grid.cell_size as i32 - 2) {
                let p = img.get_pixel(px as u32, py as u32).0;
                if p != [255, 255, 255] && p != [200, 0, 0] {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_grid_layout_centers_block() {
        let page = PageGeometry {
            width: 2480,
            height: 3508,
            margin_x: 150,
            margin_y: 250,
            glyph_scale: 0.7,
        };
        let grid = GridLayout::compute(&page, &layout(10, 14));
        // min(2180 / 10, 3008 / 14) = min(218, 214)
        assert_eq!(grid.cell_size, 214);
        assert_eq!(grid.offset_x, (2480 - 2140) / 2);
        assert_eq!(grid.offset_y, (3508 - 2996) / 2);
        assert_eq!(grid.glyph_size(&page), 149.0);
    }

    #[test]
    fn test_small_grid_layout() {
        let grid = GridLayout::compute(&small_page(), &layout(2, 2));
        assert_eq!(grid.cell_size, 90);
        assert_eq!(grid.cell_origin(1, 1), (100, 100));
    }

    #[test]
    fn test_page_has_fixed_size_and_white_background() {
        let page = small_page();
        let cfg = layout(2, 2);
        let img = render_page(&[], &cfg, &page, &font_for(&page, &cfg));
        assert_eq!(img.dimensions(), (200, 200));
        assert_eq!(img.get_pixel(2, 2).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(10, 10).0, [200, 0, 0]);
    }

    #[test]
    fn test_demo_glyphs_fill_cells_in_row_major_order() {
        let page = small_page();
        let cfg = layout(2, 2);
        let grid = GridLayout::compute(&page, &cfg);
        let img = render_page(&chars("天地玄"), &cfg, &page, &font_for(&page, &cfg));
        assert!(glyph_pixels(&img, &grid, 0, 0) > 0);
        assert!(glyph_pixels(&img, &grid, 0, 1) > 0);
        assert!(glyph_pixels(&img, &grid, 1, 0) > 0);
        assert_eq!(glyph_pixels(&img, &grid, 1, 1), 0);
    }

    #[test]
    fn test_hidden_demo_leaves_only_grid() {
        let page = small_page();
        let cfg = LayoutConfig {
            show_demo: false,
            grid_style: GridStyle::BoxDiagCross,
            ..layout(2, 2)
        };
        let img = render_page(&chars("天地玄黄"), &cfg, &page, &font_for(&page, &cfg));
        assert!(img
            .pixels()
            .all(|p| p.0 == [255, 255, 255] || p.0 == [200, 0, 0]));
    }

    #[test]
    fn test_skipped_rows_stay_blank() {
        let page = small_page();
        let cfg = LayoutConfig {
            skip_alternate_rows: true,
            ..layout(2, 2)
        };
        let grid = GridLayout::compute(&page, &cfg);
        let img = render_page(&chars("天地玄黄"), &cfg, &page, &font_for(&page, &cfg));
        assert!(glyph_pixels(&img, &grid, 0, 0) > 0);
        assert!(glyph_pixels(&img, &grid, 0, 1) > 0);
        assert_eq!(glyph_pixels(&img, &grid, 1, 0), 0);
        assert_eq!(glyph_pixels(&img, &grid, 1, 1), 0);
    }

    #[test]
    fn test_glyphs_are_alpha_blended() {
        let page = small_page();
        let cfg = LayoutConfig {
            demo_alpha: 110,
            ..layout(2, 2)
        };
        let img = render_page(&chars("天"), &cfg, &page, &font_for(&page, &cfg));
        // Black at alpha 110 over white is about 145
        assert!(img
            .pixels()
            .any(|p| p.0[0] == p.0[2] && (144..=146).contains(&p.0[0])));
        assert!(!img.pixels().any(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_zero_alpha_is_invisible() {
        let page = small_page();
        let cfg = LayoutConfig {
            demo_alpha: 0,
            ..layout(2, 2)
        };
        let img = render_page(&chars("天地"), &cfg, &page, &font_for(&page, &cfg));
        assert!(img
            .pixels()
            .all(|p| p.0 == [255, 255, 255] || p.0 == [200, 0, 0]));
    }

    #[test]
    fn test_composite_math() {
        let mut canvas = RgbImage::from_pixel(1, 1, RgbPixel([255, 255, 255]));
        let mut overlay = RgbaImage::new(1, 1);
        overlay.put_pixel(0, 0, Rgba([0, 160, 0, 255]));
        composite(&mut canvas, &overlay);
        let [r, g, b] = canvas.get_pixel(0, 0).0;
        assert_eq!((r, b), (0, 0));
        assert!((159..=160).contains(&g));
    }

    #[test]
    fn test_composite_half_alpha_over_color() {
        let mut canvas = RgbImage::from_pixel(2, 1, RgbPixel([200, 0, 0]));
        let mut overlay = RgbaImage::new(2, 1);
        overlay.put_pixel(1, 0, Rgba([0, 0, 0, 128]));
        composite(&mut canvas, &overlay);
        assert_eq!(canvas.get_pixel(0, 0).0, [200, 0, 0]);
        let [r, g, b] = canvas.get_pixel(1, 0).0;
        assert!((98..=100).contains(&r), "red {}", r);
        assert_eq!((g, b), (0, 0));
    }

    #[test]
    fn test_huge_margins_do_not_overflow() {
        let page = PageGeometry {
            margin_x: u32::MAX / 2 + 1,
            margin_y: u32::MAX / 2 + 1,
            ..small_page()
        };
        let grid = GridLayout::compute(&page, &layout(2, 2));
        assert_eq!(grid.cell_size, 0);
        assert_eq!(grid.offset_x, 100);
    }
}
