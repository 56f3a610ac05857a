use crate::core::error::{PlotError, PlotResult};
use crate::core::metrics::ScreenTable;
use crate::report::raster::{BLUE, GREY, MAROON, NAVY, RED, Raster, Rgb, WHITE};

pub const PANEL_WIDTH: usize = 50;
pub const BAR_HEIGHT: usize = 4;

/// Colours of the mapped categories, in stacking order.
pub const CATEGORY_COLORS: [Rgb; 4] = [NAVY, BLUE, RED, MAROON];

/// Half-scale width: 100% maps to 50px, any non-zero share gets at least 1px.
pub fn bar_pixels(pct: f64) -> usize {
    (pct / 2.0).ceil().max(0.0) as usize
}

/// Side-by-side stacked-bar panels, one per screen.
///
/// Libraries below the mapped threshold are dropped before layout, and the
/// shared panel height follows the largest remaining library count.
pub fn render(screens: &[ScreenTable], threshold: Option<f64>) -> PlotResult<Raster> {
    if screens.is_empty() {
        return Err(PlotError::InvalidDimensions {
            width: 0,
            height: 0,
        });
    }
    let screens = screens
        .iter()
        .map(|s| s.filtered(threshold))
        .collect::<PlotResult<Vec<_>>>()?;
    let max_libraries = screens.iter().map(ScreenTable::len).max().unwrap_or(0);
    let height = (max_libraries + 1) * (BAR_HEIGHT + 1);
    let mut img = Raster::new(screens.len() * PANEL_WIDTH, height, WHITE)?;

    for (index, screen) in screens.iter().enumerate() {
        let x_origin = index * PANEL_WIDTH;
        let x_end = x_origin + PANEL_WIDTH;
        img.draw_box(x_origin, 0, PANEL_WIDTH, height, GREY);

        for (n, row) in screen.rows.iter().enumerate() {
            let y = n * (BAR_HEIGHT + 1) + 1;
            let mut x = x_origin;
            for (pct, color) in row.mapped_categories().into_iter().zip(CATEGORY_COLORS) {
                let npx = bar_pixels(pct);
                img.fill_rect(x, y, (x + npx).min(x_end), y + BAR_HEIGHT, color);
                x += npx;
            }
        }

        if let Some(no_hits) = screen.no_hits {
            let y = max_libraries * (BAR_HEIGHT + 1) + 1;
            let npx = bar_pixels(no_hits);
            img.fill_rect(x_origin, y, (x_origin + npx).min(x_end), y + BAR_HEIGHT, GREY);
        }
    }
    Ok(img)
}
