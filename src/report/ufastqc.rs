use crate::core::error::PlotResult;
use crate::core::metrics::ModuleStatus;
use crate::core::model::Status;
use crate::report::raster::{GREEN, ORANGE, RED, Raster, Rgb, WHITE};

pub const WIDTH: usize = 30;
pub const ROW_HEIGHT: usize = 4;
pub const COLUMN_WIDTH: usize = 10;
pub const MARGIN: usize = 1;
pub const MARK_WIDTH: usize = 8;
pub const MARK_HEIGHT: usize = 3;

pub fn status_color(status: Status) -> Rgb {
    match status {
        Status::Pass => GREEN,
        Status::Warn => ORANGE,
        Status::Fail => RED,
    }
}

/// Status matrix: one row per module, PASS/WARN/FAIL columns left to right.
pub fn render(statuses: &[ModuleStatus]) -> PlotResult<Raster> {
    let mut img = Raster::new(WIDTH, ROW_HEIGHT * statuses.len(), WHITE)?;
    for (index, entry) in statuses.iter().enumerate() {
        let x = entry.status.column() * COLUMN_WIDTH + MARGIN;
        let y = index * ROW_HEIGHT + MARGIN;
        img.fill_rect(x, y, x + MARK_WIDTH, y + MARK_HEIGHT, status_color(entry.status));
    }
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PlotError;
    use crate::core::metrics::parse_summary;

    #[test]
    fn three_modules_one_mark_each() {
        let statuses = parse_summary(
            "PASS\tBasic Statistics\tx.fq\nWARN\tPer base sequence quality\tx.fq\nFAIL\tKmer Content\tx.fq\n",
        )
        .unwrap();
        let img = render(&statuses).unwrap();
        assert_eq!((img.width(), img.height()), (WIDTH, 12));

        // Row 0: PASS column only.
        assert_eq!(img.get(1, 1), Some(GREEN));
        assert_eq!(img.get(8, 3), Some(GREEN));
        assert_eq!(img.get(9, 1), Some(WHITE));
        assert_eq!(img.get(11, 1), Some(WHITE));
        assert_eq!(img.get(21, 1), Some(WHITE));

        // Row 1: WARN column.
        assert_eq!(img.get(11, 5), Some(ORANGE));
        assert_eq!(img.get(18, 7), Some(ORANGE));
        assert_eq!(img.get(1, 5), Some(WHITE));

        // Row 2: FAIL column.
        assert_eq!(img.get(21, 9), Some(RED));
        assert_eq!(img.get(28, 11), Some(RED));
        assert_eq!(img.get(29, 9), Some(WHITE));

        // Separator rows stay blank.
        assert_eq!(img.get(1, 0), Some(WHITE));
        assert_eq!(img.get(1, 4), Some(WHITE));
    }

    #[test]
    fn empty_status_list_is_invalid() {
        assert!(matches!(
            render(&[]),
            Err(PlotError::InvalidDimensions { height: 0, .. })
        ));
    }
}
