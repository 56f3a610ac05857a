use crate::core::error::PlotResult;
use crate::core::metrics::QualityStatistics;
use crate::report::raster::{BLUE, DARK_YELLOW, GREY, LIGHT_GREY, RED, Raster, WHITE};

pub const HEIGHT: usize = 40;

/// Row for a quality value; higher scores sit nearer the top, out-of-range values clamp.
pub fn row_for(value: i64) -> usize {
    (HEIGHT as i64 - value).clamp(0, HEIGHT as i64 - 1) as usize
}

/// Per-base quality micro-boxplot, one column per base.
///
/// Paint order per column: decile band, quartile band, median, mean; later
/// paints win where they overlap.
pub fn render(stats: &QualityStatistics) -> PlotResult<Raster> {
    let nbases = stats.nbases();
    let mut img = Raster::new(nbases, HEIGHT, WHITE)?;
    img.draw_box(0, 0, nbases, HEIGHT, GREY);
    for i in 0..nbases {
        for j in stats.p10[i]..stats.p90[i] {
            img.set(i, row_for(j as i64), LIGHT_GREY);
        }
        for j in stats.q25[i]..stats.q75[i] {
            img.set(i, row_for(j as i64), DARK_YELLOW);
        }
        img.set(i, row_for(stats.median[i] as i64), RED);
        img.set(i, row_for(stats.mean[i].floor() as i64), BLUE);
    }
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PlotError;
    use crate::core::metrics::QualityTable;

    fn single_base(mean: f64, median: u8, q25: u8, q75: u8, p10: u8, p90: u8) -> QualityStatistics {
        QualityStatistics {
            labels: vec!["1".to_string(); 3],
            mean: vec![mean; 3],
            median: vec![median; 3],
            q25: vec![q25; 3],
            q75: vec![q75; 3],
            p10: vec![p10; 3],
            p90: vec![p90; 3],
        }
    }

    #[test]
    fn canvas_is_nbases_by_forty_with_border() {
        let table = QualityTable::from_reads(vec![[30u8; 4]; 10]).unwrap();
        let stats = QualityStatistics::from_table(&table).unwrap();
        let img = render(&stats).unwrap();
        assert_eq!((img.width(), img.height()), (4, HEIGHT));
        assert_eq!(img.get(2, 0), Some(GREY));
        assert_eq!(img.get(2, HEIGHT - 1), Some(GREY));
        assert_eq!(img.get(0, 20), Some(GREY));
        assert_eq!(img.get(3, 20), Some(GREY));
        // Mean paints last and sits on the median.
        assert_eq!(img.get(1, 10), Some(BLUE));
        assert_eq!(img.get(1, 11), Some(WHITE));
    }

    #[test]
    fn statistics_land_on_their_rows() {
        let stats = single_base(33.7, 32, 28, 36, 20, 38);
        let img = render(&stats).unwrap();
        let x = 1;
        assert_eq!(img.get(x, HEIGHT - 32), Some(RED));
        assert_eq!(img.get(x, HEIGHT - 33), Some(BLUE));
        // Quartile band [28, 36) minus the marked rows.
        assert_eq!(img.get(x, HEIGHT - 28), Some(DARK_YELLOW));
        assert_eq!(img.get(x, HEIGHT - 35), Some(DARK_YELLOW));
        assert_eq!(img.get(x, HEIGHT - 36), Some(LIGHT_GREY));
        // Decile band [20, 38).
        assert_eq!(img.get(x, HEIGHT - 20), Some(LIGHT_GREY));
        assert_eq!(img.get(x, HEIGHT - 37), Some(LIGHT_GREY));
        assert_eq!(img.get(x, HEIGHT - 38), Some(WHITE));
        assert_eq!(img.get(x, HEIGHT - 19), Some(WHITE));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(row_for(0), HEIGHT - 1);
        assert_eq!(row_for(41), 0);
        assert_eq!(row_for(93), 0);
        let stats = single_base(0.0, 60, 0, 70, 0, 90);
        let img = render(&stats).unwrap();
        assert_eq!(img.get(1, 0), Some(RED));
        assert_eq!(img.get(1, HEIGHT - 1), Some(BLUE));
    }

    #[test]
    fn empty_statistics_have_no_canvas() {
        let stats = QualityStatistics::default();
        assert!(matches!(
            render(&stats),
            Err(PlotError::InvalidDimensions { width: 0, .. })
        ));
    }
}
