use crate::core::error::{PlotError, PlotResult};
use crate::core::metrics::quality_table::QualityTable;

const PER_BASE_QUAL_MODULE: &str = ">>Per base sequence quality";
const END_MODULE: &str = ">>END_MODULE";

/// Nearest ranks into the ascending per-position score sequence.
///
/// These are the legacy micro-plot ranks, not interpolated percentiles: the
/// median is off by one half for odd counts and the deciles are approximate.
/// Existing thumbnails depend on them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ranks {
    pub median: u64,
    pub q25: u64,
    pub q75: u64,
    pub p10: u64,
    pub p90: u64,
}

impl Ranks {
    pub fn for_count(nreads: u64) -> Self {
        let median = nreads / 2;
        let q25 = median / 2;
        let q75 = median + q25;
        let p10 = nreads / 10;
        let p90 = nreads - p10;
        Self {
            median,
            q25,
            q75,
            p10,
            p90,
        }
    }
}

/// Per-base quality summary; all arrays are index-aligned by base position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QualityStatistics {
    pub labels: Vec<String>,
    pub mean: Vec<f64>,
    pub median: Vec<u8>,
    pub q25: Vec<u8>,
    pub q75: Vec<u8>,
    pub p10: Vec<u8>,
    pub p90: Vec<u8>,
}

impl QualityStatistics {
    pub fn nbases(&self) -> usize {
        self.mean.len()
    }

    /// Computes the summary from raw-read histograms by walking cumulative counts.
    pub fn from_table(table: &QualityTable) -> PlotResult<Self> {
        let nreads = table.nreads();
        if nreads == 0 || table.len() == 0 {
            return Err(PlotError::EmptyInput);
        }
        let ranks = Ranks::for_count(nreads);
        let mut stats = Self::with_capacity(table.len());
        for (pos, hist) in table.positions().iter().enumerate() {
            let weighted: u64 = hist
                .iter()
                .enumerate()
                .map(|(q, &count)| q as u64 * count)
                .sum();
            stats.labels.push((pos + 1).to_string());
            stats.mean.push(weighted as f64 / nreads as f64);
            stats.median.push(score_at_rank(hist, ranks.median, nreads));
            stats.q25.push(score_at_rank(hist, ranks.q25, nreads));
            stats.q75.push(score_at_rank(hist, ranks.q75, nreads));
            stats.p10.push(score_at_rank(hist, ranks.p10, nreads));
            stats.p90.push(score_at_rank(hist, ranks.p90, nreads));
        }
        Ok(stats)
    }

    /// Parses the per-base quality module out of a FastQC `fastqc_data.txt`.
    pub fn from_fastqc_data(text: &str) -> PlotResult<Self> {
        let mut in_module = false;
        let mut rows = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if !in_module {
                in_module = line.starts_with(PER_BASE_QUAL_MODULE);
                continue;
            }
            if line.starts_with(END_MODULE) {
                break;
            }
            rows.push((idx + 1, line));
        }
        Self::from_numbered_rows(rows)
    }

    /// Parses bare `base mean median q25 q75 p10 p90` rows.
    pub fn from_rows<'a, I>(lines: I) -> PlotResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::from_numbered_rows(lines.into_iter().enumerate().map(|(i, l)| (i + 1, l)))
    }

    fn from_numbered_rows<'a, I>(rows: I) -> PlotResult<Self>
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        let mut stats = Self::default();
        for (line_no, line) in rows {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            stats.push_row(line_no, line)?;
        }
        if stats.nbases() == 0 {
            return Err(PlotError::EmptyInput);
        }
        Ok(stats)
    }

    fn push_row(&mut self, line_no: usize, line: &str) -> PlotResult<()> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 7 {
            return Err(PlotError::parse(
                line_no,
                format!("expected 7 fields, found {}", fields.len()),
            ));
        }
        let mean = parse_float(line_no, "mean", fields[1])?;
        if mean < 0.0 {
            return Err(PlotError::parse(line_no, "mean must not be negative"));
        }
        let median = parse_score(line_no, "median", fields[2])?;
        let q25 = parse_score(line_no, "lower quartile", fields[3])?;
        let q75 = parse_score(line_no, "upper quartile", fields[4])?;
        let p10 = parse_score(line_no, "10th percentile", fields[5])?;
        let p90 = parse_score(line_no, "90th percentile", fields[6])?;
        if !(p10 <= q25 && q25 <= median && median <= q75 && q75 <= p90) {
            return Err(PlotError::parse(
                line_no,
                format!(
                    "percentiles out of order: p10={} q25={} median={} q75={} p90={}",
                    p10, q25, median, q75, p90
                ),
            ));
        }
        self.labels.push(fields[0].to_string());
        self.mean.push(mean);
        self.median.push(median);
        self.q25.push(q25);
        self.q75.push(q75);
        self.p10.push(p10);
        self.p90.push(p90);
        Ok(())
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            labels: Vec::with_capacity(n),
            mean: Vec::with_capacity(n),
            median: Vec::with_capacity(n),
            q25: Vec::with_capacity(n),
            q75: Vec::with_capacity(n),
            p10: Vec::with_capacity(n),
            p90: Vec::with_capacity(n),
        }
    }
}

/// Score at a 0-based rank of the implicit sorted sequence, rank clamped to `nreads - 1`.
fn score_at_rank(hist: &[u64], rank: u64, nreads: u64) -> u8 {
    let rank = rank.min(nreads - 1);
    let mut cum: u64 = 0;
    for (q, &count) in hist.iter().enumerate() {
        cum += count;
        if cum > rank {
            return q as u8;
        }
    }
    (hist.len() - 1) as u8
}

fn parse_float(line_no: usize, field: &str, value: &str) -> PlotResult<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PlotError::parse(
            line_no,
            format!("invalid {} value '{}'", field, value),
        )),
    }
}

/// Scores are written as floats (`33.0`); truncate to the integer score.
fn parse_score(line_no: usize, field: &str, value: &str) -> PlotResult<u8> {
    let v = parse_float(line_no, field, value)?;
    if !(0.0..256.0).contains(&v) {
        return Err(PlotError::parse(
            line_no,
            format!("{} value '{}' out of range", field, value),
        ));
    }
    Ok(v as u8)
}
