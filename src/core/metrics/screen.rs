use crate::core::error::{PlotError, PlotResult};

const NO_HITS_PREFIX: &str = "%Hit_no_libraries:";

/// One library row of a contamination screen, percentages in [0, 100].
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenRow {
    pub library: String,
    pub unmapped: f64,
    pub one_hit_one_library: f64,
    pub multiple_hits_one_library: f64,
    pub one_hit_multiple_libraries: f64,
    pub multiple_hits_multiple_libraries: f64,
}

impl ScreenRow {
    pub fn mapped(&self) -> f64 {
        self.mapped_categories().iter().sum()
    }

    /// Mapped categories in stacking order.
    pub fn mapped_categories(&self) -> [f64; 4] {
        [
            self.one_hit_one_library,
            self.multiple_hits_one_library,
            self.one_hit_multiple_libraries,
            self.multiple_hits_multiple_libraries,
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScreenTable {
    pub rows: Vec<ScreenRow>,
    pub no_hits: Option<f64>,
}

impl ScreenTable {
    /// Parses a screen result file: header/comment lines are skipped and the
    /// `%Hit_no_libraries:` line supplies the file-level no-hit percentage.
    pub fn parse(text: &str) -> PlotResult<Self> {
        let mut table = Self::default();
        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if let Some(rest) = line.strip_prefix(NO_HITS_PREFIX) {
                table.no_hits = Some(parse_pct(line_no, "no hits", rest.trim())?);
                continue;
            }
            if line.is_empty()
                || line.starts_with('#')
                || line.starts_with("Library")
                || line.starts_with('%')
            {
                continue;
            }
            table.rows.push(parse_row(line_no, line)?);
        }
        Ok(table)
    }

    pub fn libraries(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.library.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends another screen's libraries; the first present no-hit value wins.
    pub fn merge(&mut self, other: ScreenTable) {
        self.rows.extend(other.rows);
        if self.no_hits.is_none() {
            self.no_hits = other.no_hits;
        }
    }

    /// Keeps libraries with at least `threshold`% mapped reads.
    pub fn filtered(&self, threshold: Option<f64>) -> PlotResult<ScreenTable> {
        let rows = match threshold {
            Some(t) if !(0.0..=100.0).contains(&t) => return Err(PlotError::InvalidThreshold(t)),
            Some(t) => self
                .rows
                .iter()
                .filter(|r| r.unmapped < 100.0 - t)
                .cloned()
                .collect(),
            None => self.rows.clone(),
        };
        Ok(ScreenTable {
            rows,
            no_hits: self.no_hits,
        })
    }

    /// Most unmapped library first; ties keep file order.
    pub fn sorted_by_unmapped(&self) -> ScreenTable {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| b.unmapped.total_cmp(&a.unmapped));
        ScreenTable {
            rows,
            no_hits: self.no_hits,
        }
    }
}

/// Tab-separated rows may carry spaces in the library name; rows without tabs
/// split on any whitespace.
fn parse_row(line_no: usize, line: &str) -> PlotResult<ScreenRow> {
    let fields: Vec<&str> = if line.contains('\t') {
        line.split('\t').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    };
    if fields.len() != 6 {
        return Err(PlotError::parse(
            line_no,
            format!("expected 6 fields, found {}", fields.len()),
        ));
    }
    if fields[0].is_empty() {
        return Err(PlotError::parse(line_no, "empty library name"));
    }
    Ok(ScreenRow {
        library: fields[0].to_string(),
        unmapped: parse_pct(line_no, "%Unmapped", fields[1])?,
        one_hit_one_library: parse_pct(line_no, "%One_hit_one_library", fields[2])?,
        multiple_hits_one_library: parse_pct(line_no, "%Multiple_hits_one_library", fields[3])?,
        one_hit_multiple_libraries: parse_pct(line_no, "%One_hit_multiple_libraries", fields[4])?,
        multiple_hits_multiple_libraries: parse_pct(
            line_no,
            "%Multiple_hits_multiple_libraries",
            fields[5],
        )?,
    })
}

fn parse_pct(line_no: usize, field: &str, value: &str) -> PlotResult<f64> {
    match value.parse::<f64>() {
        Ok(v) if (0.0..=100.0).contains(&v) => Ok(v),
        Ok(_) => Err(PlotError::parse(
            line_no,
            format!("{} value '{}' outside 0-100", field, value),
        )),
        Err(_) => Err(PlotError::parse(
            line_no,
            format!("invalid {} value '{}'", field, value),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: &str = "#Fastq_screen version: 0.4.1\n\
Library\t%Unmapped\t%One_hit_one_library\t%Multiple_hits_one_library\t%One_hit_multiple_libraries\t%Multiple_hits_multiple_libraries\n\
hg19\t98.10\t0.02\t0.27\t0.55\t1.06\n\
mm9\t35.92\t47.46\t10.18\t3.56\t2.88\n\
rn4\t93.01\t0.18\t0.17\t3.87\t2.77\n\
dm3\t99.97\t0.00\t0.00\t0.01\t0.02\n\
\n\
%Hit_no_libraries: 30.80\n";

    #[test]
    fn parses_screen_file() {
        let table = ScreenTable::parse(SCREEN).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.libraries().collect::<Vec<_>>(),
            vec!["hg19", "mm9", "rn4", "dm3"]
        );
        assert_eq!(table.no_hits, Some(30.80));
        let hg19 = &table.rows[0];
        assert_eq!(hg19.unmapped, 98.10);
        assert!((hg19.mapped() - 1.90).abs() < 1e-9);
        for row in &table.rows {
            assert!((row.unmapped + row.mapped() - 100.0).abs() <= 0.01 + 1e-9);
        }
    }

    #[test]
    fn no_hits_is_optional() {
        let table = ScreenTable::parse("hg19\t98.10\t0.02\t0.27\t0.55\t1.06\n").unwrap();
        assert_eq!(table.no_hits, None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn wrong_column_count_is_a_parse_error() {
        let err = ScreenTable::parse("#x\nhg19\t98.10\t0.02\t0.27\t0.55\n").unwrap_err();
        assert!(matches!(err, PlotError::Parse { line: 2, .. }));
        let err = ScreenTable::parse("hg19\t98.10\t0.02\tabc\t0.55\t1.06\n").unwrap_err();
        assert!(matches!(err, PlotError::Parse { line: 1, .. }));
        let err = ScreenTable::parse("%Hit_no_libraries: lots\n").unwrap_err();
        assert!(matches!(err, PlotError::Parse { .. }));
    }

    #[test]
    fn threshold_keeps_sufficiently_mapped_libraries() {
        let text = "a\t10\t90\t0\t0\t0\nb\t60\t40\t0\t0\t0\nc\t95\t5\t0\t0\t0\nd\t50\t50\t0\t0\t0\n";
        let table = ScreenTable::parse(text).unwrap();
        let kept = table.filtered(Some(50.0)).unwrap();
        // Strict comparison: exactly 50% mapped is dropped.
        assert_eq!(kept.libraries().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(table.filtered(None).unwrap().len(), 4);
        assert_eq!(table.filtered(Some(0.0)).unwrap().len(), 4);
        assert_eq!(table.filtered(Some(100.0)).unwrap().len(), 0);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let table = ScreenTable::parse("a\t10\t90\t0\t0\t0\n").unwrap();
        assert!(matches!(
            table.filtered(Some(f64::NAN)),
            Err(PlotError::InvalidThreshold(_))
        ));
        assert_eq!(
            table.filtered(Some(-1.0)),
            Err(PlotError::InvalidThreshold(-1.0))
        );
        assert_eq!(
            table.filtered(Some(100.5)),
            Err(PlotError::InvalidThreshold(100.5))
        );
    }

    #[test]
    fn whitespace_separated_rows() {
        let table = ScreenTable::parse("hg19 98.10 0.02 0.27 0.55 1.06\n").unwrap();
        assert_eq!(table.rows[0].library, "hg19");
        assert_eq!(table.rows[0].multiple_hits_multiple_libraries, 1.06);

        let table = ScreenTable::parse("Homo sapiens\t98.10\t0.02\t0.27\t0.55\t1.06\n").unwrap();
        assert_eq!(table.rows[0].library, "Homo sapiens");

        let err = ScreenTable::parse("hg19 98.10 0.02 0.27 0.55\n").unwrap_err();
        assert!(matches!(err, PlotError::Parse { line: 1, .. }));
    }

    #[test]
    fn sort_keeps_file_order_for_ties() {
        let text = "a\t40\t60\t0\t0\t0\nb\t70\t30\t0\t0\t0\nc\t40\t0\t60\t0\t0\nd\t40\t0\t0\t60\t0\n";
        let sorted = ScreenTable::parse(text).unwrap().sorted_by_unmapped();
        assert_eq!(
            sorted.libraries().collect::<Vec<_>>(),
            vec!["b", "a", "c", "d"]
        );
    }

    #[test]
    fn merge_and_sort() {
        let mut first = ScreenTable::parse("a\t10\t90\t0\t0\t0\n").unwrap();
        let second = ScreenTable::parse("b\t60\t40\t0\t0\t0\n%Hit_no_libraries: 5.0\n").unwrap();
        first.merge(second);
        assert_eq!(first.libraries().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(first.no_hits, Some(5.0));
        let sorted = first.sorted_by_unmapped();
        assert_eq!(sorted.libraries().collect::<Vec<_>>(), vec!["b", "a"]);
    }
}
