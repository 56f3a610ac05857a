use crate::core::error::{PlotError, PlotResult};
use crate::core::model::{MAX_Q, QualHist};

/// Per-position histograms of decoded Phred scores.
///
/// The first read fixes the sequence length; every later read must match it.
#[derive(Clone, Debug, Default)]
pub struct QualityTable {
    positions: Vec<QualHist>,
    nreads: u64,
}

impl QualityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates already-decoded reads in a single pass.
    pub fn from_reads<I, S>(reads: I) -> PlotResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut table = Self::new();
        for read in reads {
            table.add_scores(read.as_ref())?;
        }
        Ok(table)
    }

    pub fn nreads(&self) -> u64 {
        self.nreads
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nreads == 0
    }

    pub fn positions(&self) -> &[QualHist] {
        &self.positions
    }

    /// Adds one read of decoded scores (0..=MAX_Q).
    pub fn add_scores(&mut self, scores: &[u8]) -> PlotResult<()> {
        self.check_len(scores.len())?;
        if let Some(&q) = scores.iter().find(|&&q| q as usize > MAX_Q) {
            return Err(PlotError::parse(
                self.nreads as usize + 1,
                format!("quality score {} above maximum {}", q, MAX_Q),
            ));
        }
        for (hist, &q) in self.positions.iter_mut().zip(scores) {
            hist[q as usize] += 1;
        }
        self.nreads += 1;
        Ok(())
    }

    /// Adds one read of ASCII-encoded quality characters.
    pub fn add_encoded(&mut self, qual: &[u8], phred_offset: u8) -> PlotResult<()> {
        self.check_len(qual.len())?;
        let max = phred_offset as usize + MAX_Q;
        for &c in qual {
            if c < phred_offset || c as usize > max {
                return Err(PlotError::parse(
                    self.nreads as usize + 1,
                    format!(
                        "quality character '{}' outside Phred+{} range",
                        c as char, phred_offset
                    ),
                ));
            }
        }
        for (hist, &c) in self.positions.iter_mut().zip(qual) {
            hist[(c - phred_offset) as usize] += 1;
        }
        self.nreads += 1;
        Ok(())
    }

    fn check_len(&mut self, found: usize) -> PlotResult<()> {
        if self.nreads == 0 {
            self.positions = vec![[0u64; MAX_Q + 1]; found];
            return Ok(());
        }
        let expected = self.positions.len();
        if found != expected {
            return Err(PlotError::LengthMismatch {
                read: self.nreads + 1,
                expected,
                found,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_read_fixes_length() {
        let mut table = QualityTable::new();
        table.add_scores(&[30, 31, 32]).unwrap();
        table.add_scores(&[10, 11, 12]).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.nreads(), 2);
        assert_eq!(table.positions()[0][30], 1);
        assert_eq!(table.positions()[0][10], 1);
        assert_eq!(table.positions()[2][12], 1);
    }

    #[test]
    fn shorter_and_longer_reads_are_rejected() {
        let mut table = QualityTable::from_reads([[30u8, 30, 30, 30]]).unwrap();
        assert_eq!(
            table.add_scores(&[30, 30, 30]),
            Err(PlotError::LengthMismatch {
                read: 2,
                expected: 4,
                found: 3
            })
        );
        assert!(matches!(
            table.add_scores(&[30, 30, 30, 30, 30]),
            Err(PlotError::LengthMismatch { found: 5, .. })
        ));
        // Rejected reads leave the counts untouched.
        assert_eq!(table.nreads(), 1);
    }

    #[test]
    fn decodes_phred_offsets() {
        let mut table = QualityTable::new();
        table.add_encoded(b"!I", 33).unwrap();
        table.add_encoded(b"@h", 64).unwrap();
        assert_eq!(table.positions()[0][0], 2);
        assert_eq!(table.positions()[1][40], 2);
    }

    #[test]
    fn rejects_characters_below_offset() {
        let mut table = QualityTable::new();
        assert!(matches!(
            table.add_encoded(b"5 ", 33),
            Err(PlotError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            table.add_scores(&[94]),
            Err(PlotError::Parse { .. })
        ));
    }
}
