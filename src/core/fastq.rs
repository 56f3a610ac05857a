use anyhow::{Context, Result, bail};
use needletail::FastxReader;
use needletail::parser::FastqReader;
use std::io::Read;

/// Calls `f` with the raw quality string of each record, stopping after `limit`
/// records when one is given. Returns the number of records visited.
pub fn for_each_qual<R, F>(reader: R, limit: Option<usize>, mut f: F) -> Result<u64>
where
    R: Read + Send,
    F: FnMut(&[u8]) -> Result<()>,
{
    let mut fq = FastqReader::new(reader);
    let mut seen = 0u64;
    while limit.is_none_or(|l| seen < l as u64) {
        let Some(record) = fq.next() else {
            break;
        };
        let record = record.with_context(|| format!("malformed FASTQ record {}", seen + 1))?;
        let qual = record
            .qual()
            .with_context(|| format!("FASTQ record {} has no quality line", seen + 1))?;
        f(qual)?;
        seen += 1;
    }
    Ok(seen)
}

/// Returns (min, max) quality byte over the first `limit` reads and the number of reads seen.
pub fn scan_qual_range_reader<R: Read + Send>(reader: R, limit: usize) -> Result<(u8, u8, u64)> {
    let mut min_q = u8::MAX;
    let mut max_q = 0u8;
    let seen = for_each_qual(reader, Some(limit), |qual| {
        for &q in qual {
            min_q = min_q.min(q);
            max_q = max_q.max(q);
        }
        Ok(())
    })?;
    if seen == 0 {
        bail!("input file is empty");
    }
    Ok((min_q, max_q, seen))
}

/// Phred33 typically has low ASCII (<59); phred64 clusters higher.
pub fn offset_from_qual_range(min_q: u8, max_q: u8) -> u8 {
    if min_q < 59 {
        33
    } else if min_q >= 64 {
        64
    } else if max_q <= 74 {
        33
    } else {
        64
    }
}
