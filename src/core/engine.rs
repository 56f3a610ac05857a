use crate::core::fastq;
use crate::core::io;
use crate::core::metrics::{ModuleStatus, QualityStatistics, QualityTable, ScreenTable, parse_summary};
use crate::core::model::PhredOffset;
use anyhow::{Context, Result, anyhow};
use crossbeam_channel as channel;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

const AUTO_DETECT_READS: usize = 50_000;

/// Where per-base quality statistics come from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatsSource {
    /// Raw reads, aggregated here.
    Fastq { phred_offset: PhredOffset },
    /// The per-base quality module of a FastQC `fastqc_data.txt`.
    FastqcData,
    /// Bare `base mean median q25 q75 p10 p90` rows.
    Rows,
}

pub struct BoxplotConfig {
    pub inputs: Vec<PathBuf>,
    pub source: StatsSource,
    pub out_dir: PathBuf,
    pub threads: usize,
    pub inline: bool,
}

pub struct ScreenConfig {
    pub screens: Vec<PathBuf>,
    pub out: PathBuf,
    pub threshold: Option<f64>,
    pub merge: bool,
    pub sort: bool,
    pub inline: bool,
}

pub struct StatusConfig {
    pub summary: PathBuf,
    pub out: PathBuf,
    pub inline: bool,
}

pub struct QualityOutput {
    pub stats: QualityStatistics,
    /// Reads aggregated; `None` when the statistics were pre-computed.
    pub nreads: Option<u64>,
}

pub fn quality_stats(path: &Path, source: StatsSource, threads: usize) -> Result<QualityOutput> {
    let stats = stats_enabled();
    let t = Instant::now();
    let out = match source {
        StatsSource::Fastq { phred_offset } => {
            let offset = match phred_offset {
                PhredOffset::Fixed(v) => v,
                PhredOffset::Auto => detect_phred_offset(path, threads)
                    .with_context(|| "failed to auto-detect phred offset")?,
            };
            log_stage(stats, "engine.phred_detect", t);
            let t_agg = Instant::now();
            let table = aggregate_fastq(path, offset, threads)?;
            log_stage(stats, "engine.aggregate", t_agg);
            let nreads = table.nreads();
            let t_stats = Instant::now();
            let qs = QualityStatistics::from_table(&table)
                .with_context(|| format!("no reads in {}", path.display()))?;
            log_stage(stats, "engine.percentiles", t_stats);
            QualityOutput {
                stats: qs,
                nreads: Some(nreads),
            }
        }
        StatsSource::FastqcData => {
            let text = io::read_to_string(path)?;
            let qs = QualityStatistics::from_fastqc_data(&text)
                .with_context(|| format!("failed to read per-base quality from {}", path.display()))?;
            log_stage(stats, "engine.fastqc_data", t);
            QualityOutput {
                stats: qs,
                nreads: None,
            }
        }
        StatsSource::Rows => {
            let text = io::read_to_string(path)?;
            let qs = QualityStatistics::from_rows(text.lines())
                .with_context(|| format!("failed to read quality rows from {}", path.display()))?;
            log_stage(stats, "engine.rows", t);
            QualityOutput {
                stats: qs,
                nreads: None,
            }
        }
    };
    Ok(out)
}

fn aggregate_fastq(path: &Path, phred_offset: u8, threads: usize) -> Result<QualityTable> {
    let reader = io::open_reader(path, threads)?;
    let mut table = QualityTable::new();
    fastq::for_each_qual(reader, None, |qual| {
        table.add_encoded(qual, phred_offset)?;
        Ok(())
    })
    .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(table)
}

fn detect_phred_offset(path: &Path, threads: usize) -> Result<u8> {
    let reader = io::open_reader(path, threads)?;
    let (min_q, max_q, seen) = fastq::scan_qual_range_reader(reader, AUTO_DETECT_READS)?;
    let offset = fastq::offset_from_qual_range(min_q, max_q);
    debug!(input = %path.display(), reads = seen, min_q, max_q, offset, "detected phred offset");
    Ok(offset)
}

/// Parses every screen file into one table per file, or a single merged table.
pub fn load_screens(paths: &[PathBuf], merge: bool, sort: bool) -> Result<Vec<ScreenTable>> {
    let mut tables = Vec::with_capacity(paths.len());
    for path in paths {
        let text = io::read_to_string(path)?;
        let table = ScreenTable::parse(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        tables.push(table);
    }
    if merge {
        let mut merged = ScreenTable::default();
        for table in tables {
            merged.merge(table);
        }
        tables = vec![merged];
    }
    if sort {
        tables = tables.iter().map(ScreenTable::sorted_by_unmapped).collect();
    }
    Ok(tables)
}

pub fn load_summary(path: &Path) -> Result<Vec<ModuleStatus>> {
    let text = io::read_to_string(path)?;
    parse_summary(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Runs `job` over every input on a fixed worker pool; results come back in input order.
///
/// The first failing input aborts the remaining queue.
pub fn run_parallel<T, F>(inputs: &[PathBuf], threads: usize, job: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&Path) -> Result<T> + Sync,
{
    let workers = threads.max(1).min(inputs.len().max(1));
    let (job_tx, job_rx) = channel::unbounded::<(usize, &Path)>();
    for (index, path) in inputs.iter().enumerate() {
        job_tx
            .send((index, path.as_path()))
            .map_err(|_| anyhow!("job queue closed"))?;
    }
    drop(job_tx);

    let (result_tx, result_rx) = channel::unbounded::<(usize, Result<T>)>();
    let abort = AtomicBool::new(false);
    thread::scope(|scope| {
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = result_tx.clone();
            let job = &job;
            let abort = &abort;
            scope.spawn(move || {
                for (index, path) in rx.iter() {
                    if abort.load(Ordering::Relaxed) {
                        break;
                    }
                    let res = job(path);
                    if res.is_err() {
                        abort.store(true, Ordering::Relaxed);
                    }
                    if tx.send((index, res)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut parts: Vec<Option<T>> = (0..inputs.len()).map(|_| None).collect();
    let mut first_err: Option<(usize, anyhow::Error)> = None;
    for (index, res) in result_rx.iter() {
        match res {
            Ok(v) => parts[index] = Some(v),
            Err(e) => {
                if first_err.as_ref().is_none_or(|(i, _)| index < *i) {
                    first_err = Some((index, e));
                }
            }
        }
    }
    if let Some((_, e)) = first_err {
        return Err(e);
    }
    parts
        .into_iter()
        .enumerate()
        .map(|(i, p)| p.ok_or_else(|| anyhow!("no result for input {}", inputs[i].display())))
        .collect()
}

pub fn stats_enabled() -> bool {
    matches!(std::env::var("KIRA_STATS").as_deref(), Ok("1"))
}

pub fn log_stage(stats: bool, name: &str, t: Instant) {
    if stats {
        debug!(target: "kira_stats", "stage={} time={}", name, fmt_dur(t.elapsed()));
    }
}

pub fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}
