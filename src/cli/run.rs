use crate::cli::args::{BoxplotArgs, Cli, Commands, PhredOffsetArg, ScreenArgs, StatusArgs};
use anyhow::{Context, Result, bail};
use clap::Parser;
use kira_uplot::core::engine::{
    self, BoxplotConfig, ScreenConfig, StatsSource, StatusConfig, log_stage, stats_enabled,
};
use kira_uplot::core::model::PhredOffset;
use kira_uplot::report::raster::Raster;
use kira_uplot::report::{png, ufastqc, uboxplot, uscreen};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub fn entry() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Uboxplot(args) => uboxplots(boxplot_config(args)?),
        Commands::Uscreenplot(args) => uscreenplot(screen_config(args)?),
        Commands::Ufastqcplot(args) => ufastqcplot(status_config(args)?),
    }
}

fn init_logging() {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if stats_enabled() {
        if let Ok(directive) = "kira_stats=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn boxplot_config(args: BoxplotArgs) -> Result<BoxplotConfig> {
    if args.threads == 0 {
        bail!("--threads must be >= 1");
    }
    for input in &args.inputs {
        if !input.is_file() {
            bail!("input file not found: {}", input.display());
        }
    }
    check_distinct_outputs(&args.inputs, &args.out_dir)?;
    let source = if args.fastqc_data {
        StatsSource::FastqcData
    } else if args.rows {
        StatsSource::Rows
    } else {
        let phred_offset = match args.phred_offset {
            PhredOffsetArg::Auto => PhredOffset::Auto,
            PhredOffsetArg::P33 => PhredOffset::Fixed(33),
            PhredOffsetArg::P64 => PhredOffset::Fixed(64),
        };
        StatsSource::Fastq { phred_offset }
    };
    Ok(BoxplotConfig {
        inputs: args.inputs,
        source,
        out_dir: args.out_dir,
        threads: args.threads,
        inline: args.inline,
    })
}

fn screen_config(args: ScreenArgs) -> Result<ScreenConfig> {
    if let Some(t) = args.threshold {
        if !(0.0..=100.0).contains(&t) {
            bail!("--threshold must be between 0 and 100");
        }
    }
    for screen in &args.screens {
        if !screen.is_file() {
            bail!("screen file not found: {}", screen.display());
        }
    }
    Ok(ScreenConfig {
        screens: args.screens,
        out: args.out,
        threshold: args.threshold,
        merge: args.merge,
        sort: args.sort,
        inline: args.inline,
    })
}

fn status_config(args: StatusArgs) -> Result<StatusConfig> {
    if !args.summary.is_file() {
        bail!("summary file not found: {}", args.summary.display());
    }
    Ok(StatusConfig {
        summary: args.summary,
        out: args.out,
        inline: args.inline,
    })
}

fn uboxplots(cfg: BoxplotConfig) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();
    fs::create_dir_all(&cfg.out_dir)
        .with_context(|| format!("failed to create output dir {}", cfg.out_dir.display()))?;

    // Parallelism goes to files when there are several, to decompression otherwise.
    let (workers, per_file_threads) = if cfg.inputs.len() > 1 {
        (cfg.threads, 1)
    } else {
        (1, cfg.threads)
    };
    let uris = engine::run_parallel(&cfg.inputs, workers, |input| {
        let t = Instant::now();
        let quality = engine::quality_stats(input, cfg.source, per_file_threads)?;
        match quality.nreads {
            Some(reads) => info!(
                input = %input.display(),
                reads,
                bases = quality.stats.nbases(),
                "aggregated reads"
            ),
            None => info!(
                input = %input.display(),
                bases = quality.stats.nbases(),
                "loaded quality statistics"
            ),
        }
        let img = uboxplot::render(&quality.stats)
            .with_context(|| format!("failed to render {}", input.display()))?;
        let uri = emit(&img, &output_path(&cfg.out_dir, input), cfg.inline)?;
        log_stage(stats, "uboxplot.input", t);
        Ok(uri)
    })?;
    for uri in uris.into_iter().flatten() {
        println!("{}", uri);
    }
    log_stage(stats, "uboxplot.total", t0);
    Ok(())
}

fn uscreenplot(cfg: ScreenConfig) -> Result<()> {
    let stats = stats_enabled();
    let t_load = Instant::now();
    let screens = engine::load_screens(&cfg.screens, cfg.merge, cfg.sort)?;
    log_stage(stats, "uscreenplot.load", t_load);
    let t_render = Instant::now();
    let img = uscreen::render(&screens, cfg.threshold).with_context(|| "failed to render screens")?;
    log_stage(stats, "uscreenplot.render", t_render);
    if let Some(uri) = emit(&img, &cfg.out, cfg.inline)? {
        println!("{}", uri);
    }
    Ok(())
}

fn ufastqcplot(cfg: StatusConfig) -> Result<()> {
    let stats = stats_enabled();
    let t = Instant::now();
    let statuses = engine::load_summary(&cfg.summary)?;
    let img = ufastqc::render(&statuses)
        .with_context(|| format!("no modules in {}", cfg.summary.display()))?;
    log_stage(stats, "ufastqcplot.render", t);
    if let Some(uri) = emit(&img, &cfg.out, cfg.inline)? {
        println!("{}", uri);
    }
    Ok(())
}

fn emit(img: &Raster, out: &Path, inline: bool) -> Result<Option<String>> {
    let bytes = png::encode(img)?;
    png::write(out, &bytes).with_context(|| format!("failed to write {}", out.display()))?;
    info!(output = %out.display(), width = img.width(), height = img.height(), "saved plot");
    Ok(inline.then(|| png::data_uri(&bytes)))
}

fn output_path(out_dir: &Path, input: &Path) -> PathBuf {
    out_dir.join(format!("{}.uboxplot.png", output_stem(input)))
}

/// Inputs that map to the same plot file would overwrite each other.
fn check_distinct_outputs(inputs: &[PathBuf], out_dir: &Path) -> Result<()> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::with_capacity(inputs.len());
    for input in inputs {
        let out = output_path(out_dir, input);
        if let Some(prev) = seen.insert(out.clone(), input) {
            bail!(
                "{} and {} would both be written to {}",
                prev.display(),
                input.display(),
                out.display()
            );
        }
    }
    Ok(())
}

/// `sample.fastq.gz` -> `sample`; `sample_fastqc/fastqc_data.txt` -> `sample_fastqc`.
fn output_stem(input: &Path) -> String {
    let name = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("plot");
    if name == "fastqc_data.txt" {
        if let Some(dir) = input
            .parent()
            .and_then(Path::file_name)
            .and_then(|s| s.to_str())
        {
            return dir.to_string();
        }
    }
    let mut stem = PathBuf::from(name);
    for ext in ["gz", "fastq", "fq", "txt"] {
        if stem.extension().and_then(|s| s.to_str()) == Some(ext) {
            stem.set_extension("");
        }
    }
    stem.to_string_lossy().into_owned()
}
