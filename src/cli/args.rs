use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kira-uplot", version, about = "Micro-plots for FASTQ, FastQC and FastQ Screen output")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Per-base quality micro-boxplot, one PNG per input.
    Uboxplot(BoxplotArgs),
    /// Stacked-bar micro-plot of one or more FastQ Screen results.
    Uscreenplot(ScreenArgs),
    /// PASS/WARN/FAIL matrix from a FastQC summary.txt.
    Ufastqcplot(StatusArgs),
}

#[derive(Parser)]
pub struct BoxplotArgs {
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Inputs are FastQC fastqc_data.txt files instead of FASTQ.
    #[arg(long, default_value_t = false)]
    pub fastqc_data: bool,

    /// Inputs are bare `base mean median q25 q75 p10 p90` rows.
    #[arg(long, default_value_t = false, conflicts_with = "fastqc_data")]
    pub rows: bool,

    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    #[arg(long, default_value_t = num_cpus::get())]
    pub threads: usize,

    #[arg(long, value_enum, default_value_t = PhredOffsetArg::Auto)]
    pub phred_offset: PhredOffsetArg,

    /// Also print each plot as a base64 data URI.
    #[arg(long, default_value_t = false)]
    pub inline: bool,
}

#[derive(Parser)]
pub struct ScreenArgs {
    #[arg(required = true)]
    pub screens: Vec<PathBuf>,

    #[arg(long, default_value = "ufastqscreen.png")]
    pub out: PathBuf,

    /// Only show libraries with at least this percentage of mapped reads.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Combine all screen files into a single panel.
    #[arg(long, default_value_t = false)]
    pub merge: bool,

    /// Order libraries from most to least unmapped.
    #[arg(long, default_value_t = false)]
    pub sort: bool,

    #[arg(long, default_value_t = false)]
    pub inline: bool,
}

#[derive(Parser)]
pub struct StatusArgs {
    pub summary: PathBuf,

    #[arg(long, default_value = "ufastqc.png")]
    pub out: PathBuf,

    #[arg(long, default_value_t = false)]
    pub inline: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PhredOffsetArg {
    #[value(name = "auto")]
    Auto,
    #[value(name = "33")]
    P33,
    #[value(name = "64")]
    P64,
}
