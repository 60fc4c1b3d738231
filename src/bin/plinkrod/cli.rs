use clap::{Args, Parser, Subcommand};
use rs_plinkrod::PlinkFormat;

/// Decode plink pedigree files into location sorted variant records.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub(crate) struct Cli {
    #[clap(subcommand)]
    pub(crate) cmd: SubCmd,

    /// input format; detected from the file extension if not given
    #[clap(long, value_enum, global = true)]
    pub(crate) format: Option<PlinkFormat>,

    /// fail if the .bed file size does not match the .bim and .fam files
    #[clap(long, global = true)]
    pub(crate) strict: bool,

    /// enable debug logging
    #[clap(short, long, global = true)]
    pub(crate) verbose: bool,
}

#[derive(Subcommand)]
pub(crate) enum SubCmd {
    /// Print format, sample and variant counts
    Summary(InputArgs),
    /// Print sample ids, one per line
    Samples(InputArgs),
    /// Print variants with their genotypes
    View(ViewArgs),
}

#[derive(Args, Debug)]
pub(crate) struct InputArgs {
    /// path to a .ped/.raw file or to any file of a .bed/.bim/.fam trio
    pub path: String,
}

#[derive(Args, Debug)]
pub(crate) struct ViewArgs {
    /// path to a .ped/.raw file or to any file of a .bed/.bim/.fam trio
    pub path: String,

    /// only print variants overlapping this region (chrom:start-stop)
    #[clap(short, long)]
    pub region: Option<String>,

    /// print one json object per variant instead of tab separated lines
    #[clap(long)]
    pub json: bool,
}
