mod cli;

use clap::Parser;
use cli::{Cli, InputArgs, SubCmd, ViewArgs};
use log::{debug, error};
use rs_plinkrod::io::location::GenomeLoc;
use rs_plinkrod::{Error, Genotype, PlinkFormat, ReadOptions, VariantCollection, VariantView};
use std::error::Error as StdError;
use std::io::{BufWriter, Write};
use std::path::Path;

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    simple_logger::init_with_level(level).unwrap();

    let mut options = ReadOptions::new().strict_bed_size(cli.strict);
    if let Some(format) = cli.format {
        options = options.with_format(format);
    }

    let res = match cli.cmd {
        SubCmd::Summary(args) => summary(&options, args),
        SubCmd::Samples(args) => samples(&options, args),
        SubCmd::View(args) => view(&options, args),
    };

    if let Err(e) = res {
        error!("{}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            error!("caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(e: &Error) -> i32 {
    match e {
        Error::FileNotFound(_) => exitcode::NOINPUT,
        Error::IOFailure { .. } => exitcode::IOERR,
        Error::InvalidLocation(_) => exitcode::USAGE,
        _ => exitcode::DATAERR,
    }
}

fn load(options: &ReadOptions, path: &str) -> Result<(PlinkFormat, VariantCollection), Error> {
    let path = Path::new(path);
    let format = options.format_of(path);
    debug!("Reading {:?} as {:?}", path, format);
    let rod = options.clone().with_format(format).read(path)?;
    Ok((format, rod))
}

fn stdout_error(e: std::io::Error) -> Error {
    Error::IOFailure {
        path: "<stdout>".into(),
        source: e,
    }
}

fn summary(options: &ReadOptions, args: InputArgs) -> Result<(), Error> {
    let (format, rod) = load(options, &args.path)?;
    let num_multiallelic = rod
        .variants()
        .iter()
        .filter(|v| v.num_distinct_alleles() > 2)
        .count();
    println!("source\t{}", rod.source().display());
    println!("format\t{:?}", format);
    println!("samples\t{}", rod.samples().len());
    println!("variants\t{}", rod.len());
    println!("indels\t{}", rod.num_indels());
    println!("multiallelic\t{}", num_multiallelic);
    Ok(())
}

fn samples(options: &ReadOptions, args: InputArgs) -> Result<(), Error> {
    let (_, rod) = load(options, &args.path)?;
    let mut out = BufWriter::new(std::io::stdout().lock());
    for sample in rod.samples() {
        writeln!(out, "{}", sample).map_err(stdout_error)?;
    }
    out.flush().map_err(stdout_error)
}

fn format_genotype(genotype: &Genotype) -> String {
    genotype
        .iter()
        .map(|allele| match allele {
            Some(a) => a.to_string(),
            None => "-".to_owned(),
        })
        .collect::<Vec<String>>()
        .join("/")
}

fn write_tsv<W: Write>(out: &mut W, variant: &VariantView) -> std::io::Result<()> {
    write!(out, "{}\t{}", variant.name(), variant.location())?;
    for (_, genotype) in variant.sample_genotypes() {
        write!(out, "\t{}", format_genotype(genotype))?;
    }
    writeln!(out)
}

fn view(options: &ReadOptions, args: ViewArgs) -> Result<(), Error> {
    let region = args
        .region
        .as_deref()
        .map(|r| r.parse::<GenomeLoc>())
        .transpose()?;
    let (_, rod) = load(options, &args.path)?;
    let mut out = BufWriter::new(std::io::stdout().lock());

    if !args.json {
        write!(out, "#name\tlocation").map_err(stdout_error)?;
        for sample in rod.samples() {
            write!(out, "\t{}", sample).map_err(stdout_error)?;
        }
        writeln!(out).map_err(stdout_error)?;
    }

    let selected: Box<dyn Iterator<Item = VariantView<'_>> + '_> = match &region {
        Some(region) => Box::new(rod.overlapping(region)),
        None => Box::new(rod.iter()),
    };
    for variant in selected {
        if args.json {
            serde_json::to_writer(&mut out, &variant).map_err(|e| Error::IOFailure {
                path: "<stdout>".into(),
                source: e.into(),
            })?;
            writeln!(out).map_err(stdout_error)?;
        } else {
            write_tsv(&mut out, &variant).map_err(stdout_error)?;
        }
    }
    out.flush().map_err(stdout_error)
}
