use crate::data::collection::VariantCollection;
use crate::data::variant::Variant;
use crate::error::Error;
use crate::io::bed::{decode_bed, PlinkBinaryFileset};
use crate::io::bim::BimEntry;
use crate::io::fam::FamEntry;
use crate::io::indexed_read::IndexedReader;
use crate::io::ped::read_ped_file;
use log::{info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const GZIP_EXTENSION: &str = "gz";

/// The two on-disk encodings of plink genotype data.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlinkFormat {
    /// tab separated .ped / .raw file
    Text,
    /// .bed / .bim / .fam trio
    Binary,
}

impl PlinkFormat {
    /// Detects the format from the (case sensitive) file extension.
    /// A trailing `.gz` is skipped.
    pub fn from_path(path: &Path) -> Option<Self> {
        let mut ext = path.extension()?.to_str()?;
        if ext == GZIP_EXTENSION {
            ext = Path::new(path.file_stem()?).extension()?.to_str()?;
        }
        match ext {
            "ped" | "raw" => Some(Self::Text),
            "bed" | "bim" | "fam" => Some(Self::Binary),
            _ => None,
        }
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == GZIP_EXTENSION)
}

/// Settings for decoding a plink dataset.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    format: Option<PlinkFormat>,
    strict_bed_size: bool,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip extension based format detection.
    pub fn with_format(mut self, format: PlinkFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Fail instead of warning if the .bed payload does not have the size
    /// implied by the .bim and .fam files.
    pub fn strict_bed_size(mut self, strict: bool) -> Self {
        self.strict_bed_size = strict;
        self
    }

    pub fn format_of(&self, path: &Path) -> PlinkFormat {
        if let Some(format) = self.format {
            return format;
        }
        PlinkFormat::from_path(path).unwrap_or_else(|| {
            warn!(
                "Plink file {:?} does not have a standard extension (ped/raw for text, bed/bim/fam for binary) -- assuming ped format",
                path
            );
            PlinkFormat::Text
        })
    }

    pub fn read(&self, path: &Path) -> Result<VariantCollection, Error> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        match self.format_of(path) {
            PlinkFormat::Text => read_ped_file(path),
            PlinkFormat::Binary if is_gzipped(path) => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "compressed binary plink files are not supported".to_owned(),
            }),
            PlinkFormat::Binary => self.read_binary(path),
        }
    }

    fn read_binary(&self, path: &Path) -> Result<VariantCollection, Error> {
        let fileset = PlinkBinaryFileset::new(path);
        fileset.check_exists()?;

        let mut variants: Vec<Variant> = IndexedReader::<BimEntry>::read_all(fileset.bim())?
            .into_iter()
            .map(Variant::from_bim)
            .collect();
        let samples: Vec<String> = IndexedReader::<FamEntry>::read_all(fileset.fam())?
            .into_iter()
            .map(|e| e.iid)
            .collect();

        let bed_file = File::open(fileset.bed()).map_err(|e| Error::io(fileset.bed(), e))?;
        let report = decode_bed(
            BufReader::new(bed_file),
            fileset.bed(),
            &mut variants,
            samples.len(),
        )?;
        if !report.is_complete() {
            if self.strict_bed_size {
                return Err(Error::BedSizeMismatch {
                    path: fileset.bed().to_path_buf(),
                    expected: report.expected_payload_len,
                    found: report.payload_len,
                });
            }
            warn!(
                "{:?} holds {} genotype bytes, expected {} for {} variants and {} samples",
                fileset.bed(),
                report.payload_len,
                report.expected_payload_len,
                variants.len(),
                samples.len()
            );
        }
        let num_incomplete = variants
            .iter()
            .filter(|v| v.num_genotypes() != samples.len())
            .count();
        if num_incomplete > 0 {
            warn!(
                "{} of {} variants in {:?} have incomplete genotypes",
                num_incomplete,
                variants.len(),
                fileset.bed()
            );
        }
        info!(
            "Read {} samples and {} variants from {:?} ({:?})",
            samples.len(),
            variants.len(),
            fileset.bed(),
            report.layout
        );

        Ok(VariantCollection::new(path, samples, variants))
    }
}

/// Decodes a plink dataset with default options.
pub fn read_plink(path: &Path) -> Result<VariantCollection, Error> {
    ReadOptions::new().read(path)
}
