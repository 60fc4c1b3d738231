use crate::data::collection::VariantCollection;
use crate::data::variant::Variant;
use crate::error::Error;
use flate2::read::GzDecoder;
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use strum_macros::EnumString;

const HEADER_PREFIX: char = '#';
const FIELD_SEPARATOR: char = '\t';

/// Sample metadata columns of a text pedigree file.
/// Every other header field names a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum MetadataColumn {
    #[strum(serialize = "Family ID", serialize = "#Family ID", serialize = "FID")]
    FamilyId,
    #[strum(serialize = "Individual ID", serialize = "#Individual ID")]
    IndividualId,
    #[strum(serialize = "IID")]
    IndividualIdShort,
    #[strum(serialize = "Paternal ID", serialize = "PAT")]
    PaternalId,
    #[strum(serialize = "Maternal ID", serialize = "MAT")]
    MaternalId,
    #[strum(serialize = "Sex", serialize = "SEX")]
    Sex,
    #[strum(serialize = "Phenotype", serialize = "PHENOTYPE")]
    Phenotype,
}

/// Column layout of a text pedigree file, taken from its header line.
#[derive(Debug)]
pub struct PedHeader {
    num_metadata_fields: usize,
    sample_col: usize,
}

impl PedHeader {
    /// Parses the header line and creates one (empty) variant per variant column.
    pub fn parse(line: &str, path: &Path) -> Result<(Self, Vec<Variant>), Error> {
        // a header without the comment prefix comes from a recoded (.raw style) file
        if !line.starts_with(HEADER_PREFIX) {
            return Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "file is likely of .raw or recoded format, please use an uncoded .ped file"
                    .to_owned(),
            });
        }

        let mut fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        while fields.last().map_or(false, |f| f.is_empty()) {
            fields.pop();
        }

        let mut num_metadata_fields = 0;
        let mut sample_col = None;
        let mut variants = Vec::new();
        for (ix, field) in fields.iter().enumerate() {
            match field.parse::<MetadataColumn>() {
                Ok(column) => {
                    if column == MetadataColumn::IndividualId && sample_col.is_none() {
                        sample_col = Some(ix);
                    }
                    num_metadata_fields += 1;
                }
                Err(_) => variants.push(Variant::from_name(field, variants.len())?),
            }
        }

        let sample_col = sample_col.ok_or_else(|| Error::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: "header has no \"Individual ID\" column".to_owned(),
        })?;
        debug!(
            "{:?}: {} metadata columns, {} variants",
            path,
            num_metadata_fields,
            variants.len()
        );

        Ok((
            Self {
                num_metadata_fields,
                sample_col,
            },
            variants,
        ))
    }

    /// Adds the genotypes of one data row to `variants` and returns the sample id.
    pub fn add_row<'l>(
        &self,
        line: &'l str,
        line_num: usize,
        path: &Path,
        variants: &mut [Variant],
    ) -> Result<&'l str, Error> {
        let num_variants = variants.len();
        let truncated = |found: usize| Error::TruncatedRow {
            path: path.to_path_buf(),
            line: line_num,
            expected: num_variants,
            found,
        };
        let mut tokens = line.split(FIELD_SEPARATOR).filter(|t| !t.is_empty());

        // leading columns before the sample id are dropped, whatever they are
        let sample = tokens.nth(self.sample_col).ok_or_else(|| truncated(0))?;
        let mut tokens = tokens.skip(self.num_metadata_fields.saturating_sub(self.sample_col + 1));

        for (ix, variant) in variants.iter_mut().enumerate() {
            let token = tokens.next().ok_or_else(|| truncated(ix))?;
            variant.add_genotype_entry(token.split_whitespace());
        }
        Ok(sample)
    }
}

/// Decodes a text pedigree file from `reader`.
/// `path` is only used for error reporting.
pub fn read_ped<R: BufRead>(reader: R, path: &Path) -> Result<VariantCollection, Error> {
    let mut lines = reader.lines();
    let header_line = lines
        .next()
        .ok_or_else(|| Error::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: "file is empty".to_owned(),
        })?
        .map_err(|e| Error::io(path, e))?;
    let (header, mut variants) = PedHeader::parse(header_line.trim_end_matches('\r'), path)?;

    let mut samples = Vec::new();
    for (ix, line) in lines.enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        // header is line 1
        let sample = header.add_row(line, ix + 2, path, &mut variants)?;
        samples.push(sample.to_owned());
    }
    info!(
        "Read {} samples and {} variants from {:?}",
        samples.len(),
        variants.len(),
        path
    );

    Ok(VariantCollection::new(path, samples, variants))
}

/// Decodes a text pedigree file from disk, transparently decompressing `.gz` files.
pub fn read_ped_file(path: &Path) -> Result<VariantCollection, Error> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    if path.extension().map_or(false, |ext| ext == "gz") {
        read_ped(BufReader::new(GzDecoder::new(file)), path)
    } else {
        read_ped(BufReader::new(file), path)
    }
}
