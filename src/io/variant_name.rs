//! Variant identifiers of the form `<id>|c<chrom>_p<pos>[_gI|_gD<len>]`.

use crate::error::Error;
use crate::io::location::GenomeLoc;

const CHROM_MARKER: &str = "|c";
const POSITION_MARKER: char = 'p';
const INSERTION_MARKER: &str = "gI";
const DELETION_MARKER: &str = "gD";

const CONVENTION_CHROM: &str = "...|c...";
const CONVENTION_POS: &str = "...|c..._p...";
const CONVENTION_INDEL: &str = "...|c..._p..._g[I/D][length]";

/// Location and indel attributes encoded in a variant name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantName {
    pub location: GenomeLoc,
    pub is_indel: bool,
    pub is_insertion: bool,
    /// Length on the reference; 1 unless the variant is a deletion.
    pub length: u32,
}

impl VariantName {
    pub fn parse(name: &str) -> Result<Self, Error> {
        let chrom_ix = name
            .find(CHROM_MARKER)
            .ok_or_else(|| Error::invalid_variant_name(name, CONVENTION_CHROM))?;
        let mut pieces: Vec<&str> = name[chrom_ix + CHROM_MARKER.len()..].split('_').collect();
        while pieces.last().map_or(false, |p| p.is_empty()) {
            pieces.pop();
        }
        if pieces.len() < 2 {
            return Err(Error::invalid_variant_name(name, CONVENTION_POS));
        }

        let chrom = pieces[0].trim();
        let pos = pieces[1]
            .strip_prefix(POSITION_MARKER)
            .ok_or_else(|| Error::invalid_variant_name(name, CONVENTION_POS))?
            .trim();
        let location: GenomeLoc = format!("{}:{}", chrom, pos)
            .parse()
            .map_err(|_| Error::invalid_variant_name(name, CONVENTION_POS))?;

        let mut res = Self {
            location,
            is_indel: false,
            is_insertion: false,
            length: 1,
        };

        if let Some(indel) = pieces.get(2) {
            if indel.starts_with(INSERTION_MARKER) {
                // length of an insertion on the reference stays 1
                res.is_indel = true;
                res.is_insertion = true;
            } else if let Some(len) = indel.strip_prefix(DELETION_MARKER) {
                res.is_indel = true;
                res.length = len
                    .parse()
                    .map_err(|_| Error::invalid_variant_name(name, CONVENTION_INDEL))?;
            }
        }

        Ok(res)
    }
}
