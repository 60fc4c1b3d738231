use crate::io::chromosome::Chromosome;
use crate::io::indexed_read::{split_fields, EntryError, IndexedEntry};
use crate::io::location::GenomeLoc;

const BIM_NUM_FIELDS: usize = 6;

/// Entry of a .bim file:
/// chromosome, variant id, genetic distance (ignored), position, allele 1, allele 2.
#[derive(Debug)]
pub struct BimEntry {
    pub ix: usize,
    pub chromosome: Chromosome,
    pub id: String,
    pub position: u64,
    pub allele_1: String,
    pub allele_2: String,
}

impl IndexedEntry for BimEntry {
    fn from_str(s: &str, ix: usize) -> Result<Self, EntryError> {
        let fields = split_fields(s, BIM_NUM_FIELDS)?;
        Ok(Self {
            ix,
            chromosome: fields[0].parse().map_err(|_| EntryError::InvalidField {
                field: 1,
                value: fields[0].to_owned(),
                kind: "chromosome",
            })?,
            id: fields[1].to_owned(),
            position: fields[3].parse().map_err(|_| EntryError::InvalidField {
                field: 4,
                value: fields[3].to_owned(),
                kind: "position",
            })?,
            allele_1: fields[4].to_owned(),
            allele_2: fields[5].to_owned(),
        })
    }
}

impl BimEntry {
    pub fn chr(&self) -> &Chromosome {
        &self.chromosome
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn location(&self) -> GenomeLoc {
        GenomeLoc::point(self.chromosome.clone(), self.position)
    }
}
