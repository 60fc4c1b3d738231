use crate::io::indexed_read::{split_fields, EntryError, IndexedEntry};

/// Entry of a .fam file.
///
/// According to the Plink 1.9 specs, one line per sample with six fields:
/// Family ID, within-family ID, father, mother, sex code, phenotype value.
/// Samples are identified by the within-family ID alone.
#[derive(Debug)]
pub struct FamEntry {
    pub ix: usize,
    pub iid: String,
}

impl IndexedEntry for FamEntry {
    fn from_str(s: &str, ix: usize) -> Result<Self, EntryError> {
        let fields = split_fields(s, 2)?;
        Ok(Self {
            ix,
            iid: fields[1].to_owned(),
        })
    }
}
