use crate::error::Error;
use crate::io::allele::{AlleleCache, AlleleHandle, NO_CALL_STR};
use crate::io::bim::BimEntry;
use crate::io::location::GenomeLoc;
use crate::io::variant_name::VariantName;
use std::collections::HashMap;

/// Allele pair of one sample at one variant.
/// A slot is `None` if the input row did not provide a second allele.
pub type Genotype = [Option<AlleleHandle>; 2];

/// A single marker with the genotypes of all samples,
/// stored in the order of the sample list of the enclosing collection.
#[derive(Debug, Clone)]
pub struct Variant {
    name: String,
    location: GenomeLoc,
    is_indel: bool,
    is_insertion: bool,
    length: u32,
    // position of the variant in the input file
    source_ix: usize,
    declared_alleles: Option<[AlleleHandle; 2]>,
    genotypes: Vec<Genotype>,
    allele_cache: AlleleCache,
}

impl Variant {
    /// Builds a variant from a text header field, decoding location and
    /// indel attributes from the name.
    pub fn from_name(name: &str, source_ix: usize) -> Result<Self, Error> {
        let parsed = VariantName::parse(name)?;
        Ok(Self {
            name: name.to_owned(),
            location: parsed.location,
            is_indel: parsed.is_indel,
            is_insertion: parsed.is_insertion,
            length: parsed.length,
            source_ix,
            declared_alleles: None,
            genotypes: Vec::new(),
            allele_cache: AlleleCache::new(),
        })
    }

    /// Builds a variant from a .bim row.
    /// A no-call first allele is replaced by the second one,
    /// so that the first slot always holds an observed allele if there is one.
    pub fn from_bim(entry: BimEntry) -> Self {
        let mut allele_cache = AlleleCache::new();
        let first = if entry.allele_1 == NO_CALL_STR {
            allele_cache.intern(&entry.allele_2)
        } else {
            allele_cache.intern(&entry.allele_1)
        };
        let second = allele_cache.intern(&entry.allele_2);
        Self {
            location: entry.location(),
            name: entry.id,
            is_indel: false,
            is_insertion: false,
            length: 1,
            source_ix: entry.ix,
            declared_alleles: Some([first, second]),
            genotypes: Vec::new(),
            allele_cache,
        }
    }

    /// Appends the genotype of the next sample.
    /// Only the first two alleles are used, missing ones are left empty.
    pub fn add_genotype_entry<'s, I>(&mut self, alleles: I)
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut genotype: Genotype = [None, None];
        for (slot, allele) in genotype.iter_mut().zip(alleles) {
            *slot = Some(self.allele_cache.intern(allele));
        }
        self.genotypes.push(genotype);
    }

    pub(crate) fn push_genotype(&mut self, genotype: Genotype) {
        self.genotypes.push(genotype);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &GenomeLoc {
        &self.location
    }

    pub fn is_indel(&self) -> bool {
        self.is_indel
    }

    pub fn is_insertion(&self) -> bool {
        self.is_insertion
    }

    /// Length of the variant on the reference. Only meaningful for indels.
    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn source_ix(&self) -> usize {
        self.source_ix
    }

    /// The two alleles declared in the .bim file, `None` for text input.
    pub fn declared_alleles(&self) -> Option<&[AlleleHandle; 2]> {
        self.declared_alleles.as_ref()
    }

    pub fn genotypes(&self) -> &[Genotype] {
        &self.genotypes
    }

    pub fn num_genotypes(&self) -> usize {
        self.genotypes.len()
    }

    /// Number of distinct called alleles seen at this variant.
    pub fn num_distinct_alleles(&self) -> usize {
        self.allele_cache.len()
    }

    /// Genotype of the sample at `sample_ix` in the sample list.
    pub fn genotype(&self, sample_ix: usize) -> Option<&Genotype> {
        self.genotypes.get(sample_ix)
    }

    /// Mapping from sample name to genotype.
    pub fn genotype_map<'a>(&'a self, samples: &'a [String]) -> HashMap<&'a str, &'a Genotype> {
        samples
            .iter()
            .map(String::as_str)
            .zip(self.genotypes.iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Variant;
    use crate::io::allele::{no_call, Allele};
    use crate::io::bim::BimEntry;
    use crate::io::indexed_read::IndexedEntry;
    use std::sync::Arc;

    #[test]
    fn text_genotypes_share_alleles() {
        let mut v = Variant::from_name("SNP1|c1_p100", 0).unwrap();
        v.add_genotype_entry("A C".split_whitespace());
        v.add_genotype_entry("C A".split_whitespace());
        v.add_genotype_entry("0 0".split_whitespace());
        let g = v.genotypes();
        assert_eq!(g.len(), 3);
        let a0 = g[0][0].as_ref().unwrap();
        let a1 = g[1][1].as_ref().unwrap();
        assert!(Arc::ptr_eq(a0, a1));
        assert!(Arc::ptr_eq(g[2][0].as_ref().unwrap(), &no_call()));
        assert_eq!(v.num_distinct_alleles(), 2);
    }

    #[test]
    fn single_allele_leaves_second_slot_empty() {
        let mut v = Variant::from_name("SNP1|c1_p100", 0).unwrap();
        v.add_genotype_entry("T".split_whitespace());
        let g = &v.genotypes()[0];
        assert_eq!(g[0].as_deref(), Some(&Allele::Called("T".into())));
        assert!(g[1].is_none());
    }

    #[test]
    fn extra_alleles_are_ignored() {
        let mut v = Variant::from_name("SNP1|c1_p100", 0).unwrap();
        v.add_genotype_entry("A C G".split_whitespace());
        assert_eq!(v.num_distinct_alleles(), 2);
    }

    #[test]
    fn bim_no_call_first_allele_is_normalized() {
        let entry = BimEntry::from_str("1 rs3 0 200 0 T", 2).unwrap();
        let v = Variant::from_bim(entry);
        let [first, second] = v.declared_alleles().unwrap();
        assert_eq!(**first, Allele::Called("T".into()));
        assert!(Arc::ptr_eq(first, second));
        assert_eq!(v.source_ix(), 2);
        assert_eq!(v.name(), "rs3");
        assert!(!v.is_indel());
    }

    #[test]
    fn genotype_map_by_sample() {
        let mut v = Variant::from_name("SNP1|c1_p100", 0).unwrap();
        v.add_genotype_entry("A A".split_whitespace());
        v.add_genotype_entry("A T".split_whitespace());
        let samples = vec!["s1".to_owned(), "s2".to_owned()];
        let map = v.genotype_map(&samples);
        assert_eq!(map.len(), 2);
        assert_eq!(map["s2"][1].as_deref(), Some(&Allele::Called("T".into())));
    }
}
