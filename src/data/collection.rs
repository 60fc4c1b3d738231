use crate::data::variant::{Genotype, Variant};
use crate::io::location::GenomeLoc;
use serde::{Serialize, Serializer};
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// All variants of one plink dataset, sorted by genome location.
#[derive(Debug, Clone)]
pub struct VariantCollection {
    source: PathBuf,
    samples: Vec<String>,
    variants: Vec<Variant>,
}

impl VariantCollection {
    /// Takes variants in file order with fully populated genotypes
    /// and sorts them by location. Variants at the same location keep their file order.
    pub fn new(source: &Path, samples: Vec<String>, mut variants: Vec<Variant>) -> Self {
        variants.sort_by(|a, b| a.location().cmp(b.location()));
        Self {
            source: source.to_path_buf(),
            samples,
            variants,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Variants in the order of the input file.
    pub fn variants_in_source_order(&self) -> Vec<&Variant> {
        let mut res: Vec<&Variant> = self.variants.iter().collect();
        res.sort_by_key(|v| v.source_ix());
        res
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn get(&self, ix: usize) -> Option<VariantView<'_>> {
        self.variants.get(ix).map(|variant| VariantView {
            variant,
            samples: &self.samples,
        })
    }

    pub fn iter(&self) -> Variants<'_> {
        Variants {
            collection: self,
            next_ix: 0,
        }
    }

    /// Variants whose location overlaps `region`, in sorted order.
    pub fn overlapping<'a>(
        &'a self,
        region: &'a GenomeLoc,
    ) -> impl Iterator<Item = VariantView<'a>> + 'a {
        self.iter().filter(move |v| v.location().overlaps(region))
    }

    pub fn num_indels(&self) -> usize {
        self.variants.iter().filter(|v| v.is_indel()).count()
    }
}

/// Cursor over a [`VariantCollection`] in location order.
/// Each cursor keeps its own position, so independent traversals do not interfere.
pub struct Variants<'a> {
    collection: &'a VariantCollection,
    next_ix: usize,
}

impl<'a> Iterator for Variants<'a> {
    type Item = VariantView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let res = self.collection.get(self.next_ix)?;
        self.next_ix += 1;
        Some(res)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.collection.len().saturating_sub(self.next_ix);
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for Variants<'a> {}

impl<'a> IntoIterator for &'a VariantCollection {
    type Item = VariantView<'a>;
    type IntoIter = Variants<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A variant together with the sample list its genotypes refer to.
#[derive(Debug, Clone, Copy)]
pub struct VariantView<'a> {
    variant: &'a Variant,
    samples: &'a [String],
}

impl<'a> VariantView<'a> {
    pub fn variant(&self) -> &'a Variant {
        self.variant
    }

    pub fn samples(&self) -> &'a [String] {
        self.samples
    }

    pub fn genotype_of(&self, sample: &str) -> Option<&'a Genotype> {
        let ix = self.samples.iter().position(|s| s == sample)?;
        self.variant.genotype(ix)
    }

    /// Pairs of sample name and genotype, in sample order.
    pub fn sample_genotypes(&self) -> impl Iterator<Item = (&'a str, &'a Genotype)> + 'a {
        self.samples
            .iter()
            .map(String::as_str)
            .zip(self.variant.genotypes().iter())
    }
}

impl<'a> Deref for VariantView<'a> {
    type Target = Variant;

    fn deref(&self) -> &Self::Target {
        self.variant
    }
}

#[derive(Serialize)]
struct SampleGenotype<'a> {
    sample: &'a str,
    alleles: &'a Genotype,
}

#[derive(Serialize)]
struct VariantRecord<'a> {
    name: &'a str,
    location: &'a GenomeLoc,
    is_indel: bool,
    is_insertion: bool,
    length: u32,
    genotypes: Vec<SampleGenotype<'a>>,
}

impl<'a> Serialize for VariantView<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        VariantRecord {
            name: self.variant.name(),
            location: self.variant.location(),
            is_indel: self.variant.is_indel(),
            is_insertion: self.variant.is_insertion(),
            length: self.variant.length(),
            genotypes: self
                .sample_genotypes()
                .map(|(sample, alleles)| SampleGenotype { sample, alleles })
                .collect(),
        }
        .serialize(serializer)
    }
}
