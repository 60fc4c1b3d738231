use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, OnceLock};

/// Plink encodes a missing allele call as `0`.
pub const NO_CALL_STR: &str = "0";

/// Display and serialized form of a no-call.
const NO_CALL_DISPLAY: &str = ".";

/// Observed allele of a genotype call.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum Allele {
    Called(Box<str>),
    NoCall,
}

/// Shared handle to an allele. Identical alleles within a variant share one handle.
pub type AlleleHandle = Arc<Allele>;

impl Allele {
    pub fn is_no_call(&self) -> bool {
        matches!(self, Allele::NoCall)
    }

    pub fn bases(&self) -> Option<&str> {
        match self {
            Allele::Called(bases) => Some(bases),
            Allele::NoCall => None,
        }
    }
}

impl Display for Allele {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Allele::Called(bases) => write!(f, "{}", bases),
            Allele::NoCall => write!(f, "{}", NO_CALL_DISPLAY),
        }
    }
}

impl Serialize for Allele {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Allele::Called(bases) => serializer.serialize_str(bases),
            Allele::NoCall => serializer.serialize_str(NO_CALL_DISPLAY),
        }
    }
}

/// The process wide no-call handle.
pub fn no_call() -> AlleleHandle {
    static NO_CALL: OnceLock<AlleleHandle> = OnceLock::new();
    NO_CALL.get_or_init(|| Arc::new(Allele::NoCall)).clone()
}

/// Interning table for the alleles seen at a single variant.
#[derive(Default, Debug, Clone)]
pub struct AlleleCache {
    alleles: HashMap<Box<str>, AlleleHandle>,
}

impl AlleleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared handle for `allele`, creating it on first use.
    /// The no-call code always resolves to [`no_call`] and is never cached.
    pub fn intern(&mut self, allele: &str) -> AlleleHandle {
        if allele == NO_CALL_STR {
            return no_call();
        }
        if let Some(handle) = self.alleles.get(allele) {
            return handle.clone();
        }
        let handle = Arc::new(Allele::Called(allele.into()));
        self.alleles.insert(allele.into(), handle.clone());
        handle
    }

    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{no_call, Allele, AlleleCache};
    use std::sync::Arc;

    #[test]
    fn same_string_same_handle() {
        let mut cache = AlleleCache::new();
        let a = cache.intern("A");
        let b = cache.intern("A");
        let c = cache.intern("C");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn caches_are_independent() {
        let mut first = AlleleCache::new();
        let mut second = AlleleCache::new();
        let a1 = first.intern("A");
        let a2 = second.intern("A");
        assert_eq!(a1, a2);
        assert!(!Arc::ptr_eq(&a1, &a2));
    }

    #[test]
    fn no_call_is_global_and_uncached() {
        let mut first = AlleleCache::new();
        let mut second = AlleleCache::new();
        let n1 = first.intern("0");
        let n2 = second.intern("0");
        assert!(Arc::ptr_eq(&n1, &n2));
        assert!(Arc::ptr_eq(&n1, &no_call()));
        assert_eq!(*n1, Allele::NoCall);
        assert!(first.is_empty());
    }

    #[test]
    fn display_and_bases() {
        let mut cache = AlleleCache::new();
        let indel = cache.intern("ACGT");
        assert_eq!(indel.bases(), Some("ACGT"));
        assert_eq!(indel.to_string(), "ACGT");
        assert_eq!(no_call().to_string(), ".");
        assert!(no_call().is_no_call());
    }
}
