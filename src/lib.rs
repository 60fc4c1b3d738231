//! Decoder for genotype data in the plink pedigree formats.
//!
//! Text (`.ped`/`.raw`) and binary (`.bed`/`.bim`/`.fam`) datasets are decoded
//! into a [`VariantCollection`](data::collection::VariantCollection) that is
//! sorted by genome location.

pub mod data;
pub mod error;
pub mod io;

pub use data::collection::{VariantCollection, VariantView};
pub use data::variant::{Genotype, Variant};
pub use error::Error;
pub use io::format::{read_plink, PlinkFormat, ReadOptions};
