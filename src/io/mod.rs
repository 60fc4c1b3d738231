pub mod allele;
pub mod bed;
pub mod bim;
pub mod chromosome;
pub mod fam;
pub mod format;
pub mod indexed_read;
pub mod location;
pub mod ped;
pub mod variant_name;
