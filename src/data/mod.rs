pub mod collection;
pub mod variant;
