pub mod composite;
pub mod scaling;
pub mod swath_mask;
