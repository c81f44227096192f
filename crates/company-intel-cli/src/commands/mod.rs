pub mod analysis;
pub mod validate;
