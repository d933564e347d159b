pub mod product;
pub mod trace;
