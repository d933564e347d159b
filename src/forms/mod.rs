pub mod products;
pub mod trace;
