pub mod analysis;
pub mod export;
