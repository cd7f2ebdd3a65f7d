pub mod config;
pub mod count;
pub mod mappings;
pub mod sync;
