pub mod api;
pub mod seed;
