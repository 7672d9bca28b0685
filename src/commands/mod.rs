pub mod classify;
pub mod config;
pub mod organize;
pub mod scan;
