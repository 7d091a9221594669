//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: Fan a seed list out across the worker pool

pub mod crawl;

pub use crawl::run_crawler;
