//! File exports for evaluation and projection results.

pub mod export;
