//! Per-product segmentation of learned campaign patterns.

pub mod segment;

pub use segment::{segment_patterns_by_product, segment_patterns_for_all_products};
