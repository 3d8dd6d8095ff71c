//! Gift bundle generation.
//!
//! A prompt either matches a curated keyword rule (fixed templates, no
//! randomness) or falls back to randomly sampled bundles. An optional budget
//! then filters (range) or trims (single limit) the candidates. The result is
//! never empty when candidates existed.

pub mod budget;
pub mod catalog;
pub mod generator;
pub mod sampler;

pub use budget::BudgetConstraint;
pub use catalog::{Bundle, Catalog, CatalogItem};
pub use generator::BundleGenerator;
pub use sampler::{Sampler, SeededSampler, ThreadRngSampler};
