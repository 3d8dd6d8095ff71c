use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::budget::BudgetConstraint;
use super::catalog::{Bundle, Catalog};
use super::sampler::{Sampler, SeededSampler, ThreadRngSampler};

const MIN_RANDOM_BUNDLES: usize = 2;
const MAX_RANDOM_BUNDLES: usize = 3;
const MIN_ITEMS_PER_BUNDLE: usize = 3;
const MAX_ITEMS_PER_BUNDLE: usize = 5;

/// Builds gift bundles for a prompt.
///
/// Prompts that hit a curated keyword rule get that rule's fixed templates;
/// anything else gets 2-3 randomly sampled bundles of 3-5 distinct items.
/// The budget, when present, is applied to whichever candidates came out.
pub struct BundleGenerator {
    catalog: Arc<Catalog>,
    sampler: Box<dyn Sampler>,
}

impl BundleGenerator {
    pub fn new(catalog: Arc<Catalog>, sampler: Box<dyn Sampler>) -> Self {
        Self { catalog, sampler }
    }

    /// Built-in catalog, non-deterministic fallback.
    pub fn with_thread_rng() -> Self {
        Self::new(Catalog::builtin(), Box::new(ThreadRngSampler))
    }

    /// Built-in catalog, reproducible fallback.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Catalog::builtin(), Box::new(SeededSampler::new(seed)))
    }

    /// `prompt` is expected to be non-empty; callers reject blank prompts.
    pub fn generate(&self, prompt: &str, budget: Option<&BudgetConstraint>) -> Vec<Bundle> {
        let candidates = match self.curated(prompt) {
            Some(bundles) => bundles,
            None => self.random(),
        };

        match budget {
            Some(budget) => budget.apply(candidates),
            None => candidates,
        }
    }

    fn curated(&self, prompt: &str) -> Option<Vec<Bundle>> {
        let rule = self.catalog.rule_for(prompt)?;
        let bundles: Vec<Bundle> = rule
            .templates
            .iter()
            .map(|template| self.catalog.bundle_from(template))
            .filter(|bundle| !bundle.is_empty())
            .collect();

        if bundles.is_empty() {
            debug!(keywords = ?rule.keywords, "curated rule has no usable templates");
            return None;
        }
        debug!(keywords = ?rule.keywords, bundles = bundles.len(), "curated match");
        Some(bundles)
    }

    fn random(&self) -> Vec<Bundle> {
        let items = self.catalog.items();
        let count = self.sampler.pick_count(MIN_RANDOM_BUNDLES, MAX_RANDOM_BUNDLES);

        (0..count)
            .filter_map(|n| {
                let size = self
                    .sampler
                    .pick_count(MIN_ITEMS_PER_BUNDLE, MAX_ITEMS_PER_BUNDLE);
                let mut seen = HashSet::new();
                let picked: Vec<_> = self
                    .sampler
                    .pick_distinct(items.len(), size)
                    .into_iter()
                    .filter(|i| seen.insert(*i))
                    .filter_map(|i| items.get(i).cloned())
                    .collect();

                if picked.is_empty() {
                    None
                } else {
                    Some(Bundle::new(format!("Bundle {}", n + 1), picked))
                }
            })
            .collect()
    }
}

impl Default for BundleGenerator {
    fn default() -> Self {
        Self::with_thread_rng()
    }
}

impl std::fmt::Debug for BundleGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleGenerator")
            .field("catalog_items", &self.catalog.items().len())
            .finish_non_exhaustive()
    }
}
