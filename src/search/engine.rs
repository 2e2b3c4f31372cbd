//! The combination search engine.
//!
//! Given a target length the engine reserves the accessory (if requested),
//! then walks every quantity vector over the regular segments in catalog
//! order with a depth-first search. Each complete assignment that fits the
//! budget becomes a [`Combination`]; the best ones by leftover are returned.
//!
//! # Example
//!
//! ```
//! use lightcalc::search::{CombinationSearchEngine, SearchConfig};
//!
//! let engine = CombinationSearchEngine::new(SearchConfig::default()).unwrap();
//! let results = engine.search(620, true).unwrap();
//!
//! let best = &results.combinations[0];
//! assert_eq!(best.total_used_length(), 620);
//! assert_eq!(best.remaining_length(), 0);
//! ```

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, SegmentType};
use crate::combination::{Combination, CombinationLine};
use crate::error::{LightcalcError, Result};
use crate::search::collector::{Collector, TopCombinationsCollector};
use crate::search::config::SearchConfig;

/// Outcome of one search invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Target length searched for, in millimeters.
    pub target: i64,
    /// Whether one accessory unit was reserved.
    pub include_accessory: bool,
    /// Best combinations, least leftover first.
    pub combinations: Vec<Combination>,
    /// Number of complete assignments enumerated.
    pub enumerated: u64,
}

impl SearchResults {
    fn empty(target: i64, include_accessory: bool) -> Self {
        SearchResults {
            target,
            include_accessory,
            combinations: Vec::new(),
            enumerated: 0,
        }
    }

    /// No combination fits the target. A valid outcome, not an error.
    pub fn is_no_solution(&self) -> bool {
        self.combinations.is_empty()
    }

    /// The tightest fit, if any.
    pub fn best(&self) -> Option<&Combination> {
        self.combinations.first()
    }
}

/// Stateless search over an immutable catalog.
#[derive(Debug, Clone)]
pub struct CombinationSearchEngine {
    config: SearchConfig,
}

/// Per-invocation state of the depth-first walk.
struct Enumeration<'a> {
    target: i64,
    segments: &'a [SegmentType],
    accessory_line: Option<CombinationLine>,
    lines: Vec<CombinationLine>,
    collector: TopCombinationsCollector,
    enumerated: u64,
}

impl CombinationSearchEngine {
    /// Create an engine from a validated configuration.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(CombinationSearchEngine { config })
    }

    /// Create an engine over `catalog` with default settings.
    pub fn with_catalog(catalog: Catalog) -> Self {
        CombinationSearchEngine {
            config: SearchConfig::with_catalog(catalog),
        }
    }

    /// The catalog searched over.
    pub fn catalog(&self) -> &Catalog {
        &self.config.catalog
    }

    /// The engine configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find the best combinations covering `target` millimeters.
    ///
    /// Returns [`LightcalcError::InvalidInput`] for a non-positive target.
    /// A target the accessory alone does not fit in yields an empty result.
    pub fn search(&self, target: i64, include_accessory: bool) -> Result<SearchResults> {
        if target <= 0 {
            return Err(LightcalcError::invalid_input(format!(
                "target length must be positive, got {target}"
            )));
        }

        let catalog = &self.config.catalog;
        let accessory_line = include_accessory.then(|| CombinationLine::new(catalog.accessory(), 1));
        let reserved = accessory_line.as_ref().map_or(0, |line| line.used_length);
        let budget = target - reserved;

        if budget < 0 {
            debug!(
                "accessory needs {reserved}mm but target is {target}mm; no combination fits"
            );
            return Ok(SearchResults::empty(target, include_accessory));
        }

        let mut enumeration = Enumeration {
            target,
            segments: catalog.segments(),
            accessory_line,
            lines: Vec::with_capacity(catalog.segments().len() + 1),
            collector: TopCombinationsCollector::new(self.config.max_results),
            enumerated: 0,
        };
        enumeration.walk(0, budget)?;

        debug!(
            "target {target}mm (budget {budget}mm): enumerated {} combinations, ranked {}",
            enumeration.enumerated,
            enumeration.collector.total_collected()
        );

        Ok(SearchResults {
            target,
            include_accessory,
            combinations: enumeration.collector.results(),
            enumerated: enumeration.enumerated,
        })
    }

    /// Run independent searches for several targets in parallel.
    ///
    /// Results are returned in the order of `targets`.
    pub fn search_many(&self, targets: &[i64], include_accessory: bool) -> Vec<Result<SearchResults>> {
        targets
            .par_iter()
            .map(|&target| self.search(target, include_accessory))
            .collect()
    }
}

impl Enumeration<'_> {
    fn walk(&mut self, index: usize, budget: i64) -> Result<()> {
        let segments = self.segments;
        let Some(segment) = segments.get(index) else {
            return self.finalize(budget);
        };

        let max_quantity = u32::try_from(budget / segment.actual_length).map_err(|_| {
            LightcalcError::invalid_input(format!(
                "target {}mm is too large to enumerate",
                self.target
            ))
        })?;

        for quantity in 0..=max_quantity {
            let used = i64::from(quantity) * segment.actual_length;
            if quantity > 0 {
                self.lines.push(CombinationLine::new(segment, quantity));
            }
            let walked = self.walk(index + 1, budget - used);
            if quantity > 0 {
                self.lines.pop();
            }
            walked?;
        }
        Ok(())
    }

    fn finalize(&mut self, remaining: i64) -> Result<()> {
        self.enumerated += 1;
        if !self.collector.accepts(remaining) {
            return Ok(());
        }

        let mut lines = self.lines.clone();
        if let Some(accessory) = &self.accessory_line {
            lines.push(accessory.clone());
        }
        let combination = Combination::new(self.target, lines)?;
        debug_assert_eq!(combination.remaining_length(), remaining);
        self.collector.collect(combination);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::POWER_CORD_LABEL;

    fn engine() -> CombinationSearchEngine {
        CombinationSearchEngine::new(SearchConfig::default()).unwrap()
    }

    #[test]
    fn test_exact_fit_with_power_cord() {
        let results = engine().search(620, true).unwrap();
        let best = results.best().unwrap();

        assert_eq!(best.total_used_length(), 620);
        assert_eq!(best.remaining_length(), 0);
        assert_eq!(best.lines().len(), 2);
        assert_eq!(best.lines()[0].segment_type, "600");
        assert_eq!(best.lines()[0].quantity, 1);
        assert_eq!(best.lines()[1].segment_type, POWER_CORD_LABEL);
    }

    #[test]
    fn test_invalid_target() {
        for target in [0, -5] {
            let err = engine().search(target, false).unwrap_err();
            assert!(err.is_invalid_input());
        }
    }

    #[test]
    fn test_accessory_does_not_fit() {
        let results = engine().search(30, true).unwrap();
        assert!(results.is_no_solution());
        assert_eq!(results.enumerated, 0);
    }

    #[test]
    fn test_accessory_only_combination() {
        // 100 - 60 leaves 40, too short for any segment.
        let results = engine().search(100, true).unwrap();
        assert_eq!(results.combinations.len(), 1);
        let only = &results.combinations[0];
        assert_eq!(only.lines().len(), 1);
        assert_eq!(only.lines()[0].segment_type, POWER_CORD_LABEL);
        assert_eq!(only.remaining_length(), 40);
    }

    #[test]
    fn test_empty_combination_without_accessory() {
        let results = engine().search(100, false).unwrap();
        assert_eq!(results.combinations.len(), 1);
        assert!(results.combinations[0].lines().is_empty());
        assert_eq!(results.combinations[0].remaining_length(), 100);
    }

    #[test]
    fn test_enumeration_count() {
        // Budget 600 over {1160, 860, 560, 390, 300}:
        // 560 -> 1 way, 390 -> 1 way, 300 x {0,1,2} and 390+... only where fitting.
        // Leaves: (560), (390), (300), (300,300), () = 5
        let results = engine().search(600, false).unwrap();
        assert_eq!(results.enumerated, 5);
        assert_eq!(results.combinations[0].remaining_length(), 0);
        assert_eq!(results.combinations[0].lines()[0].segment_type, "300");
        assert_eq!(results.combinations[0].lines()[0].quantity, 2);
    }

    #[test]
    fn test_ranking_matches_stable_sort() {
        let catalog = Catalog::new(
            vec![SegmentType::new("b", 50, 50), SegmentType::new("a", 20, 20)],
            SegmentType::new("cord", 5, 5),
        )
        .unwrap();
        let engine = CombinationSearchEngine::with_catalog(catalog);
        let results = engine.search(100, false).unwrap();

        // Exact fits in enumeration order: b=0,a=5 then b=2,a=0.
        // Next best is b=1,a=2 with 10mm left.
        let quantities: Vec<Vec<(String, u32)>> = results
            .combinations
            .iter()
            .map(|c| {
                c.lines()
                    .iter()
                    .map(|l| (l.segment_type.clone(), l.quantity))
                    .collect()
            })
            .collect();
        assert_eq!(quantities[0], vec![("a".to_string(), 5)]);
        assert_eq!(quantities[1], vec![("b".to_string(), 2)]);
        assert_eq!(results.combinations[2].remaining_length(), 10);
    }

    #[test]
    fn test_search_many_preserves_order() {
        let results = engine().search_many(&[620, 0, 30], true);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().target, 620);
        assert!(results[1].as_ref().unwrap_err().is_invalid_input());
        assert!(results[2].as_ref().unwrap().is_no_solution());
    }

    #[test]
    fn test_max_results_config() {
        let config = SearchConfig {
            max_results: 5,
            ..Default::default()
        };
        let engine = CombinationSearchEngine::new(config).unwrap();
        let results = engine.search(5000, false).unwrap();
        assert_eq!(results.combinations.len(), 5);

        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        assert!(CombinationSearchEngine::new(config).is_err());
    }
}
