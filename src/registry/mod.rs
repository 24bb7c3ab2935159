//! Factor Registry (C2): assembles a [`FactorSet`] from embedded
//! reference tables. Deterministic — same build, same bytes — and
//! exposes the lookup helpers spec.md §4.1 names.
//!
//! Grounded on `DataLoader`/`ProcessingDataLoader` (the teacher's
//! `data.rs`/`processing/data.rs`): a builder with private
//! `initialize_*`/table-building methods assembling typed records from
//! Rust literals rather than files parsed at runtime.

mod cbecs;
mod egrid;
pub mod epa;
mod gwp;
mod scope3_factors;

use log::info;
use std::collections::HashMap;

use crate::constants::engine_version;
use crate::error::{CoreError, CoreResult};
use crate::factors::FactorSet;

pub struct FactorRegistry;

impl FactorRegistry {
    /// Assembles the full factor bundle. Pure: calling this twice
    /// yields byte-identical `FactorSet`s.
    pub fn build() -> FactorSet {
        let set = FactorSet {
            version: engine_version(),
            stationary: epa::stationary_factors(),
            mobile: epa::mobile_factors(),
            grid: egrid::grid_factors(),
            refrigerants: gwp::refrigerant_factors(),
            scope3: scope3_factors::scope3_factors(),
            waste: scope3_factors::waste_factors(),
            water: scope3_factors::water_factors(),
            benchmarks: cbecs::benchmarks(),
            climate: cbecs::climate_factors(),
            grid_projection: egrid::grid_projection(),
        };
        info!(
            "assembled factor set {} ({} stationary fuels, {} grid subregions, {} benchmarks)",
            set.version,
            set.stationary.len(),
            set.grid.subregions.len(),
            set.benchmarks.len()
        );
        set
    }

    /// Case-insensitive US state -> eGRID subregion lookup.
    pub fn state_to_subregion(factors: &FactorSet, state: &str) -> Option<String> {
        factors
            .grid
            .state_to_subregion
            .get(&state.to_uppercase())
            .cloned()
    }

    /// Resolves a grid factor for a US state, falling back to the
    /// national average when the state is unrecognized.
    pub fn grid_factor_for_state(factors: &FactorSet, state: &str) -> f64 {
        Self::state_to_subregion(factors, state)
            .and_then(|sub| factors.grid.subregions.get(&sub))
            .map(|f| f.kg_co2e_per_kwh)
            .unwrap_or(crate::constants::US_NATIONAL_AVERAGE_GRID_EF)
    }

    /// Resolves GWP-100 by formal or common refrigerant name.
    pub fn gwp_for(factors: &FactorSet, refrigerant: &str) -> CoreResult<f64> {
        let upper = refrigerant.to_uppercase();
        if let Some(gwp) = factors.refrigerants.gwp_by_formal_name.get(&upper) {
            return Ok(*gwp);
        }
        let lower = refrigerant.to_lowercase();
        if let Some(gwp) = factors.refrigerants.gwp_by_common_name.get(&lower) {
            return Ok(*gwp);
        }
        Err(CoreError::UnknownRefrigerant(refrigerant.to_string()))
    }
}

/// Helper used by several embedded tables to build a `HashMap` inline
/// without the boilerplate of repeated `.insert` calls — matches the
/// teacher's `initialize_regional_factors` shape (`data.rs`) but as a
/// free function since these tables have no shared mutable builder.
pub(crate) fn map_of<K: std::hash::Hash + Eq, V>(pairs: Vec<(K, V)>) -> HashMap<K, V> {
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_is_deterministic() {
        let a = FactorRegistry::build();
        let b = FactorRegistry::build();
        assert_eq!(a.version, b.version);
        assert_eq!(a.stationary.len(), b.stationary.len());
        assert_eq!(a.grid.subregions.len(), b.grid.subregions.len());
    }

    #[test]
    fn state_lookup_is_case_insensitive() {
        let factors = FactorRegistry::build();
        let upper = FactorRegistry::state_to_subregion(&factors, "NY");
        let lower = FactorRegistry::state_to_subregion(&factors, "ny");
        assert_eq!(upper, lower);
        assert!(upper.is_some());
    }

    #[test]
    fn unknown_state_falls_back_to_national_average() {
        let factors = FactorRegistry::build();
        let ef = FactorRegistry::grid_factor_for_state(&factors, "ZZ");
        assert_eq!(ef, crate::constants::US_NATIONAL_AVERAGE_GRID_EF);
    }

    #[test]
    fn gwp_resolves_by_formal_and_common_name() {
        let factors = FactorRegistry::build();
        let formal = FactorRegistry::gwp_for(&factors, "R-410A").unwrap();
        let common = FactorRegistry::gwp_for(&factors, "Puron").unwrap();
        assert_eq!(formal, common);
    }

    #[test]
    fn gwp_fails_on_unknown_refrigerant() {
        let factors = FactorRegistry::build();
        assert!(FactorRegistry::gwp_for(&factors, "R-Unobtainium").is_err());
    }
}
