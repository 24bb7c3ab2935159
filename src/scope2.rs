//! Scope 2 (C5): location-based and market-based electricity
//! accounting, always computed side by side per the GHG Protocol dual
//! reporting requirement. Grid-factor resolution is shared between the
//! two methods (and reused by Scope 3 category 3's T&D portion).

use crate::constants::{DEFAULT_GRID_LOSS_PCT, US_NATIONAL_AVERAGE_GRID_EF};
use crate::factors::FactorSet;
use crate::models::{BreakdownRow, DataGap, FacilityProfile, FuelKey, ScopeTag, ScopeTotal};
use crate::registry::FactorRegistry;

/// A resolved grid factor plus enough provenance to label a row's
/// methodology/source, reused by Scope 3 category 3's T&D portion.
pub struct GridResolution {
    pub kg_co2e_per_kwh: f64,
    pub loss_pct: f64,
    pub source: &'static str,
}

/// Grid-factor resolution order (spec.md §4.4): explicit eGRID
/// subregion, then US state, then country, then national average.
pub fn resolve_grid(facility: &FacilityProfile, factors: &FactorSet) -> GridResolution {
    if let Some(sub) = facility.egrid_subregion.as_ref() {
        let key = sub.to_uppercase();
        if let Some(f) = factors.grid.subregions.get(&key) {
            return GridResolution {
                kg_co2e_per_kwh: f.kg_co2e_per_kwh,
                loss_pct: f.grid_gross_loss_pct.unwrap_or(DEFAULT_GRID_LOSS_PCT),
                source: "egrid_subregion_explicit",
            };
        }
    }
    if let Some(state) = facility.state.as_ref() {
        if let Some(sub) = FactorRegistry::state_to_subregion(factors, state) {
            if let Some(f) = factors.grid.subregions.get(&sub) {
                return GridResolution {
                    kg_co2e_per_kwh: f.kg_co2e_per_kwh,
                    loss_pct: f.grid_gross_loss_pct.unwrap_or(DEFAULT_GRID_LOSS_PCT),
                    source: "egrid_state_lookup",
                };
            }
        }
    }
    if let Some(ef) = factors.grid.international.get(&facility.country.to_uppercase()) {
        return GridResolution {
            kg_co2e_per_kwh: *ef,
            loss_pct: DEFAULT_GRID_LOSS_PCT,
            source: "international_grid_average",
        };
    }
    GridResolution {
        kg_co2e_per_kwh: US_NATIONAL_AVERAGE_GRID_EF,
        loss_pct: DEFAULT_GRID_LOSS_PCT,
        source: "us_national_average_fallback",
    }
}

pub fn compute_location(facility: &FacilityProfile, factors: &FactorSet) -> (ScopeTotal, Vec<DataGap>) {
    let mut gaps = Vec::new();
    let Some(electricity) = facility.energy.get(&FuelKey::Electricity) else {
        gaps.push(DataGap::new(
            "no_electricity_data",
            "no electricity line item supplied; Scope 2 assumed zero",
        ));
        return (ScopeTotal::empty(), gaps);
    };
    let kwh = electricity.annual_quantity();
    if kwh <= 0.0 {
        gaps.push(DataGap::new(
            "no_electricity_data",
            "electricity quantity is zero; Scope 2 assumed zero",
        ));
        return (ScopeTotal::empty(), gaps);
    }

    let grid = resolve_grid(facility, factors);
    let value = kwh * grid.kg_co2e_per_kwh * (1.0 + grid.loss_pct) / 1000.0;

    let row = BreakdownRow {
        scope: ScopeTag::Scope2Location,
        category: "grid_electricity_location".into(),
        subcategory: None,
        value_tco2e: value,
        data_quality: electricity.data_quality,
        methodology: format!(
            "{:.0} kWh x {:.4} kg/kWh x (1+{:.1}% T&D), resolved via {}",
            kwh,
            grid.kg_co2e_per_kwh,
            grid.loss_pct * 100.0,
            grid.source
        ),
        source: "egrid-subregions".into(),
    };

    (ScopeTotal::from_rows(vec![row]), gaps)
}

pub fn compute_market(facility: &FacilityProfile, factors: &FactorSet) -> ScopeTotal {
    let Some(electricity) = facility.energy.get(&FuelKey::Electricity) else {
        return ScopeTotal::empty();
    };
    let kwh = electricity.annual_quantity();
    if kwh <= 0.0 {
        return ScopeTotal::empty();
    }

    let row = if let Some(supplier_ef) = electricity.supplier_ef {
        BreakdownRow {
            scope: ScopeTag::Scope2Market,
            category: "grid_electricity_market".into(),
            subcategory: Some("supplier_specific".into()),
            value_tco2e: kwh * supplier_ef / 1000.0,
            data_quality: electricity.data_quality,
            methodology: format!("{:.0} kWh x supplier-specific EF {:.4} kg/kWh", kwh, supplier_ef),
            source: "supplier_disclosure".into(),
        }
    } else if electricity.is_renewable == Some(true) {
        BreakdownRow {
            scope: ScopeTag::Scope2Market,
            category: "grid_electricity_market".into(),
            subcategory: Some("renewable_rec".into()),
            value_tco2e: 0.0,
            data_quality: electricity.data_quality,
            methodology: "100% covered by renewable energy certificates / PPA, zero-rated".into(),
            source: "rec_ppa_accounting".into(),
        }
    } else {
        let grid = resolve_grid(facility, factors);
        let value = kwh * grid.kg_co2e_per_kwh * (1.0 + grid.loss_pct) / 1000.0;
        BreakdownRow {
            scope: ScopeTag::Scope2Market,
            category: "grid_electricity_market".into(),
            subcategory: Some("residual_mix".into()),
            value_tco2e: value,
            data_quality: electricity.data_quality,
            methodology: format!(
                "{:.0} kWh x residual-mix proxy {:.4} kg/kWh x (1+{:.1}% T&D), resolved via {}",
                kwh,
                grid.kg_co2e_per_kwh,
                grid.loss_pct * 100.0,
                grid.source
            ),
            source: "egrid-subregions".into(),
        }
    };

    ScopeTotal::from_rows(vec![row])
}
