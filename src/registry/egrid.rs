//! eGRID subregion grid factors and the EIA grid-decarbonization
//! projection table (`egrid-subregions-<year>.json`,
//! `grid-projection-eia.json` in spec.md §6).

use std::collections::HashMap;

use crate::factors::{GridFactors, GridSubregionFactor};

use super::map_of;

pub fn grid_factors() -> GridFactors {
    let subregions = map_of(vec![
        (
            "NYUP".to_string(),
            GridSubregionFactor {
                kg_co2e_per_kwh: 0.1842,
                grid_gross_loss_pct: Some(0.057),
            },
        ),
        (
            "NYCW".to_string(),
            GridSubregionFactor {
                kg_co2e_per_kwh: 0.2934,
                grid_gross_loss_pct: Some(0.057),
            },
        ),
        (
            "NYLI".to_string(),
            GridSubregionFactor {
                kg_co2e_per_kwh: 0.4387,
                grid_gross_loss_pct: Some(0.057),
            },
        ),
        (
            "CAMX".to_string(),
            GridSubregionFactor {
                kg_co2e_per_kwh: 0.2049,
                grid_gross_loss_pct: Some(0.045),
            },
        ),
        (
            "ERCT".to_string(),
            GridSubregionFactor {
                kg_co2e_per_kwh: 0.3866,
                grid_gross_loss_pct: Some(0.052),
            },
        ),
        (
            "RFCW".to_string(),
            GridSubregionFactor {
                kg_co2e_per_kwh: 0.4512,
                grid_gross_loss_pct: Some(0.061),
            },
        ),
        (
            "RFCE".to_string(),
            GridSubregionFactor {
                kg_co2e_per_kwh: 0.2987,
                grid_gross_loss_pct: Some(0.055),
            },
        ),
        (
            "SRMV".to_string(),
            GridSubregionFactor {
                kg_co2e_per_kwh: 0.4234,
                grid_gross_loss_pct: Some(0.058),
            },
        ),
        (
            "FRCC".to_string(),
            GridSubregionFactor {
                kg_co2e_per_kwh: 0.3912,
                grid_gross_loss_pct: Some(0.049),
            },
        ),
        (
            "NWPP".to_string(),
            GridSubregionFactor {
                kg_co2e_per_kwh: 0.2456,
                grid_gross_loss_pct: Some(0.046),
            },
        ),
    ]);

    let state_to_subregion = map_of(vec![
        ("NY".to_string(), "NYUP".to_string()),
        ("CA".to_string(), "CAMX".to_string()),
        ("TX".to_string(), "ERCT".to_string()),
        ("OH".to_string(), "RFCW".to_string()),
        ("PA".to_string(), "RFCE".to_string()),
        ("NJ".to_string(), "RFCE".to_string()),
        ("LA".to_string(), "SRMV".to_string()),
        ("MS".to_string(), "SRMV".to_string()),
        ("FL".to_string(), "FRCC".to_string()),
        ("WA".to_string(), "NWPP".to_string()),
        ("OR".to_string(), "NWPP".to_string()),
    ]);

    let international = map_of(vec![
        ("CA".to_string(), 0.130),  // Canada, hydro-heavy average
        ("MX".to_string(), 0.430),  // Mexico
        ("GB".to_string(), 0.193),  // United Kingdom
        ("DE".to_string(), 0.366),  // Germany
        ("FR".to_string(), 0.056),  // France, nuclear-heavy
        ("CN".to_string(), 0.555),  // China
        ("IN".to_string(), 0.708),  // India
        ("JP".to_string(), 0.457),  // Japan
    ]);

    GridFactors {
        subregions,
        state_to_subregion,
        international,
    }
}

/// National average grid EF (kg CO2e/kWh) by calendar year, EIA AEO
/// decarbonization reference case. Used by the scenario evaluator's
/// 10-year trajectory (C13); the engine itself only ever reads the
/// current-year resolution via [`super::FactorRegistry::grid_factor_for_state`].
pub fn grid_projection() -> HashMap<u16, f64> {
    map_of(vec![
        (2024, 0.3716),
        (2025, 0.3612),
        (2026, 0.3498),
        (2027, 0.3379),
        (2028, 0.3255),
        (2029, 0.3128),
        (2030, 0.2998),
        (2031, 0.2871),
        (2032, 0.2748),
        (2033, 0.2629),
        (2034, 0.2516),
        (2035, 0.2408),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_map_resolves_known_states() {
        let g = grid_factors();
        assert_eq!(g.state_to_subregion["NY"], "NYUP");
        assert!(g.subregions.contains_key("NYUP"));
    }

    #[test]
    fn projection_is_monotonically_declining() {
        let proj = grid_projection();
        let mut years: Vec<_> = proj.keys().copied().collect();
        years.sort();
        for pair in years.windows(2) {
            assert!(proj[&pair[0]] >= proj[&pair[1]]);
        }
    }
}
