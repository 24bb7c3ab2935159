//! Exact unit conversions, AR6 GWPs for gases that are fixed by GHG
//! Protocol convention (never perturbed in Monte Carlo), and the
//! engine/factor version string.

/// Global-warming potential (100-year, IPCC AR6) for fossil methane.
pub const GWP_CH4_FOSSIL: f64 = 29.8;

/// Global-warming potential (100-year, IPCC AR6) for nitrous oxide.
pub const GWP_N2O: f64 = 273.0;

/// kBtu per MMBtu.
pub const KBTU_PER_MMBTU: f64 = 1000.0;

/// MMBtu per kWh (1 kWh = 3.412 kBtu).
pub const MMBTU_PER_KWH: f64 = 0.003412;

/// Therms per MMBtu (1 therm = 0.1 MMBtu, so 1 MMBtu = 10 therms).
pub const THERMS_PER_MMBTU: f64 = 10.0;

/// MMBtu per therm, the inverse of [`THERMS_PER_MMBTU`].
pub const MMBTU_PER_THERM: f64 = 0.1;

/// Short tons per metric tonne.
pub const SHORT_TONS_PER_TONNE: f64 = 1.0 / 0.9072;

/// Empirical hybrid-vehicle CO2 reduction versus an equivalent gasoline
/// vehicle. Flagged in spec.md §9 as a placeholder pending a per-fuel
/// hybrid-adjustment factor in the registry.
pub const HYBRID_CO2_SCALAR: f64 = 0.70;

/// Default mobile-combustion fall-back fuel economy (mpg) when neither
/// a user override nor a default-table entry is available.
pub const DEFAULT_MPG_FALLBACK: f64 = 25.0;

/// Default fugitive-refrigerant leak rate when neither a user value
/// nor an equipment-type default is available.
pub const DEFAULT_LEAK_RATE_FALLBACK: f64 = 0.05;

/// US national average grid factor (kg CO2e/kWh), the last-resort
/// fall-back when a subregion cannot be resolved.
pub const US_NATIONAL_AVERAGE_GRID_EF: f64 = 0.3716;

/// Default transmission & distribution loss percentage applied when a
/// subregion carries no loss figure of its own.
pub const DEFAULT_GRID_LOSS_PCT: f64 = 0.05;

/// Fall-back Scope 3 spend-based factor (kg CO2e/USD) for unknown sectors.
pub const FALLBACK_SPEND_EF: f64 = 0.30;

/// Fall-back product-transport factor (kg CO2e/ton-mile).
pub const FALLBACK_TRANSPORT_EF: f64 = 0.1616;

/// Fall-back business-travel factor (kg CO2e/passenger-mile).
pub const FALLBACK_TRAVEL_EF: f64 = 0.137;

/// Fall-back waste factor (tCO2e/short ton) when neither the specific
/// (waste type, disposal method) pair nor the mixed-MSW-landfill
/// fall-back resolves.
pub const FALLBACK_WASTE_EF: f64 = 0.52;

/// Confidence level reported alongside the analytical uncertainty bands.
pub const ANALYTICAL_CONFIDENCE_LEVEL: f64 = 0.95;

/// Percentile classification thresholds.
pub const PERCENTILE_LOW_MAX: f64 = 25.0;
pub const PERCENTILE_AVERAGE_MAX: f64 = 50.0;
pub const PERCENTILE_HIGH_MAX: f64 = 75.0;

/// Floating-point tolerance used when checking that scope totals sum
/// to the reported grand total.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// Engine version string, of the form `epa-<yr>_egrid-<yr>_defra-<yr>_ar6`,
/// surfaced on every result for provenance. Assembled once by the
/// registry from the vintages of the embedded reference tables.
pub fn engine_version() -> String {
    format!(
        "epa-{}_egrid-{}_defra-{}_ar6",
        EPA_FACTOR_YEAR, EGRID_YEAR, DEFRA_YEAR
    )
}

pub const EPA_FACTOR_YEAR: u16 = 2024;
pub const EGRID_YEAR: u16 = 2022;
pub const DEFRA_YEAR: u16 = 2024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_has_expected_shape() {
        assert_eq!(engine_version(), "epa-2024_egrid-2022_defra-2024_ar6");
    }

    #[test]
    fn short_ton_conversion_matches_invariant_9() {
        // spec.md §8 invariant 9: tonnes -> short tons uses 1/0.9072.
        let tonnes = 1.0_f64;
        let short_tons = tonnes * SHORT_TONS_PER_TONNE;
        assert!((short_tons - 1.1023).abs() < 1e-3);
    }
}
