//! Emissions Engine orchestration (C7): the `compute_all` public entry
//! point. Wires the estimator and three scope calculators together and
//! derives intensity, benchmark percentile, analytical uncertainty,
//! data-quality score, and the methodology record.

use chrono::Utc;
use std::collections::BTreeSet;

use crate::constants::ANALYTICAL_CONFIDENCE_LEVEL;
use crate::error::CoreResult;
use crate::estimator::apply_estimator_if_needed;
use crate::factors::{FactorSet, Quartiles};
use crate::models::{
    AnalyticalUncertainty, BenchmarkClassification, BenchmarkComparison, BreakdownRow,
    ComputeOptions, DataGap, DataQuality, EmissionResult, FacilityProfile, Intensity,
    MethodologyRecord, Scope2Result, ScopeTotal, UncertaintyBand,
};
use crate::{scope1, scope2, scope3};

/// Computes a full GHG-Protocol-aligned emission result for a facility.
/// Pure: equal inputs yield equal (aside from the methodology
/// timestamp) outputs.
pub fn compute_all(
    facility: &FacilityProfile,
    factors: &FactorSet,
    options: ComputeOptions,
) -> CoreResult<EmissionResult> {
    facility.validate()?;

    let (working, estimator_gaps) =
        apply_estimator_if_needed(facility, factors, options.include_estimation);
    let estimator_triggered = estimator_gaps.iter().any(|g| g.code == "benchmark_estimation_applied");

    let (s1, s1_gaps) = scope1::compute(&working, factors);
    let (s2_location, s2_gaps) = scope2::compute_location(&working, factors);
    let s2_market = scope2::compute_market(&working, factors);
    let (s3, s3_gaps) = if options.include_scope3 {
        scope3::compute(&working, factors)
    } else {
        (ScopeTotal::empty(), Vec::new())
    };

    let total = s1.total + s2_location.total + s3.total;
    let total_market = s1.total + s2_market.total + s3.total;

    let mut breakdown = Vec::with_capacity(
        s1.rows.len() + s2_location.rows.len() + s2_market.rows.len() + s3.rows.len(),
    );
    breakdown.extend(s1.rows.clone());
    breakdown.extend(s2_location.rows.clone());
    breakdown.extend(s2_market.rows.clone());
    breakdown.extend(s3.rows.clone());

    let location_based_rows: Vec<&BreakdownRow> = s1
        .rows
        .iter()
        .chain(s2_location.rows.iter())
        .chain(s3.rows.iter())
        .collect();

    let intensity = Intensity {
        per_sqft: total / working.square_feet,
        per_employee: working
            .occupancy
            .as_ref()
            .and_then(|o| o.employees)
            .filter(|e| *e > 0)
            .map(|e| total / e as f64),
    };

    let kg_co2e_per_sqft = total * 1000.0 / working.square_feet;
    let quartiles = factors
        .benchmarks
        .get(&working.building_type)
        .map(|b| b.kg_co2e_per_sqft)
        .unwrap_or(Quartiles { p25: 0.0, median: 0.0, p75: 0.0 });
    let percentile = percentile_from_quartiles(kg_co2e_per_sqft, &quartiles);
    let benchmark = BenchmarkComparison {
        kg_co2e_per_sqft,
        percentile,
        classification: classify_percentile(percentile),
    };

    let uncertainty = analytical_uncertainty(&s1, &s2_location, &s3, total, &location_based_rows);

    let data_quality_score = weighted_data_quality_score(&location_based_rows);

    let mut gaps = Vec::new();
    gaps.extend(estimator_gaps);
    gaps.extend(s1_gaps);
    gaps.extend(s2_gaps);
    gaps.extend(s3_gaps);

    let mut sources: BTreeSet<String> = BTreeSet::new();
    for row in &breakdown {
        sources.insert(row.source.clone());
    }

    let mut assumptions = Vec::new();
    if estimator_triggered {
        assumptions.push(
            "missing energy inputs imputed from CBECS building-type benchmarks and ASHRAE climate-zone degree days"
                .to_string(),
        );
    }

    let methodology = MethodologyRecord {
        engine_version: factors.version.clone(),
        timestamp: Utc::now(),
        sources: sources.into_iter().collect(),
        assumptions,
        data_gaps: gaps,
    };

    Ok(EmissionResult {
        facility_name: working.name.clone(),
        total,
        total_market,
        scope1: s1,
        scope2: Scope2Result { location: s2_location, market: s2_market },
        scope3: s3,
        breakdown,
        intensity,
        benchmark,
        uncertainty,
        data_quality_score,
        methodology,
    })
}

/// Piecewise-linear interpolation through the quartile breakpoints
/// `(0, p25, median, p75, p75+delta)` mapped to percentiles
/// `(0, 25, 50, 75, 100)`, where `delta = p75 - median` extends the
/// 50-75 slope one more segment. Saturates at 100.
fn percentile_from_quartiles(value: f64, q: &Quartiles) -> f64 {
    let delta = q.p75 - q.median;
    let top = q.p75 + delta;
    let points = [(0.0, 0.0), (q.p25, 25.0), (q.median, 50.0), (q.p75, 75.0), (top, 100.0)];

    if value <= 0.0 {
        return 0.0;
    }
    if value >= top {
        return 100.0;
    }
    for window in points.windows(2) {
        let (v0, p0) = window[0];
        let (v1, p1) = window[1];
        if value >= v0 && value <= v1 {
            if (v1 - v0).abs() < 1e-12 {
                return p1;
            }
            let frac = (value - v0) / (v1 - v0);
            return p0 + frac * (p1 - p0);
        }
    }
    100.0
}

fn classify_percentile(percentile: f64) -> BenchmarkClassification {
    if percentile <= crate::constants::PERCENTILE_LOW_MAX {
        BenchmarkClassification::Low
    } else if percentile <= crate::constants::PERCENTILE_AVERAGE_MAX {
        BenchmarkClassification::Average
    } else if percentile <= crate::constants::PERCENTILE_HIGH_MAX {
        BenchmarkClassification::High
    } else {
        BenchmarkClassification::VeryHigh
    }
}

fn relative_uncertainty_for_quality(quality: DataQuality) -> f64 {
    match quality {
        DataQuality::Measured => 0.05,
        DataQuality::Modeled => 0.10,
        DataQuality::Estimated => 0.15,
    }
}

fn value_weighted_band(rows: &[&BreakdownRow], total: f64) -> UncertaintyBand {
    let weight_total: f64 = rows.iter().map(|r| r.value_tco2e.abs()).sum();
    if weight_total <= 0.0 {
        return UncertaintyBand { relative_uncertainty: 0.0, lower: total, upper: total };
    }
    let weighted: f64 = rows
        .iter()
        .map(|r| r.value_tco2e.abs() * relative_uncertainty_for_quality(r.data_quality))
        .sum();
    let u = weighted / weight_total;
    UncertaintyBand { relative_uncertainty: u, lower: total * (1.0 - u), upper: total * (1.0 + u) }
}

fn analytical_uncertainty(
    s1: &ScopeTotal,
    s2_location: &ScopeTotal,
    s3: &ScopeTotal,
    total: f64,
    location_based_rows: &[&BreakdownRow],
) -> AnalyticalUncertainty {
    let s1_refs: Vec<&BreakdownRow> = s1.rows.iter().collect();
    let s2_refs: Vec<&BreakdownRow> = s2_location.rows.iter().collect();
    let s3_refs: Vec<&BreakdownRow> = s3.rows.iter().collect();

    let weight_total: f64 = location_based_rows.iter().map(|r| r.value_tco2e.abs()).sum();
    let measured_weight: f64 = location_based_rows
        .iter()
        .filter(|r| r.data_quality == DataQuality::Measured)
        .map(|r| r.value_tco2e.abs())
        .sum();
    let modeled_weight: f64 = location_based_rows
        .iter()
        .filter(|r| r.data_quality == DataQuality::Modeled)
        .map(|r| r.value_tco2e.abs())
        .sum();

    let overall_data_quality = if weight_total <= 0.0 {
        DataQuality::Measured
    } else if measured_weight / weight_total > 0.7 {
        DataQuality::Measured
    } else if modeled_weight / weight_total > 0.3 {
        DataQuality::Modeled
    } else {
        DataQuality::Estimated
    };

    AnalyticalUncertainty {
        scope1: value_weighted_band(&s1_refs, s1.total),
        scope2_location: value_weighted_band(&s2_refs, s2_location.total),
        scope3: value_weighted_band(&s3_refs, s3.total),
        total: value_weighted_band(location_based_rows, total),
        overall_data_quality,
        confidence_level: ANALYTICAL_CONFIDENCE_LEVEL,
    }
}

fn weighted_data_quality_score(rows: &[&BreakdownRow]) -> f64 {
    let weight_total: f64 = rows.iter().map(|r| r.value_tco2e.abs()).sum();
    if weight_total <= 0.0 {
        return 100.0;
    }
    let weighted: f64 = rows
        .iter()
        .map(|r| {
            let score = match r.data_quality {
                DataQuality::Measured => 100.0,
                DataQuality::Modeled => 70.0,
                DataQuality::Estimated => 40.0,
            };
            r.value_tco2e.abs() * score
        })
        .sum();
    weighted / weight_total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BuildingType, DataQuality as DQ, EnergyLineItem, EnergyUnit, FuelKey, InputMode, Period,
        Scope3Inputs,
    };
    use crate::registry::FactorRegistry;
    use std::collections::HashMap;

    fn minimal_office() -> FacilityProfile {
        let mut energy = HashMap::new();
        energy.insert(
            FuelKey::Electricity,
            EnergyLineItem {
                quantity: 500_000.0,
                unit: EnergyUnit::Kwh,
                period: Period::Annual,
                data_quality: DQ::Measured,
                is_renewable: None,
                supplier_ef: None,
            },
        );
        energy.insert(
            FuelKey::NaturalGas,
            EnergyLineItem {
                quantity: 20_000.0,
                unit: EnergyUnit::Therms,
                period: Period::Annual,
                data_quality: DQ::Measured,
                is_renewable: None,
                supplier_ef: None,
            },
        );
        FacilityProfile {
            name: "Minimal Office".into(),
            building_type: BuildingType::Office,
            square_feet: 50_000.0,
            year_built: None,
            country: "US".into(),
            state: Some("NY".into()),
            zip: None,
            city: None,
            climate_zone: None,
            egrid_subregion: None,
            lat: None,
            lon: None,
            input_mode: InputMode::Advanced,
            energy,
            refrigerants: Vec::new(),
            fleet: Vec::new(),
            waste: Vec::new(),
            water: Vec::new(),
            scope3: Scope3Inputs::enabled(),
            occupancy: None,
        }
    }

    #[test]
    fn scope_totals_sum_to_grand_total_within_tolerance() {
        let factors = FactorRegistry::build();
        let facility = minimal_office();
        let result = compute_all(&facility, &factors, ComputeOptions::default()).unwrap();
        let sum = result.scope1.total + result.scope2.location.total + result.scope3.total;
        assert!((sum - result.total).abs() < 1e-9);
    }

    #[test]
    fn compute_all_is_deterministic_given_equal_inputs() {
        let factors = FactorRegistry::build();
        let facility = minimal_office();
        let a = compute_all(&facility, &factors, ComputeOptions::default()).unwrap();
        let b = compute_all(&facility, &factors, ComputeOptions::default()).unwrap();
        assert_eq!(a.total, b.total);
        assert_eq!(a.breakdown.len(), b.breakdown.len());
    }

    #[test]
    fn percentile_is_within_bounds_and_classification_matches() {
        let factors = FactorRegistry::build();
        let facility = minimal_office();
        let result = compute_all(&facility, &factors, ComputeOptions::default()).unwrap();
        assert!(result.benchmark.percentile >= 0.0 && result.benchmark.percentile <= 100.0);
        let expected_class = classify_percentile(result.benchmark.percentile);
        assert_eq!(result.benchmark.classification, expected_class);
    }

    #[test]
    fn invalid_facility_is_rejected_before_computation() {
        let factors = FactorRegistry::build();
        let mut facility = minimal_office();
        facility.square_feet = 0.0;
        assert!(compute_all(&facility, &factors, ComputeOptions::default()).is_err());
    }

    #[test]
    fn renewable_electricity_zeroes_market_based_scope2_row() {
        let factors = FactorRegistry::build();
        let mut facility = minimal_office();
        facility.energy.get_mut(&FuelKey::Electricity).unwrap().is_renewable = Some(true);
        let result = compute_all(&facility, &factors, ComputeOptions::default()).unwrap();
        assert_eq!(result.scope2.market.total, 0.0);
        assert_eq!(result.scope2.market.rows.len(), 1);
    }

    #[test]
    fn percentile_from_quartiles_is_monotonic_and_saturates() {
        let q = Quartiles { p25: 4.5, median: 7.8, p75: 12.1 };
        assert_eq!(percentile_from_quartiles(0.0, &q), 0.0);
        assert_eq!(percentile_from_quartiles(4.5, &q), 25.0);
        assert_eq!(percentile_from_quartiles(7.8, &q), 50.0);
        assert_eq!(percentile_from_quartiles(12.1, &q), 75.0);
        assert_eq!(percentile_from_quartiles(1000.0, &q), 100.0);
    }
}
