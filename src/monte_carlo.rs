//! Monte Carlo Simulator (C11): the `run_monte_carlo` public entry
//! point. Perturbs a facility profile and factor set per run through a
//! single, fixed-order RNG stream and aggregates the engine's output
//! across runs into distributional statistics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::engine::compute_all;
use crate::error::{CoreError, CoreResult};
use crate::factors::FactorSet;
use crate::models::{BreakdownRow, ComputeOptions, FacilityProfile, FuelKey};
use crate::rng::Rng;
use crate::statistics::{self, Histogram};
use crate::uncertainty::{self, ParamType};

const MIN_RUNS: usize = 100;
const MAX_RUNS: usize = 50_000;
const MIN_BINS: usize = 10;
const MAX_BINS: usize = 200;

/// Canonical, fixed iteration order for fuel-keyed perturbations
/// (spec.md §4.10: "stationary factors in fuel-key order"). `HashMap`
/// iteration order is not stable across runs, so every RNG-consuming
/// walk over a fuel-keyed table goes through this list instead of the
/// map's own iterator.
const FUEL_ORDER: [FuelKey; 7] = [
    FuelKey::Electricity,
    FuelKey::NaturalGas,
    FuelKey::Diesel,
    FuelKey::FuelOil2,
    FuelKey::FuelOil6,
    FuelKey::Propane,
    FuelKey::Kerosene,
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub runs: usize,
    pub seed: u32,
    pub confidence_level: f64,
    pub histogram_bins: usize,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self { runs: 1000, seed: 42, confidence_level: 0.95, histogram_bins: 50 }
    }
}

impl MonteCarloConfig {
    fn validate(&self) -> CoreResult<()> {
        if self.runs < MIN_RUNS {
            return Err(CoreError::MonteCarloDegenerate { requested: self.runs, minimum: MIN_RUNS });
        }
        if self.runs > MAX_RUNS {
            return Err(CoreError::ValidationFailed(format!(
                "runs must be <= {}, got {}",
                MAX_RUNS, self.runs
            )));
        }
        if !(0.5..=0.999).contains(&self.confidence_level) {
            return Err(CoreError::ValidationFailed(format!(
                "confidence_level must be within [0.5, 0.999], got {}",
                self.confidence_level
            )));
        }
        if !(MIN_BINS..=MAX_BINS).contains(&self.histogram_bins) {
            return Err(CoreError::ValidationFailed(format!(
                "histogram_bins must be within [{}, {}], got {}",
                MIN_BINS, MAX_BINS, self.histogram_bins
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub ci95_lower: f64,
    pub ci95_upper: f64,
    pub histogram: HistogramSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramSummary {
    pub bin_edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl From<Histogram> for HistogramSummary {
    fn from(h: Histogram) -> Self {
        Self { bin_edges: h.bin_edges, counts: h.counts }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub mean: f64,
    pub ci95_lower: f64,
    pub ci95_upper: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub runs: usize,
    pub seed: u32,
    pub total: DistributionSummary,
    pub scope1: DistributionSummary,
    pub scope2_location: DistributionSummary,
    pub scope3: DistributionSummary,
    /// Keyed by `"{scope}:{category}:{subcategory}"`.
    pub per_category: HashMap<String, CategorySummary>,
    pub convergence_diagnostic: f64,
}

pub fn run_monte_carlo(
    facility: &FacilityProfile,
    factors: &FactorSet,
    config: MonteCarloConfig,
) -> CoreResult<SimulationResult> {
    config.validate()?;
    facility.validate()?;

    let mut rng = Rng::new(config.seed);
    let mut totals = Vec::with_capacity(config.runs);
    let mut s1_vals = Vec::with_capacity(config.runs);
    let mut s2l_vals = Vec::with_capacity(config.runs);
    let mut s3_vals = Vec::with_capacity(config.runs);
    let mut per_category: HashMap<String, Vec<f64>> = HashMap::new();
    let mut running_means = Vec::with_capacity(config.runs);
    let mut running_sum = 0.0;

    for i in 0..config.runs {
        let (perturbed_facility, perturbed_factors) = perturb_run_inputs(facility, factors, &mut rng);
        let result = compute_all(
            &perturbed_facility,
            &perturbed_factors,
            ComputeOptions { include_scope3: true, include_estimation: true },
        )?;

        totals.push(result.total);
        s1_vals.push(result.scope1.total);
        s2l_vals.push(result.scope2.location.total);
        s3_vals.push(result.scope3.total);
        for row in &result.breakdown {
            per_category.entry(category_key(row)).or_default().push(row.value_tco2e);
        }

        running_sum += result.total;
        running_means.push(running_sum / (i + 1) as f64);
    }

    let alpha = (1.0 - config.confidence_level) / 2.0;
    let convergence_diagnostic = statistics::convergence_diagnostic(&running_means);

    Ok(SimulationResult {
        runs: config.runs,
        seed: config.seed,
        total: summarize(&totals, config.histogram_bins, alpha),
        scope1: summarize(&s1_vals, config.histogram_bins, alpha),
        scope2_location: summarize(&s2l_vals, config.histogram_bins, alpha),
        scope3: summarize(&s3_vals, config.histogram_bins, alpha),
        per_category: per_category
            .into_iter()
            .map(|(k, v)| (k, category_summary(&v, alpha)))
            .collect(),
        convergence_diagnostic,
    })
}

fn category_key(row: &BreakdownRow) -> String {
    format!(
        "{:?}:{}:{}",
        row.scope,
        row.category,
        row.subcategory.as_deref().unwrap_or("")
    )
}

fn summarize(values: &[f64], bins: usize, alpha: f64) -> DistributionSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    DistributionSummary {
        mean: statistics::mean(values),
        median: statistics::median_sorted(&sorted),
        std_dev: statistics::stddev(values),
        min: *sorted.first().unwrap_or(&0.0),
        max: *sorted.last().unwrap_or(&0.0),
        p5: statistics::percentile_sorted(&sorted, 0.05),
        p10: statistics::percentile_sorted(&sorted, 0.10),
        p25: statistics::percentile_sorted(&sorted, 0.25),
        p75: statistics::percentile_sorted(&sorted, 0.75),
        p90: statistics::percentile_sorted(&sorted, 0.90),
        p95: statistics::percentile_sorted(&sorted, 0.95),
        ci95_lower: statistics::percentile_sorted(&sorted, alpha),
        ci95_upper: statistics::percentile_sorted(&sorted, 1.0 - alpha),
        histogram: statistics::histogram(values, bins).into(),
    }
}

fn category_summary(values: &[f64], alpha: f64) -> CategorySummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    CategorySummary {
        mean: statistics::mean(values),
        ci95_lower: statistics::percentile_sorted(&sorted, alpha),
        ci95_upper: statistics::percentile_sorted(&sorted, 1.0 - alpha),
    }
}

/// One run's perturbation pass. RNG draws happen in exactly this
/// order: energy line items (fuel-key order), refrigerants (input
/// order), fleet (input order), waste (input order), water (input
/// order), stationary emission factors (fuel-key order), grid
/// subregions (sorted by code — `HashMap` carries no insertion order
/// to replay, so a stable sort substitutes for it). Reordering this is
/// a breaking change to seed reproducibility.
fn perturb_run_inputs(
    facility: &FacilityProfile,
    factors: &FactorSet,
    rng: &mut Rng,
) -> (FacilityProfile, FactorSet) {
    let mut working_facility = facility.clone();
    let mut working_factors = factors.clone();

    for fuel in FUEL_ORDER {
        if let Some(item) = working_facility.energy.get_mut(&fuel) {
            let param = uncertainty::energy_param_for(item.data_quality);
            item.quantity = uncertainty::perturb(item.quantity, param, rng);
        }
    }

    for entry in &mut working_facility.refrigerants {
        entry.charge_kg = uncertainty::perturb(entry.charge_kg, ParamType::RefrigerantCharge, rng);
        entry.leak_rate = uncertainty::perturb(entry.leak_rate, ParamType::RefrigerantLeakRate, rng).min(1.0);
    }

    for group in &mut working_facility.fleet {
        group.annual_miles_per_vehicle =
            uncertainty::perturb(group.annual_miles_per_vehicle, ParamType::FleetMileage, rng);
        if let Some(mpg) = group.fuel_efficiency {
            group.fuel_efficiency = Some(uncertainty::perturb(mpg, ParamType::FleetFuelEconomy, rng));
        }
    }

    for stream in &mut working_facility.waste {
        stream.annual_tonnes = uncertainty::perturb(stream.annual_tonnes, ParamType::WasteQuantity, rng);
    }

    for use_ in &mut working_facility.water {
        use_.annual_gallons = uncertainty::perturb(use_.annual_gallons, ParamType::WaterQuantity, rng);
    }

    for fuel in FUEL_ORDER {
        if let Some(factor) = working_factors.stationary.get_mut(&fuel) {
            factor.co2_kg_per_unit = uncertainty::perturb(factor.co2_kg_per_unit, ParamType::StationaryEf, rng);
            factor.ch4_g_per_unit = uncertainty::perturb(factor.ch4_g_per_unit, ParamType::StationaryEf, rng);
            factor.n2o_g_per_unit = uncertainty::perturb(factor.n2o_g_per_unit, ParamType::StationaryEf, rng);
        }
    }

    let mut subregion_codes: Vec<String> = working_factors.grid.subregions.keys().cloned().collect();
    subregion_codes.sort();
    for code in subregion_codes {
        if let Some(sub) = working_factors.grid.subregions.get_mut(&code) {
            sub.kg_co2e_per_kwh = uncertainty::perturb(sub.kg_co2e_per_kwh, ParamType::GridEf, rng);
        }
    }

    (working_facility, working_factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BuildingType, DataQuality, EnergyLineItem, EnergyUnit, InputMode, Period, Scope3Inputs,
    };
    use crate::registry::FactorRegistry;
    use std::collections::HashMap as StdHashMap;

    fn minimal_office() -> FacilityProfile {
        let mut energy = StdHashMap::new();
        energy.insert(
            FuelKey::Electricity,
            EnergyLineItem {
                quantity: 500_000.0,
                unit: EnergyUnit::Kwh,
                period: Period::Annual,
                data_quality: DataQuality::Measured,
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
                data_quality: DataQuality::Measured,
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
    fn identical_seed_and_inputs_yield_bit_identical_summaries() {
        let factors = FactorRegistry::build();
        let facility = minimal_office();
        let config = MonteCarloConfig { runs: 150, ..MonteCarloConfig::default() };
        let a = run_monte_carlo(&facility, &factors, config).unwrap();
        let b = run_monte_carlo(&facility, &factors, config).unwrap();
        assert_eq!(a.total.mean, b.total.mean);
        assert_eq!(a.total.histogram.counts, b.total.histogram.counts);
    }

    #[test]
    fn percentiles_are_monotonic() {
        let factors = FactorRegistry::build();
        let facility = minimal_office();
        let config = MonteCarloConfig { runs: 200, ..MonteCarloConfig::default() };
        let result = run_monte_carlo(&facility, &factors, config).unwrap();
        let t = &result.total;
        assert!(t.p5 <= t.p10);
        assert!(t.p10 <= t.p25);
        assert!(t.p25 <= t.median);
        assert!(t.median <= t.p75);
        assert!(t.p75 <= t.p90);
        assert!(t.p90 <= t.p95);
        assert!(t.ci95_lower <= t.mean);
        assert!(t.mean <= t.ci95_upper);
    }

    #[test]
    fn below_minimum_runs_is_rejected() {
        let factors = FactorRegistry::build();
        let facility = minimal_office();
        let config = MonteCarloConfig { runs: 10, ..MonteCarloConfig::default() };
        assert!(matches!(
            run_monte_carlo(&facility, &factors, config),
            Err(CoreError::MonteCarloDegenerate { .. })
        ));
    }

    #[test]
    fn gwp_is_never_among_the_perturbed_parameters() {
        // Fugitive refrigerant rows scale linearly with GWP; since
        // GWPs are fixed (ParamType::Gwp is never invoked from
        // perturb_run_inputs), perturbing charge alone still produces
        // a deterministic GWP multiplier across runs.
        let factors = FactorRegistry::build();
        let mut facility = minimal_office();
        facility.refrigerants.push(crate::models::RefrigerantEntry {
            refrigerant_type: "R-410A".into(),
            charge_kg: 100.0,
            leak_rate: 0.10,
            equipment_type: None,
            data_quality: DataQuality::Measured,
        });
        let config = MonteCarloConfig { runs: 120, ..MonteCarloConfig::default() };
        let result = run_monte_carlo(&facility, &factors, config).unwrap();
        assert!(result.total.mean > 0.0);
    }
}
