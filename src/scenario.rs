//! Scenario Evaluator (C13): the `evaluate_scenario` public entry
//! point. Six decarbonization intervention types, each with a
//! closed-form reduction/capex/opex model, aggregated without
//! combinatoric interaction and projected across a grid-decarbonizing
//! 10-year trajectory.

use serde::{Deserialize, Serialize};

use crate::engine::compute_all;
use crate::error::CoreResult;
use crate::factors::FactorSet;
use crate::financial::{build_cash_flows, cumulative_co2_avoided, irr, npv, payback};
use crate::models::{ComputeOptions, FacilityProfile};
use crate::scope2::resolve_grid;

const DISCOUNT_RATE: f64 = 0.08;
const TRAJECTORY_YEARS: u32 = 10;
const SCOPE2_BASELINE_FRACTION: f64 = 0.45;
const GRID_PROJECTION_FALLBACK: f64 = 0.224;
const HVAC_DEFAULT_OLD_COP: f64 = 2.5;
const HVAC_DEFAULT_NEW_COP: f64 = 4.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
pub enum Intervention {
    RenewableSwitch { renewable_pct: f64, premium_usd_per_kwh: Option<f64> },
    FleetElectrification { electrification_pct: f64, ev_count: u32 },
    HvacUpgrade { old_cop: Option<f64>, new_cop: Option<f64> },
    SolarOnsite { capacity_kw: f64, annual_capacity_factor: f64 },
    BuildingEnvelope { heating_reduction_pct: f64, cooling_reduction_pct: f64 },
    WasteReduction { diversion_pct: f64 },
}

/// Unused in the closed-form deltas themselves but kept so callers can
/// pass the same literal shape the wire format documents
/// (`{type, params}`); each intervention carries its own parameters
/// inline via its enum variant instead.
pub type InterventionParams = Intervention;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionEffect {
    pub label: String,
    pub annual_reduction_tco2e: f64,
    pub capex_usd: f64,
    pub annual_opex_delta_usd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub year: u16,
    pub grid_ef: f64,
    pub grid_adjusted_baseline: f64,
    pub scenario_emissions: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub npv: f64,
    pub irr: Option<f64>,
    pub payback_years: f64,
    pub cumulative_co2_avoided_tco2e: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub baseline_tco2e: f64,
    pub effects: Vec<InterventionEffect>,
    pub total_reduction_tco2e: f64,
    pub total_capex_usd: f64,
    pub annual_savings_usd: f64,
    pub projected_emissions_tco2e: f64,
    pub trajectory: Vec<TrajectoryPoint>,
    pub cumulative_reduction_tco2e: f64,
    pub financial: FinancialSummary,
    /// Assumptions the evaluator had to make (e.g. a defaulted HVAC COP).
    pub assumptions: Vec<String>,
}

/// Evaluates a bundle of interventions against a facility's current
/// emission profile. `current_year` anchors the 10-year grid-decline
/// trajectory and the eGRID projection lookup.
pub fn evaluate_scenario(
    facility: &FacilityProfile,
    factors: &FactorSet,
    interventions: &[Intervention],
    current_year: u16,
) -> CoreResult<ScenarioResult> {
    let baseline_result = compute_all(
        facility,
        factors,
        ComputeOptions { include_scope3: true, include_estimation: true },
    )?;
    let baseline = baseline_result.total;

    let grid = resolve_grid(facility, factors);
    let mobile_scope1: f64 = baseline_result
        .scope1
        .rows
        .iter()
        .filter(|r| r.category == "mobile_combustion")
        .map(|r| r.value_tco2e)
        .sum();
    let s3_cat5: f64 = baseline_result
        .scope3
        .rows
        .iter()
        .filter(|r| r.category == "waste_generated_in_operations")
        .map(|r| r.value_tco2e)
        .sum();
    let has_scope1 = baseline_result.scope1.total > 0.0;

    let mut effects = Vec::with_capacity(interventions.len());
    let mut assumptions = Vec::new();

    for intervention in interventions {
        effects.push(evaluate_one(
            intervention,
            &baseline_result,
            mobile_scope1,
            s3_cat5,
            has_scope1,
            grid.kg_co2e_per_kwh,
            facility.square_feet,
            &mut assumptions,
        ));
    }

    let total_reduction: f64 = effects.iter().map(|e| e.annual_reduction_tco2e).sum();
    let total_capex: f64 = effects.iter().map(|e| e.capex_usd).sum();
    let annual_opex_delta: f64 = effects.iter().map(|e| e.annual_opex_delta_usd).sum();
    let annual_savings = -annual_opex_delta;
    let projected_emissions = (baseline - total_reduction).max(0.0);

    let trajectory = build_trajectory(factors, baseline, total_reduction, current_year);
    let cumulative_reduction: f64 = trajectory
        .iter()
        .map(|p| p.grid_adjusted_baseline - p.scenario_emissions)
        .sum();

    let cash_flows = build_cash_flows(total_capex, annual_savings, TRAJECTORY_YEARS);
    let financial = FinancialSummary {
        npv: npv(DISCOUNT_RATE, &cash_flows),
        irr: irr(&cash_flows),
        payback_years: payback(total_capex, annual_savings),
        cumulative_co2_avoided_tco2e: cumulative_co2_avoided(total_reduction, TRAJECTORY_YEARS, 0.0),
    };

    Ok(ScenarioResult {
        baseline_tco2e: baseline,
        effects,
        total_reduction_tco2e: total_reduction,
        total_capex_usd: total_capex,
        annual_savings_usd: annual_savings,
        projected_emissions_tco2e: projected_emissions,
        trajectory,
        cumulative_reduction_tco2e: cumulative_reduction,
        financial,
        assumptions,
    })
}

#[allow(clippy::too_many_arguments)]
fn evaluate_one(
    intervention: &Intervention,
    baseline_result: &crate::models::EmissionResult,
    mobile_scope1: f64,
    s3_cat5: f64,
    has_scope1: bool,
    grid_ef: f64,
    square_feet: f64,
    assumptions: &mut Vec<String>,
) -> InterventionEffect {
    match intervention {
        Intervention::RenewableSwitch { renewable_pct, premium_usd_per_kwh } => {
            let s2_location = baseline_result.scope2.location.total;
            let reduction = s2_location * renewable_pct;
            let estimated_kwh = if grid_ef > 0.0 { reduction * 1000.0 / grid_ef } else { 0.0 };
            let premium = premium_usd_per_kwh.unwrap_or(0.015);
            InterventionEffect {
                label: "renewable_switch".into(),
                annual_reduction_tco2e: reduction,
                capex_usd: 0.0,
                annual_opex_delta_usd: estimated_kwh * premium,
            }
        }
        Intervention::FleetElectrification { electrification_pct, ev_count } => {
            let reduction = mobile_scope1 * electrification_pct * (1.0 - 0.35);
            InterventionEffect {
                label: "fleet_electrification".into(),
                annual_reduction_tco2e: reduction,
                capex_usd: *ev_count as f64 * 12_000.0,
                annual_opex_delta_usd: -(*ev_count as f64) * 1_200.0,
            }
        }
        Intervention::HvacUpgrade { old_cop, new_cop } => {
            if old_cop.is_none() || new_cop.is_none() {
                assumptions.push(
                    "hvac_upgrade: oldCOP/newCOP not supplied, defaulted to 2.5/4.0".to_string(),
                );
            }
            let old_cop = old_cop.unwrap_or(HVAC_DEFAULT_OLD_COP);
            let new_cop = new_cop.unwrap_or(HVAC_DEFAULT_NEW_COP);
            let s1_plus_s2 = baseline_result.scope1.total + baseline_result.scope2.location.total;
            let reduction = s1_plus_s2 * 0.50 * (1.0 - old_cop / new_cop);
            let capex = square_feet * 8.0;
            InterventionEffect {
                label: "hvac_upgrade".into(),
                annual_reduction_tco2e: reduction,
                capex_usd: capex,
                annual_opex_delta_usd: -capex * 0.12,
            }
        }
        Intervention::SolarOnsite { capacity_kw, annual_capacity_factor } => {
            let annual_kwh = capacity_kw * 8760.0 * annual_capacity_factor;
            let reduction = annual_kwh * grid_ef / 1000.0;
            let capex = capacity_kw * 2_500.0;
            InterventionEffect {
                label: "solar_onsite".into(),
                annual_reduction_tco2e: reduction,
                capex_usd: capex,
                annual_opex_delta_usd: -annual_kwh * 0.12,
            }
        }
        Intervention::BuildingEnvelope { heating_reduction_pct, cooling_reduction_pct } => {
            let s1_plus_s2 = baseline_result.scope1.total + baseline_result.scope2.location.total;
            let reduction = s1_plus_s2 * (0.30 * heating_reduction_pct + 0.20 * cooling_reduction_pct);
            let capex = if has_scope1 { 50_000.0 } else { 25_000.0 };
            InterventionEffect {
                label: "building_envelope".into(),
                annual_reduction_tco2e: reduction,
                capex_usd: capex,
                annual_opex_delta_usd: -capex * 0.08,
            }
        }
        Intervention::WasteReduction { diversion_pct } => {
            let reduction = s3_cat5 * diversion_pct * 0.80;
            InterventionEffect {
                label: "waste_reduction".into(),
                annual_reduction_tco2e: reduction,
                capex_usd: 5_000.0,
                annual_opex_delta_usd: -2_000.0,
            }
        }
    }
}

fn build_trajectory(
    factors: &FactorSet,
    baseline: f64,
    total_reduction: f64,
    current_year: u16,
) -> Vec<TrajectoryPoint> {
    let current_grid_ef = projected_grid_ef(factors, current_year);
    (0..=TRAJECTORY_YEARS)
        .map(|offset| {
            let year = current_year + offset as u16;
            let grid_ef = projected_grid_ef(factors, year);
            let decline_ratio = if current_grid_ef > 0.0 { grid_ef / current_grid_ef } else { 1.0 };
            let grid_adjusted_baseline =
                baseline * (1.0 - SCOPE2_BASELINE_FRACTION + SCOPE2_BASELINE_FRACTION * decline_ratio);
            let scenario_emissions = (grid_adjusted_baseline - total_reduction).max(0.0);
            TrajectoryPoint { year, grid_ef, grid_adjusted_baseline, scenario_emissions }
        })
        .collect()
}

/// Looks up the EIA grid-projection table for `year`; falls back to
/// the latest tabulated year (2035), then to a flat long-run estimate.
fn projected_grid_ef(factors: &FactorSet, year: u16) -> f64 {
    if let Some(ef) = factors.grid_projection.get(&year) {
        return *ef;
    }
    let max_year = factors.grid_projection.keys().copied().max();
    match max_year {
        Some(y) => factors.grid_projection.get(&y).copied().unwrap_or(GRID_PROJECTION_FALLBACK),
        None => GRID_PROJECTION_FALLBACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BuildingType, DataQuality, EnergyLineItem, EnergyUnit, FuelKey, InputMode, Period, Scope3Inputs,
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
                data_quality: DataQuality::Measured,
                is_renewable: None,
                supplier_ef: None,
            },
        );
        FacilityProfile {
            name: "Scenario Office".into(),
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
    fn solar_onsite_matches_the_closed_form_worked_example() {
        let factors = FactorRegistry::build();
        let facility = minimal_office();
        let interventions = vec![Intervention::SolarOnsite {
            capacity_kw: 200.0,
            annual_capacity_factor: 0.18,
        }];
        let result = evaluate_scenario(&facility, &factors, &interventions, 2026).unwrap();
        let effect = &result.effects[0];
        assert!((effect.capex_usd - 500_000.0).abs() < 1e-6);
        let annual_kwh = 200.0 * 8760.0 * 0.18;
        assert!((annual_kwh - 315_360.0).abs() < 1e-6);
        assert!((effect.annual_opex_delta_usd - (-37_843.20)).abs() < 1e-2);
    }

    #[test]
    fn interventions_aggregate_additively_without_interaction() {
        let factors = FactorRegistry::build();
        let facility = minimal_office();
        let solar = Intervention::SolarOnsite { capacity_kw: 100.0, annual_capacity_factor: 0.18 };
        let waste = Intervention::WasteReduction { diversion_pct: 0.5 };
        let combined = evaluate_scenario(&facility, &factors, &[solar.clone(), waste.clone()], 2026).unwrap();
        let solar_only = evaluate_scenario(&facility, &factors, &[solar], 2026).unwrap();
        let waste_only = evaluate_scenario(&facility, &factors, &[waste], 2026).unwrap();
        let expected = solar_only.total_reduction_tco2e + waste_only.total_reduction_tco2e;
        assert!((combined.total_reduction_tco2e - expected).abs() < 1e-9);
    }

    #[test]
    fn missing_hvac_cop_defaults_and_records_an_assumption() {
        let factors = FactorRegistry::build();
        let facility = minimal_office();
        let interventions = vec![Intervention::HvacUpgrade { old_cop: None, new_cop: None }];
        let result = evaluate_scenario(&facility, &factors, &interventions, 2026).unwrap();
        assert!(result.assumptions.iter().any(|a| a.contains("oldCOP")));
    }

    #[test]
    fn trajectory_has_eleven_points_and_reduces_emissions_over_time() {
        let factors = FactorRegistry::build();
        let facility = minimal_office();
        let interventions = vec![Intervention::RenewableSwitch { renewable_pct: 0.5, premium_usd_per_kwh: None }];
        let result = evaluate_scenario(&facility, &factors, &interventions, 2024).unwrap();
        assert_eq!(result.trajectory.len(), 11);
        let first = &result.trajectory[0];
        let last = &result.trajectory[10];
        assert!(last.grid_ef <= first.grid_ef);
    }

    #[test]
    fn projected_emissions_never_go_negative() {
        let factors = FactorRegistry::build();
        let facility = minimal_office();
        let interventions = vec![Intervention::RenewableSwitch { renewable_pct: 1.0, premium_usd_per_kwh: None }];
        let result = evaluate_scenario(&facility, &factors, &interventions, 2026).unwrap();
        assert!(result.projected_emissions_tco2e >= 0.0);
        for point in &result.trajectory {
            assert!(point.scenario_emissions >= 0.0);
        }
    }
}
