//! Scope 1 (C4): stationary combustion, mobile combustion, fugitive
//! refrigerants. Grounded on the teacher's per-category calculator
//! functions in `production/lci.rs` — one function per emission
//! source, each returning rows rather than mutating shared state.

use crate::constants::{
    DEFAULT_LEAK_RATE_FALLBACK, DEFAULT_MPG_FALLBACK, GWP_CH4_FOSSIL, GWP_N2O, HYBRID_CO2_SCALAR,
};
use crate::factors::{mobile_key, FactorSet};
use crate::models::{BreakdownRow, DataGap, FacilityProfile, FleetFuelType, FuelKey, ScopeTag, ScopeTotal};
use crate::registry::FactorRegistry;

pub fn compute(facility: &FacilityProfile, factors: &FactorSet) -> (ScopeTotal, Vec<DataGap>) {
    let mut rows = Vec::new();
    let mut gaps = Vec::new();

    rows.extend(stationary_combustion(facility, factors));
    rows.extend(mobile_combustion(facility, factors));
    rows.extend(fugitive_refrigerants(facility, factors, &mut gaps));

    if facility.refrigerants.is_empty() {
        gaps.push(DataGap::new(
            "no_refrigerant_data",
            "no refrigerant charge data supplied; fugitive emissions assumed zero",
        ));
    }
    if facility.fleet.is_empty() {
        gaps.push(DataGap::new(
            "no_fleet_data",
            "no fleet data supplied; mobile combustion assumed zero",
        ));
    }

    (ScopeTotal::from_rows(rows), gaps)
}

fn stationary_combustion(facility: &FacilityProfile, factors: &FactorSet) -> Vec<BreakdownRow> {
    let mut rows = Vec::new();
    for (fuel, item) in &facility.energy {
        if *fuel == FuelKey::Electricity {
            continue;
        }
        let qty = item.annual_quantity();
        if qty <= 0.0 {
            continue;
        }
        let Some(factor) = factors.stationary.get(fuel) else {
            continue;
        };

        let effective_qty = match factor.heat_content_mmbtu_per_native {
            Some(heat_content) => qty * heat_content,
            None => qty,
        };

        let co2_t = effective_qty * factor.co2_kg_per_unit / 1000.0;
        let ch4_t = effective_qty * factor.ch4_g_per_unit * GWP_CH4_FOSSIL / 1e6;
        let n2o_t = effective_qty * factor.n2o_g_per_unit * GWP_N2O / 1e6;

        rows.push(BreakdownRow {
            scope: ScopeTag::Scope1,
            category: "stationary_combustion".into(),
            subcategory: Some(fuel.label().into()),
            value_tco2e: co2_t + ch4_t + n2o_t,
            data_quality: item.data_quality,
            methodology: format!(
                "{} combusted on-site: CO2 {:.3} t, CH4 {:.4} t CO2e, N2O {:.4} t CO2e",
                fuel.label(),
                co2_t,
                ch4_t,
                n2o_t
            ),
            source: "epa-emission-factors".into(),
        });
    }
    rows
}

fn mobile_combustion(facility: &FacilityProfile, factors: &FactorSet) -> Vec<BreakdownRow> {
    let mut rows = Vec::new();
    for group in &facility.fleet {
        if group.fuel_type == FleetFuelType::Ev {
            continue;
        }
        let total_miles = group.count as f64 * group.annual_miles_per_vehicle;
        if total_miles <= 0.0 {
            continue;
        }

        let lookup_fuel = match group.fuel_type {
            FleetFuelType::Hybrid => FleetFuelType::Gasoline,
            other => other,
        };
        let key = mobile_key(&group.vehicle_type, lookup_fuel);

        let mpg = group
            .fuel_efficiency
            .filter(|v| *v > 0.0)
            .or_else(|| factors.mobile.default_mpg.get(&key).copied())
            .unwrap_or(DEFAULT_MPG_FALLBACK);
        let gallons = total_miles / mpg;

        let co2_per_gallon = factors
            .mobile
            .co2_kg_per_gallon
            .get(&lookup_fuel)
            .copied()
            .unwrap_or(0.0);
        let mut co2_t = gallons * co2_per_gallon / 1000.0;
        if group.fuel_type == FleetFuelType::Hybrid {
            co2_t *= HYBRID_CO2_SCALAR;
        }

        let ch4_g_per_mile = factors.mobile.ch4_g_per_mile.get(&key).copied().unwrap_or(0.0);
        let n2o_g_per_mile = factors.mobile.n2o_g_per_mile.get(&key).copied().unwrap_or(0.0);
        let ch4_t = total_miles * ch4_g_per_mile * GWP_CH4_FOSSIL / 1e6;
        let n2o_t = total_miles * n2o_g_per_mile * GWP_N2O / 1e6;

        rows.push(BreakdownRow {
            scope: ScopeTag::Scope1,
            category: "mobile_combustion".into(),
            subcategory: Some(key),
            value_tco2e: co2_t + ch4_t + n2o_t,
            data_quality: group.data_quality,
            methodology: format!(
                "{:.0} vehicle-miles at {:.1} mpg: CO2 {:.3} t, CH4 {:.4} t CO2e, N2O {:.4} t CO2e",
                total_miles, mpg, co2_t, ch4_t, n2o_t
            ),
            source: "epa-emission-factors".into(),
        });
    }
    rows
}

fn fugitive_refrigerants(
    facility: &FacilityProfile,
    factors: &FactorSet,
    gaps: &mut Vec<DataGap>,
) -> Vec<BreakdownRow> {
    let mut rows = Vec::new();
    for entry in &facility.refrigerants {
        if entry.charge_kg <= 0.0 {
            continue;
        }
        let gwp = match FactorRegistry::gwp_for(factors, &entry.refrigerant_type) {
            Ok(g) => g,
            Err(_) => {
                gaps.push(DataGap::new(
                    "unknown_refrigerant",
                    format!(
                        "refrigerant '{}' not found in GWP table; entry skipped",
                        entry.refrigerant_type
                    ),
                ));
                continue;
            }
        };

        let leak_rate = if entry.leak_rate > 0.0 {
            entry.leak_rate
        } else {
            entry
                .equipment_type
                .as_ref()
                .and_then(|eq| factors.refrigerants.default_leak_rates_by_equipment.get(eq).copied())
                .unwrap_or(DEFAULT_LEAK_RATE_FALLBACK)
        };

        let value = entry.charge_kg * leak_rate * gwp / 1000.0;

        rows.push(BreakdownRow {
            scope: ScopeTag::Scope1,
            category: "fugitive_refrigerants".into(),
            subcategory: Some(entry.refrigerant_type.clone()),
            value_tco2e: value,
            data_quality: entry.data_quality,
            methodology: format!(
                "{:.1} kg charge, {:.1}% annual leak rate, GWP-100 {:.0}",
                entry.charge_kg,
                leak_rate * 100.0,
                gwp
            ),
            source: "ipcc-ar6-gwp100".into(),
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BuildingType, DataQuality, EnergyLineItem, EnergyUnit, FleetGroup, InputMode, Period,
        RefrigerantEntry, Scope3Inputs, VehicleType,
    };
    use crate::registry::FactorRegistry;
    use std::collections::HashMap;

    fn base_facility() -> FacilityProfile {
        FacilityProfile {
            name: "T".into(),
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
            energy: HashMap::new(),
            refrigerants: Vec::new(),
            fleet: Vec::new(),
            waste: Vec::new(),
            water: Vec::new(),
            scope3: Scope3Inputs::enabled(),
            occupancy: None,
        }
    }

    #[test]
    fn natural_gas_stationary_combustion_matches_closed_form() {
        let factors = FactorRegistry::build();
        let mut facility = base_facility();
        facility.energy.insert(
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
        let (total, _) = compute(&facility, &factors);
        let ng = &factors.stationary[&FuelKey::NaturalGas];
        let mmbtu = 20_000.0 * 0.1;
        let expected = mmbtu * ng.co2_kg_per_unit / 1000.0
            + mmbtu * ng.ch4_g_per_unit * GWP_CH4_FOSSIL / 1e6
            + mmbtu * ng.n2o_g_per_unit * GWP_N2O / 1e6;
        assert!((total.total - expected).abs() < 1e-9);
    }

    #[test]
    fn ev_fleet_group_is_excluded() {
        let factors = FactorRegistry::build();
        let mut facility = base_facility();
        facility.fleet.push(FleetGroup {
            vehicle_type: VehicleType::LightDutyCar,
            fuel_type: FleetFuelType::Ev,
            count: 10,
            annual_miles_per_vehicle: 12_000.0,
            fuel_efficiency: None,
            data_quality: DataQuality::Measured,
        });
        let (total, _) = compute(&facility, &factors);
        assert_eq!(total.total, 0.0);
    }

    #[test]
    fn refrigerant_leak_matches_closed_form() {
        let factors = FactorRegistry::build();
        let mut facility = base_facility();
        facility.refrigerants.push(RefrigerantEntry {
            refrigerant_type: "R-410A".into(),
            charge_kg: 100.0,
            leak_rate: 0.10,
            equipment_type: None,
            data_quality: DataQuality::Measured,
        });
        let (total, _) = compute(&facility, &factors);
        let gwp = FactorRegistry::gwp_for(&factors, "R-410A").unwrap();
        let expected = 100.0 * 0.10 * gwp / 1000.0;
        assert!((total.total - expected).abs() < 1e-9);
    }

    #[test]
    fn unknown_refrigerant_is_skipped_with_data_gap() {
        let factors = FactorRegistry::build();
        let mut facility = base_facility();
        facility.refrigerants.push(RefrigerantEntry {
            refrigerant_type: "R-Unobtainium".into(),
            charge_kg: 50.0,
            leak_rate: 0.05,
            equipment_type: None,
            data_quality: DataQuality::Estimated,
        });
        let (total, gaps) = compute(&facility, &factors);
        assert_eq!(total.total, 0.0);
        assert!(gaps.iter().any(|g| g.code == "unknown_refrigerant"));
    }

    #[test]
    fn hybrid_fleet_scales_co2_by_point_seven() {
        let factors = FactorRegistry::build();
        let mut gasoline = base_facility();
        gasoline.fleet.push(FleetGroup {
            vehicle_type: VehicleType::LightDutyCar,
            fuel_type: FleetFuelType::Gasoline,
            count: 1,
            annual_miles_per_vehicle: 10_000.0,
            fuel_efficiency: None,
            data_quality: DataQuality::Measured,
        });
        let mut hybrid = base_facility();
        hybrid.fleet.push(FleetGroup {
            vehicle_type: VehicleType::LightDutyCar,
            fuel_type: FleetFuelType::Hybrid,
            count: 1,
            annual_miles_per_vehicle: 10_000.0,
            fuel_efficiency: None,
            data_quality: DataQuality::Measured,
        });
        let (gasoline_total, _) = compute(&gasoline, &factors);
        let (hybrid_total, _) = compute(&hybrid, &factors);
        assert!(hybrid_total.total < gasoline_total.total);
    }
}
