//! EPA stationary & mobile combustion factor tables (`epa-emission-factors-<year>.json`
//! in spec.md §6 — here embedded as Rust literals per the registry's
//! "deterministic, no runtime file I/O" contract).

use std::collections::HashMap;

use crate::factors::{mobile_key, MobileFactors, StationaryFactor};
use crate::models::{EnergyUnit, FleetFuelType, FuelKey, VehicleType};

use super::map_of;

/// Table 1: stationary combustion, one row per configurable fuel.
/// Natural gas is denominated per MMBtu (native billing unit is
/// therms; `heat_content_mmbtu_per_native` converts). Liquid fuels are
/// denominated directly per gallon.
pub fn stationary_factors() -> HashMap<FuelKey, StationaryFactor> {
    map_of(vec![
        (
            FuelKey::NaturalGas,
            StationaryFactor {
                co2_kg_per_unit: 53.06,
                ch4_g_per_unit: 1.0,
                n2o_g_per_unit: 0.1,
                native_unit: EnergyUnit::Mmbtu,
                heat_content_mmbtu_per_native: Some(0.1), // 1 therm = 0.1 MMBtu
                wtt_kg_per_native_unit: 0.447,            // kg CO2e/MMBtu, upstream leakage
            },
        ),
        (
            FuelKey::Diesel,
            StationaryFactor {
                co2_kg_per_unit: 10.21,
                ch4_g_per_unit: 0.41,
                n2o_g_per_unit: 0.08,
                native_unit: EnergyUnit::Gallons,
                heat_content_mmbtu_per_native: None,
                wtt_kg_per_native_unit: 2.35,
            },
        ),
        (
            FuelKey::FuelOil2,
            StationaryFactor {
                co2_kg_per_unit: 10.21,
                ch4_g_per_unit: 0.41,
                n2o_g_per_unit: 0.08,
                native_unit: EnergyUnit::Gallons,
                heat_content_mmbtu_per_native: None,
                wtt_kg_per_native_unit: 2.30,
            },
        ),
        (
            FuelKey::FuelOil6,
            StationaryFactor {
                co2_kg_per_unit: 11.27,
                ch4_g_per_unit: 0.49,
                n2o_g_per_unit: 0.09,
                native_unit: EnergyUnit::Gallons,
                heat_content_mmbtu_per_native: None,
                wtt_kg_per_native_unit: 2.40,
            },
        ),
        (
            FuelKey::Propane,
            StationaryFactor {
                co2_kg_per_unit: 5.79,
                ch4_g_per_unit: 0.09,
                n2o_g_per_unit: 0.06,
                native_unit: EnergyUnit::Gallons,
                heat_content_mmbtu_per_native: None,
                wtt_kg_per_native_unit: 0.68,
            },
        ),
        (
            FuelKey::Kerosene,
            StationaryFactor {
                co2_kg_per_unit: 9.75,
                ch4_g_per_unit: 0.33,
                n2o_g_per_unit: 0.08,
                native_unit: EnergyUnit::Gallons,
                heat_content_mmbtu_per_native: None,
                wtt_kg_per_native_unit: 2.20,
            },
        ),
    ])
}

pub fn mobile_factors() -> MobileFactors {
    let co2_kg_per_gallon = map_of(vec![
        (FleetFuelType::Gasoline, 8.887),
        (FleetFuelType::Diesel, 10.21),
    ]);

    let vehicle_fuel_pairs = [
        (VehicleType::LightDutyCar, FleetFuelType::Gasoline, 0.0097, 0.0082, 28.0),
        (VehicleType::LightDutyCar, FleetFuelType::Diesel, 0.0005, 0.0015, 32.0),
        (VehicleType::LightDutyTruck, FleetFuelType::Gasoline, 0.0114, 0.0091, 22.0),
        (VehicleType::LightDutyTruck, FleetFuelType::Diesel, 0.0006, 0.0018, 25.0),
        (VehicleType::Van, FleetFuelType::Gasoline, 0.0103, 0.0086, 18.0),
        (VehicleType::Van, FleetFuelType::Diesel, 0.0006, 0.0017, 20.0),
        (VehicleType::HeavyDutyTruck, FleetFuelType::Diesel, 0.0051, 0.0048, 8.0),
        (VehicleType::Bus, FleetFuelType::Diesel, 0.0058, 0.0052, 7.0),
    ];

    let mut ch4_g_per_mile = HashMap::new();
    let mut n2o_g_per_mile = HashMap::new();
    let mut default_mpg = HashMap::new();
    for (vehicle, fuel, ch4, n2o, mpg) in vehicle_fuel_pairs {
        let key = mobile_key(&vehicle, fuel);
        ch4_g_per_mile.insert(key.clone(), ch4);
        n2o_g_per_mile.insert(key.clone(), n2o);
        default_mpg.insert(key, mpg);
    }

    MobileFactors {
        co2_kg_per_gallon,
        ch4_g_per_mile,
        n2o_g_per_mile,
        default_mpg,
    }
}

/// Office-default benchmark used by the estimator (C3) when a facility's
/// building type has no benchmark row of its own. Kept here, next to the
/// other EPA/CBECS-adjacent constants, since it backstops the same
/// fallback chain as the stationary/mobile tables.
pub fn office_default_eui_kwh_per_sqft() -> f64 {
    14.6
}

pub fn office_default_therms_per_sqft() -> f64 {
    0.18
}
