//! CBECS EUI/emissions benchmarks and ASHRAE climate-zone degree days
//! (`cbecs-<year>-benchmarks.json`, `ashrae-climate-zones.json` in
//! spec.md §6).

use std::collections::HashMap;

use crate::factors::{Benchmark, ClimateFactors, DegreeDays, Quartiles};
use crate::models::{BuildingType, FuelKey};

use super::map_of;

fn fuel_split(electricity: f64, natural_gas: f64) -> HashMap<FuelKey, f64> {
    map_of(vec![
        (FuelKey::Electricity, electricity),
        (FuelKey::NaturalGas, natural_gas),
    ])
}

pub fn benchmarks() -> HashMap<BuildingType, Benchmark> {
    map_of(vec![
        (
            BuildingType::Office,
            Benchmark {
                eui_kbtu_per_sqft: Quartiles { p25: 45.0, median: 67.0, p75: 95.0 },
                fuel_split: fuel_split(0.65, 0.35),
                kg_co2e_per_sqft: Quartiles { p25: 4.5, median: 7.8, p75: 12.1 },
            },
        ),
        (
            BuildingType::Warehouse,
            Benchmark {
                eui_kbtu_per_sqft: Quartiles { p25: 20.0, median: 31.0, p75: 48.0 },
                fuel_split: fuel_split(0.55, 0.45),
                kg_co2e_per_sqft: Quartiles { p25: 2.1, median: 3.6, p75: 5.9 },
            },
        ),
        (
            BuildingType::Manufacturing,
            Benchmark {
                eui_kbtu_per_sqft: Quartiles { p25: 60.0, median: 95.0, p75: 150.0 },
                fuel_split: fuel_split(0.50, 0.50),
                kg_co2e_per_sqft: Quartiles { p25: 6.0, median: 11.0, p75: 18.0 },
            },
        ),
        (
            BuildingType::DataCenter,
            Benchmark {
                eui_kbtu_per_sqft: Quartiles { p25: 150.0, median: 250.0, p75: 400.0 },
                fuel_split: fuel_split(0.95, 0.05),
                kg_co2e_per_sqft: Quartiles { p25: 18.0, median: 30.0, p75: 48.0 },
            },
        ),
        (
            BuildingType::Hospital,
            Benchmark {
                eui_kbtu_per_sqft: Quartiles { p25: 120.0, median: 187.0, p75: 270.0 },
                fuel_split: fuel_split(0.55, 0.45),
                kg_co2e_per_sqft: Quartiles { p25: 14.0, median: 22.0, p75: 32.0 },
            },
        ),
        (
            BuildingType::Retail,
            Benchmark {
                eui_kbtu_per_sqft: Quartiles { p25: 35.0, median: 53.0, p75: 80.0 },
                fuel_split: fuel_split(0.70, 0.30),
                kg_co2e_per_sqft: Quartiles { p25: 3.8, median: 6.2, p75: 9.5 },
            },
        ),
        (
            BuildingType::Education,
            Benchmark {
                eui_kbtu_per_sqft: Quartiles { p25: 40.0, median: 58.0, p75: 85.0 },
                fuel_split: fuel_split(0.55, 0.45),
                kg_co2e_per_sqft: Quartiles { p25: 4.2, median: 6.8, p75: 10.1 },
            },
        ),
        (
            BuildingType::FoodService,
            Benchmark {
                eui_kbtu_per_sqft: Quartiles { p25: 150.0, median: 244.0, p75: 350.0 },
                fuel_split: fuel_split(0.55, 0.45),
                kg_co2e_per_sqft: Quartiles { p25: 16.0, median: 26.0, p75: 38.0 },
            },
        ),
        (
            BuildingType::Lodging,
            Benchmark {
                eui_kbtu_per_sqft: Quartiles { p25: 55.0, median: 79.0, p75: 112.0 },
                fuel_split: fuel_split(0.60, 0.40),
                kg_co2e_per_sqft: Quartiles { p25: 6.0, median: 9.0, p75: 13.5 },
            },
        ),
    ])
}

/// ASHRAE climate zone -> heating/cooling degree-days (base 65°F).
/// `4A` is the estimator's reference zone (spec.md §4.2 step 3
/// denominator).
pub fn climate_factors() -> ClimateFactors {
    let zones = map_of(vec![
        ("1A".to_string(), DegreeDays { hdd65: 300.0, cdd65: 4500.0 }),
        ("2A".to_string(), DegreeDays { hdd65: 1500.0, cdd65: 3000.0 }),
        ("3A".to_string(), DegreeDays { hdd65: 2500.0, cdd65: 2000.0 }),
        ("4A".to_string(), DegreeDays { hdd65: 4500.0, cdd65: 1200.0 }),
        ("5A".to_string(), DegreeDays { hdd65: 6000.0, cdd65: 700.0 }),
        ("6A".to_string(), DegreeDays { hdd65: 7200.0, cdd65: 450.0 }),
        ("7".to_string(), DegreeDays { hdd65: 9000.0, cdd65: 200.0 }),
    ]);

    let state_to_default_zone = map_of(vec![
        ("NY".to_string(), "4A".to_string()),
        ("CA".to_string(), "3A".to_string()),
        ("TX".to_string(), "2A".to_string()),
        ("OH".to_string(), "5A".to_string()),
        ("PA".to_string(), "4A".to_string()),
        ("NJ".to_string(), "4A".to_string()),
        ("LA".to_string(), "2A".to_string()),
        ("MS".to_string(), "3A".to_string()),
        ("FL".to_string(), "1A".to_string()),
        ("WA".to_string(), "4A".to_string()),
        ("OR".to_string(), "4A".to_string()),
    ]);

    ClimateFactors {
        zones,
        state_to_default_zone,
    }
}
