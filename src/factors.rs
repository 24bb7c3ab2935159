//! `FactorSet`: the versioned, immutable bundle of emission factors the
//! registry assembles. Consumed read-only by the engine, Monte Carlo,
//! and scenario evaluator; cloned (never mutated in place) whenever a
//! caller needs a perturbed copy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{EnergyUnit, FleetFuelType, FuelKey, VehicleType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorSet {
    pub version: String,
    pub stationary: HashMap<FuelKey, StationaryFactor>,
    pub mobile: MobileFactors,
    pub grid: GridFactors,
    pub refrigerants: RefrigerantFactors,
    pub scope3: Scope3Factors,
    /// Keyed by `waste_key(waste_type, disposal_method)`, tCO2e / short ton.
    pub waste: HashMap<String, f64>,
    pub water: WaterFactors,
    pub benchmarks: HashMap<crate::models::BuildingType, Benchmark>,
    pub climate: ClimateFactors,
    pub grid_projection: HashMap<u16, f64>, // year -> national grid EF
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StationaryFactor {
    pub co2_kg_per_unit: f64,
    pub ch4_g_per_unit: f64,
    pub n2o_g_per_unit: f64,
    pub native_unit: EnergyUnit,
    /// MMBtu per native unit, set for fuels billed in a unit other than
    /// MMBtu whose factor table is itself denominated in MMBtu (natural
    /// gas therms).
    pub heat_content_mmbtu_per_native: Option<f64>,
    pub wtt_kg_per_native_unit: f64, // Scope 3 cat 3 upstream WTT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileFactors {
    pub co2_kg_per_gallon: HashMap<FleetFuelType, f64>,
    /// Keyed by `mobile_key(vehicle_type, fuel_type)`.
    pub ch4_g_per_mile: HashMap<String, f64>,
    pub n2o_g_per_mile: HashMap<String, f64>,
    pub default_mpg: HashMap<String, f64>,
}

/// Composite lookup key for the (vehicle type × fuel type) mobile
/// tables, mirroring the teacher's `create_factor_key` hierarchical
/// string-key pattern (`production/lca.rs`) rather than a tuple struct
/// — `serde_json` cannot serialize a non-string map key.
pub fn mobile_key(vehicle_type: &VehicleType, fuel_type: FleetFuelType) -> String {
    let vehicle = match vehicle_type {
        VehicleType::LightDutyCar => "light_duty_car",
        VehicleType::LightDutyTruck => "light_duty_truck",
        VehicleType::HeavyDutyTruck => "heavy_duty_truck",
        VehicleType::Van => "van",
        VehicleType::Bus => "bus",
        VehicleType::Other(s) => s.as_str(),
    };
    format!("{}_{:?}", vehicle, fuel_type)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSubregionFactor {
    pub kg_co2e_per_kwh: f64,
    pub grid_gross_loss_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridFactors {
    /// Keyed by upper-cased eGRID subregion code.
    pub subregions: HashMap<String, GridSubregionFactor>,
    /// Keyed by upper-cased two-letter US state code.
    pub state_to_subregion: HashMap<String, String>,
    /// Keyed by country name/ISO code as supplied on the facility.
    pub international: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefrigerantFactors {
    /// Keyed by upper-cased formal refrigerant name (e.g. "R-410A").
    pub gwp_by_formal_name: HashMap<String, f64>,
    /// Keyed by lower-cased common name (e.g. "puron").
    pub gwp_by_common_name: HashMap<String, f64>,
    pub default_leak_rates_by_equipment: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope3Factors {
    pub business_travel_kg_per_pax_mile: HashMap<String, f64>, // mode -> factor
    pub commuting_kg_per_mile: HashMap<String, f64>,
    pub product_transport_kg_per_ton_mile: HashMap<String, f64>,
    pub spend_kg_per_usd: HashMap<String, f64>, // sector -> factor
}

/// Normalizes a (waste_type, disposal_method) pair to the lower
/// snake-case composite key used by `FactorSet.waste`.
pub fn waste_key(waste_type: &str, disposal_method: &str) -> String {
    format!(
        "{}_{}",
        waste_type.to_lowercase().replace(' ', "_"),
        disposal_method.to_lowercase().replace(' ', "_")
    )
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaterFactors {
    pub supply_tco2e_per_1000_gal: f64,
    pub treatment_tco2e_per_1000_gal: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quartiles {
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Benchmark {
    pub eui_kbtu_per_sqft: Quartiles,
    pub fuel_split: HashMap<FuelKey, f64>, // fraction of total energy, sums to 1.0
    pub kg_co2e_per_sqft: Quartiles,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DegreeDays {
    pub hdd65: f64,
    pub cdd65: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateFactors {
    pub zones: HashMap<String, DegreeDays>,
    pub state_to_default_zone: HashMap<String, String>,
}
