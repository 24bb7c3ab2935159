//! Core data model: facility input profile and the emission result it
//! produces. `FactorSet` (the registry's output bundle) lives in
//! [`crate::factors`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{validate_positive, validate_sqft, validate_unit_fraction, CoreResult};

// ======================================================================
// FACILITY PROFILE
// ======================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityProfile {
    pub name: String,
    pub building_type: BuildingType,
    pub square_feet: f64,
    pub year_built: Option<u32>,

    pub country: String,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub climate_zone: Option<String>,
    pub egrid_subregion: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    pub input_mode: InputMode,
    pub energy: HashMap<FuelKey, EnergyLineItem>,
    pub refrigerants: Vec<RefrigerantEntry>,
    pub fleet: Vec<FleetGroup>,
    pub waste: Vec<WasteStream>,
    pub water: Vec<WaterUse>,
    pub scope3: Scope3Inputs,
    pub occupancy: Option<Occupancy>,
}

impl FacilityProfile {
    /// Shape/range validation per spec.md §7 ValidationFailed: malformed
    /// input shape or out-of-range numerics. Does not touch factor
    /// resolution or fall-backs — those are the calculators' job.
    pub fn validate(&self) -> CoreResult<()> {
        validate_sqft(self.square_feet)?;
        for (fuel, item) in &self.energy {
            validate_positive(item.quantity, &format!("energy.{:?}.quantity", fuel))?;
            if item.unit != fuel.expected_unit() {
                return Err(crate::error::CoreError::ValidationFailed(format!(
                    "energy.{:?}.unit: expected {:?}, got {:?}",
                    fuel,
                    fuel.expected_unit(),
                    item.unit
                )));
            }
            if let Some(ef) = item.supplier_ef {
                validate_positive(ef, &format!("energy.{:?}.supplier_ef", fuel))?;
            }
        }
        for r in &self.refrigerants {
            validate_positive(r.charge_kg, "refrigerants[].charge_kg")?;
            validate_unit_fraction(r.leak_rate, "refrigerants[].leak_rate")?;
        }
        for f in &self.fleet {
            validate_positive(f.count as f64, "fleet[].count")?;
            validate_positive(f.annual_miles_per_vehicle, "fleet[].annual_miles_per_vehicle")?;
        }
        for w in &self.waste {
            validate_positive(w.annual_tonnes, "waste[].annual_tonnes")?;
        }
        for w in &self.water {
            validate_positive(w.annual_gallons, "water[].annual_gallons")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingType {
    Office,
    Warehouse,
    Manufacturing,
    DataCenter,
    Hospital,
    Retail,
    Education,
    FoodService,
    Lodging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    Basic,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataQuality {
    Measured,
    Estimated,
    Modeled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelKey {
    Electricity,
    NaturalGas,
    Diesel,
    FuelOil2,
    FuelOil6,
    Propane,
    Kerosene,
}

impl FuelKey {
    /// The unit an `EnergyLineItem` for this fuel must be expressed in.
    pub fn expected_unit(&self) -> EnergyUnit {
        match self {
            FuelKey::Electricity => EnergyUnit::Kwh,
            FuelKey::NaturalGas => EnergyUnit::Therms,
            FuelKey::Diesel | FuelKey::FuelOil2 | FuelKey::FuelOil6 | FuelKey::Kerosene => {
                EnergyUnit::Gallons
            }
            FuelKey::Propane => EnergyUnit::Gallons,
        }
    }

    /// Snake-case label used in breakdown-row subcategories and source
    /// strings.
    pub fn label(&self) -> &'static str {
        match self {
            FuelKey::Electricity => "electricity",
            FuelKey::NaturalGas => "natural_gas",
            FuelKey::Diesel => "diesel",
            FuelKey::FuelOil2 => "fuel_oil_2",
            FuelKey::FuelOil6 => "fuel_oil_6",
            FuelKey::Propane => "propane",
            FuelKey::Kerosene => "kerosene",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyUnit {
    Kwh,
    Therms,
    Gallons,
    Mmbtu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Annual,
    Monthly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyLineItem {
    pub quantity: f64,
    pub unit: EnergyUnit,
    pub period: Period,
    pub data_quality: DataQuality,
    pub is_renewable: Option<bool>,
    pub supplier_ef: Option<f64>, // kg CO2e/kWh, market-based hierarchy step 1
}

impl EnergyLineItem {
    /// Quantity normalized to an annual basis (monthly × 12).
    pub fn annual_quantity(&self) -> f64 {
        match self.period {
            Period::Annual => self.quantity,
            Period::Monthly => self.quantity * 12.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefrigerantEntry {
    pub refrigerant_type: String,
    pub charge_kg: f64,
    pub leak_rate: f64,
    pub equipment_type: Option<String>,
    pub data_quality: DataQuality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FleetFuelType {
    Gasoline,
    Diesel,
    Ev,
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    LightDutyCar,
    LightDutyTruck,
    HeavyDutyTruck,
    Van,
    Bus,
    Other(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetGroup {
    pub vehicle_type: VehicleType,
    pub fuel_type: FleetFuelType,
    pub count: u32,
    pub annual_miles_per_vehicle: f64,
    pub fuel_efficiency: Option<f64>, // mpg override
    pub data_quality: DataQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteStream {
    pub waste_type: String,
    pub disposal_method: String,
    pub annual_tonnes: f64,
    pub data_quality: DataQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterUse {
    pub source: String,
    pub annual_gallons: f64,
    pub treatment_type: Option<String>,
    pub data_quality: DataQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occupancy {
    pub employees: Option<u32>,
    pub annual_visitors: Option<u32>,
}

// ======================================================================
// SCOPE 3 INPUTS
// ======================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scope3Inputs {
    pub category1_purchased_goods: Vec<SpendEntry>,
    pub category2_capital_goods: Vec<SpendEntry>,
    pub category4_upstream_transport: Vec<TransportEntry>,
    pub category6_business_travel: Vec<TravelEntry>,
    pub category7_commuting: Option<CommuteProfile>,
    pub category8_upstream_leased_assets: Vec<SpendEntry>,
    pub category9_downstream_transport: Vec<TransportEntry>,
    pub category10_processing_of_sold_products: Vec<SpendEntry>,
    pub category11_use_of_sold_products: Vec<SpendEntry>,
    pub category12_end_of_life_treatment: Vec<SpendEntry>,
    pub category13_downstream_leased_assets: Vec<SpendEntry>,
    pub category14_franchises: Vec<SpendEntry>,
    pub category15_investments: Vec<SpendEntry>,
    /// Category 3 (fuel & energy-related) is auto-computed from Scope
    /// 1/2 inputs; set false to suppress it.
    pub include_category3: bool,
    /// Category 5 (waste) is computed from `FacilityProfile.waste`; set
    /// false to suppress it.
    pub include_category5: bool,
}

impl Scope3Inputs {
    pub fn enabled() -> Self {
        Self {
            include_category3: true,
            include_category5: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendEntry {
    pub sector: String,
    pub annual_usd: f64,
    pub data_quality: DataQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportEntry {
    pub mode: String,
    pub ton_miles: f64,
    pub data_quality: DataQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelEntry {
    pub mode: String,
    pub passenger_miles: f64,
    pub data_quality: DataQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommuteProfile {
    pub employees: u32,
    pub working_days_per_year: u32,
    pub modes: Vec<CommuteModeShare>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommuteModeShare {
    pub mode: String,
    pub share: f64,                   // fraction of employees, 0..1
    pub one_way_distance_miles: f64,
}

// ======================================================================
// RESULT STRUCTURE
// ======================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeTag {
    Scope1,
    Scope2Location,
    Scope2Market,
    Scope3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub scope: ScopeTag,
    pub category: String,
    pub subcategory: Option<String>,
    pub value_tco2e: f64,
    pub data_quality: DataQuality,
    pub methodology: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeTotal {
    pub total: f64,
    pub rows: Vec<BreakdownRow>,
}

impl ScopeTotal {
    pub fn empty() -> Self {
        Self {
            total: 0.0,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(rows: Vec<BreakdownRow>) -> Self {
        let total = rows.iter().map(|r| r.value_tco2e).sum();
        Self { total, rows }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope2Result {
    pub location: ScopeTotal,
    pub market: ScopeTotal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intensity {
    pub per_sqft: f64,
    pub per_employee: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BenchmarkClassification {
    Low,
    Average,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub kg_co2e_per_sqft: f64,
    pub percentile: f64,
    pub classification: BenchmarkClassification,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UncertaintyBand {
    pub relative_uncertainty: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticalUncertainty {
    pub scope1: UncertaintyBand,
    pub scope2_location: UncertaintyBand,
    pub scope3: UncertaintyBand,
    pub total: UncertaintyBand,
    pub overall_data_quality: DataQuality,
    pub confidence_level: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataGap {
    pub code: String,
    pub message: String,
}

impl DataGap {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodologyRecord {
    pub engine_version: String,
    pub timestamp: DateTime<Utc>,
    pub sources: Vec<String>,
    pub assumptions: Vec<String>,
    pub data_gaps: Vec<DataGap>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionResult {
    pub facility_name: String,
    pub total: f64,
    pub total_market: f64,
    pub scope1: ScopeTotal,
    pub scope2: Scope2Result,
    pub scope3: ScopeTotal,
    pub breakdown: Vec<BreakdownRow>,
    pub intensity: Intensity,
    pub benchmark: BenchmarkComparison,
    pub uncertainty: AnalyticalUncertainty,
    pub data_quality_score: f64,
    pub methodology: MethodologyRecord,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComputeOptions {
    pub include_scope3: bool,
    pub include_estimation: bool,
}

impl Default for ComputeOptions {
    fn default() -> Self {
        Self {
            include_scope3: true,
            include_estimation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_profile() -> FacilityProfile {
        FacilityProfile {
            name: "Test".into(),
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
    fn validate_rejects_zero_sqft() {
        let mut p = minimal_profile();
        p.square_feet = 0.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn validate_accepts_minimal_profile() {
        assert!(minimal_profile().validate().is_ok());
    }

    #[test]
    fn validate_rejects_mismatched_energy_unit() {
        let mut p = minimal_profile();
        p.energy.insert(
            FuelKey::Electricity,
            EnergyLineItem {
                quantity: 1000.0,
                unit: EnergyUnit::Therms,
                period: Period::Annual,
                data_quality: DataQuality::Measured,
                is_renewable: None,
                supplier_ef: None,
            },
        );
        assert!(p.validate().is_err());
    }

    #[test]
    fn annual_quantity_scales_monthly() {
        let item = EnergyLineItem {
            quantity: 100.0,
            unit: EnergyUnit::Kwh,
            period: Period::Monthly,
            data_quality: DataQuality::Measured,
            is_renewable: None,
            supplier_ef: None,
        };
        assert_eq!(item.annual_quantity(), 1200.0);
    }

    #[test]
    fn scope_total_from_rows_sums_values() {
        let rows = vec![
            BreakdownRow {
                scope: ScopeTag::Scope1,
                category: "stationary_combustion".into(),
                subcategory: None,
                value_tco2e: 1.5,
                data_quality: DataQuality::Measured,
                methodology: "x".into(),
                source: "y".into(),
            },
            BreakdownRow {
                scope: ScopeTag::Scope1,
                category: "mobile_combustion".into(),
                subcategory: None,
                value_tco2e: 2.5,
                data_quality: DataQuality::Measured,
                methodology: "x".into(),
                source: "y".into(),
            },
        ];
        assert_eq!(ScopeTotal::from_rows(rows).total, 4.0);
    }
}
