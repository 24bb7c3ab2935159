//! Estimator Fallback (C3): imputes missing energy from building-type
//! × climate × size when the facility is in basic mode or is missing
//! electricity data.

use log::info;

use crate::constants::{MMBTU_PER_KWH, THERMS_PER_MMBTU};
use crate::factors::FactorSet;
use crate::models::{
    BuildingType, DataGap, DataQuality, EnergyLineItem, EnergyUnit, FacilityProfile, FuelKey,
    InputMode, Period,
};
use crate::registry::epa::{office_default_eui_kwh_per_sqft, office_default_therms_per_sqft};

/// Returns a facility with missing energy line items imputed (a clone
/// when nothing needed imputing) plus any data-gap notes raised along
/// the way.
pub fn apply_estimator_if_needed(
    facility: &FacilityProfile,
    factors: &FactorSet,
    include_estimation: bool,
) -> (FacilityProfile, Vec<DataGap>) {
    let mut working = facility.clone();
    let mut gaps = Vec::new();

    let electricity_missing = facility
        .energy
        .get(&FuelKey::Electricity)
        .map(|e| e.annual_quantity() <= 0.0)
        .unwrap_or(true);

    let triggered = include_estimation && (facility.input_mode == InputMode::Basic || electricity_missing);
    if !triggered {
        return (working, gaps);
    }

    let climate_adj = climate_adjustment(facility, factors);

    let benchmark = factors.benchmarks.get(&facility.building_type);
    let (electricity_kwh, gas_therms) = match benchmark {
        Some(bench) => {
            let eui_adjusted = bench.eui_kbtu_per_sqft.median * climate_adj;
            let total_mmbtu = eui_adjusted * facility.square_feet / 1000.0;
            let electricity_share = bench
                .fuel_split
                .get(&FuelKey::Electricity)
                .copied()
                .unwrap_or(0.0);
            let gas_share = bench
                .fuel_split
                .get(&FuelKey::NaturalGas)
                .copied()
                .unwrap_or(0.0);
            let electricity_mmbtu = total_mmbtu * electricity_share;
            let gas_mmbtu = total_mmbtu * gas_share;
            (
                (electricity_mmbtu / MMBTU_PER_KWH).round(),
                (gas_mmbtu * THERMS_PER_MMBTU).round(),
            )
        }
        None => {
            gaps.push(DataGap::new(
                "no_benchmark_for_building_type",
                format!(
                    "no CBECS benchmark for {:?}; used office defaults",
                    facility.building_type
                ),
            ));
            (
                (office_default_eui_kwh_per_sqft() * facility.square_feet).round(),
                (office_default_therms_per_sqft() * facility.square_feet).round(),
            )
        }
    };

    working.energy.entry(FuelKey::Electricity).or_insert_with(|| {
        info!(
            "estimator: imputed electricity {} kWh for {:?} at {} sqft",
            electricity_kwh, facility.building_type, facility.square_feet
        );
        EnergyLineItem {
            quantity: electricity_kwh,
            unit: EnergyUnit::Kwh,
            period: Period::Annual,
            data_quality: DataQuality::Estimated,
            is_renewable: None,
            supplier_ef: None,
        }
    });
    working.energy.entry(FuelKey::NaturalGas).or_insert_with(|| {
        info!(
            "estimator: imputed natural gas {} therms for {:?} at {} sqft",
            gas_therms, facility.building_type, facility.square_feet
        );
        EnergyLineItem {
            quantity: gas_therms,
            unit: EnergyUnit::Therms,
            period: Period::Annual,
            data_quality: DataQuality::Estimated,
            is_renewable: None,
            supplier_ef: None,
        }
    });

    gaps.push(DataGap::new(
        "benchmark_estimation_applied",
        "electricity/natural gas imputed from CBECS benchmark and climate adjustment",
    ));

    (working, gaps)
}

/// `(HDD65+CDD65)_target / (HDD65+CDD65)_4A`, clamped to `[0.5, 2.5]`;
/// falls back to `1.0` when the climate zone cannot be determined.
fn climate_adjustment(facility: &FacilityProfile, factors: &FactorSet) -> f64 {
    let zone = facility
        .climate_zone
        .clone()
        .or_else(|| {
            facility
                .state
                .as_ref()
                .and_then(|s| factors.climate.state_to_default_zone.get(&s.to_uppercase()).cloned())
        });

    let zone = match zone {
        Some(z) => z,
        None => return 1.0,
    };

    let target = match factors.climate.zones.get(&zone) {
        Some(dd) => dd,
        None => return 1.0,
    };
    let reference = match factors.climate.zones.get("4A") {
        Some(dd) => dd,
        None => return 1.0,
    };

    let ratio = (target.hdd65 + target.cdd65) / (reference.hdd65 + reference.cdd65);
    ratio.clamp(0.5, 2.5)
}
