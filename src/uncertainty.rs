//! Uncertainty Spec (C9): the fixed parameter-type -> distribution
//! table Monte Carlo (C11) perturbs every input and factor through.

use crate::models::DataQuality;
use crate::rng::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    EnergyMeasured,
    EnergyEstimated,
    StationaryEf,
    GridEf,
    RefrigerantCharge,
    RefrigerantLeakRate,
    FleetMileage,
    FleetFuelEconomy,
    Scope3Spend,
    Scope3Distance,
    WasteQuantity,
    WaterQuantity,
    Gwp,
}

#[derive(Debug, Clone, Copy)]
pub enum Distribution {
    Normal,
    Lognormal,
    /// Triangular around the point value, with min/max expressed as
    /// multipliers of it (spec.md §4.9: refrigerant leak rate uses
    /// 0.5x/2.0x).
    Triangular { min_mult: f64, max_mult: f64 },
    /// Never perturbed (GHG Protocol treats GWPs as fixed constants).
    Fixed,
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub distribution: Distribution,
    pub relative_uncertainty: f64,
}

pub fn spec_for(param: ParamType) -> ParamSpec {
    match param {
        ParamType::EnergyMeasured => ParamSpec { distribution: Distribution::Normal, relative_uncertainty: 0.025 },
        ParamType::EnergyEstimated => {
            ParamSpec { distribution: Distribution::Lognormal, relative_uncertainty: 0.15 }
        }
        ParamType::StationaryEf => ParamSpec { distribution: Distribution::Normal, relative_uncertainty: 0.01 },
        ParamType::GridEf => ParamSpec { distribution: Distribution::Normal, relative_uncertainty: 0.05 },
        ParamType::RefrigerantCharge => {
            ParamSpec { distribution: Distribution::Normal, relative_uncertainty: 0.20 }
        }
        ParamType::RefrigerantLeakRate => ParamSpec {
            distribution: Distribution::Triangular { min_mult: 0.5, max_mult: 2.0 },
            relative_uncertainty: 0.50,
        },
        ParamType::FleetMileage => ParamSpec { distribution: Distribution::Normal, relative_uncertainty: 0.10 },
        ParamType::FleetFuelEconomy => {
            ParamSpec { distribution: Distribution::Normal, relative_uncertainty: 0.08 }
        }
        ParamType::Scope3Spend => ParamSpec { distribution: Distribution::Lognormal, relative_uncertainty: 0.30 },
        ParamType::Scope3Distance => ParamSpec { distribution: Distribution::Normal, relative_uncertainty: 0.15 },
        ParamType::WasteQuantity => ParamSpec { distribution: Distribution::Normal, relative_uncertainty: 0.20 },
        ParamType::WaterQuantity => ParamSpec { distribution: Distribution::Normal, relative_uncertainty: 0.10 },
        ParamType::Gwp => ParamSpec { distribution: Distribution::Fixed, relative_uncertainty: 0.0 },
    }
}

/// Perturbs `value` under `param`'s distribution, flooring the result
/// at zero (a perturbation must never yield a negative physical
/// quantity).
pub fn perturb(value: f64, param: ParamType, rng: &mut Rng) -> f64 {
    let spec = spec_for(param);
    let sample = match spec.distribution {
        Distribution::Fixed => value,
        Distribution::Normal => rng.normal(value, value * spec.relative_uncertainty),
        Distribution::Lognormal => {
            if value <= 0.0 {
                0.0
            } else {
                rng.lognormal(value, spec.relative_uncertainty)
            }
        }
        Distribution::Triangular { min_mult, max_mult } => {
            rng.triangular(value * min_mult, value, value * max_mult)
        }
    };
    sample.max(0.0)
}

/// Energy line items dispatch to `energy_measured` or
/// `energy_estimated` by their reported data quality; anything short
/// of `measured` is treated as estimated uncertainty.
pub fn energy_param_for(quality: DataQuality) -> ParamType {
    match quality {
        DataQuality::Measured => ParamType::EnergyMeasured,
        DataQuality::Modeled | DataQuality::Estimated => ParamType::EnergyEstimated,
    }
}
