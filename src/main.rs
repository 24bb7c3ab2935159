use std::env;
use std::fs;
use std::process;

use facility_emissions_core::{
    compute_all, evaluate_scenario, run_monte_carlo, ComputeOptions, FacilityProfile,
    FactorRegistry, Intervention, MonteCarloConfig,
};
use serde::Deserialize;

/// Anchors the scenario evaluator's 10-year grid-decline trajectory
/// when the input file doesn't specify one.
const DEFAULT_CURRENT_YEAR: u16 = 2026;

#[derive(Debug, Deserialize)]
struct CliInput {
    facility: FacilityProfile,
    #[serde(default)]
    monte_carlo: Option<MonteCarloConfig>,
    #[serde(default)]
    interventions: Vec<Intervention>,
    #[serde(default)]
    current_year: Option<u16>,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <input_json_file> [compute|monte-carlo|scenario]", args[0]);
        process::exit(1);
    }

    let input_path = &args[1];
    let mode = args.get(2).map(String::as_str).unwrap_or("compute");

    let raw = match fs::read_to_string(input_path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error reading input file: {}", e);
            process::exit(1);
        }
    };

    let input: CliInput = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error parsing input JSON: {}", e);
            process::exit(1);
        }
    };

    let factors = FactorRegistry::build();

    match mode {
        "compute" => run_compute(&input.facility, &factors),
        "monte-carlo" => run_monte_carlo_mode(&input.facility, &factors, input.monte_carlo),
        "scenario" => run_scenario_mode(
            &input.facility,
            &factors,
            &input.interventions,
            input.current_year.unwrap_or(DEFAULT_CURRENT_YEAR),
        ),
        other => {
            eprintln!("Unknown mode '{}'; expected compute, monte-carlo, or scenario", other);
            process::exit(1);
        }
    }
}

fn run_compute(facility: &FacilityProfile, factors: &facility_emissions_core::FactorSet) {
    match compute_all(facility, factors, ComputeOptions::default()) {
        Ok(result) => print_json(&result),
        Err(e) => {
            eprintln!("Error computing emissions: {}", e);
            process::exit(1);
        }
    }
}

fn run_monte_carlo_mode(
    facility: &FacilityProfile,
    factors: &facility_emissions_core::FactorSet,
    config: Option<MonteCarloConfig>,
) {
    let config = config.unwrap_or_default();
    match run_monte_carlo(facility, factors, config) {
        Ok(result) => print_json(&result),
        Err(e) => {
            eprintln!("Error running Monte Carlo simulation: {}", e);
            process::exit(1);
        }
    }
}

fn run_scenario_mode(
    facility: &FacilityProfile,
    factors: &facility_emissions_core::FactorSet,
    interventions: &[Intervention],
    current_year: u16,
) {
    if interventions.is_empty() {
        eprintln!("Warning: no interventions supplied, reporting baseline only");
    }
    match evaluate_scenario(facility, factors, interventions, current_year) {
        Ok(result) => print_json(&result),
        Err(e) => {
            eprintln!("Error evaluating scenario: {}", e);
            process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing result: {}", e);
            process::exit(1);
        }
    }
}
