pub mod constants;
pub mod engine;
pub mod error;
pub mod factors;
pub mod financial;
pub mod models;
pub mod monte_carlo;
pub mod registry;
pub mod rng;
pub mod scenario;
pub mod scope1;
pub mod scope2;
pub mod scope3;
pub mod statistics;
pub mod uncertainty;

mod estimator;

pub use engine::compute_all;
pub use error::{CoreError, CoreResult};
pub use factors::FactorSet;
pub use models::*;
pub use monte_carlo::{run_monte_carlo, MonteCarloConfig, SimulationResult};
pub use registry::FactorRegistry;
pub use scenario::{evaluate_scenario, Intervention, InterventionParams, ScenarioResult};
