//! Financial modeling (C12): NPV, IRR via Newton-Raphson, payback, and
//! the cash-flow/CO2-avoided builders the scenario evaluator (C13)
//! composes into its per-intervention summaries.

/// Net present value. `cash_flows[0]` is the initial (sign-bearing)
/// outlay; later entries are discounted at `rate` per period.
pub fn npv(rate: f64, cash_flows: &[f64]) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Internal rate of return via Newton-Raphson on `npv(r)`, starting
/// from `r=0.10`. Returns `None` on a negative-unity discount rate,
/// a near-zero derivative, or non-convergence within 100 iterations —
/// the contract is to surface uncertainty rather than guess.
pub fn irr(cash_flows: &[f64]) -> Option<f64> {
    let mut r = 0.10;
    for _ in 0..100 {
        let value = npv(r, cash_flows);
        if value.abs() < 1e-7 {
            return Some(r);
        }
        let derivative: f64 = cash_flows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(t, cf)| -(t as f64) * cf / (1.0 + r).powi(t as i32 + 1))
            .sum();
        if derivative.abs() < 1e-15 {
            return None;
        }
        let next_r = r - value / derivative;
        if next_r < -0.99 {
            return None;
        }
        if (next_r - r).abs() < 1e-7 {
            return Some(next_r);
        }
        r = next_r;
    }
    None
}

/// Simple payback in years; `+inf` when annual savings are zero or
/// negative.
pub fn payback(capex: f64, annual_savings: f64) -> f64 {
    if annual_savings <= 0.0 {
        f64::INFINITY
    } else {
        capex / annual_savings
    }
}

/// `[-capex, savings, savings, ...]`, length `1 + years`.
pub fn build_cash_flows(capex: f64, annual_savings: f64, years: u32) -> Vec<f64> {
    let mut flows = Vec::with_capacity(1 + years as usize);
    flows.push(-capex);
    flows.extend(std::iter::repeat(annual_savings).take(years as usize));
    flows
}

/// Cumulative avoided emissions under a constant annual-decay rate:
/// `sum_{i=0}^{years-1} annual * (1-decay)^i`.
pub fn cumulative_co2_avoided(annual: f64, years: u32, decay: f64) -> f64 {
    (0..years).map(|i| annual * (1.0 - decay).powi(i as i32)).sum()
}
