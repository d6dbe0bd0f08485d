//! Full simulator pass: clamp the form values, compute the financing plan
//! and report every adjustment and notable condition as a warning.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::calculator::{compute_financing, FinancingInput, FinancingResult};
use super::clamping::{clamp_financing_input, Adjustment};
use super::policy::FinancingPolicy;
use crate::types::{with_metadata, ComputationOutput};
use crate::HousingFinanceResult;

/// Simulator request: raw form values and an optional policy override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    pub financing: FinancingInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<FinancingPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// Values the calculator actually ran on.
    pub effective_input: FinancingInput,
    pub adjustments: Vec<Adjustment>,
    pub financing: FinancingResult,
}

/// Clamp and compute one simulation.
pub fn simulate_financing(
    input: &SimulationInput,
) -> HousingFinanceResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();
    let policy = input.policy.clone().unwrap_or_default();

    let clamped = clamp_financing_input(&input.financing, &policy)?;
    let financing = compute_financing(&clamped.input)?;

    let mut warnings: Vec<String> = clamped.adjustments.iter().map(Adjustment::message).collect();

    if !financing.meets_required_down_payment {
        warnings.push(format!(
            "Down payment and subsidy fall {} short of the required down payment of {}",
            financing.down_payment_shortfall, financing.required_down_payment
        ));
    }
    if financing.credit_amount.is_zero() {
        warnings.push("Upfront resources cover the full project value; no credit is needed".into());
    }

    let output = SimulationOutput {
        effective_input: clamped.input,
        adjustments: clamped.adjustments,
        financing,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate monthly annuity after upfront resources",
        input,
        warnings,
        elapsed,
        output,
    ))
}
