//! Side-by-side financing plans for every offered term.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::calculator::{compute_financing, FinancingInput};
use super::clamping::clamp_financing_input;
use super::policy::FinancingPolicy;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::HousingFinanceResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermComparisonInput {
    /// Form values; `term_years` is replaced by each offered term.
    pub financing: FinancingInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<FinancingPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermScenario {
    pub term_years: i32,
    pub total_upfront_resources: Money,
    pub credit_amount: Money,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_to_pay: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermComparisonOutput {
    pub scenarios: Vec<TermScenario>,
    pub lowest_total_interest_term: Option<i32>,
    pub lowest_monthly_payment_term: Option<i32>,
}

/// Run the simulator once per allowed term, shortest first.
pub fn compare_terms(
    input: &TermComparisonInput,
) -> HousingFinanceResult<ComputationOutput<TermComparisonOutput>> {
    let start = Instant::now();
    let policy = input.policy.clone().unwrap_or_default();
    let mut warnings: Vec<String> = Vec::new();
    let mut scenarios = Vec::with_capacity(policy.allowed_terms.len());

    for term_years in policy.sorted_terms() {
        let candidate = FinancingInput {
            term_years,
            ..input.financing.clone()
        };
        let clamped = clamp_financing_input(&candidate, &policy)?;
        // Same adjustments repeat per term; report them once.
        if scenarios.is_empty() {
            warnings.extend(clamped.adjustments.iter().map(|a| a.message()));
        }
        let result = compute_financing(&clamped.input)?;
        scenarios.push(TermScenario {
            term_years,
            total_upfront_resources: result.total_upfront_resources,
            credit_amount: result.credit_amount,
            monthly_payment: result.monthly_payment,
            total_interest: result.total_interest,
            total_to_pay: result.total_to_pay,
        });
    }

    // Ties go to the shorter term.
    let lowest_total_interest_term = scenarios
        .iter()
        .min_by(|a, b| a.total_interest.cmp(&b.total_interest))
        .map(|s| s.term_years);
    let lowest_monthly_payment_term = scenarios
        .iter()
        .min_by(|a, b| a.monthly_payment.cmp(&b.monthly_payment))
        .map(|s| s.term_years);

    let output = TermComparisonOutput {
        scenarios,
        lowest_total_interest_term,
        lowest_monthly_payment_term,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate monthly annuity across offered terms",
        input,
        warnings,
        elapsed,
        output,
    ))
}
