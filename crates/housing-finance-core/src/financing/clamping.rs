//! Input clamping for the simulator form.
//!
//! The calculator accepts anything with a positive term; this layer brings
//! raw form values into the valid range and records every adjustment so the
//! caller can warn the user instead of silently absorbing bad input.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculator::FinancingInput;
use super::policy::FinancingPolicy;
use crate::error::HousingFinanceError;
use crate::HousingFinanceResult;

/// A single change made to a form value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub field: String,
    pub original: Decimal,
    pub adjusted: Decimal,
    pub reason: String,
}

impl Adjustment {
    /// User-facing warning text.
    pub fn message(&self) -> String {
        format!(
            "{} adjusted from {} to {}: {}",
            self.field, self.original, self.adjusted, self.reason
        )
    }
}

/// Input ready for the calculator plus what had to change to get there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClampedInput {
    pub input: FinancingInput,
    pub adjustments: Vec<Adjustment>,
}

impl ClampedInput {
    pub fn was_adjusted(&self) -> bool {
        !self.adjustments.is_empty()
    }
}

/// Clamp simulator input to the valid range under `policy`.
///
/// Terms and the project value cannot be repaired and are rejected.
pub fn clamp_financing_input(
    input: &FinancingInput,
    policy: &FinancingPolicy,
) -> HousingFinanceResult<ClampedInput> {
    validate_unclampable(input, policy)?;

    let mut out = input.clone();
    let mut adjustments = Vec::new();

    for (field, value) in [
        ("down_payment", &mut out.down_payment),
        ("subsidy_amount", &mut out.subsidy_amount),
        ("severance_fund_per_year", &mut out.severance_fund_per_year),
        ("bonus_per_payment", &mut out.bonus_per_payment),
        ("annual_rate_percent", &mut out.annual_rate_percent),
    ] {
        if *value < Decimal::ZERO {
            adjustments.push(adjust(field, value, Decimal::ZERO, "value cannot be negative"));
        }
    }

    if out.down_payment > out.project_value {
        let limit = out.project_value;
        adjustments.push(adjust(
            "down_payment",
            &mut out.down_payment,
            limit,
            "down payment cannot exceed the project value",
        ));
    }

    let subsidy_room = out.project_value - out.down_payment;
    if out.subsidy_amount > subsidy_room {
        adjustments.push(adjust(
            "subsidy_amount",
            &mut out.subsidy_amount,
            subsidy_room,
            "down payment plus subsidy cannot exceed the project value",
        ));
    }

    if !out.use_severance_fund && !out.severance_fund_per_year.is_zero() {
        adjustments.push(adjust(
            "severance_fund_per_year",
            &mut out.severance_fund_per_year,
            Decimal::ZERO,
            "severance fund contributions are disabled",
        ));
    } else if out.severance_fund_per_year > policy.severance_cap_per_year {
        adjustments.push(adjust(
            "severance_fund_per_year",
            &mut out.severance_fund_per_year,
            policy.severance_cap_per_year,
            "exceeds the yearly severance fund cap",
        ));
    }

    if !out.use_bonus && !out.bonus_per_payment.is_zero() {
        adjustments.push(adjust(
            "bonus_per_payment",
            &mut out.bonus_per_payment,
            Decimal::ZERO,
            "bonus contributions are disabled",
        ));
    } else if out.bonus_per_payment > policy.bonus_cap_per_payment {
        adjustments.push(adjust(
            "bonus_per_payment",
            &mut out.bonus_per_payment,
            policy.bonus_cap_per_payment,
            "exceeds the per-payment bonus cap",
        ));
    }

    Ok(ClampedInput {
        input: out,
        adjustments,
    })
}

fn validate_unclampable(input: &FinancingInput, policy: &FinancingPolicy) -> HousingFinanceResult<()> {
    policy.validate()?;
    if input.term_years <= 0 {
        return Err(HousingFinanceError::InvalidTerm {
            term_years: i64::from(input.term_years),
        });
    }
    if !policy.allows_term(input.term_years) {
        return Err(HousingFinanceError::InvalidInput {
            field: "term_years".into(),
            reason: format!(
                "{} years is not an offered term (allowed: {:?})",
                input.term_years,
                policy.sorted_terms()
            ),
        });
    }
    if input.project_value <= Decimal::ZERO {
        return Err(HousingFinanceError::InvalidInput {
            field: "project_value".into(),
            reason: "Project value must be positive".into(),
        });
    }
    Ok(())
}

fn adjust(field: &str, value: &mut Decimal, adjusted: Decimal, reason: &str) -> Adjustment {
    let original = *value;
    *value = adjusted;
    Adjustment {
        field: field.into(),
        original,
        adjusted,
        reason: reason.into(),
    }
}
