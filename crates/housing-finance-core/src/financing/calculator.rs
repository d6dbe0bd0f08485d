//! Housing purchase financing calculator.
//!
//! Splits a purchase price between the buyer's upfront resources (down
//! payment, subsidy, severance-fund and bonus contributions) and an
//! installment credit, then prices the credit as a fixed-rate annuity with
//! monthly compounding. Pure and synchronous: no I/O, no shared state.
//!
//! Cross-field limits (down payment within the price, contribution caps,
//! allowed terms) are not enforced here; see [`super::clamping`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::HousingFinanceError;
use crate::time_value::{self, checked};
use crate::types::{percent_to_rate, Money, Percent, Rate};
use crate::HousingFinanceResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Share of the purchase price the buyer must cover up front.
pub const REQUIRED_DOWN_PAYMENT_RATIO: Rate = dec!(0.30);

/// Bonus payments received per year (mid-year and year-end).
pub const BONUS_PAYMENTS_PER_YEAR: i64 = 2;

pub const MONTHS_PER_YEAR: i64 = 12;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Purchase and resource data for one financing simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingInput {
    /// Purchase price of the property.
    pub project_value: Money,
    /// Cash the buyer contributes directly.
    #[serde(default)]
    pub down_payment: Money,
    /// Non-repayable government subsidy.
    #[serde(default)]
    pub subsidy_amount: Money,
    /// Whether yearly severance-fund contributions are applied.
    #[serde(default)]
    pub use_severance_fund: bool,
    /// Severance-fund contribution per year of the term.
    #[serde(default)]
    pub severance_fund_per_year: Money,
    /// Whether semiannual bonus contributions are applied.
    #[serde(default)]
    pub use_bonus: bool,
    /// Contribution per bonus payment (two per year).
    #[serde(default)]
    pub bonus_per_payment: Money,
    /// Loan term in years.
    pub term_years: i32,
    /// Annual nominal interest rate as a percentage (1.7 = 1.7%).
    pub annual_rate_percent: Percent,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Share of the purchase price covered by each funding source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingBreakdown {
    pub down_payment_share: Rate,
    pub subsidy_share: Rate,
    pub severance_share: Rate,
    pub bonus_share: Rate,
    pub credit_share: Rate,
}

/// Derived financing figures. Recomputed in full on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingResult {
    pub required_down_payment: Money,
    /// Part of the required down payment not covered by cash and subsidy.
    pub down_payment_shortfall: Money,
    pub meets_required_down_payment: bool,
    pub severance_contribution: Money,
    pub bonus_contribution: Money,
    pub total_upfront_resources: Money,
    pub credit_amount: Money,
    pub total_months: u32,
    pub monthly_rate: Rate,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_to_pay: Money,
    pub funding_breakdown: FundingBreakdown,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the financing plan for a purchase.
///
/// Fails only with [`HousingFinanceError::InvalidTerm`] when the term is not
/// positive, or [`HousingFinanceError::NumericOverflow`] when amounts, rate
/// and term push an intermediate beyond decimal range.
pub fn compute_financing(input: &FinancingInput) -> HousingFinanceResult<FinancingResult> {
    let total_months = total_months(input.term_years)?;
    let term = Decimal::from(input.term_years);

    let required_down_payment = input.project_value * REQUIRED_DOWN_PAYMENT_RATIO;

    let severance_contribution = if input.use_severance_fund {
        checked(
            input.severance_fund_per_year.checked_mul(term),
            "severance contribution",
            input.severance_fund_per_year,
        )?
    } else {
        Decimal::ZERO
    };
    let bonus_contribution = if input.use_bonus {
        checked(
            input
                .bonus_per_payment
                .checked_mul(term * Decimal::from(BONUS_PAYMENTS_PER_YEAR)),
            "bonus contribution",
            input.bonus_per_payment,
        )?
    } else {
        Decimal::ZERO
    };

    let total_upfront_resources = [
        input.subsidy_amount,
        severance_contribution,
        bonus_contribution,
    ]
    .into_iter()
    .try_fold(input.down_payment, |acc, x| {
        checked(acc.checked_add(x), "total upfront resources", acc)
    })?;

    let credit_amount = checked(
        input.project_value.checked_sub(total_upfront_resources),
        "credit amount",
        total_upfront_resources,
    )?
    .max(Decimal::ZERO);

    let monthly_rate = percent_to_rate(input.annual_rate_percent) / Decimal::from(MONTHS_PER_YEAR);

    let monthly_payment = if credit_amount > Decimal::ZERO {
        // Negative present value yields a positive payment; zero rate falls
        // back to straight-line inside pmt.
        time_value::pmt(monthly_rate, total_months, -credit_amount, Decimal::ZERO)?
    } else {
        Decimal::ZERO
    };

    let months = Decimal::from(total_months);
    let total_installments = checked(
        monthly_payment.checked_mul(months),
        "total installments",
        monthly_payment,
    )?;
    let total_interest = if credit_amount > Decimal::ZERO {
        (total_installments - credit_amount).max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };
    let total_to_pay = checked(
        total_installments.checked_add(total_upfront_resources),
        "total to pay",
        total_installments,
    )?;

    let down_payment_shortfall = checked(
        required_down_payment
            .checked_sub(input.down_payment)
            .and_then(|rest| rest.checked_sub(input.subsidy_amount)),
        "down payment shortfall",
        required_down_payment,
    )?
    .max(Decimal::ZERO);

    let funding_breakdown = FundingBreakdown {
        down_payment_share: share(input.down_payment, input.project_value)?,
        subsidy_share: share(input.subsidy_amount, input.project_value)?,
        severance_share: share(severance_contribution, input.project_value)?,
        bonus_share: share(bonus_contribution, input.project_value)?,
        credit_share: share(credit_amount, input.project_value)?,
    };

    Ok(FinancingResult {
        required_down_payment,
        down_payment_shortfall,
        meets_required_down_payment: down_payment_shortfall.is_zero(),
        severance_contribution,
        bonus_contribution,
        total_upfront_resources,
        credit_amount,
        total_months,
        monthly_rate,
        monthly_payment,
        total_interest,
        total_to_pay,
        funding_breakdown,
    })
}

/// Number of monthly installments for a term, rejecting non-positive terms.
pub fn total_months(term_years: i32) -> HousingFinanceResult<u32> {
    if term_years <= 0 {
        return Err(HousingFinanceError::InvalidTerm {
            term_years: i64::from(term_years),
        });
    }
    u32::try_from(i64::from(term_years) * MONTHS_PER_YEAR).map_err(|_| {
        HousingFinanceError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Term of {term_years} years exceeds the supported range"),
        }
    })
}

fn share(part: Money, whole: Money) -> HousingFinanceResult<Rate> {
    if whole > Decimal::ZERO {
        checked(part.checked_div(whole), "funding share", part)
    } else {
        Ok(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.000001);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn base_input() -> FinancingInput {
        FinancingInput {
            project_value: dec!(280_000_000),
            down_payment: dec!(0),
            subsidy_amount: dec!(0),
            use_severance_fund: false,
            severance_fund_per_year: dec!(0),
            use_bonus: false,
            bonus_per_payment: dec!(0),
            term_years: 20,
            annual_rate_percent: dec!(1.7),
        }
    }

    #[test]
    fn test_full_financing_without_resources() {
        let result = compute_financing(&base_input()).unwrap();
        assert_eq!(result.credit_amount, dec!(280_000_000));
        assert_eq!(result.required_down_payment, dec!(84_000_000));
        assert_eq!(result.total_upfront_resources, dec!(0));
        assert_eq!(result.total_months, 240);
        assert!(!result.meets_required_down_payment);
        assert_eq!(result.down_payment_shortfall, dec!(84_000_000));
    }

    #[test]
    fn test_annuity_payment_matches_closed_form() {
        let input = FinancingInput {
            project_value: dec!(100_000),
            annual_rate_percent: dec!(6),
            term_years: 30,
            ..base_input()
        };
        let result = compute_financing(&input).unwrap();
        // 100k at 6%/12 over 360 months ≈ 599.55
        assert_close(result.monthly_payment, dec!(599.55), dec!(0.01), "monthly payment");
        assert_close(
            result.total_interest,
            result.monthly_payment * dec!(360) - dec!(100_000),
            TOL,
            "total interest",
        );
        assert_eq!(result.monthly_rate, dec!(0.005));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let input = FinancingInput {
            project_value: dec!(120_000_000),
            term_years: 10,
            annual_rate_percent: dec!(0),
            ..base_input()
        };
        let result = compute_financing(&input).unwrap();
        assert_eq!(result.monthly_payment, dec!(1_000_000));
        assert_eq!(result.total_interest, dec!(0));
        assert_eq!(result.total_to_pay, dec!(120_000_000));
    }

    #[test]
    fn test_severance_and_bonus_contributions() {
        let input = FinancingInput {
            use_severance_fund: true,
            severance_fund_per_year: dec!(2_000_000),
            use_bonus: true,
            bonus_per_payment: dec!(1_000_000),
            ..base_input()
        };
        let result = compute_financing(&input).unwrap();
        assert_eq!(result.severance_contribution, dec!(40_000_000));
        assert_eq!(result.bonus_contribution, dec!(40_000_000));
        assert_eq!(result.total_upfront_resources, dec!(80_000_000));
        assert_eq!(result.credit_amount, dec!(200_000_000));
    }

    #[test]
    fn test_disabled_flags_ignore_amounts() {
        let input = FinancingInput {
            severance_fund_per_year: dec!(2_000_000),
            bonus_per_payment: dec!(1_000_000),
            ..base_input()
        };
        let result = compute_financing(&input).unwrap();
        assert_eq!(result.severance_contribution, dec!(0));
        assert_eq!(result.bonus_contribution, dec!(0));
        assert_eq!(result.credit_amount, dec!(280_000_000));
    }

    #[test]
    fn test_resources_exceeding_price_clamp_credit() {
        let input = FinancingInput {
            project_value: dec!(100_000_000),
            down_payment: dec!(60_000_000),
            subsidy_amount: dec!(30_000_000),
            use_bonus: true,
            bonus_per_payment: dec!(5_000_000),
            ..base_input()
        };
        let result = compute_financing(&input).unwrap();
        assert_eq!(result.total_upfront_resources, dec!(290_000_000));
        assert_eq!(result.credit_amount, dec!(0));
        assert_eq!(result.monthly_payment, dec!(0));
        assert_eq!(result.total_interest, dec!(0));
        assert_eq!(result.total_to_pay, dec!(290_000_000));
    }

    #[test]
    fn test_funding_breakdown_shares() {
        let input = FinancingInput {
            project_value: dec!(200_000_000),
            down_payment: dec!(60_000_000),
            subsidy_amount: dec!(20_000_000),
            ..base_input()
        };
        let result = compute_financing(&input).unwrap();
        let b = &result.funding_breakdown;
        assert_eq!(b.down_payment_share, dec!(0.3));
        assert_eq!(b.subsidy_share, dec!(0.1));
        assert_eq!(b.credit_share, dec!(0.6));
        assert!(result.meets_required_down_payment);
    }

    #[test]
    fn test_zero_project_value_has_zero_shares() {
        let input = FinancingInput {
            project_value: dec!(0),
            ..base_input()
        };
        let result = compute_financing(&input).unwrap();
        assert_eq!(result.credit_amount, dec!(0));
        assert_eq!(result.funding_breakdown.credit_share, dec!(0));
    }

    #[test]
    fn test_invalid_terms() {
        for term in [0, -1, -30] {
            let input = FinancingInput {
                term_years: term,
                ..base_input()
            };
            match compute_financing(&input) {
                Err(HousingFinanceError::InvalidTerm { term_years }) => {
                    assert_eq!(term_years, i64::from(term))
                }
                other => panic!("expected InvalidTerm, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_extreme_rate_reports_overflow() {
        let input = FinancingInput {
            term_years: 30,
            annual_rate_percent: dec!(200),
            ..base_input()
        };
        match compute_financing(&input) {
            Err(HousingFinanceError::NumericOverflow { .. }) => {}
            other => panic!("expected NumericOverflow, got {other:?}"),
        }
    }

    #[test]
    fn test_huge_contributions_report_overflow() {
        let input = FinancingInput {
            use_severance_fund: true,
            severance_fund_per_year: Decimal::MAX,
            ..base_input()
        };
        assert!(matches!(
            compute_financing(&input),
            Err(HousingFinanceError::NumericOverflow { .. })
        ));
    }

    #[test]
    fn test_total_months_out_of_range() {
        assert!(matches!(
            total_months(i32::MAX),
            Err(HousingFinanceError::InvalidInput { .. })
        ));
        assert_eq!(total_months(25).unwrap(), 300);
    }
}
