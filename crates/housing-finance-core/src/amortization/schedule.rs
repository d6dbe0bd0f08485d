//! Month-by-month amortization of the financed credit.
//!
//! Each level installment pays the month's interest on the outstanding
//! balance first and the remainder goes to principal. The last installment
//! absorbs decimal rounding residue so the balance closes at exactly zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HousingFinanceError;
use crate::financing::calculator::{compute_financing, total_months, FinancingInput, MONTHS_PER_YEAR};
use crate::time_value;
use crate::types::{percent_to_rate, with_metadata, ComputationOutput, Money, Percent};
use crate::HousingFinanceResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based installment number.
    pub month: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    /// Outstanding balance after this installment.
    pub balance: Money,
    pub cumulative_interest: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub credit_amount: Money,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub rows: Vec<AmortizationRow>,
}

/// Build the installment schedule for a credit.
///
/// Returns an empty schedule when there is nothing to finance.
pub fn build_schedule(
    credit_amount: Money,
    annual_rate_percent: Percent,
    term_years: i32,
) -> HousingFinanceResult<Vec<AmortizationRow>> {
    let months = total_months(term_years)?;
    if credit_amount < Decimal::ZERO {
        return Err(HousingFinanceError::InvalidInput {
            field: "credit_amount".into(),
            reason: "Credit amount cannot be negative".into(),
        });
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(HousingFinanceError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if credit_amount.is_zero() {
        return Ok(Vec::new());
    }

    let monthly_rate = percent_to_rate(annual_rate_percent) / Decimal::from(MONTHS_PER_YEAR);
    let payment = time_value::pmt(monthly_rate, months, -credit_amount, Decimal::ZERO)?;

    let mut rows = Vec::with_capacity(months as usize);
    let mut balance = credit_amount;
    let mut cumulative_interest = Decimal::ZERO;

    for month in 1..=months {
        let interest = balance * monthly_rate;
        let (payment, principal) = if month == months {
            (balance + interest, balance)
        } else {
            (payment, (payment - interest).min(balance))
        };

        balance -= principal;
        cumulative_interest += interest;

        rows.push(AmortizationRow {
            month,
            payment,
            interest,
            principal,
            balance,
            cumulative_interest,
        });
    }

    Ok(rows)
}

/// Compute the financing plan for `input` and amortize its credit.
pub fn amortization_schedule(
    input: &FinancingInput,
) -> HousingFinanceResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let financing = compute_financing(input)?;
    let rows = build_schedule(
        financing.credit_amount,
        input.annual_rate_percent,
        input.term_years,
    )?;

    if rows.is_empty() {
        warnings.push("No credit to amortize; upfront resources cover the project value".into());
    }

    let total_interest = rows
        .last()
        .map(|r| r.cumulative_interest)
        .unwrap_or(Decimal::ZERO);

    let output = AmortizationOutput {
        credit_amount: financing.credit_amount,
        monthly_payment: financing.monthly_payment,
        total_interest,
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization, interest first",
        input,
        warnings,
        elapsed,
        output,
    ))
}
