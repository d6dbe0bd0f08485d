//! Payment tracking against a financing plan.
//!
//! Replays recorded payments against the plan's due dates: interest accrues
//! on the outstanding balance at each due date, and each payment settles
//! accrued interest before reducing principal. The result is compared with
//! what the plan expected to have been paid by the `as_of` date.

use chrono::{Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HousingFinanceError;
use crate::financing::calculator::{total_months, MONTHS_PER_YEAR};
use crate::time_value::{self, checked};
use crate::types::{percent_to_rate, with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::HousingFinanceResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Difference between paid and expected within which the plan is on track.
const ON_TRACK_TOLERANCE: Money = dec!(1);

/// Balance below which the credit is considered repaid.
const BALANCE_EPSILON: Money = dec!(0.01);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub credit_amount: Money,
    pub annual_rate_percent: Percent,
    pub term_years: i32,
    /// Disbursement date; installment k falls due k months later.
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedPayment {
    pub date: NaiveDate,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingInput {
    pub plan: PaymentPlan,
    #[serde(default)]
    pub payments: Vec<RecordedPayment>,
    pub as_of: NaiveDate,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Ahead,
    OnTrack,
    Behind,
    PaidOff,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingOutput {
    pub monthly_payment: Money,
    pub total_months: u32,
    pub installments_due: u32,
    pub installments_covered: u32,
    pub expected_paid: Money,
    pub total_paid: Money,
    /// Paid minus expected; negative means arrears.
    pub variance: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    /// Interest accrued at due dates and not yet paid.
    pub unpaid_interest: Money,
    pub outstanding_balance: Money,
    /// Balance the plan expects after the installments due so far.
    pub scheduled_balance: Money,
    /// Paid beyond what the credit required.
    pub overpayment: Money,
    /// Principal repaid as a fraction of the credit.
    pub progress: Rate,
    pub next_due_date: Option<NaiveDate>,
    pub ignored_payments: u32,
    pub status: PaymentStatus,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare recorded payments with the plan as of `input.as_of`.
pub fn track_payments(input: &TrackingInput) -> HousingFinanceResult<ComputationOutput<TrackingOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let plan = &input.plan;

    let months = total_months(plan.term_years)?;
    validate(input)?;

    let monthly_rate = percent_to_rate(plan.annual_rate_percent) / Decimal::from(MONTHS_PER_YEAR);
    let monthly_payment = if plan.credit_amount > Decimal::ZERO {
        time_value::pmt(monthly_rate, months, -plan.credit_amount, Decimal::ZERO)?
    } else {
        Decimal::ZERO
    };

    let due_dates = due_dates_through(plan.start_date, months, input.as_of)?;
    let installments_due = due_dates.len() as u32;

    let mut payments: Vec<&RecordedPayment> = Vec::with_capacity(input.payments.len());
    let mut ignored_payments = 0u32;
    for p in &input.payments {
        if p.date < plan.start_date || p.date > input.as_of {
            ignored_payments += 1;
            warnings.push(format!(
                "Payment of {} on {} ignored: outside {} to {}",
                p.amount, p.date, plan.start_date, input.as_of
            ));
        } else {
            payments.push(p);
        }
    }
    // Stable sort keeps entry order for same-day payments.
    payments.sort_by_key(|p| p.date);

    let mut balance = plan.credit_amount;
    let mut unpaid_interest = Decimal::ZERO;
    let mut principal_paid = Decimal::ZERO;
    let mut interest_paid = Decimal::ZERO;
    let mut overpayment = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    let mut due_iter = due_dates.iter().peekable();
    for payment in &payments {
        // Due dates on the payment day accrue before the payment settles.
        while due_iter.next_if(|d| **d <= payment.date).is_some() {
            unpaid_interest += balance * monthly_rate;
        }

        total_paid = checked(total_paid.checked_add(payment.amount), "total paid", total_paid)?;
        let to_interest = payment.amount.min(unpaid_interest);
        unpaid_interest -= to_interest;
        interest_paid += to_interest;

        let remainder = payment.amount - to_interest;
        let to_principal = remainder.min(balance);
        balance -= to_principal;
        principal_paid += to_principal;
        overpayment += remainder - to_principal;
    }
    for _ in due_iter {
        unpaid_interest += balance * monthly_rate;
    }

    let expected_paid = monthly_payment * Decimal::from(installments_due);
    let variance = total_paid - expected_paid;

    let installments_covered = if monthly_payment > Decimal::ZERO {
        ((total_paid + BALANCE_EPSILON) / monthly_payment)
            .floor()
            .to_u32()
            .unwrap_or(months)
            .min(months)
    } else {
        0
    };

    let scheduled_balance =
        time_value::remaining_balance(plan.credit_amount, monthly_rate, monthly_payment, installments_due)?;

    let progress = if plan.credit_amount > Decimal::ZERO {
        principal_paid / plan.credit_amount
    } else {
        Decimal::ONE
    };

    let status = if balance < BALANCE_EPSILON && unpaid_interest < BALANCE_EPSILON {
        PaymentStatus::PaidOff
    } else if variance > ON_TRACK_TOLERANCE {
        PaymentStatus::Ahead
    } else if variance < -ON_TRACK_TOLERANCE {
        PaymentStatus::Behind
    } else {
        PaymentStatus::OnTrack
    };

    let next_due_date = if status == PaymentStatus::PaidOff || installments_due >= months {
        None
    } else {
        plan.start_date.checked_add_months(Months::new(installments_due + 1))
    };

    match status {
        PaymentStatus::Behind => warnings.push(format!(
            "Payments are {} behind the plan ({} of {} installments due)",
            -variance, installments_due, months
        )),
        PaymentStatus::PaidOff if installments_due < months => {
            warnings.push("Credit repaid before the end of the term".into())
        }
        _ => {}
    }
    if overpayment > Decimal::ZERO {
        warnings.push(format!("Payments exceed the credit by {overpayment}"));
    }

    let output = TrackingOutput {
        monthly_payment,
        total_months: months,
        installments_due,
        installments_covered,
        expected_paid,
        total_paid,
        variance,
        principal_paid,
        interest_paid,
        unpaid_interest,
        outstanding_balance: balance,
        scheduled_balance,
        overpayment,
        progress,
        next_due_date,
        ignored_payments,
        status,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Payment replay against level-payment plan, interest first",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate(input: &TrackingInput) -> HousingFinanceResult<()> {
    let plan = &input.plan;
    if plan.credit_amount < Decimal::ZERO {
        return Err(HousingFinanceError::InvalidInput {
            field: "plan.credit_amount".into(),
            reason: "Credit amount cannot be negative".into(),
        });
    }
    if plan.annual_rate_percent < Decimal::ZERO {
        return Err(HousingFinanceError::InvalidInput {
            field: "plan.annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if let Some(p) = input.payments.iter().find(|p| p.amount < Decimal::ZERO) {
        return Err(HousingFinanceError::InvalidInput {
            field: "payments".into(),
            reason: format!("Payment on {} has negative amount {}", p.date, p.amount),
        });
    }
    if input.as_of < plan.start_date {
        return Err(HousingFinanceError::DateError(format!(
            "as_of {} is before the plan start date {}",
            input.as_of, plan.start_date
        )));
    }
    Ok(())
}

/// Due dates of installments 1..=months falling on or before `as_of`.
fn due_dates_through(start: NaiveDate, months: u32, as_of: NaiveDate) -> HousingFinanceResult<Vec<NaiveDate>> {
    let mut dates = Vec::new();
    for k in 1..=months {
        let due = start.checked_add_months(Months::new(k)).ok_or_else(|| {
            HousingFinanceError::DateError(format!("installment {k} after {start} is out of range"))
        })?;
        if due > as_of {
            break;
        }
        dates.push(due);
    }
    Ok(dates)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
