use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::HousingFinanceError;
use crate::types::{Money, Rate};
use crate::HousingFinanceResult;

/// Compound growth factor (1 + rate)^nper.
pub fn compound_factor(rate: Rate, nper: u32) -> HousingFinanceResult<Decimal> {
    let one_plus_r = Decimal::ONE + rate;
    one_plus_r
        .checked_powu(u64::from(nper))
        .ok_or_else(|| HousingFinanceError::NumericOverflow {
            context: format!("compound factor over {nper} periods"),
            value: one_plus_r,
        })
}

/// Future Value
pub fn fv(rate: Rate, nper: u32, pmt: Money, present_value: Money) -> HousingFinanceResult<Money> {
    if rate.is_zero() {
        let paid = checked(pmt.checked_mul(Decimal::from(nper)), "FV payment total", pmt)?;
        return checked(present_value.checked_add(paid), "FV", present_value).map(|v| -v);
    }

    let factor = compound_factor(rate, nper)?;
    let annuity_factor = checked((factor - Decimal::ONE).checked_div(rate), "FV annuity factor", factor)?;

    let grown = checked(present_value.checked_mul(factor), "FV present value growth", factor)?;
    let accrued = checked(pmt.checked_mul(annuity_factor), "FV payment growth", annuity_factor)?;
    checked(grown.checked_add(accrued), "FV", grown).map(|v| -v)
}

/// Payment (PMT)
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> HousingFinanceResult<Money> {
    if nper == 0 {
        return Err(HousingFinanceError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        let total = checked(present_value.checked_add(future_value), "PMT", present_value)?;
        return Ok(-total / Decimal::from(nper));
    }

    let factor = compound_factor(rate, nper)?;
    let annuity_factor = checked((factor - Decimal::ONE).checked_div(rate), "PMT annuity factor", factor)?;

    if annuity_factor.is_zero() {
        return Err(HousingFinanceError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    let grown = checked(present_value.checked_mul(factor), "PMT present value growth", factor)?;
    let target = checked(grown.checked_add(future_value), "PMT", grown)?;
    checked(target.checked_div(annuity_factor), "PMT", target).map(|v| -v)
}

/// Map a failed checked operation to [`HousingFinanceError::NumericOverflow`].
pub(crate) fn checked(result: Option<Decimal>, context: &str, value: Decimal) -> HousingFinanceResult<Decimal> {
    result.ok_or_else(|| HousingFinanceError::NumericOverflow {
        context: context.into(),
        value,
    })
}

/// Outstanding principal of a level-payment loan after `paid` installments.
/// Clamped at zero.
pub fn remaining_balance(
    principal: Money,
    rate: Rate,
    payment: Money,
    paid: u32,
) -> HousingFinanceResult<Money> {
    let balance = fv(rate, paid, payment, -principal)?;
    Ok(balance.max(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pmt_basic() {
        // 100k over 360 months at 0.5% monthly ≈ 599.55
        let result = pmt(dec!(0.005), 360, dec!(-100_000), dec!(0)).unwrap();
        assert!((result - dec!(599.55)).abs() < dec!(0.01));
    }

    #[test]
    fn test_pmt_zero_rate() {
        let result = pmt(dec!(0), 120, dec!(-12_000), dec!(0)).unwrap();
        assert_eq!(result, dec!(100));
    }

    #[test]
    fn test_pmt_zero_periods() {
        assert!(pmt(dec!(0.01), 0, dec!(-1000), dec!(0)).is_err());
    }

    #[test]
    fn test_fv_basic() {
        // 1000 at 10% for 2 periods, no payments: 1210
        let result = fv(dec!(0.10), 2, dec!(0), dec!(-1000)).unwrap();
        assert_eq!(result, dec!(1210));
    }

    #[test]
    fn test_remaining_balance_reaches_zero_at_maturity() {
        let payment = pmt(dec!(0.005), 120, dec!(-50_000), dec!(0)).unwrap();
        let balance = remaining_balance(dec!(50_000), dec!(0.005), payment, 120).unwrap();
        assert!(balance < dec!(0.0001));
        let halfway = remaining_balance(dec!(50_000), dec!(0.005), payment, 60).unwrap();
        assert!(halfway > dec!(0) && halfway < dec!(50_000));
    }

    #[test]
    fn test_pmt_overflow_is_an_error() {
        // (1 + 2/12)^360 fits in a Decimal, the grown principal does not.
        let err = pmt(dec!(2) / dec!(12), 360, dec!(-280_000_000), dec!(0)).unwrap_err();
        assert!(matches!(err, HousingFinanceError::NumericOverflow { .. }));
    }

    #[test]
    fn test_fv_overflow_is_an_error() {
        let err = fv(dec!(2) / dec!(12), 360, dec!(0), dec!(-280_000_000)).unwrap_err();
        assert!(matches!(err, HousingFinanceError::NumericOverflow { .. }));
    }

    #[test]
    fn test_compound_factor_overflow() {
        let err = compound_factor(dec!(1_000_000), 360).unwrap_err();
        assert!(matches!(err, HousingFinanceError::NumericOverflow { .. }));
    }
}
