use housing_finance_core::financing::calculator::{self, FinancingInput};
use housing_finance_core::financing::clamping;
use housing_finance_core::financing::comparison;
use housing_finance_core::financing::policy::FinancingPolicy;
use housing_finance_core::HousingFinanceError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn scenario_a() -> FinancingInput {
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

fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected ~{expected}, got {actual}"
    );
}

// ===========================================================================
// Reference scenarios
// ===========================================================================

#[test]
fn test_scenario_a_no_resources() {
    let result = calculator::compute_financing(&scenario_a()).unwrap();
    assert_eq!(result.credit_amount, dec!(280_000_000));
    assert_eq!(result.required_down_payment, dec!(84_000_000));
    assert!(result.monthly_payment > dec!(0));
    // 1.7% / 12 monthly over 240 months
    assert_close(result.monthly_payment, dec!(1_377_035.58), dec!(0.01));
}

#[test]
fn test_scenario_b_down_payment_and_subsidy() {
    let input = FinancingInput {
        down_payment: dec!(84_000_000),
        subsidy_amount: dec!(15_000_000),
        ..scenario_a()
    };
    let result = calculator::compute_financing(&input).unwrap();
    assert_eq!(result.total_upfront_resources, dec!(99_000_000));
    assert_eq!(result.credit_amount, dec!(181_000_000));
    assert!(result.meets_required_down_payment);
}

#[test]
fn test_scenario_c_fully_covered() {
    let input = FinancingInput {
        project_value: dec!(100_000_000),
        down_payment: dec!(100_000_000),
        ..scenario_a()
    };
    let result = calculator::compute_financing(&input).unwrap();
    assert_eq!(result.credit_amount, dec!(0));
    assert_eq!(result.monthly_payment, dec!(0));
    assert_eq!(result.total_interest, dec!(0));
    assert_eq!(result.total_to_pay, dec!(100_000_000));
}

#[test]
fn test_scenario_d_zero_term() {
    let input = FinancingInput {
        term_years: 0,
        ..scenario_a()
    };
    match calculator::compute_financing(&input) {
        Err(HousingFinanceError::InvalidTerm { term_years }) => assert_eq!(term_years, 0),
        other => panic!("expected InvalidTerm, got {other:?}"),
    }
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_credit_never_negative() {
    for down in [dec!(0), dec!(50_000_000), dec!(280_000_000), dec!(400_000_000)] {
        for subsidy in [dec!(0), dec!(30_000_000), dec!(280_000_000)] {
            let input = FinancingInput {
                down_payment: down,
                subsidy_amount: subsidy,
                ..scenario_a()
            };
            let result = calculator::compute_financing(&input).unwrap();
            assert!(result.credit_amount >= dec!(0));
            assert!(result.monthly_payment >= dec!(0));
            assert!(result.total_interest >= dec!(0));
            if result.total_upfront_resources >= input.project_value {
                assert_eq!(result.credit_amount, dec!(0));
                assert_eq!(result.monthly_payment, dec!(0));
            }
        }
    }
}

#[test]
fn test_zero_rate_payment_is_credit_over_months() {
    for term in [10, 15, 20, 25, 30] {
        let input = FinancingInput {
            term_years: term,
            annual_rate_percent: dec!(0),
            down_payment: dec!(37_000_000),
            ..scenario_a()
        };
        let result = calculator::compute_financing(&input).unwrap();
        let expected = result.credit_amount / Decimal::from(term * 12);
        assert_close(result.monthly_payment, expected, dec!(0.0000001));
    }
}

#[test]
fn test_idempotent() {
    let input = FinancingInput {
        down_payment: dec!(84_000_000),
        use_bonus: true,
        bonus_per_payment: dec!(2_500_000),
        ..scenario_a()
    };
    let first = calculator::compute_financing(&input).unwrap();
    let second = calculator::compute_financing(&input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_negative_terms_always_rejected() {
    for term in [-1, -10, i32::MIN] {
        let input = FinancingInput {
            term_years: term,
            ..scenario_a()
        };
        assert!(matches!(
            calculator::compute_financing(&input),
            Err(HousingFinanceError::InvalidTerm { .. })
        ));
    }
}

#[test]
fn test_higher_rate_costs_more() {
    let low = calculator::compute_financing(&scenario_a()).unwrap();
    let high = calculator::compute_financing(&FinancingInput {
        annual_rate_percent: dec!(13.5),
        ..scenario_a()
    })
    .unwrap();
    assert!(high.monthly_payment > low.monthly_payment);
    assert!(high.total_interest > low.total_interest);
}

// ===========================================================================
// Clamping feeds the calculator
// ===========================================================================

#[test]
fn test_clamped_input_respects_limits() {
    let policy = FinancingPolicy::default();
    let raw = FinancingInput {
        down_payment: dec!(200_000_000),
        subsidy_amount: dec!(150_000_000),
        use_severance_fund: true,
        severance_fund_per_year: dec!(99_000_000),
        use_bonus: true,
        bonus_per_payment: dec!(-3),
        ..scenario_a()
    };
    let clamped = clamping::clamp_financing_input(&raw, &policy).unwrap();
    let input = &clamped.input;
    assert!(input.down_payment + input.subsidy_amount <= input.project_value);
    assert_eq!(input.severance_fund_per_year, policy.severance_cap_per_year);
    assert_eq!(input.bonus_per_payment, dec!(0));
    assert_eq!(clamped.adjustments.len(), 3);

    let result = calculator::compute_financing(input).unwrap();
    assert_eq!(result.credit_amount, dec!(0));
    assert_eq!(
        result.severance_contribution,
        policy.severance_cap_per_year * dec!(20)
    );
}

// ===========================================================================
// Decimal range
// ===========================================================================

#[test]
fn test_extreme_rate_overflows_every_entry_point() {
    let input = FinancingInput {
        term_years: 30,
        annual_rate_percent: dec!(200),
        ..scenario_a()
    };
    assert!(matches!(
        calculator::compute_financing(&input),
        Err(HousingFinanceError::NumericOverflow { .. })
    ));

    let comparison = comparison::TermComparisonInput {
        financing: input,
        policy: None,
    };
    assert!(matches!(
        comparison::compare_terms(&comparison),
        Err(HousingFinanceError::NumericOverflow { .. })
    ));
}

#[test]
fn test_high_but_representable_rate_still_computes() {
    let input = FinancingInput {
        term_years: 10,
        annual_rate_percent: dec!(200),
        ..scenario_a()
    };
    let result = calculator::compute_financing(&input).unwrap();
    // Interest alone on the full credit is 1/6 of it per month.
    assert!(result.monthly_payment > dec!(280_000_000) / dec!(6));
    assert!(result.total_interest > dec!(0));
}
