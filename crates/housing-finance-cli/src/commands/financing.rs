use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use housing_finance_core::financing::calculator::{self, FinancingInput};
use housing_finance_core::financing::comparison::{self, TermComparisonInput};
use housing_finance_core::financing::policy::FinancingPolicy;
use housing_finance_core::financing::simulator::{self, SimulationInput};

use crate::input;

/// Purchase and resource values shared by the financing commands
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct FinancingArgs {
    /// Purchase price of the property
    #[arg(long, alias = "price")]
    pub project_value: Option<Decimal>,

    /// Cash contributed up front
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Government housing subsidy
    #[arg(long, alias = "subsidy")]
    pub subsidy_amount: Option<Decimal>,

    /// Severance-fund contribution per year (enables severance contributions)
    #[arg(long)]
    pub severance_per_year: Option<Decimal>,

    /// Contribution per bonus payment, two per year (enables bonus contributions)
    #[arg(long)]
    pub bonus_per_payment: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "20")]
    pub term_years: i32,

    /// Annual nominal interest rate in percent (e.g. 12.5 for 12.5%)
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Build the calculator input from individual flags.
pub fn from_flags(args: &FinancingArgs) -> Result<FinancingInput, Box<dyn std::error::Error>> {
    Ok(FinancingInput {
        project_value: args
            .project_value
            .ok_or("--project-value is required (or provide --input)")?,
        down_payment: args.down_payment.unwrap_or(Decimal::ZERO),
        subsidy_amount: args.subsidy_amount.unwrap_or(Decimal::ZERO),
        use_severance_fund: args.severance_per_year.is_some(),
        severance_fund_per_year: args.severance_per_year.unwrap_or(Decimal::ZERO),
        use_bonus: args.bonus_per_payment.is_some(),
        bonus_per_payment: args.bonus_per_payment.unwrap_or(Decimal::ZERO),
        term_years: args.term_years,
        annual_rate_percent: args
            .annual_rate_percent
            .ok_or("--annual-rate-percent is required (or provide --input)")?,
    })
}

/// Input from `--input`, piped stdin, or flags, in that order.
pub fn financing_input(args: &FinancingArgs) -> Result<FinancingInput, Box<dyn std::error::Error>> {
    match input::read_input(args.input.as_deref())? {
        Some(parsed) => Ok(parsed),
        None => from_flags(args),
    }
}

pub fn run_financing(args: FinancingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let financing = financing_input(&args)?;
    tracing::info!(term_years = financing.term_years, "computing financing");
    let result = calculator::compute_financing(&financing)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_simulate(args: FinancingArgs, policy: FinancingPolicy) -> Result<Value, Box<dyn std::error::Error>> {
    let sim_input = SimulationInput {
        financing: financing_input(&args)?,
        policy: Some(policy),
    };
    let result = simulator::simulate_financing(&sim_input)?;
    if !result.result.adjustments.is_empty() {
        tracing::info!(count = result.result.adjustments.len(), "inputs clamped to policy limits");
    }
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare_terms(args: FinancingArgs, policy: FinancingPolicy) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input = TermComparisonInput {
        financing: financing_input(&args)?,
        policy: Some(policy),
    };
    let result = comparison::compare_terms(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args() -> FinancingArgs {
        FinancingArgs {
            project_value: Some(dec!(280_000_000)),
            down_payment: Some(dec!(84_000_000)),
            subsidy_amount: None,
            severance_per_year: Some(dec!(1_000_000)),
            bonus_per_payment: None,
            term_years: 20,
            annual_rate_percent: Some(dec!(1.7)),
            input: None,
        }
    }

    #[test]
    fn test_flags_enable_contributions() {
        let input = from_flags(&args()).unwrap();
        assert!(input.use_severance_fund);
        assert!(!input.use_bonus);
        assert_eq!(input.subsidy_amount, dec!(0));
        assert_eq!(input.severance_fund_per_year, dec!(1_000_000));
    }

    #[test]
    fn test_missing_required_flags() {
        let mut a = args();
        a.project_value = None;
        let err = from_flags(&a).unwrap_err();
        assert!(err.to_string().contains("--project-value"));

        let mut a = args();
        a.annual_rate_percent = None;
        assert!(from_flags(&a).is_err());
    }
}
