use serde_json::Value;

use housing_finance_core::amortization::schedule;

use super::financing::{financing_input, FinancingArgs};

pub fn run_schedule(args: FinancingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let financing = financing_input(&args)?;
    let result = schedule::amortization_schedule(&financing)?;
    tracing::debug!(rows = result.result.rows.len(), "built amortization schedule");
    Ok(serde_json::to_value(result)?)
}
