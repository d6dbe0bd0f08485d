use clap::Args;
use serde_json::Value;

use housing_finance_core::tracking::payments::{self, TrackingInput};

use crate::input;

#[derive(Args)]
pub struct TrackPaymentsArgs {
    /// Path to JSON file with the plan, recorded payments and as_of date
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_track_payments(args: TrackPaymentsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tracking_input: TrackingInput = input::read_input(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for payment tracking")?;
    tracing::debug!(payments = tracking_input.payments.len(), as_of = %tracking_input.as_of, "tracking payments");
    let result = payments::track_payments(&tracking_input)?;
    Ok(serde_json::to_value(result)?)
}
