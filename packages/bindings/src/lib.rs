use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Financing
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_financing(input_json: String) -> NapiResult<String> {
    let input: housing_finance_core::financing::calculator::FinancingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = housing_finance_core::financing::calculator::compute_financing(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_financing(input_json: String) -> NapiResult<String> {
    let input: housing_finance_core::financing::simulator::SimulationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = housing_finance_core::financing::simulator::simulate_financing(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_terms(input_json: String) -> NapiResult<String> {
    let input: housing_finance_core::financing::comparison::TermComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        housing_finance_core::financing::comparison::compare_terms(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Default policy, so a form can show caps and offered terms before the
/// first simulation.
#[napi]
pub fn default_financing_policy() -> NapiResult<String> {
    let policy = housing_finance_core::financing::policy::FinancingPolicy::default();
    serde_json::to_string(&policy).map_err(to_napi_error)
}

#[derive(serde::Deserialize)]
struct RateSweepInput {
    financing: housing_finance_core::financing::calculator::FinancingInput,
    annual_rates_percent: Vec<rust_decimal::Decimal>,
}

#[derive(serde::Serialize)]
struct RateSweepPoint {
    annual_rate_percent: rust_decimal::Decimal,
    result: housing_finance_core::financing::calculator::FinancingResult,
}

/// Run the calculator once per candidate rate, keeping every other input fixed.
#[napi]
pub fn financing_rate_sweep(input_json: String) -> NapiResult<String> {
    let input: RateSweepInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let points = input
        .annual_rates_percent
        .into_iter()
        .map(|annual_rate_percent| {
            let financing = housing_finance_core::financing::calculator::FinancingInput {
                annual_rate_percent,
                ..input.financing.clone()
            };
            housing_finance_core::financing::calculator::compute_financing(&financing).map(
                |result| RateSweepPoint {
                    annual_rate_percent,
                    result,
                },
            )
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_napi_error)?;
    serde_json::to_string(&points).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: housing_finance_core::financing::calculator::FinancingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = housing_finance_core::amortization::schedule::amortization_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Payment tracking
// ---------------------------------------------------------------------------

#[napi]
pub fn track_payments(input_json: String) -> NapiResult<String> {
    let input: housing_finance_core::tracking::payments::TrackingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        housing_finance_core::tracking::payments::track_payments(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
