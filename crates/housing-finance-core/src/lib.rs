pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "financing")]
pub mod financing;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "tracking")]
pub mod tracking;

pub use error::HousingFinanceError;
pub use types::*;

/// Standard result type for all housing-finance operations
pub type HousingFinanceResult<T> = Result<T, HousingFinanceError>;
