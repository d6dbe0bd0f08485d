//! Limits applied to simulator inputs before they reach the calculator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::HousingFinanceError;
use crate::types::Money;
use crate::HousingFinanceResult;

/// Canonical loan terms offered by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TermYears {
    Ten,
    Fifteen,
    Twenty,
    TwentyFive,
    Thirty,
}

impl TermYears {
    pub const ALL: [TermYears; 5] = [
        TermYears::Ten,
        TermYears::Fifteen,
        TermYears::Twenty,
        TermYears::TwentyFive,
        TermYears::Thirty,
    ];

    pub fn years(self) -> i32 {
        match self {
            TermYears::Ten => 10,
            TermYears::Fifteen => 15,
            TermYears::Twenty => 20,
            TermYears::TwentyFive => 25,
            TermYears::Thirty => 30,
        }
    }
}

/// Contribution caps and offered terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingPolicy {
    /// Maximum severance-fund contribution per year.
    pub severance_cap_per_year: Money,
    /// Maximum contribution per bonus payment.
    pub bonus_cap_per_payment: Money,
    /// Terms, in years, a simulation may use.
    pub allowed_terms: Vec<i32>,
}

impl Default for FinancingPolicy {
    fn default() -> Self {
        Self {
            severance_cap_per_year: dec!(20_000_000),
            bonus_cap_per_payment: dec!(10_000_000),
            allowed_terms: TermYears::ALL.iter().map(|t| t.years()).collect(),
        }
    }
}

impl FinancingPolicy {
    pub fn validate(&self) -> HousingFinanceResult<()> {
        if self.severance_cap_per_year < Decimal::ZERO {
            return Err(HousingFinanceError::InvalidInput {
                field: "severance_cap_per_year".into(),
                reason: "Cap cannot be negative".into(),
            });
        }
        if self.bonus_cap_per_payment < Decimal::ZERO {
            return Err(HousingFinanceError::InvalidInput {
                field: "bonus_cap_per_payment".into(),
                reason: "Cap cannot be negative".into(),
            });
        }
        if self.allowed_terms.is_empty() {
            return Err(HousingFinanceError::InvalidInput {
                field: "allowed_terms".into(),
                reason: "At least one term must be allowed".into(),
            });
        }
        if let Some(bad) = self.allowed_terms.iter().find(|t| **t <= 0) {
            return Err(HousingFinanceError::InvalidTerm {
                term_years: i64::from(*bad),
            });
        }
        Ok(())
    }

    pub fn allows_term(&self, term_years: i32) -> bool {
        self.allowed_terms.contains(&term_years)
    }

    /// Allowed terms in ascending order without duplicates.
    pub fn sorted_terms(&self) -> Vec<i32> {
        let mut terms = self.allowed_terms.clone();
        terms.sort_unstable();
        terms.dedup();
        terms
    }
}
