use housing_finance_core::financing::policy::FinancingPolicy;
use housing_finance_core::HousingFinanceError;
use std::fmt;
use std::fs;
use std::path::Path;

/// Errors raised while loading a policy file.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(HousingFinanceError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read policy file: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse policy file: {e}"),
            ConfigError::Invalid(e) => write!(f, "invalid policy: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Parse(value)
    }
}

impl From<HousingFinanceError> for ConfigError {
    fn from(value: HousingFinanceError) -> Self {
        ConfigError::Invalid(value)
    }
}

/// Load the policy from `path`, or the built-in defaults when none is given.
///
/// Keys missing from the file keep their default values.
pub fn load_policy(path: Option<&Path>) -> Result<FinancingPolicy, ConfigError> {
    let Some(path) = path else {
        tracing::debug!("using default financing policy");
        return Ok(FinancingPolicy::default());
    };

    let content = fs::read_to_string(path)?;
    let policy = parse_policy(&content)?;
    tracing::debug!(path = %path.display(), terms = ?policy.allowed_terms, "loaded financing policy");
    Ok(policy)
}

fn parse_policy(content: &str) -> Result<FinancingPolicy, ConfigError> {
    let policy: FinancingPolicy = toml::from_str(content)?;
    policy.validate()?;
    Ok(policy)
}
