//! Procurement configuration
//!
//! Loads risk policy and ledger wording from TOML. Every field has a default,
//! so a file only needs the values it changes:
//!
//! ```toml
//! [risk]
//! disqualification_threshold = 40
//! low_ball_discount = "0.35"
//!
//! [ledger]
//! closeout_statement = "Contract closed."
//! risk_engine_id = "RULES_V2"
//! ```

use procurechain_risk::{PolicyError, RiskPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write TOML
    #[error("Failed to serialize config TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Risk policy values are inconsistent
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// Some other value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Text recorded into ledger blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// Message sealed into every genesis block
    pub genesis_message: String,

    /// Statement sealed into the closeout block
    pub closeout_statement: String,

    /// Notes recorded when an acceptance carries none
    pub default_acceptance_notes: String,

    /// Actor id recorded on evaluation blocks
    pub risk_engine_id: String,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            genesis_message: "Genesis block - ledger initialized".to_string(),
            closeout_statement: "All deliverables accepted. Contract closed. Ledger remains immutable."
                .to_string(),
            default_acceptance_notes: "Accepted - meets requirements.".to_string(),
            risk_engine_id: "RULES_V1".to_string(),
        }
    }
}

/// Top-level configuration for a procurement registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcurementConfig {
    /// Risk rule weights and thresholds
    pub risk: RiskPolicy,

    /// Ledger wording
    pub ledger: LedgerSettings,
}

impl ProcurementConfig {
    /// Strict risk policy with default ledger wording
    pub fn strict() -> Self {
        Self {
            risk: RiskPolicy::strict(),
            ledger: LedgerSettings::default(),
        }
    }

    /// Lenient risk policy with default ledger wording
    pub fn lenient() -> Self {
        Self {
            risk: RiskPolicy::lenient(),
            ledger: LedgerSettings::default(),
        }
    }

    /// Parse and validate TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: ProcurementConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Check every value
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.risk.validate()?;

        if self.ledger.genesis_message.trim().is_empty() {
            return Err(ConfigError::Invalid("ledger.genesis_message must not be empty".to_string()));
        }
        if self.ledger.closeout_statement.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "ledger.closeout_statement must not be empty".to_string(),
            ));
        }
        if self.ledger.risk_engine_id.trim().is_empty() {
            return Err(ConfigError::Invalid("ledger.risk_engine_id must not be empty".to_string()));
        }
        Ok(())
    }
}
