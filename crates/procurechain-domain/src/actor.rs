//! Who performed a lifecycle event
//!
//! Every sealed event names the role and identifier of the party that caused
//! it. The actor is recorded, not authenticated.

use crate::validation::require_text;
use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier recorded on the genesis block
pub const SYSTEM_ACTOR_ID: &str = "PROCURECHAIN";

/// Capacity in which an actor performed an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    /// The ledger itself (genesis)
    System,

    /// Publishes, closes, awards and closes out
    ContractingOfficer,

    /// Submits bids and deliverables
    Vendor,

    /// Scores bids
    RiskEngine,

    /// Reviews and accepts deliverables
    AgencyQa,
}

impl ActorRole {
    /// Get the role name as written in exports
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::System => "SYSTEM",
            ActorRole::ContractingOfficer => "CONTRACTING_OFFICER",
            ActorRole::Vendor => "VENDOR",
            ActorRole::RiskEngine => "RISK_ENGINE",
            ActorRole::AgencyQa => "AGENCY_QA",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role paired with the identifier of whoever acted in it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    /// Capacity of the actor
    pub role: ActorRole,

    /// Caller-supplied identifier, trimmed
    pub id: String,
}

impl Actor {
    /// Create an actor, rejecting a blank identifier
    pub fn new(role: ActorRole, id: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            role,
            id: require_text("actor_id", id)?,
        })
    }

    /// The ledger itself
    pub fn system() -> Self {
        Self {
            role: ActorRole::System,
            id: SYSTEM_ACTOR_ID.to_string(),
        }
    }

    /// Contracting officer `id`
    pub fn contracting_officer(id: &str) -> Result<Self, ValidationError> {
        Self::new(ActorRole::ContractingOfficer, id)
    }

    /// Vendor `id`
    pub fn vendor(id: &str) -> Result<Self, ValidationError> {
        Self::new(ActorRole::Vendor, id)
    }

    /// Risk engine identified by its rule set
    pub fn risk_engine(id: &str) -> Result<Self, ValidationError> {
        Self::new(ActorRole::RiskEngine, id)
    }

    /// Agency quality reviewer `id`
    pub fn agency_qa(id: &str) -> Result<Self, ValidationError> {
        Self::new(ActorRole::AgencyQa, id)
    }
}

/// `ROLE:id`, the form hashed into each block
impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_trims_and_rejects_blank() {
        let officer = Actor::contracting_officer("  CO_JSMITH ").unwrap();
        assert_eq!(officer.id, "CO_JSMITH");
        assert_eq!(officer.to_string(), "CONTRACTING_OFFICER:CO_JSMITH");

        assert_eq!(
            Actor::agency_qa(" "),
            Err(ValidationError::MissingField("actor_id"))
        );
    }

    #[test]
    fn test_actor_serialized_form() {
        let actor = Actor::risk_engine("RULES_V1").unwrap();
        let value = serde_json::to_value(&actor).unwrap();
        assert_eq!(value, serde_json::json!({"role": "RISK_ENGINE", "id": "RULES_V1"}));

        let back: Actor = serde_json::from_value(value).unwrap();
        assert_eq!(back, actor);
        assert_eq!(Actor::system().role, ActorRole::System);
    }
}
