use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auth::UserId;

pub use models::errors::ValidationErrors;
pub use models::refueling::RefuelingFields;

pub type RefuelingId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refueling {
    pub id: RefuelingId,
    pub owner: UserId,
    pub liters: Decimal,
    pub kilometers: Decimal,
    pub cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<models::refueling::Model> for Refueling {
    fn from(m: models::refueling::Model) -> Self {
        Self {
            id: m.id,
            owner: UserId(m.user_id),
            liters: m.liters,
            kilometers: m.kilometers,
            cost: m.cost,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

/// Raw, unvalidated form values as submitted. Kept verbatim so a rejected form
/// can be shown again with the user's input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefuelingParams {
    #[serde(default)]
    pub liters: Option<String>,
    #[serde(default)]
    pub kilometers: Option<String>,
    #[serde(default)]
    pub cost: Option<String>,
}

impl RefuelingParams {
    pub fn new(liters: impl Into<String>, kilometers: impl Into<String>, cost: impl Into<String>) -> Self {
        Self { liters: Some(liters.into()), kilometers: Some(kilometers.into()), cost: Some(cost.into()) }
    }

    pub fn validate(&self) -> Result<RefuelingFields, ValidationErrors> {
        models::refueling::parse_fields(self.liters.as_deref(), self.kilometers.as_deref(), self.cost.as_deref())
    }
}

impl From<&Refueling> for RefuelingParams {
    fn from(r: &Refueling) -> Self {
        Self::new(r.liters.to_string(), r.kilometers.to_string(), r.cost.to_string())
    }
}
