use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, ConnectionTrait, NotSet, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ModelError, ValidationErrors};
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "refueling")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Uuid,
    pub liters: Decimal,
    pub kilometers: Decimal,
    pub cost: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const NOT_A_NUMBER: &str = "is not a number";
pub const BLANK: &str = "can't be blank";
pub const NOT_POSITIVE: &str = "must be greater than 0";

/// Validated values of a refueling form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefuelingFields {
    pub liters: Decimal,
    pub kilometers: Decimal,
    pub cost: Decimal,
}

/// Parse raw form values. Every field is checked so that all problems are
/// reported at once.
pub fn parse_fields(
    liters: Option<&str>,
    kilometers: Option<&str>,
    cost: Option<&str>,
) -> Result<RefuelingFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let liters = parse_number("liters", liters, &mut errors);
    let kilometers = parse_number("kilometers", kilometers, &mut errors);
    let cost = parse_number("cost", cost, &mut errors);

    if let Some(l) = liters {
        if l <= Decimal::ZERO {
            errors.add("liters", NOT_POSITIVE);
        }
    }

    match (liters, kilometers, cost) {
        (Some(liters), Some(kilometers), Some(cost)) if errors.is_empty() => {
            Ok(RefuelingFields { liters, kilometers, cost })
        }
        _ => Err(errors),
    }
}

fn parse_number(field: &'static str, raw: Option<&str>, errors: &mut ValidationErrors) -> Option<Decimal> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        errors.add(field, NOT_A_NUMBER);
        errors.add(field, BLANK);
        return None;
    }
    match Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) {
        Ok(value) => Some(value.normalize()),
        Err(_) => {
            errors.add(field, NOT_A_NUMBER);
            None
        }
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, user_id: Uuid, fields: &RefuelingFields) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        liters: Set(fields.liters),
        kilometers: Set(fields.kilometers),
        cost: Set(fields.cost),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Overwrite the measured values; owner and creation time never change.
pub async fn apply_fields<C: ConnectionTrait>(db: &C, existing: Model, fields: &RefuelingFields) -> Result<Model, ModelError> {
    let mut am: ActiveModel = existing.into();
    am.liters = Set(fields.liters);
    am.kilometers = Set(fields.kilometers);
    am.cost = Set(fields.cost);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn accepts_numeric_input() {
        let fields = parse_fields(Some("30"), Some(" 600.5 "), Some("150.00")).unwrap();
        assert_eq!(fields.liters, dec("30"));
        assert_eq!(fields.kilometers, dec("600.5"));
        assert_eq!(fields.cost, dec("150"));
    }

    #[test]
    fn blank_liters_reports_both_messages() {
        let errors = parse_fields(Some(""), Some("600"), Some("150")).unwrap_err();
        assert_eq!(errors.full_messages(), vec!["Liters is not a number and can't be blank"]);
    }

    #[test]
    fn missing_liters_is_treated_as_blank() {
        let errors = parse_fields(None, Some("600"), Some("150")).unwrap_err();
        assert_eq!(errors.messages_for("liters"), &[NOT_A_NUMBER, BLANK]);
    }

    #[test]
    fn garbage_is_not_a_number() {
        let errors = parse_fields(Some("thirty"), Some("600"), Some("abc")).unwrap_err();
        assert_eq!(
            errors.full_messages(),
            vec!["Liters is not a number", "Cost is not a number"]
        );
    }

    #[test]
    fn liters_must_be_positive() {
        let errors = parse_fields(Some("0"), Some("600"), Some("150")).unwrap_err();
        assert_eq!(errors.full_messages(), vec!["Liters must be greater than 0"]);
        assert!(parse_fields(Some("-2"), Some("600"), Some("150")).is_err());
    }

    #[test]
    fn scientific_notation_is_numeric() {
        let fields = parse_fields(Some("4.2e1"), Some("6e2"), Some("150")).unwrap();
        assert_eq!(fields.liters, dec("42"));
        assert_eq!(fields.kilometers, dec("600"));
    }
}
