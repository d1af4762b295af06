use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use strum::EnumIter;

#[cfg(feature = "database")]
use sea_orm::Value;

/// The role tags governing workflow permissions. A user holds exactly one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Submits reservation requests and may cancel their own.
    Requester,
    /// First approval stage.
    Secretariat,
    /// Second and final approval stage.
    EventProducer,
    /// Supervisory read access to everything; triggers no transitions.
    ItAdmin,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "requester" => Ok(Self::Requester),
            "secretariat" => Ok(Self::Secretariat),
            "event_producer" | "eventproducer" => Ok(Self::EventProducer),
            "it_admin" | "itadmin" => Ok(Self::ItAdmin),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Requester => write!(f, "requester"),
            Self::Secretariat => write!(f, "secretariat"),
            Self::EventProducer => write!(f, "event_producer"),
            Self::ItAdmin => write!(f, "it_admin"),
        }
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for Role {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::String(Some(s)) => {
                Role::from_str(&s).map_err(|_| sea_orm::sea_query::ValueTypeErr)
            }
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "Role".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::Text
    }
}

#[cfg(feature = "database")]
impl From<Role> for Value {
    fn from(role: Role) -> Self {
        Value::String(Some(Box::new(role.to_string())))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for Role {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: String = res.try_get_by(index)?;

        Role::from_str(&val).map_err(|e| {
            sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                "Failed to deserialize Role: {e}"
            )))
        })
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for Role {
    fn null() -> Value {
        Value::String(None)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Iterable;

    use crate::role::Role;
    use std::str::FromStr;

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from_str("requester").unwrap(), Role::Requester);
        assert_eq!(Role::from_str("Secretariat").unwrap(), Role::Secretariat);
        assert_eq!(
            Role::from_str("event_producer").unwrap(),
            Role::EventProducer
        );
        assert_eq!(Role::from_str("EventProducer").unwrap(), Role::EventProducer);
        assert_eq!(Role::from_str("it_admin").unwrap(), Role::ItAdmin);
        assert!(Role::from_str("principal").is_err());
    }

    #[test]
    fn test_role_round_trip() {
        for role in Role::iter() {
            let s = role.to_string();
            let parsed = Role::from_str(&s).unwrap();
            assert_eq!(role, parsed);
        }
    }
}
