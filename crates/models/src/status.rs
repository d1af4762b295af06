use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use strum::EnumIter;

#[cfg(feature = "database")]
use sea_orm::Value;

/// Where a reservation sits in the two-stage approval workflow.
///
/// Every reservation starts at `PendingSecretariat`. `Approved`, `Rejected`
/// and `Cancelled` are terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    PendingSecretariat,
    PendingProducer,
    Approved,
    Rejected,
    Cancelled,
}

impl ReservationStatus {
    /// Terminal statuses accept no further workflow action.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Cancelled)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingSecretariat | Self::PendingProducer)
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending_secretariat" => Ok(Self::PendingSecretariat),
            "pending_producer" => Ok(Self::PendingProducer),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown reservation status: {s}")),
        }
    }
}

impl Display for ReservationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::PendingSecretariat => write!(f, "pending_secretariat"),
            Self::PendingProducer => write!(f, "pending_producer"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for ReservationStatus {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::String(Some(s)) => {
                ReservationStatus::from_str(&s).map_err(|_| sea_orm::sea_query::ValueTypeErr)
            }
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "ReservationStatus".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::Text
    }
}

#[cfg(feature = "database")]
impl From<ReservationStatus> for Value {
    fn from(status: ReservationStatus) -> Self {
        Value::String(Some(Box::new(status.to_string())))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for ReservationStatus {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: String = res.try_get_by(index)?;

        ReservationStatus::from_str(&val).map_err(|e| {
            sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                "Failed to deserialize ReservationStatus: {e}"
            )))
        })
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for ReservationStatus {
    fn null() -> Value {
        Value::String(None)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Iterable;

    use crate::status::ReservationStatus;
    use std::str::FromStr;

    #[test]
    fn test_status_round_trip() {
        for status in ReservationStatus::iter() {
            let s = status.to_string();
            let parsed = ReservationStatus::from_str(&s).unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_status_parsing_rejects_unknown() {
        assert!(ReservationStatus::from_str("waiting").is_err());
        assert!(ReservationStatus::from_str("").is_err());
    }

    #[test]
    fn test_terminal_and_pending_split() {
        for status in ReservationStatus::iter() {
            assert_ne!(status.is_terminal(), status.is_pending());
        }

        assert!(ReservationStatus::PendingSecretariat.is_pending());
        assert!(ReservationStatus::PendingProducer.is_pending());
        assert!(ReservationStatus::Approved.is_terminal());
        assert!(ReservationStatus::Rejected.is_terminal());
        assert!(ReservationStatus::Cancelled.is_terminal());
    }
}
