use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A payment recorded against a rental contract.
///
/// Transactions are append-only. They belong to exactly one contract and are
/// deleted with it; `room_id` and `guest_id` exist for reporting and are
/// cleared if the room or guest is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub room_id: Option<Uuid>,
    pub guest_id: Option<Uuid>,
    pub transaction_date: NaiveDate,
    pub transaction_type: TransactionType,
    pub notes: Option<String>,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// What a payment was for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Rent,
    Advance,
    Utility,
    Other,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Advance => "advance",
            Self::Utility => "utility",
            Self::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "rent" => Some(Self::Rent),
            "advance" => Some(Self::Advance),
            "utility" => Some(Self::Utility),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Input for recording a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionInput {
    pub contract_id: Uuid,
    /// Defaults to the contract's room.
    pub room_id: Option<Uuid>,
    /// Defaults to the contract's guest.
    pub guest_id: Option<Uuid>,
    /// Defaults to today.
    pub transaction_date: Option<NaiveDate>,
    pub transaction_type: TransactionType,
    pub notes: Option<String>,
    pub amount: i64,
}
