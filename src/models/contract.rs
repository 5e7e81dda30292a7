use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::PaymentTransaction;

/// A rental agreement between the property and a guest.
///
/// `room_number` and `guest_name` are snapshots taken when the contract is
/// created. They are never re-synced with later room or guest edits, and they
/// survive the deletion of the room or guest. `room_id` and `guest_id` are
/// cleared when the referenced record is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalContract {
    pub id: Uuid,
    pub room_id: Option<Uuid>,
    pub guest_id: Option<Uuid>,
    pub room_number: Option<i64>,
    pub guest_name: Option<String>,
    pub advance_amount_paid: Option<i64>,
    pub rent_due_date: Option<NaiveDate>,
    pub monthly_rent_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a contract.
///
/// Snapshot fields left empty are filled from `room_id` / `guest_id` when those
/// are given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateContractInput {
    pub room_id: Option<Uuid>,
    pub guest_id: Option<Uuid>,
    pub room_number: Option<i64>,
    pub guest_name: Option<String>,
    pub advance_amount_paid: Option<i64>,
    pub rent_due_date: Option<NaiveDate>,
    pub monthly_rent_amount: Option<f64>,
}

/// A contract with its owned payment transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractWithTransactions {
    #[serde(flatten)]
    pub contract: RentalContract,
    pub transactions: Vec<PaymentTransaction>,
}
