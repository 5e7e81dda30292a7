use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::occupancy::room_exists;
use super::{format_date, load_guest, load_room, parse_date, parse_datetime, parse_uuid, Database};
use crate::models::*;

const CONTRACT_COLUMNS: &str = "id, room_id, guest_id, room_number, guest_name, advance_amount_paid, rent_due_date, monthly_rent_amount, created_at";

const TRANSACTION_COLUMNS: &str = "id, contract_id, room_id, guest_id, transaction_date, transaction_type, notes, amount, created_at";

impl Database {
    // ============================================================
    // Rental contract operations
    // ============================================================

    /// Stores a contract, snapshotting room number and guest name.
    ///
    /// Snapshot fields missing from the input are copied from the referenced
    /// room and guest. Returns `None` if a referenced room or guest does not
    /// exist.
    pub fn create_contract(&self, input: CreateContractInput) -> Result<Option<RentalContract>> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let mut room_number = input.room_number;
        if let Some(room_id) = input.room_id {
            let Some(room) = load_room(&conn, room_id)? else {
                tracing::warn!("No room found with ID {}", room_id);
                return Ok(None);
            };
            room_number = room_number.or(Some(room.room_number));
        }

        let mut guest_name = input.guest_name;
        if let Some(guest_id) = input.guest_id {
            let Some(guest) = load_guest(&conn, guest_id)? else {
                tracing::warn!("No guest found with ID {}", guest_id);
                return Ok(None);
            };
            guest_name = guest_name.or(Some(guest.name));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO rental_contracts (id, room_id, guest_id, room_number, guest_name, advance_amount_paid, rent_due_date, monthly_rent_amount, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                input.room_id.map(|u| u.to_string()),
                input.guest_id.map(|u| u.to_string()),
                room_number,
                &guest_name,
                input.advance_amount_paid,
                input.rent_due_date.map(format_date),
                input.monthly_rent_amount,
                now.to_rfc3339(),
            ),
        )?;

        tracing::info!("Added rental contract {}", id);

        Ok(Some(RentalContract {
            id,
            room_id: input.room_id,
            guest_id: input.guest_id,
            room_number,
            guest_name,
            advance_amount_paid: input.advance_amount_paid,
            rent_due_date: input.rent_due_date,
            monthly_rent_amount: input.monthly_rent_amount,
            created_at: now,
        }))
    }

    pub fn get_contract(&self, id: Uuid) -> Result<Option<RentalContract>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        load_contract(&conn, id)
    }

    pub fn get_all_contracts(&self) -> Result<Vec<RentalContract>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {CONTRACT_COLUMNS} FROM rental_contracts ORDER BY created_at"
        ))?;

        let contracts = stmt
            .query_map([], contract_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(contracts)
    }

    pub fn get_contract_with_transactions(
        &self,
        id: Uuid,
    ) -> Result<Option<ContractWithTransactions>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let Some(contract) = load_contract(&conn, id)? else {
            return Ok(None);
        };

        let transactions = load_transactions(&conn, id)?;

        Ok(Some(ContractWithTransactions {
            contract,
            transactions,
        }))
    }

    /// Deletes a contract and, through the foreign key cascade, its
    /// transactions.
    pub fn delete_contract(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(
            "DELETE FROM rental_contracts WHERE id = ?",
            [id.to_string()],
        )?;
        if rows > 0 {
            tracing::info!("Deleted rental contract {}", id);
        }
        Ok(rows > 0)
    }

    // ============================================================
    // Payment transaction operations
    // ============================================================

    /// Appends a payment to an existing contract.
    ///
    /// Returns `None` if the contract, or an explicitly given room or guest,
    /// does not exist. The contract itself is never modified.
    pub fn create_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<Option<PaymentTransaction>> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let Some(contract) = load_contract(&conn, input.contract_id)? else {
            tracing::warn!("No rental contract found with ID {}", input.contract_id);
            return Ok(None);
        };

        if let Some(room_id) = input.room_id {
            if !room_exists(&conn, room_id)? {
                tracing::warn!("No room found with ID {}", room_id);
                return Ok(None);
            }
        }
        if let Some(guest_id) = input.guest_id {
            if load_guest(&conn, guest_id)?.is_none() {
                tracing::warn!("No guest found with ID {}", guest_id);
                return Ok(None);
            }
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        let room_id = input.room_id.or(contract.room_id);
        let guest_id = input.guest_id.or(contract.guest_id);
        let transaction_date = input.transaction_date.unwrap_or_else(|| now.date_naive());

        conn.execute(
            "INSERT INTO payment_transactions (id, contract_id, room_id, guest_id, transaction_date, transaction_type, notes, amount, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                contract.id.to_string(),
                room_id.map(|u| u.to_string()),
                guest_id.map(|u| u.to_string()),
                format_date(transaction_date),
                input.transaction_type.as_str(),
                &input.notes,
                input.amount,
                now.to_rfc3339(),
            ),
        )?;

        tracing::info!(
            "Added {} transaction {} to contract {}",
            input.transaction_type.as_str(),
            id,
            contract.id
        );

        Ok(Some(PaymentTransaction {
            id,
            contract_id: contract.id,
            room_id,
            guest_id,
            transaction_date,
            transaction_type: input.transaction_type,
            notes: input.notes,
            amount: input.amount,
            created_at: now,
        }))
    }

    /// Transactions of a contract, oldest first. `None` if the contract does
    /// not exist.
    pub fn get_transactions_by_contract(
        &self,
        contract_id: Uuid,
    ) -> Result<Option<Vec<PaymentTransaction>>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        if load_contract(&conn, contract_id)?.is_none() {
            return Ok(None);
        }
        load_transactions(&conn, contract_id).map(Some)
    }
}

fn load_contract(conn: &Connection, id: Uuid) -> Result<Option<RentalContract>> {
    let contract = conn
        .query_row(
            &format!("SELECT {CONTRACT_COLUMNS} FROM rental_contracts WHERE id = ?"),
            [id.to_string()],
            contract_from_row,
        )
        .optional()?;
    Ok(contract)
}

fn load_transactions(conn: &Connection, contract_id: Uuid) -> Result<Vec<PaymentTransaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM payment_transactions
         WHERE contract_id = ? ORDER BY transaction_date, created_at"
    ))?;

    let transactions = stmt
        .query_map([contract_id.to_string()], transaction_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(transactions)
}

fn contract_from_row(row: &Row) -> rusqlite::Result<RentalContract> {
    Ok(RentalContract {
        id: parse_uuid(row.get::<_, String>(0)?),
        room_id: row.get::<_, Option<String>>(1)?.map(parse_uuid),
        guest_id: row.get::<_, Option<String>>(2)?.map(parse_uuid),
        room_number: row.get(3)?,
        guest_name: row.get(4)?,
        advance_amount_paid: row.get(5)?,
        rent_due_date: row.get::<_, Option<String>>(6)?.and_then(parse_date),
        monthly_rent_amount: row.get(7)?,
        created_at: parse_datetime(row.get::<_, String>(8)?),
    })
}

fn transaction_from_row(row: &Row) -> rusqlite::Result<PaymentTransaction> {
    let created_at = parse_datetime(row.get::<_, String>(8)?);
    Ok(PaymentTransaction {
        id: parse_uuid(row.get::<_, String>(0)?),
        contract_id: parse_uuid(row.get::<_, String>(1)?),
        room_id: row.get::<_, Option<String>>(2)?.map(parse_uuid),
        guest_id: row.get::<_, Option<String>>(3)?.map(parse_uuid),
        transaction_date: parse_date(row.get::<_, String>(4)?)
            .unwrap_or_else(|| created_at.date_naive()),
        transaction_type: TransactionType::from_str(&row.get::<_, String>(5)?)
            .unwrap_or(TransactionType::Other),
        notes: row.get(6)?,
        amount: row.get(7)?,
        created_at,
    })
}
