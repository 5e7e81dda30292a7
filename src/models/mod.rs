//! Domain models for roomledger.
//!
//! # Occupancy
//!
//! - [`Room`]: A rentable room. Owns its guest set and derives its
//!   availability from it.
//! - [`Guest`]: A person renting space. Points back at its current room, if any.
//!
//! # Ledger
//!
//! - [`RentalContract`]: An agreement with snapshots of the room number and
//!   guest name taken at signing.
//! - [`PaymentTransaction`]: A payment against a contract. Deleted with the
//!   contract.

mod contract;
mod guest;
mod room;
mod transaction;

pub use contract::*;
pub use guest::*;
pub use room::*;
pub use transaction::*;
