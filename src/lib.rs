//! roomledger: rooms, the guests occupying them, and the contracts and
//! payments recorded against them.
//!
//! The occupancy rules live in [`db::Database`]; [`api`] exposes them over
//! HTTP.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
