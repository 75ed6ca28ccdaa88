//! Row models
//!
//! Thin `FromRow` structs mirroring the schema. Amounts are `i64` here
//! because that is SQLite's integer type; conversion into [`Coins`] happens
//! at the store boundary.
//!
//! [`Coins`]: coinshop_types::Coins

use sqlx::FromRow;

/// A row from `accounts`.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub name: String,
    pub credential: String,
    pub balance: i64,
}

/// A row from `items`.
#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    pub name: String,
    pub price: i64,
}

/// One inventory entry for an account.
#[derive(Debug, Clone, FromRow)]
pub struct InventoryRow {
    pub item: String,
    pub quantity: i64,
}

/// One aggregated history row: counterparty and summed amount.
#[derive(Debug, Clone, FromRow)]
pub struct CounterpartyRow {
    pub counterparty: String,
    pub total: i64,
}
