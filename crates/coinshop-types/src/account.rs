//! Accounts, items, and derived views

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Coins;

/// The verified principal returned by a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    /// Account name, the immutable key.
    pub name: String,
}

/// A catalog item: read-only reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub price: Coins,
}

/// A completed transfer between two accounts. Immutable once written;
/// purchases never produce one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub sender: String,
    pub receiver: String,
    pub amount: Coins,
}

/// Item-name → quantity multiset.
///
/// Adding an item merges into an existing entry or inserts a fresh one with
/// quantity 1; quantities never decrease in scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<String, u64>);

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge-or-insert: increment the quantity for `item`, starting at 1.
    pub fn add(&mut self, item: impl Into<String>) {
        *self.0.entry(item.into()).or_insert(0) += 1;
    }

    /// Quantity held of `item`; zero if absent.
    pub fn quantity(&self, item: &str) -> u64 {
        self.0.get(item).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(item, qty)| (item.as_str(), *qty))
    }
}

impl FromIterator<(String, u64)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Aggregated transfer volume against a single counterparty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartyTotal {
    pub counterparty: String,
    pub total: Coins,
}

/// Read-only composite of an account's state and history.
///
/// All four parts are read at the same logical point in time, so the balance
/// and the history sums never contradict each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub balance: Coins,
    pub inventory: Inventory,
    /// Totals received, grouped by sender.
    pub incoming: Vec<CounterpartyTotal>,
    /// Totals sent, grouped by receiver.
    pub outgoing: Vec<CounterpartyTotal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_merge_or_insert() {
        let mut inv = Inventory::new();
        assert_eq!(inv.quantity("cup"), 0);

        inv.add("cup");
        assert_eq!(inv.quantity("cup"), 1);

        inv.add("cup");
        assert_eq!(inv.quantity("cup"), 2);
        assert_eq!(inv.len(), 1);

        inv.add("book");
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.quantity("book"), 1);
    }

    #[test]
    fn inventory_serializes_as_map() {
        let mut inv = Inventory::new();
        inv.add("pen");
        inv.add("pen");

        let json = serde_json::to_string(&inv).unwrap();
        assert_eq!(json, r#"{"pen":2}"#);
    }
}
