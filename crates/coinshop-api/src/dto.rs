//! Request and response DTOs
//!
//! Wire shapes follow the service's established JSON contract: camelCase
//! keys, inventory entries as `{type, quantity}`, history split into
//! `received` and `sent` lists keyed by counterparty.

use serde::{Deserialize, Serialize};
use validator::Validate;

use coinshop_types::AccountView;

/// Authentication request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AuthRequest {
    /// Account name
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    /// Account secret
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// Authentication response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent calls
    pub token: String,
}

/// Coin transfer request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendCoinRequest {
    /// Receiving account name
    #[validate(length(min = 1, message = "toUser must not be empty"))]
    pub to_user: String,
    /// Amount of coins; must be positive
    pub amount: i64,
}

/// One inventory entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// Item name
    #[serde(rename = "type")]
    pub kind: String,
    /// Quantity held
    pub quantity: u64,
}

/// Received-coins history entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedEntry {
    pub from_user: String,
    pub amount: u64,
}

/// Sent-coins history entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentEntry {
    pub to_user: String,
    pub amount: u64,
}

/// Transfer history grouped by counterparty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinHistory {
    pub received: Vec<ReceivedEntry>,
    pub sent: Vec<SentEntry>,
}

/// Account info response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub coins: u64,
    pub inventory: Vec<InventoryEntry>,
    pub coin_history: CoinHistory,
}

impl From<AccountView> for InfoResponse {
    fn from(view: AccountView) -> Self {
        Self {
            coins: view.balance.units(),
            inventory: view
                .inventory
                .iter()
                .map(|(item, quantity)| InventoryEntry {
                    kind: item.to_string(),
                    quantity,
                })
                .collect(),
            coin_history: CoinHistory {
                received: view
                    .incoming
                    .into_iter()
                    .map(|t| ReceivedEntry {
                        from_user: t.counterparty,
                        amount: t.total.units(),
                    })
                    .collect(),
                sent: view
                    .outgoing
                    .into_iter()
                    .map(|t| SentEntry {
                        to_user: t.counterparty,
                        amount: t.total.units(),
                    })
                    .collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinshop_types::{Coins, CounterpartyTotal, Inventory};

    #[test]
    fn info_response_wire_shape() {
        let mut inventory = Inventory::new();
        inventory.add("cup");
        inventory.add("cup");

        let view = AccountView {
            balance: Coins::new(960),
            inventory,
            incoming: vec![CounterpartyTotal {
                counterparty: "bob".into(),
                total: Coins::new(30),
            }],
            outgoing: vec![CounterpartyTotal {
                counterparty: "carol".into(),
                total: Coins::new(70),
            }],
        };

        let json = serde_json::to_value(InfoResponse::from(view)).unwrap();
        assert_eq!(json["coins"], 960);
        assert_eq!(json["inventory"][0]["type"], "cup");
        assert_eq!(json["inventory"][0]["quantity"], 2);
        assert_eq!(json["coinHistory"]["received"][0]["fromUser"], "bob");
        assert_eq!(json["coinHistory"]["sent"][0]["toUser"], "carol");
        assert_eq!(json["coinHistory"]["sent"][0]["amount"], 70);
    }

    #[test]
    fn send_coin_request_accepts_camel_case() {
        let req: SendCoinRequest =
            serde_json::from_str(r#"{"toUser": "bob", "amount": 50}"#).unwrap();
        assert_eq!(req.to_user, "bob");
        assert_eq!(req.amount, 50);
    }
}
