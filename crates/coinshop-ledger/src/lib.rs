//! Coinshop ledger engine
//!
//! The engine owns every coin and item movement:
//!
//! - `authenticate_or_register`: provision-on-first-auth with a fixed
//!   starting balance, credential verification afterwards
//! - `transfer`: move coins between two accounts and record exactly one
//!   operation
//! - `purchase`: exchange coins for a catalog item (no operation record)
//! - `account_view`: balance, inventory, and aggregated history in one
//!   consistent snapshot
//!
//! # Invariants
//!
//! 1. No negative balances
//! 2. Transfers conserve total balance; purchases strictly decrease it
//! 3. Amounts are strictly positive, validated before any mutation
//! 4. The operation log is append-only and covers transfers only
//!
//! Every operation acquires exactly one [`coinshop_db::AtomicUnit`] and
//! performs both its precondition checks and its mutations through it, so no
//! concurrent caller can act on a stale balance between check and write.

use std::sync::Arc;

use tracing::{info, warn};

use coinshop_db::store::{accounts, catalog, operations};
use coinshop_db::{Database, DbError};
use coinshop_types::{AccountIdentity, AccountView, Coins, CounterpartyTotal, Inventory};
use coinshop_types::{LedgerError, Result};

/// Balance granted to every account on first authentication.
pub const STARTING_BALANCE: Coins = Coins::new(1000);

/// Credential protection seam.
///
/// The engine stores and compares opaque protected strings; the scheme
/// decides what "protected" means. It must never silently upgrade or rehash
/// a stored credential.
pub trait CredentialScheme: Send + Sync {
    /// Protect a freshly supplied secret for storage.
    fn protect(&self, secret: &str) -> Result<String>;

    /// Check a supplied secret against a stored protected credential.
    fn verify(&self, secret: &str, protected: &str) -> Result<bool>;
}

/// The ledger engine.
#[derive(Clone)]
pub struct Ledger {
    db: Database,
    credentials: Arc<dyn CredentialScheme>,
}

impl Ledger {
    pub fn new(db: Database, credentials: Arc<dyn CredentialScheme>) -> Self {
        Self { db, credentials }
    }

    /// The underlying store, for liveness checks at the boundary.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Authenticate `name`, creating the account on first contact.
    ///
    /// A missing account is provisioned with [`STARTING_BALANCE`] and the
    /// protected secret; afterwards the name is permanently bound to that
    /// credential. This auto-provisioning is preserved behavior: whoever
    /// first presents a secret for a name claims it.
    pub async fn authenticate_or_register(
        &self,
        name: &str,
        secret: &str,
    ) -> Result<AccountIdentity> {
        let mut unit = self.db.begin().await?;

        if let Some(row) = accounts::get(&mut unit, name).await? {
            unit.commit().await?;
            return self.verify_credential(name, secret, &row.credential);
        }

        let protected = self.credentials.protect(secret)?;
        match accounts::create(&mut unit, name, &protected, STARTING_BALANCE).await {
            Ok(()) => {
                unit.commit().await?;
                info!(account = %name, "Provisioned account on first authentication");
                Ok(AccountIdentity {
                    name: name.to_string(),
                })
            }
            Err(DbError::Duplicate(_)) => {
                // Lost a registration race; the winner's credential decides.
                unit.rollback().await?;
                let mut unit = self.db.begin().await?;
                let row = accounts::get(&mut unit, name).await?.ok_or_else(|| {
                    LedgerError::storage(format!("account {name} vanished after duplicate create"))
                })?;
                unit.commit().await?;
                self.verify_credential(name, secret, &row.credential)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn verify_credential(
        &self,
        name: &str,
        secret: &str,
        protected: &str,
    ) -> Result<AccountIdentity> {
        if self.credentials.verify(secret, protected)? {
            Ok(AccountIdentity {
                name: name.to_string(),
            })
        } else {
            warn!(account = %name, "Credential mismatch");
            Err(LedgerError::WrongCredential)
        }
    }

    /// Move `amount` coins from `sender` to `receiver` and record exactly
    /// one operation, all inside one atomic unit.
    ///
    /// Precondition order, short-circuiting on first failure: amount is
    /// positive; sender and receiver differ; sender exists; receiver
    /// exists; funds suffice. The funds check re-validates inside the same
    /// unit that performs the debit.
    pub async fn transfer(&self, sender: &str, receiver: &str, amount: i64) -> Result<()> {
        if amount <= 0 {
            return Err(LedgerError::invalid_amount("amount must be positive"));
        }
        if sender == receiver {
            return Err(LedgerError::invalid_amount(
                "sender and receiver must differ",
            ));
        }

        let mut unit = self.db.begin().await?;

        accounts::get(&mut unit, sender)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound {
                name: sender.to_string(),
            })?;
        accounts::get(&mut unit, receiver)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound {
                name: receiver.to_string(),
            })?;

        accounts::apply_delta(&mut unit, sender, -amount).await?;
        accounts::apply_delta(&mut unit, receiver, amount).await?;
        operations::append(&mut unit, sender, receiver, Coins::new(amount.unsigned_abs())).await?;

        unit.commit().await?;

        info!(sender = %sender, receiver = %receiver, amount, "Transfer committed");
        Ok(())
    }

    /// Buy one catalog item: debit the price, merge-or-insert the item into
    /// the buyer's inventory. Writes no operation record; purchases are not
    /// transfers.
    pub async fn purchase(&self, buyer: &str, item_name: &str) -> Result<()> {
        let mut unit = self.db.begin().await?;

        accounts::get(&mut unit, buyer)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound {
                name: buyer.to_string(),
            })?;
        let item =
            catalog::get(&mut unit, item_name)
                .await?
                .ok_or_else(|| LedgerError::ItemNotFound {
                    name: item_name.to_string(),
                })?;

        if item.price <= 0 {
            return Err(LedgerError::invalid_amount(format!(
                "item {item_name} has no positive price"
            )));
        }

        accounts::apply_delta(&mut unit, buyer, -item.price).await?;
        accounts::append_inventory(&mut unit, buyer, item_name).await?;

        unit.commit().await?;

        info!(buyer = %buyer, item = %item_name, price = item.price, "Purchase committed");
        Ok(())
    }

    /// Assemble the read-only composite view of an account.
    ///
    /// All four reads go through one unit, so balance and history totals
    /// observe the same logical point in time.
    pub async fn account_view(&self, name: &str) -> Result<AccountView> {
        let mut unit = self.db.begin().await?;

        let row = accounts::get(&mut unit, name)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound {
                name: name.to_string(),
            })?;

        let inventory: Inventory = accounts::inventory(&mut unit, name)
            .await?
            .into_iter()
            .map(|r| Ok((r.item, amount_from_db(r.quantity)?.units())))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .collect();

        let incoming = counterparty_totals(operations::incoming_totals(&mut unit, name).await?)?;
        let outgoing = counterparty_totals(operations::outgoing_totals(&mut unit, name).await?)?;

        unit.commit().await?;

        Ok(AccountView {
            balance: amount_from_db(row.balance)?,
            inventory,
            incoming,
            outgoing,
        })
    }
}

fn amount_from_db(value: i64) -> Result<Coins> {
    Coins::try_from(value)
        .map_err(|v| LedgerError::storage(format!("negative amount in store: {v}")))
}

fn counterparty_totals(rows: Vec<coinshop_db::CounterpartyRow>) -> Result<Vec<CounterpartyTotal>> {
    rows.into_iter()
        .map(|r| {
            Ok(CounterpartyTotal {
                counterparty: r.counterparty,
                total: amount_from_db(r.total)?,
            })
        })
        .collect()
}
