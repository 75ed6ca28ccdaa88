//! Account store
//!
//! Balances and inventories. The debit path is a single conditional UPDATE
//! so the funds check and the write cannot be separated by another writer.

use coinshop_types::Coins;

use crate::{AccountRow, AtomicUnit, DbError, DbResult, InventoryRow};

/// Fetch an account by name.
pub async fn get(unit: &mut AtomicUnit, name: &str) -> DbResult<Option<AccountRow>> {
    let row = sqlx::query_as::<_, AccountRow>(
        "SELECT name, credential, balance FROM accounts WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(&mut *unit.conn())
    .await?;

    Ok(row)
}

/// Create an account. Fails with [`DbError::Duplicate`] if the name is taken.
pub async fn create(
    unit: &mut AtomicUnit,
    name: &str,
    credential: &str,
    balance: Coins,
) -> DbResult<()> {
    let balance = i64::try_from(balance.units())
        .map_err(|_| DbError::Corrupt(format!("balance out of range for {name}")))?;

    sqlx::query("INSERT INTO accounts (name, credential, balance) VALUES (?, ?, ?)")
        .bind(name)
        .bind(credential)
        .bind(balance)
        .execute(&mut *unit.conn())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::Duplicate(name.to_string())
            }
            _ => DbError::Query(e),
        })?;

    Ok(())
}

/// Apply a signed balance delta.
///
/// A debit re-validates the balance in the same statement that writes it:
/// zero affected rows means either a missing account or a short balance,
/// distinguished by a follow-up probe inside the same unit.
pub async fn apply_delta(unit: &mut AtomicUnit, name: &str, delta: i64) -> DbResult<()> {
    if delta == 0 {
        return Ok(());
    }

    if delta > 0 {
        let result = sqlx::query("UPDATE accounts SET balance = balance + ? WHERE name = ?")
            .bind(delta)
            .bind(name)
            .execute(&mut *unit.conn())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(name.to_string()));
        }
        return Ok(());
    }

    let amount = delta.unsigned_abs();
    let amount_param = i64::try_from(amount)
        .map_err(|_| DbError::Corrupt(format!("delta out of range for {name}")))?;

    let result =
        sqlx::query("UPDATE accounts SET balance = balance - ?1 WHERE name = ?2 AND balance >= ?1")
            .bind(amount_param)
            .bind(name)
            .execute(&mut *unit.conn())
            .await?;

    if result.rows_affected() == 0 {
        return match get(unit, name).await? {
            Some(row) => {
                let available = u64::try_from(row.balance)
                    .map_err(|_| DbError::Corrupt(format!("negative balance for {name}")))?;
                Err(DbError::InsufficientFunds {
                    available,
                    required: amount,
                })
            }
            None => Err(DbError::NotFound(name.to_string())),
        };
    }

    Ok(())
}

/// Merge-or-insert one unit of `item` into the account's inventory:
/// increment an existing entry, else insert a fresh one with quantity 1.
pub async fn append_inventory(unit: &mut AtomicUnit, name: &str, item: &str) -> DbResult<()> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts WHERE name = ?")
        .bind(name)
        .fetch_one(&mut *unit.conn())
        .await?;

    if exists == 0 {
        return Err(DbError::NotFound(name.to_string()));
    }

    sqlx::query(
        r#"
        INSERT INTO inventory (account, item, quantity)
        VALUES (?, ?, 1)
        ON CONFLICT(account, item) DO UPDATE SET quantity = quantity + 1
        "#,
    )
    .bind(name)
    .bind(item)
    .execute(&mut *unit.conn())
    .await?;

    Ok(())
}

/// All inventory entries for an account, ordered by item name.
pub async fn inventory(unit: &mut AtomicUnit, name: &str) -> DbResult<Vec<InventoryRow>> {
    let rows = sqlx::query_as::<_, InventoryRow>(
        "SELECT item, quantity FROM inventory WHERE account = ? ORDER BY item",
    )
    .bind(name)
    .fetch_all(&mut *unit.conn())
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_database;

    #[tokio::test]
    async fn create_rejects_duplicates() {
        let db = test_database().await;
        let mut unit = db.begin().await.unwrap();

        create(&mut unit, "alice", "secret", Coins::new(1000))
            .await
            .unwrap();
        let err = create(&mut unit, "alice", "other", Coins::new(1000))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate(ref name) if name == "alice"));
    }

    #[tokio::test]
    async fn credit_and_debit() {
        let db = test_database().await;
        let mut unit = db.begin().await.unwrap();
        create(&mut unit, "alice", "secret", Coins::new(100))
            .await
            .unwrap();

        apply_delta(&mut unit, "alice", 50).await.unwrap();
        apply_delta(&mut unit, "alice", -30).await.unwrap();

        let row = get(&mut unit, "alice").await.unwrap().unwrap();
        assert_eq!(row.balance, 120);
    }

    #[tokio::test]
    async fn debit_rejects_short_balance() {
        let db = test_database().await;
        let mut unit = db.begin().await.unwrap();
        create(&mut unit, "alice", "secret", Coins::new(100))
            .await
            .unwrap();

        let err = apply_delta(&mut unit, "alice", -150).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::InsufficientFunds {
                available: 100,
                required: 150
            }
        ));

        // no partial effect
        let row = get(&mut unit, "alice").await.unwrap().unwrap();
        assert_eq!(row.balance, 100);
    }

    #[tokio::test]
    async fn delta_on_missing_account() {
        let db = test_database().await;
        let mut unit = db.begin().await.unwrap();

        let err = apply_delta(&mut unit, "nobody", -10).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));

        let err = apply_delta(&mut unit, "nobody", 10).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[tokio::test]
    async fn inventory_merges_on_repeat() {
        let db = test_database().await;
        let mut unit = db.begin().await.unwrap();
        create(&mut unit, "alice", "secret", Coins::new(100))
            .await
            .unwrap();

        append_inventory(&mut unit, "alice", "cup").await.unwrap();
        append_inventory(&mut unit, "alice", "cup").await.unwrap();
        append_inventory(&mut unit, "alice", "pen").await.unwrap();

        let rows = inventory(&mut unit, "alice").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item, "cup");
        assert_eq!(rows[0].quantity, 2);
        assert_eq!(rows[1].item, "pen");
        assert_eq!(rows[1].quantity, 1);
    }

    #[tokio::test]
    async fn inventory_requires_account() {
        let db = test_database().await;
        let mut unit = db.begin().await.unwrap();

        let err = append_inventory(&mut unit, "nobody", "cup")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }
}
