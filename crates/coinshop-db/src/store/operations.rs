//! Operation log
//!
//! Append-only record of completed transfers. `append` is always called
//! inside the same unit as the two balance deltas it documents. The history
//! queries are aggregations computed fresh on each call; the unit's snapshot
//! is the only consistency they promise.

use coinshop_types::Coins;

use crate::{AtomicUnit, CounterpartyRow, DbError, DbResult};

/// Append one transfer record.
pub async fn append(
    unit: &mut AtomicUnit,
    sender: &str,
    receiver: &str,
    amount: Coins,
) -> DbResult<()> {
    let amount = i64::try_from(amount.units())
        .map_err(|_| DbError::Corrupt(format!("amount out of range for {sender}")))?;

    sqlx::query("INSERT INTO operations (sender, receiver, amount) VALUES (?, ?, ?)")
        .bind(sender)
        .bind(receiver)
        .bind(amount)
        .execute(&mut *unit.conn())
        .await?;

    Ok(())
}

/// Totals received by `name`, grouped by sender.
pub async fn incoming_totals(unit: &mut AtomicUnit, name: &str) -> DbResult<Vec<CounterpartyRow>> {
    let rows = sqlx::query_as::<_, CounterpartyRow>(
        r#"
        SELECT sender AS counterparty, SUM(amount) AS total
        FROM operations
        WHERE receiver = ?
        GROUP BY sender
        ORDER BY sender
        "#,
    )
    .bind(name)
    .fetch_all(&mut *unit.conn())
    .await?;

    Ok(rows)
}

/// Totals sent by `name`, grouped by receiver.
pub async fn outgoing_totals(unit: &mut AtomicUnit, name: &str) -> DbResult<Vec<CounterpartyRow>> {
    let rows = sqlx::query_as::<_, CounterpartyRow>(
        r#"
        SELECT receiver AS counterparty, SUM(amount) AS total
        FROM operations
        WHERE sender = ?
        GROUP BY receiver
        ORDER BY receiver
        "#,
    )
    .bind(name)
    .fetch_all(&mut *unit.conn())
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::accounts;
    use crate::test_database;

    async fn seed_accounts(unit: &mut AtomicUnit) {
        for name in ["alice", "bob", "carol"] {
            accounts::create(unit, name, "secret", Coins::new(1000))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn totals_group_by_counterparty() {
        let db = test_database().await;
        let mut unit = db.begin().await.unwrap();
        seed_accounts(&mut unit).await;

        append(&mut unit, "alice", "bob", Coins::new(30)).await.unwrap();
        append(&mut unit, "alice", "bob", Coins::new(20)).await.unwrap();
        append(&mut unit, "alice", "carol", Coins::new(10)).await.unwrap();
        append(&mut unit, "carol", "alice", Coins::new(5)).await.unwrap();

        let outgoing = outgoing_totals(&mut unit, "alice").await.unwrap();
        assert_eq!(outgoing.len(), 2);
        assert_eq!(outgoing[0].counterparty, "bob");
        assert_eq!(outgoing[0].total, 50);
        assert_eq!(outgoing[1].counterparty, "carol");
        assert_eq!(outgoing[1].total, 10);

        let incoming = incoming_totals(&mut unit, "bob").await.unwrap();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].counterparty, "alice");
        assert_eq!(incoming[0].total, 50);

        let incoming = incoming_totals(&mut unit, "alice").await.unwrap();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].counterparty, "carol");
        assert_eq!(incoming[0].total, 5);
    }

    #[tokio::test]
    async fn empty_history_is_empty() {
        let db = test_database().await;
        let mut unit = db.begin().await.unwrap();
        seed_accounts(&mut unit).await;

        assert!(incoming_totals(&mut unit, "bob").await.unwrap().is_empty());
        assert!(outgoing_totals(&mut unit, "bob").await.unwrap().is_empty());
    }
}
