//! Catalog store
//!
//! Read-only reference data; there is no mutation path in scope.

use crate::{AtomicUnit, DbResult, ItemRow};

/// Fetch an item by name.
pub async fn get(unit: &mut AtomicUnit, name: &str) -> DbResult<Option<ItemRow>> {
    let row = sqlx::query_as::<_, ItemRow>("SELECT name, price FROM items WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *unit.conn())
        .await?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_database;

    #[tokio::test]
    async fn seeded_item_is_readable() {
        let db = test_database().await;
        let mut unit = db.begin().await.unwrap();

        let item = get(&mut unit, "pink-hoody").await.unwrap().unwrap();
        assert_eq!(item.price, 500);
    }

    #[tokio::test]
    async fn unknown_item_is_none() {
        let db = test_database().await;
        let mut unit = db.begin().await.unwrap();

        assert!(get(&mut unit, "laptop").await.unwrap().is_none());
    }
}
