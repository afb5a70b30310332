//! Stored fridge contents

use anyhow::Result;
use sqlx::SqlitePool;

pub struct FridgeRepository;

impl FridgeRepository {
    /// Replace the whole fridge in one transaction
    pub async fn replace(pool: &SqlitePool, user_id: i64, ingredients: &[String]) -> Result<()> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM fridge_contents WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for ingredient in ingredients {
            sqlx::query("INSERT OR IGNORE INTO fridge_contents (user_id, ingredient_name) VALUES (?, ?)")
                .bind(user_id)
                .bind(ingredient)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Ingredient names in the order they were stored
    pub async fn list(pool: &SqlitePool, user_id: i64) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT ingredient_name FROM fridge_contents WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(names)
    }
}
