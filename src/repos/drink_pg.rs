/*
 * Responsibility
 * - drinks テーブル向け SQLx 操作
 * - recipe は TEXT カラムに JSON として保存し、読み出し時に必ず復元する
 * - unique 制約違反は RepoError::Conflict として返す
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::{
    drink_repo::{Drink, DrinkStore, NewDrink, decode_recipe, encode_recipe},
    error::{RepoError, RepoResult},
};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS drinks (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL UNIQUE,
        recipe TEXT NOT NULL
    )
"#;

#[derive(Debug, FromRow)]
struct DrinkRow {
    id: i64,
    title: String,
    recipe: String,
}

impl TryFrom<DrinkRow> for Drink {
    type Error = RepoError;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        Ok(Drink {
            id: row.id,
            title: row.title,
            recipe: decode_recipe(&row.recipe)?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgDrinkStore {
    pool: PgPool,
}

impl PgDrinkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `drinks` table when it does not exist yet.
    pub async fn ensure_schema(&self) -> RepoResult<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Drop every drink and recreate the table (development resets).
    pub async fn reset_schema(&self) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DROP TABLE IF EXISTS drinks")
            .execute(&mut *tx)
            .await?;
        sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl DrinkStore for PgDrinkStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self) -> RepoResult<Vec<Drink>> {
        let rows = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Drink::try_from).collect()
    }

    async fn find_by_title(&self, title: &str) -> RepoResult<Option<Drink>> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            WHERE title = $1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Drink::try_from).transpose()
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Drink>> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Drink::try_from).transpose()
    }

    async fn insert(&self, drink: NewDrink) -> RepoResult<Drink> {
        let recipe = encode_recipe(&drink.recipe)?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO drinks (title, recipe)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(&drink.title)
        .bind(&recipe)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(Drink {
            id,
            title: drink.title,
            recipe: drink.recipe,
        })
    }

    async fn update(&self, drink: &Drink) -> RepoResult<()> {
        let recipe = encode_recipe(&drink.recipe)?;

        sqlx::query(
            r#"
            UPDATE drinks
            SET title = $2, recipe = $3
            WHERE id = $1
            "#,
        )
        .bind(drink.id)
        .bind(&drink.title)
        .bind(&recipe)
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(())
    }

    async fn delete(&self, drink: &Drink) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM drinks
            WHERE id = $1
            "#,
        )
        .bind(drink.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
