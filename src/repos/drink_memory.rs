//! In-process drink store.
//!
//! Used when no `DATABASE_URL` is configured (local development) and by the
//! test-suite. Mirrors the Postgres schema's guarantees: ids are generated and
//! never reused, titles are unique, rows come back in insertion order.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repos::{
    drink_repo::{Drink, DrinkStore, NewDrink},
    error::{RepoError, RepoResult},
};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Drink>,
    last_id: i64,
}

impl Table {
    fn title_taken(&self, title: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|d| d.title == title && Some(d.id) != except)
    }
}

#[derive(Debug, Default)]
pub struct MemoryDrinkStore {
    table: RwLock<Table>,
}

impl MemoryDrinkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DrinkStore for MemoryDrinkStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> RepoResult<Vec<Drink>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_title(&self, title: &str) -> RepoResult<Option<Drink>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|d| d.title == title).cloned())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Drink>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, drink: NewDrink) -> RepoResult<Drink> {
        let mut table = self.table.write().await;
        if table.title_taken(&drink.title, None) {
            return Err(RepoError::Conflict);
        }

        table.last_id += 1;
        let row = Drink {
            id: table.last_id,
            title: drink.title,
            recipe: drink.recipe,
        };
        table.rows.insert(row.id, row.clone());

        Ok(row)
    }

    async fn update(&self, drink: &Drink) -> RepoResult<()> {
        let mut table = self.table.write().await;
        if table.title_taken(&drink.title, Some(drink.id)) {
            return Err(RepoError::Conflict);
        }

        // Same as `UPDATE ... WHERE id = $1`: a vanished row is not an error.
        if let Some(row) = table.rows.get_mut(&drink.id) {
            row.title.clone_from(&drink.title);
            row.recipe.clone_from(&drink.recipe);
        }

        Ok(())
    }

    async fn delete(&self, drink: &Drink) -> RepoResult<()> {
        self.table.write().await.rows.remove(&drink.id);
        Ok(())
    }
}
