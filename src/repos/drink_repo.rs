/*
 * Responsibility
 * - Drink エンティティと永続化の契約 (DrinkStore)
 * - recipe は構造化データとして扱い、保存時のみ JSON テキストに直列化する
 * - handler は必ずこの trait を経由する (ストレージを直接触らない)
 */
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::repos::error::RepoResult;

/// One line of a recipe. `parts` is a relative quantity and keeps the
/// caller's numeric representation (`3` stays `3`, `1.5` stays `1.5`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: serde_json::Number,
}

impl Ingredient {
    pub fn has_positive_parts(&self) -> bool {
        self.parts.as_f64().is_some_and(|p| p > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

#[derive(Debug, Clone)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Persistence for drinks. Implementations own uniqueness of `title` at the
/// storage level and report a violation as `RepoError::Conflict`.
///
/// Implementations must be cheap to share (`Arc<dyn DrinkStore>` in AppState).
#[async_trait]
pub trait DrinkStore: Send + Sync + 'static {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // All drinks in storage order.
    async fn list(&self) -> RepoResult<Vec<Drink>>;

    async fn find_by_title(&self, title: &str) -> RepoResult<Option<Drink>>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Drink>>;

    // Persist a new row and return it with its generated id.
    async fn insert(&self, drink: NewDrink) -> RepoResult<Drink>;

    // Persist the mutable fields (title, recipe) of an existing row.
    async fn update(&self, drink: &Drink) -> RepoResult<()>;

    async fn delete(&self, drink: &Drink) -> RepoResult<()>;
}

pub(crate) fn encode_recipe(recipe: &[Ingredient]) -> RepoResult<String> {
    Ok(serde_json::to_string(recipe)?)
}

pub(crate) fn decode_recipe(raw: &str) -> RepoResult<Vec<Ingredient>> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::error::RepoError;

    #[test]
    fn recipe_text_keeps_numeric_representation() {
        let recipe: Vec<Ingredient> = serde_json::from_str(
            r#"[{"name":"milk","color":"white","parts":3},{"name":"espresso","color":"brown","parts":1.5}]"#,
        )
        .unwrap();

        let text = encode_recipe(&recipe).unwrap();
        assert!(text.contains(r#""parts":3}"#));
        assert_eq!(decode_recipe(&text).unwrap(), recipe);
    }

    #[test]
    fn unreadable_recipe_is_a_storage_error() {
        assert!(matches!(
            decode_recipe("not json"),
            Err(RepoError::CorruptRecipe(_))
        ));
    }

    #[test]
    fn parts_must_be_positive() {
        let ingredient = |parts: &str| Ingredient {
            name: "milk".into(),
            color: "white".into(),
            parts: serde_json::from_str(parts).unwrap(),
        };

        assert!(ingredient("2").has_positive_parts());
        assert!(ingredient("0.25").has_positive_parts());
        assert!(!ingredient("0").has_positive_parts());
        assert!(!ingredient("-1").has_positive_parts());
    }
}
