/*
 * Responsibility
 * - Drinks の request/response DTO
 * - short view (公開一覧, parts を伏せる) と long view (詳細, parts を含む)
 * - 成功レスポンスの envelope ({"success": true, ...})
 */
use serde::{Deserialize, Serialize};

use crate::api::extractors::{Combinator, JsonKeys};
use crate::repos::{Drink, Ingredient};

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl JsonKeys for CreateDrinkRequest {
    const KEYS: &'static [&'static str] = &["title", "recipe"];
    const COMBINATOR: Combinator = Combinator::All;

    fn validate(&self) -> Result<(), &'static str> {
        validate_title(&self.title)?;
        validate_recipe(&self.recipe)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Vec<Ingredient>>,
}

impl JsonKeys for UpdateDrinkRequest {
    const KEYS: &'static [&'static str] = &["title", "recipe"];
    const COMBINATOR: Combinator = Combinator::Any;

    fn validate(&self) -> Result<(), &'static str> {
        if self.title.is_none() && self.recipe.is_none() {
            return Err("title or recipe is required");
        }
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(recipe) = &self.recipe {
            validate_recipe(recipe)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("title cannot be empty");
    }
    Ok(())
}

fn validate_recipe(recipe: &[Ingredient]) -> Result<(), &'static str> {
    if recipe.is_empty() {
        return Err("recipe needs at least one ingredient");
    }
    if !recipe.iter().all(Ingredient::has_positive_parts) {
        return Err("ingredient parts must be positive");
    }
    Ok(())
}

/// Ingredient as shown publicly: `parts` is kept as a key but always `null`.
#[derive(Debug, Serialize)]
pub struct ShortIngredient {
    pub name: String,
    pub color: String,
    pub parts: Option<serde_json::Number>,
}

#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

impl From<Drink> for DrinkShort {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id,
            title: drink.title,
            recipe: drink
                .recipe
                .into_iter()
                .map(|i| ShortIngredient {
                    name: i.name,
                    color: i.color,
                    parts: None,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl From<Drink> for DrinkLong {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id,
            title: drink.title,
            recipe: drink.recipe,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    pub delete: i64,
}
