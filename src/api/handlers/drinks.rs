/*
 * Responsibility
 * - /drinks 系 CRUD handler
 * - 認可は Authorized<P>、body 検証は ValidJson<T> が handler の前に済ませる
 * - 失敗はすべて AppError で返し、envelope への変換は error.rs に任せる
 */
use axum::{Json, extract::State};

use crate::{
    api::{
        dto::drinks::{
            CreateDrinkRequest, DeleteDrinkResponse, DrinkLong, DrinkShort, DrinksResponse,
            UpdateDrinkRequest,
        },
        extractors::{
            Authorized, DrinkId, ValidJson,
            authorized::{DeleteDrinks, GetDrinksDetail, PatchDrinks, PostDrinks},
        },
    },
    error::AppError,
    repos::NewDrink,
    state::AppState,
};

pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    let drinks = state.store.list().await?;

    Ok(Json(DrinksResponse::new(
        drinks.into_iter().map(DrinkShort::from).collect(),
    )))
}

pub async fn list_drinks_detail(
    State(state): State<AppState>,
    _auth: Authorized<GetDrinksDetail>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let drinks = state.store.list().await?;

    Ok(Json(DrinksResponse::new(
        drinks.into_iter().map(DrinkLong::from).collect(),
    )))
}

pub async fn create_drink(
    State(state): State<AppState>,
    _auth: Authorized<PostDrinks>,
    ValidJson(req): ValidJson<CreateDrinkRequest>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    if state.store.find_by_title(&req.title).await?.is_some() {
        return Err(AppError::Conflict);
    }

    let drink = state
        .store
        .insert(NewDrink {
            title: req.title,
            recipe: req.recipe,
        })
        .await?;

    tracing::info!(id = drink.id, title = %drink.title, "drink created");

    Ok(Json(DrinksResponse::new(vec![DrinkLong::from(drink)])))
}

pub async fn update_drink(
    State(state): State<AppState>,
    DrinkId(id): DrinkId,
    _auth: Authorized<PatchDrinks>,
    ValidJson(req): ValidJson<UpdateDrinkRequest>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let mut drink = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(title) = req.title {
        if let Some(other) = state.store.find_by_title(&title).await?
            && other.id != drink.id
        {
            return Err(AppError::Conflict);
        }
        drink.title = title;
    }
    if let Some(recipe) = req.recipe {
        drink.recipe = recipe;
    }

    state.store.update(&drink).await?;

    tracing::info!(id = drink.id, title = %drink.title, "drink updated");

    Ok(Json(DrinksResponse::new(vec![DrinkLong::from(drink)])))
}

pub async fn delete_drink(
    State(state): State<AppState>,
    DrinkId(id): DrinkId,
    _auth: Authorized<DeleteDrinks>,
) -> Result<Json<DeleteDrinkResponse>, AppError> {
    let drink = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    state.store.delete(&drink).await?;

    tracing::info!(id, "drink deleted");

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: id,
    }))
}
