/*
 * Responsibility
 * - URL 構造を定義 (/drinks, /drinks-detail, /drinks/{id}, /health)
 * - 認可は route_layer ではなく handler 引数の Authorized<P> で route ごとに宣言する
 * - 未定義のパスは JSON の 404 を返す
 */
use axum::{
    Router,
    routing::{get, patch},
};

use crate::api::handlers::{
    drinks::{create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink},
    health::health,
};
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/drinks", get(list_drinks).post(create_drink))
        .route("/drinks-detail", get(list_drinks_detail))
        .route("/drinks/{id}", patch(update_drink).delete(delete_drink))
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound
}
