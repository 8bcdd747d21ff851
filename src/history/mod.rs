use axum::{debug_handler, extract::{Path, State}, routing::get, Json, Router};

use crate::store::{Store, StoredMessage};
use crate::{AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/room/{room}", get(room_history))
        .route("/pair/{a}/{b}", get(pair_history))
}

#[debug_handler(state = AppState)]
async fn room_history(
    Path(room): Path<String>,
    State(store): State<Option<Store>>,
) -> AppResult<Json<Vec<StoredMessage>>> {
    let store = store.ok_or("message history requires DATABASE_URL")?;
    Ok(Json(store.room_history(&room).await?))
}

#[debug_handler(state = AppState)]
async fn pair_history(
    Path((a, b)): Path<(String, String)>,
    State(store): State<Option<Store>>,
) -> AppResult<Json<Vec<StoredMessage>>> {
    let store = store.ok_or("message history requires DATABASE_URL")?;
    Ok(Json(store.pair_history(&a, &b).await?))
}
