mod events;
mod registry;
mod ws;

use axum::{routing::get, Router};

use crate::AppState;

pub use events::{ClientEvent, ServerEvent};
pub use registry::Registry;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::chat_ws))
}
