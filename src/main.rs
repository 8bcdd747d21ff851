use axum::{http::Method, routing::get, Router};
use charla::{chat, history, res, store::Store, AppState};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let store = match dotenv::var("DATABASE_URL") {
        Ok(url) => Some(Store::connect(&url).await.unwrap()),
        Err(_) => {
            info!("DATABASE_URL not set, relaying without persistence");
            None
        }
    };

    let app_state = AppState {
        registry: chat::Registry::new(),
        store,
    };

    let app = Router::new()
        .route("/", get(res::index))

        .nest("/history", history::router())
        .merge(chat::router())

        .with_state(app_state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST]),
        );

    let addr = dotenv::var("BIND_ADDR").unwrap_or("0.0.0.0:3000".to_owned());
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
