//! HTTP API for a single list of todos persisted in SQLite.
//!
//! # Overview
//! `app` wires the routes below to their handlers, wraps them in the CORS
//! middleware, and shares one `TodoStore` through `AppState`.
//!
//! | Method | Path                          | Handler           |
//! |--------|-------------------------------|-------------------|
//! | GET    | `/api/todos`                  | `list_todos`      |
//! | POST   | `/api/todos`                  | `create_todo`     |
//! | GET    | `/api/todos/{id}`             | `get_todo`        |
//! | PUT    | `/api/todos/{id}`             | `update_todo`     |
//! | DELETE | `/api/todos/{id}`             | `delete_todo`     |
//! | PUT    | `/api/todos/{id}/toggle`      | `toggle_todo`     |
//! | DELETE | `/api/todos/completed/clear`  | `clear_completed` |
//!
//! Literal segments win over `{id}`, so `/api/todos/completed/clear` never
//! reaches the id-based routes.

pub mod config;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod store;

use std::future::Future;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::{Config, ConfigError};
pub use error::{ApiError, StartupError};
pub use store::{StorageError, TodoStore};

/// Shared handler state. The store is the only process-wide resource.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<TodoStore>,
}

impl AppState {
    pub fn new(store: TodoStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Human-readable endpoint summary, logged at startup.
pub const ENDPOINTS: &[&str] = &[
    "GET    /api/todos                  - list todos",
    "POST   /api/todos                  - create todo",
    "GET    /api/todos/{id}             - fetch one todo",
    "PUT    /api/todos/{id}             - update todo",
    "DELETE /api/todos/{id}             - delete todo",
    "PUT    /api/todos/{id}/toggle      - toggle completion",
    "DELETE /api/todos/completed/clear  - clear completed todos",
];

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/api/todos/completed/clear",
            delete(handlers::clear_completed),
        )
        .route(
            "/api/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .route("/api/todos/{id}/toggle", put(handlers::toggle_todo))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(cors::cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API on `listener` until `shutdown` resolves or I/O fails. The
/// store is dropped, closing the database, once in-flight requests finish.
pub async fn run<F>(
    listener: TcpListener,
    store: TodoStore,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(AppState::new(store)))
        .with_graceful_shutdown(shutdown)
        .await
}
