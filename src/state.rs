use sqlx::SqlitePool;

/// Shared per-worker state, handed to handlers through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
}
