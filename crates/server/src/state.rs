use sea_orm::DatabaseConnection;

/// Shared handler state: the ORM connection plus the frontend base url used
/// when composing public rating urls.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub frontend_base_url: String,
}
