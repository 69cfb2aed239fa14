use crate::db::{DbPool, OrmConn};

/// Shared handles cloned into every handler. The sqlx pool serves the
/// dynamic search queries, taxonomy reads and migrations; the SeaORM
/// connection serves entity CRUD and the workflow transactions.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
}
