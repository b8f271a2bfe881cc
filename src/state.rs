use std::sync::Arc;

use crate::db::{DbPool, OrmConn};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    /// HS256 key shared with the upstream auth service.
    pub jwt_secret: Arc<str>,
}
