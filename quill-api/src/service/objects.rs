use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct DbConnection {
    pub(super) db_connection: DatabaseConnection,
}

impl DbConnection {
    pub fn new(db_connection: DatabaseConnection) -> Self {
        Self { db_connection }
    }
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct UserLookup {
    pub(super) username: String,
}
