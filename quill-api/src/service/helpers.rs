use crate::entity;
use crate::entity::prelude::*;
use crate::errors::{self, SessionValidationError};
use crate::session::TokenSession;

pub use super::objects::DbConnection;
use super::SESSION_ID;
use actix_session::Session;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::{str::FromStr, sync::Mutex};
use uuid::Uuid;

pub fn validate_session(
    token_session: &actix_web::web::Data<Mutex<dyn TokenSession>>,
    session: &Session,
) -> Result<String, errors::SessionValidationError> {
    let Ok(Some(uuid_string)) = session.get::<String>(SESSION_ID) else {
        return Err(SessionValidationError::NoCookie);
    };
    let uuid = Uuid::from_str(&uuid_string).map_err(|e| SessionValidationError::Other {
        source: Box::new(e),
    })?;

    let lock = token_session.lock();
    let sess = lock.as_ref().unwrap();
    let Some(usr_login) = sess.get_user(&uuid) else {
        return Err(SessionValidationError::NoSession);
    };
    Ok(usr_login)
}

pub async fn get_user_id(login: &str, db: &DbConnection) -> Result<i32, errors::UserIdError> {
    let usr = Users::find()
        .filter(entity::users::Column::Username.eq(login))
        .one(&db.db_connection)
        .await?;
    match usr {
        Some(u) => Ok(u.id),
        None => Err(errors::UserIdError::NoUser),
    }
}
