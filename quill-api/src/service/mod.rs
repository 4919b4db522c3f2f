pub mod comments;
mod helpers;
mod objects;
pub mod posts;

use crate::entity;
use crate::entity::prelude::*;
use crate::errors;
use crate::session::TokenSession;
use actix_session::Session;
use actix_web::{self, web, HttpResponse, Responder};
use log::{debug, error, log, Level};
pub use objects::DbConnection;
use objects::UserLookup;
use quill_commons::data_structures::{
    LoginForm, RegisterForm, UserDataResponse, ValidationErrorResponse,
};
use sea_orm::{ActiveValue, ColumnTrait, Condition, EntityTrait, QueryFilter};
use std::str::FromStr;
use std::sync::Mutex;
use validator::Validate;

pub(crate) const SESSION_ID: &str = "id";

pub type ServiceResult = Result<HttpResponse, errors::ServiceError>;

pub fn configure_service(cfg: &mut web::ServiceConfig) {
    cfg.service(hello_world);

    let user_scope = web::scope("/user")
        .service(user_create)
        .service(user_exists)
        .service(user_login_token)
        .service(user_data)
        .service(user_logout);
    cfg.service(user_scope);

    posts::configure_service(cfg);
    comments::configure_service(cfg);
}

#[actix_web::get("/")]
async fn hello_world() -> impl Responder {
    "quill api"
}

#[actix_web::post("/create")]
async fn user_create(
    registration: web::Json<RegisterForm>,
    app_data: web::Data<DbConnection>,
) -> impl Responder {
    let registration = registration.into_inner();
    if let Err(errors) = registration.validate() {
        return HttpResponse::BadRequest().json(ValidationErrorResponse {
            reason: "registration data validation failed".to_owned(),
            errors,
        });
    }

    let db = &app_data.db_connection;
    use entity::users;
    let res = Users::find()
        .filter(
            Condition::any()
                .add(users::Column::Username.eq(registration.username.as_str()))
                .add(users::Column::Email.eq(registration.email.as_str())),
        )
        .one(db)
        .await;
    match res {
        Ok(Some(_)) => HttpResponse::BadRequest()
            .reason("user already exists")
            .finish(),
        Ok(None) => {
            let Ok(password_hash) = bcrypt::hash(registration.password.as_str(), bcrypt::DEFAULT_COST)
            else {
                return HttpResponse::InternalServerError().finish();
            };

            let active = users::ActiveModel {
                username: ActiveValue::Set(registration.username.clone()),
                email: ActiveValue::Set(registration.email.clone()),
                password: ActiveValue::Set(password_hash),
                ..Default::default()
            };
            // a registration racing this one loses at the unique constraint
            if let Err(db_err) = Users::insert(active).exec(db).await {
                log!(
                    Level::Error,
                    "database insert error at create user for username: '{}' , err: '{:?}'",
                    registration.username,
                    db_err
                );
                return HttpResponse::InternalServerError().finish();
            }
            HttpResponse::Created().finish()
        }
        Err(db_err) => {
            log!(
                Level::Error,
                "database find error at create user for username: '{}' , err: '{:?}'",
                registration.username,
                db_err
            );
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[actix_web::get("/exists")]
async fn user_exists(
    lookup: web::Query<UserLookup>,
    data: web::Data<DbConnection>,
) -> impl Responder {
    let db = &data.db_connection;
    use entity::users;
    match Users::find()
        .filter(users::Column::Username.eq(lookup.username.as_str()))
        .one(db)
        .await
    {
        Ok(Some(_)) => HttpResponse::Ok().reason("user exists").finish(),
        Ok(None) => HttpResponse::NotFound()
            .reason("user does not exist")
            .finish(),
        Err(err) => {
            log!(
                Level::Error,
                "user exists error for username '{}' err: {:?}",
                lookup.username,
                err
            );
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[actix_web::post("/token")]
async fn user_login_token(
    login_form: web::Json<LoginForm>,
    data: web::Data<DbConnection>,
    token_session: web::Data<Mutex<dyn TokenSession>>,
    session: Session,
) -> Result<HttpResponse, errors::TokenError> {
    use entity::users;
    use errors::TokenError;

    let login_form = login_form.into_inner();
    if let Err(errors) = login_form.validate() {
        return Ok(HttpResponse::BadRequest().json(ValidationErrorResponse {
            reason: "login data validation failed".to_owned(),
            errors,
        }));
    }

    let db = &data.db_connection;
    let user = Users::find()
        .filter(users::Column::Username.eq(login_form.username.as_str()))
        .one(db)
        .await;
    let Ok(Some(model)) = user else {
        return Err(TokenError::UserNotFound);
    };

    if bcrypt::verify(login_form.password.as_str(), &model.password).unwrap_or(false) {
        let mut lock = token_session.lock();
        let guard = lock.as_mut().unwrap();

        let token = guard.add_user(&model.username, login_form.should_remember);
        session.insert(SESSION_ID, token.to_string())?;
        debug!("token minted for '{}'", model.username);

        Ok(HttpResponse::Accepted()
            .reason("password accepted")
            .finish())
    } else {
        session.remove(SESSION_ID);
        Err(TokenError::WrongPassword)
    }
}

#[actix_web::get("/data")]
async fn user_data(
    data: web::Data<DbConnection>,
    token_session: web::Data<Mutex<dyn TokenSession>>,
    session: Session,
) -> ServiceResult {
    let login = helpers::validate_session(&token_session, &session)?;

    let db = &data.db_connection;
    let user = Users::find()
        .filter(entity::users::Column::Username.eq(login.as_str()))
        .one(db)
        .await;
    match user {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(UserDataResponse {
            id: user.id,
            username: user.username,
            email: user.email,
        })),
        Ok(None) => {
            debug!("session login '{}' has no user row", login);
            Ok(HttpResponse::NotFound().finish())
        }
        Err(e) => {
            error!("{:?}", e);
            Err(e.into())
        }
    }
}

#[actix_web::post("/logout")]
async fn user_logout(
    token_session: web::Data<Mutex<dyn TokenSession>>,
    session: Session,
) -> impl Responder {
    if let Ok(Some(uuid_string)) = session.get::<String>(SESSION_ID) {
        if let Ok(uuid) = uuid::Uuid::from_str(&uuid_string) {
            let mut lock = token_session.lock();
            let guard = lock.as_mut().unwrap();
            guard.remove_user(&uuid);
        }
    }
    session.purge();
    HttpResponse::Ok().finish()
}
