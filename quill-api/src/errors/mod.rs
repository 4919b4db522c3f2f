use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("User not found")]
    UserNotFound,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Session error")]
    SessionError {
        #[from]
        source: actix_session::SessionInsertError,
    },
}

impl ResponseError for TokenError {
    fn error_response(&self) -> actix_web::HttpResponse<actix_web::body::BoxBody> {
        match self {
            &TokenError::WrongPassword => {
                HttpResponse::Forbidden().reason("wrong password").finish()
            }
            &TokenError::UserNotFound => {
                HttpResponse::BadRequest().reason("user not found").finish()
            }
            &TokenError::SessionError { source: _ } => HttpResponse::InternalServerError()
                .reason("session error")
                .finish(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionValidationError {
    #[error("No session cookie")]
    NoCookie,

    #[error("No such user session")]
    NoSession,

    #[error("Session validation error")]
    Other { source: Box<dyn std::error::Error> },
}

#[derive(Error, Debug)]
pub enum UserIdError {
    #[error("No such user")]
    NoUser,

    #[error("Database error")]
    Database {
        #[from]
        source: DbErr,
    },
}

/// Constraint violations from the storage engine pass through `Database`
/// unmodified; deciding what the client sees happens here and nowhere deeper.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error")]
    Database {
        #[from]
        source: DbErr,
    },

    #[error("Session validation failed")]
    Session {
        #[from]
        source: SessionValidationError,
    },

    #[error("User resolution failed")]
    User {
        #[from]
        source: UserIdError,
    },

    #[error("Not the resource owner")]
    Forbidden,

    #[error("Resource not found")]
    NotFound,
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> actix_web::HttpResponse<actix_web::body::BoxBody> {
        match self {
            ServiceError::Database { source: _ } => HttpResponse::InternalServerError()
                .reason("database error")
                .finish(),
            ServiceError::Session { source: _ } => HttpResponse::Forbidden()
                .reason("invalid session")
                .finish(),
            ServiceError::User {
                source: UserIdError::NoUser,
            } => HttpResponse::BadRequest().reason("user not found").finish(),
            ServiceError::User { source: _ } => HttpResponse::InternalServerError()
                .reason("database error")
                .finish(),
            ServiceError::Forbidden => HttpResponse::Forbidden().reason("not the author").finish(),
            ServiceError::NotFound => HttpResponse::NotFound().finish(),
        }
    }
}
