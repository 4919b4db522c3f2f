use actix_session::Session;
use actix_web::{web, HttpResponse};
use quill_commons::data_structures::{CommentData, CommentForm, ValidationErrorResponse};
use sea_orm::{
    ActiveModelBehavior, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Deserialize;
use std::sync::Mutex;
use validator::Validate;

use crate::entity::{comments, posts, users};
use crate::errors::ServiceError;
use crate::session::TokenSession;

use super::{helpers, DbConnection, ServiceResult};

pub fn configure_service(cfg: &mut web::ServiceConfig) {
    let scope = web::scope("/comments")
        .service(comments_post)
        .service(comments_get);
    cfg.service(scope);
}

fn to_comment_data((comment, author): (comments::Model, Option<users::Model>)) -> CommentData {
    CommentData {
        id: comment.id,
        post_id: comment.post_id,
        author: author.map_or_else(String::new, |u| u.username),
        content: comment.content,
        date: comment.date,
    }
}

#[actix_web::post("post")]
pub async fn comments_post(
    comment: web::Json<CommentForm>,
    db: web::Data<DbConnection>,
    session: Session,
    token_session: web::Data<Mutex<dyn TokenSession>>,
) -> ServiceResult {
    let comment = comment.into_inner();
    if let Err(errors) = comment.validate() {
        return Ok(HttpResponse::BadRequest().json(ValidationErrorResponse {
            reason: "comment data validation failed".to_owned(),
            errors,
        }));
    }

    let login = helpers::validate_session(&token_session, &session)?;
    let uid = helpers::get_user_id(&login, &db).await?;

    if posts::Entity::find_by_id(comment.post_id)
        .one(&db.db_connection)
        .await?
        .is_none()
    {
        return Err(ServiceError::NotFound);
    }

    let mut model = comments::ActiveModel::new();
    model.content = ActiveValue::Set(comment.content);
    model.post_id = ActiveValue::Set(comment.post_id);
    model.author_id = ActiveValue::Set(uid);

    comments::Entity::insert(model)
        .exec(&db.db_connection)
        .await?;
    Ok(HttpResponse::Created().finish())
}

#[derive(Deserialize)]
pub struct CommentsGetQuery {
    cid: Option<i32>,
    pid: Option<i32>,
    limit: Option<u64>,
}

#[actix_web::get("")]
pub async fn comments_get(
    query: web::Query<CommentsGetQuery>,
    db: web::Data<DbConnection>,
) -> ServiceResult {
    let query = query.into_inner();
    match (query.pid, query.cid) {
        (None, None) | (Some(_), Some(_)) => Ok(HttpResponse::BadRequest().finish()),
        (None, Some(cid)) => {
            let com = comments::Entity::find_by_id(cid)
                .find_also_related(users::Entity)
                .one(&db.db_connection)
                .await?;
            match com {
                None => Ok(HttpResponse::NotFound().finish()),
                Some(c) => Ok(HttpResponse::Ok().json(to_comment_data(c))),
            }
        }
        (Some(pid), None) => {
            let com = comments::Entity::find()
                .filter(comments::Column::PostId.eq(pid))
                .find_also_related(users::Entity)
                .order_by_desc(comments::Column::Date)
                .limit(query.limit)
                .all(&db.db_connection)
                .await?;
            Ok(HttpResponse::Ok()
                .json(com.into_iter().map(to_comment_data).collect::<Vec<_>>()))
        }
    }
}
