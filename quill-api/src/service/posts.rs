use actix_session::Session;
use actix_web::{
    web::{self, Data, Json},
    HttpResponse,
};
use quill_commons::data_structures::{EditForm, PostData, PostForm, ValidationErrorResponse};
use sea_orm::{
    ActiveModelBehavior, ActiveValue, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Select,
};
use std::sync::Mutex;
use validator::Validate;

use crate::entity::{posts, users};
use crate::errors::ServiceError;
use crate::session::TokenSession;

use super::{helpers, DbConnection, ServiceResult};

pub fn configure_service(cfg: &mut web::ServiceConfig) {
    let posts_scope = web::scope("/posts")
        .service(posts_create)
        .service(posts_edit)
        .service(posts_newest)
        .service(posts_user)
        .service(posts_id);
    cfg.service(posts_scope);
}

/// One author's posts, newest first.
pub fn posts_by_author(author_id: i32) -> Select<posts::Entity> {
    posts::Entity::find()
        .filter(posts::Column::AuthorId.eq(author_id))
        .order_by_desc(posts::Column::Date)
}

fn to_post_data((post, author): (posts::Model, Option<users::Model>)) -> PostData {
    PostData {
        id: post.id,
        author: author.map_or_else(String::new, |u| u.username),
        title: post.title,
        content: post.content,
        date: post.date,
        image_path: post.image_path,
    }
}

#[actix_web::post("create")]
async fn posts_create(
    post_form: Json<PostForm>,
    session: Session,
    token_session: Data<Mutex<dyn TokenSession>>,
    db: Data<DbConnection>,
) -> ServiceResult {
    let post_form = post_form.into_inner();
    if let Err(errors) = post_form.validate() {
        return Ok(HttpResponse::BadRequest().json(ValidationErrorResponse {
            reason: "post creation data validation failed".to_owned(),
            errors,
        }));
    }

    let login = helpers::validate_session(&token_session, &session)?;
    let id = helpers::get_user_id(&login, &db).await?;

    let mut model = posts::ActiveModel::new();
    model.title = ActiveValue::Set(post_form.title);
    model.content = ActiveValue::Set(post_form.content);
    model.image_path = ActiveValue::Set(post_form.image);
    model.author_id = ActiveValue::Set(id);

    posts::Entity::insert(model).exec(&db.db_connection).await?;
    Ok(HttpResponse::Created().finish())
}

#[actix_web::put("edit/{post_id}")]
async fn posts_edit(
    post_id: web::Path<i32>,
    edit_form: Json<EditForm>,
    session: Session,
    token_session: Data<Mutex<dyn TokenSession>>,
    db: Data<DbConnection>,
) -> ServiceResult {
    let edit_form = edit_form.into_inner();
    if let Err(errors) = edit_form.validate() {
        return Ok(HttpResponse::BadRequest().json(ValidationErrorResponse {
            reason: "post edit data validation failed".to_owned(),
            errors,
        }));
    }

    let login = helpers::validate_session(&token_session, &session)?;
    let id = helpers::get_user_id(&login, &db).await?;

    let Some(post) = posts::Entity::find_by_id(post_id.into_inner())
        .one(&db.db_connection)
        .await?
    else {
        return Err(ServiceError::NotFound);
    };
    if post.author_id != id {
        return Err(ServiceError::Forbidden);
    }

    let mut model = post.into_active_model();
    model.title = ActiveValue::Set(edit_form.title);
    model.content = ActiveValue::Set(edit_form.content);
    posts::Entity::update(model).exec(&db.db_connection).await?;

    Ok(HttpResponse::Ok().finish())
}

#[actix_web::get("newest/{amount}")]
async fn posts_newest(amount: web::Path<u64>, db: Data<DbConnection>) -> ServiceResult {
    let posts = posts::Entity::find()
        .find_also_related(users::Entity)
        .order_by_desc(posts::Column::Date)
        .limit(Some(amount.into_inner()))
        .all(&db.db_connection)
        .await?;

    Ok(HttpResponse::Ok().json(posts.into_iter().map(to_post_data).collect::<Vec<_>>()))
}

#[derive(serde::Deserialize)]
struct PostsByUserQuery {
    username: String,
    amount: u64,
}

#[actix_web::get("user")]
async fn posts_user(query: web::Query<PostsByUserQuery>, db: Data<DbConnection>) -> ServiceResult {
    let query = query.into_inner();
    let id = helpers::get_user_id(&query.username, &db).await?;

    let posts = posts_by_author(id)
        .limit(Some(query.amount))
        .all(&db.db_connection)
        .await?;

    Ok(HttpResponse::Ok().json(
        posts
            .into_iter()
            .map(|post| PostData {
                id: post.id,
                author: query.username.clone(),
                title: post.title,
                content: post.content,
                date: post.date,
                image_path: post.image_path,
            })
            .collect::<Vec<_>>(),
    ))
}

#[actix_web::get("id/{post_id}")]
async fn posts_id(post_id: web::Path<i32>, db: Data<DbConnection>) -> ServiceResult {
    let post = posts::Entity::find_by_id(post_id.into_inner())
        .find_also_related(users::Entity)
        .one(&db.db_connection)
        .await?
        .map(to_post_data);
    match post {
        Some(p) => Ok(HttpResponse::Ok().json(p)),
        None => Ok(HttpResponse::NotFound().finish()),
    }
}
