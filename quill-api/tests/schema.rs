use chrono::Utc;
use quill_api::entity::{comments, posts, users};
use quill_api::migrator::Migrator;
use quill_api::service::posts::posts_by_author;
use sea_orm::{ActiveModelBehavior, ActiveValue, ConnectOptions, Database, DatabaseConnection, EntityTrait};
use sea_orm_migration::MigratorTrait;

// 60 chars, the shape of a bcrypt hash
const PASSWORD_HASH: &str = "$2b$12$C6UzMDM.H6dfI/f/IKcEeO7ZnTDEnrw9L0R1sCCNUlRbRNu6wDCBa";

async fn fresh_db() -> DatabaseConnection {
    let mut c_opt = ConnectOptions::new("sqlite::memory:");
    c_opt.max_connections(1).sqlx_logging(false);

    let db = Database::connect(c_opt).await.expect("sqlite connect");
    Migrator::up(&db, None).await.expect("migrations");
    db
}

async fn insert_user(db: &DatabaseConnection, username: &str, email: &str) -> i32 {
    let user = users::ActiveModel {
        username: ActiveValue::Set(username.to_owned()),
        email: ActiveValue::Set(email.to_owned()),
        password: ActiveValue::Set(PASSWORD_HASH.to_owned()),
        ..Default::default()
    };
    users::Entity::insert(user)
        .exec(db)
        .await
        .expect("insert user")
        .last_insert_id
}

async fn insert_post(db: &DatabaseConnection, author_id: i32, title: &str, date: chrono::NaiveDateTime) -> i32 {
    let post = posts::ActiveModel {
        title: ActiveValue::Set(title.to_owned()),
        content: ActiveValue::Set("content".to_owned()),
        date: ActiveValue::Set(date),
        author_id: ActiveValue::Set(author_id),
        ..Default::default()
    };
    posts::Entity::insert(post)
        .exec(db)
        .await
        .expect("insert post")
        .last_insert_id
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let db = fresh_db().await;
    insert_user(&db, "alice", "alice@example.com").await;

    let dup = users::ActiveModel {
        username: ActiveValue::Set("alice".to_owned()),
        email: ActiveValue::Set("other@example.com".to_owned()),
        password: ActiveValue::Set(PASSWORD_HASH.to_owned()),
        ..Default::default()
    };
    assert!(users::Entity::insert(dup).exec(&db).await.is_err());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let db = fresh_db().await;
    insert_user(&db, "alice", "alice@example.com").await;

    let dup = users::ActiveModel {
        username: ActiveValue::Set("bob".to_owned()),
        email: ActiveValue::Set("alice@example.com".to_owned()),
        password: ActiveValue::Set(PASSWORD_HASH.to_owned()),
        ..Default::default()
    };
    assert!(users::Entity::insert(dup).exec(&db).await.is_err());
}

#[tokio::test]
async fn post_author_must_exist() {
    let db = fresh_db().await;

    let orphan = posts::ActiveModel {
        title: ActiveValue::Set("title".to_owned()),
        content: ActiveValue::Set("content".to_owned()),
        date: ActiveValue::Set(Utc::now().naive_utc()),
        author_id: ActiveValue::Set(4242),
        ..Default::default()
    };
    assert!(posts::Entity::insert(orphan).exec(&db).await.is_err());
}

#[tokio::test]
async fn comment_author_and_post_must_exist() {
    let db = fresh_db().await;
    let uid = insert_user(&db, "alice", "alice@example.com").await;
    let pid = insert_post(&db, uid, "title", Utc::now().naive_utc()).await;

    let bad_author = comments::ActiveModel {
        content: ActiveValue::Set("hello".to_owned()),
        date: ActiveValue::Set(Utc::now().naive_utc()),
        author_id: ActiveValue::Set(4242),
        post_id: ActiveValue::Set(pid),
        ..Default::default()
    };
    assert!(comments::Entity::insert(bad_author).exec(&db).await.is_err());

    let bad_post = comments::ActiveModel {
        content: ActiveValue::Set("hello".to_owned()),
        date: ActiveValue::Set(Utc::now().naive_utc()),
        author_id: ActiveValue::Set(uid),
        post_id: ActiveValue::Set(4242),
        ..Default::default()
    };
    assert!(comments::Entity::insert(bad_post).exec(&db).await.is_err());

    let good = comments::ActiveModel {
        content: ActiveValue::Set("hello".to_owned()),
        date: ActiveValue::Set(Utc::now().naive_utc()),
        author_id: ActiveValue::Set(uid),
        post_id: ActiveValue::Set(pid),
        ..Default::default()
    };
    assert!(comments::Entity::insert(good).exec(&db).await.is_ok());
}

#[tokio::test]
async fn user_posts_are_listed_newest_first() {
    let db = fresh_db().await;
    let uid = insert_user(&db, "alice", "alice@example.com").await;

    let now = Utc::now().naive_utc();
    // inserted out of order on purpose
    insert_post(&db, uid, "middle", now - chrono::Duration::hours(1)).await;
    insert_post(&db, uid, "newest", now).await;
    insert_post(&db, uid, "oldest", now - chrono::Duration::hours(2)).await;

    let posts = posts_by_author(uid)
        .all(&db)
        .await
        .expect("list posts");

    let titles = posts.iter().map(|p| p.title.as_str()).collect::<Vec<_>>();
    assert_eq!(titles, vec!["newest", "middle", "oldest"]);
    assert!(posts.windows(2).all(|w| w[0].date >= w[1].date));
}

#[tokio::test]
async fn post_creation_date_defaults_to_now_utc() {
    let db = fresh_db().await;
    let uid = insert_user(&db, "alice", "alice@example.com").await;

    let mut model = posts::ActiveModel::new();
    model.title = ActiveValue::Set("title".to_owned());
    model.content = ActiveValue::Set("content".to_owned());
    model.author_id = ActiveValue::Set(uid);

    let id = posts::Entity::insert(model)
        .exec(&db)
        .await
        .expect("insert post")
        .last_insert_id;
    let stored = posts::Entity::find_by_id(id)
        .one(&db)
        .await
        .expect("find post")
        .expect("post row");

    // image_path was never set, defaults to NULL
    assert_eq!(stored.image_path, None);

    let age = Utc::now().naive_utc().signed_duration_since(stored.date);
    assert!(age >= chrono::Duration::zero());
    assert!(age < chrono::Duration::seconds(2));
}

#[tokio::test]
async fn comment_creation_date_defaults_to_now_utc() {
    let model = comments::ActiveModel::new();
    let date = match model.date {
        ActiveValue::Set(date) => date,
        _ => panic!("creation date was not defaulted"),
    };

    let age = Utc::now().naive_utc().signed_duration_since(date);
    assert!(age >= chrono::Duration::zero());
    assert!(age < chrono::Duration::seconds(2));
}
