use actix_web::{Responder, delete, get, post, put, web};
use common::auth::AuthUser;
use common::error::Res;
use common::http::Success;
use db::dtos::child::{ChildNew, ChildUpdate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::child::ChildRequest;

#[post("")]
async fn post_child(
    user: web::ReqData<AuthUser>,
    req: web::Json<ChildRequest>,
    pool: web::Data<PgPool>,
) -> Res<impl Responder> {
    let req = req.into_inner();
    let child = db::child::insert_child(
        &**pool,
        ChildNew {
            parent_id: user.id,
            first_name: req.first_name,
            last_name: req.last_name,
            school_level: req.school_level,
        },
    )
    .await?;
    Success::created(child)
}

#[get("")]
async fn get_children(
    user: web::ReqData<AuthUser>,
    pool: web::Data<PgPool>,
) -> Res<impl Responder> {
    let children = db::child::get_children_by_parent(&**pool, user.id).await?;
    Success::ok(children)
}

#[put("/{id}")]
async fn put_child(
    user: web::ReqData<AuthUser>,
    path: web::Path<Uuid>,
    req: web::Json<ChildRequest>,
    pool: web::Data<PgPool>,
) -> Res<impl Responder> {
    let req = req.into_inner();
    let child = db::child::update_child(
        &**pool,
        path.into_inner(),
        user.id,
        ChildUpdate {
            first_name: req.first_name,
            last_name: req.last_name,
            school_level: req.school_level,
        },
    )
    .await?;
    Success::ok(child)
}

#[delete("/{id}")]
async fn delete_child(
    user: web::ReqData<AuthUser>,
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Res<impl Responder> {
    db::child::delete_child(&**pool, path.into_inner(), user.id).await?;
    Success::ok(serde_json::json!({ "success": true }))
}
