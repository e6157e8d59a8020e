use actix_web::{Responder, get, post, web};
use common::auth::AuthUser;
use common::error::Res;
use common::http::Success;
use db::dtos::learning::VideoProgressUpsert;
use sqlx::PgPool;

use crate::dtos::learn::{CatalogQuery, VideoProgressRequest};

#[get("/videos")]
async fn get_videos(
    query: web::Query<CatalogQuery>,
    pool: web::Data<PgPool>,
) -> Res<impl Responder> {
    let videos = db::learning::list_videos(
        &**pool,
        query.level.clone(),
        query.subject.clone(),
        query.capped_limit(),
    )
    .await?;
    Success::ok(videos)
}

/// Records watch progress, one row per (child, video).
#[post("/videos/progress")]
async fn post_progress(
    user: web::ReqData<AuthUser>,
    req: web::Json<VideoProgressRequest>,
    pool: web::Data<PgPool>,
) -> Res<impl Responder> {
    let req = req.into_inner();
    let child = db::child::get_child_of_parent(&**pool, req.child_id, user.id).await?;

    let history = db::learning::upsert_video_progress(
        &**pool,
        VideoProgressUpsert {
            child_id: child.id,
            video_id: req.video_id,
            watched_seconds: req.watched_seconds,
            completed: req.completed,
            last_position: req.last_position,
        },
    )
    .await?;
    Success::ok(history)
}
