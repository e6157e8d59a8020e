use actix_web::{Responder, get, web};
use common::auth::AuthUser;
use common::error::Res;
use common::http::Success;
use sqlx::PgPool;

use crate::services::stats;

/// Parent dashboard: profile, per-child learning aggregates and the
/// subscription summary.
#[get("/stats")]
async fn get_stats(
    user: web::ReqData<AuthUser>,
    pool: web::Data<PgPool>,
) -> Res<impl Responder> {
    let stats = stats::dashboard(&pool, &user).await?;
    Success::ok(stats)
}
