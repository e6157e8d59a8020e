use std::sync::Arc;

use actix_web::{Responder, post, web};
use common::auth::AuthUser;
use common::catalog::Plan;
use common::env_config::Config;
use common::error::Res;
use common::http::Success;
use sqlx::PgPool;

use crate::dtos::sub::{CancelResponse, CheckoutRequest, CheckoutResponse, TrialRequest, TrialResponse};
use crate::services;
use crate::services::gateway::PaymentGateway;

/// Starts the free trial for the authenticated profile.
#[post("/start")]
async fn post_start(
    user: web::ReqData<AuthUser>,
    req: web::Json<TrialRequest>,
    pool: web::Data<PgPool>,
) -> Res<impl Responder> {
    let plan = Plan::parse(&req.plan)?;
    let trial_ends_at = services::sub::start_trial(&pool, &user, plan).await?;
    Success::ok(TrialResponse {
        success: true,
        trial_ends_at,
    })
}

/// Opens a checkout session for a paid plan.
#[post("/create")]
async fn post_create(
    user: web::ReqData<AuthUser>,
    req: web::Json<CheckoutRequest>,
    pool: web::Data<PgPool>,
    gateway: web::Data<Arc<PaymentGateway>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let session =
        services::sub::create_checkout(&pool, &gateway, &config, &user, req.into_inner()).await?;
    Success::ok(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    })
}

/// Cancels the caller's subscription at the end of the current period.
#[post("/cancel")]
async fn post_cancel(
    user: web::ReqData<AuthUser>,
    pool: web::Data<PgPool>,
    gateway: web::Data<Arc<PaymentGateway>>,
) -> Res<impl Responder> {
    services::sub::cancel_subscription(&pool, &gateway, &user).await?;
    Success::ok(CancelResponse {
        success: true,
        message: "Subscription will be canceled at the end of the period".to_string(),
    })
}
