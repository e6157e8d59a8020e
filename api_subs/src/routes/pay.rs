use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use common::env_config::Config;
use common::error::{AppError, Res};
use common::http::Success;
use sqlx::PgPool;

use crate::services;
use crate::services::gateway::PaymentGateway;

/// Handles payment gateway webhook events.
///
/// Not called from the frontend: Stripe's servers post here when events
/// occur. The endpoint URL and the signing secret are configured in the
/// Stripe dashboard (STRIPE_WEBHOOK_SECRET).
///
/// Signature verification failures are a 400 so Stripe retries with a
/// correct signature. Processing failures after verification are logged
/// and acknowledged anyway; rejecting them would only trigger redelivery
/// of an event we already cannot apply, so a failed write here is a
/// reconciliation gap until the next event for the same object arrives.
#[post("/webhook")]
async fn post_webhook(
    payload: String,
    req: actix_web::HttpRequest,
    config: web::Data<Arc<Config>>,
    pool: web::Data<PgPool>,
) -> Res<impl Responder> {
    let signature = match req.headers().get("stripe-signature") {
        Some(signature) => signature.to_str().unwrap_or(""),
        None => return Err(AppError::BadRequest("Stripe signature missing".to_string())),
    };

    let event =
        services::webhook::construct_event(&payload, signature, &config.stripe_webhook_secret)?;
    if let Err(e) = services::webhook::process_event(&pool, event).await {
        log::error!("Webhook processing failed: {}", e);
    }

    Success::ok(serde_json::json!({ "received": true }))
}

/// Public product catalog for the pricing page.
#[get("/stripe/products")]
async fn get_products(gateway: web::Data<Arc<PaymentGateway>>) -> Res<impl Responder> {
    let products = gateway.list_products().await?;
    Success::ok(products)
}

/// Outcome of a checkout session, for the post-payment confirmation
/// page.
#[get("/payments/{session_id}")]
async fn get_payment_session(
    path: web::Path<String>,
    gateway: web::Data<Arc<PaymentGateway>>,
) -> Res<impl Responder> {
    let session_id = path.into_inner();
    let status = gateway.retrieve_checkout(&session_id).await?;
    Success::ok(status)
}
