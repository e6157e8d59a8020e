use chrono::{Duration, NaiveDateTime, Utc};
use common::auth::AuthUser;
use common::catalog::{BillingPeriod, Plan, SubscriptionStatus, TRIAL_DAYS};
use common::env_config::Config;
use common::error::{AppError, Res};
use db::dtos::subscription::SubscriptionUpsert;
use sqlx::PgPool;

use crate::dtos::sub::CheckoutRequest;
use crate::services::gateway::{CheckoutMeta, CheckoutSessionInfo, PaymentGateway};

/// Grants a free trial. The profile update is conditional, so two
/// concurrent requests (or a request racing a paid checkout) cannot
/// both succeed.
pub async fn start_trial(pool: &PgPool, user: &AuthUser, plan: Plan) -> Res<NaiveDateTime> {
    let profile = db::profile::get_profile(pool, user.id).await?;
    let trial_ends_at = trial_end_from(Utc::now().naive_utc());

    let granted = db::profile::start_trial(pool, user.id, plan.as_str(), trial_ends_at).await?;
    if !granted {
        return Err(AppError::BadRequest(
            "A subscription or trial is already active".to_string(),
        ));
    }

    // local trial row; the synthetic id keeps it distinct from anything
    // the gateway will ever send
    db::subscription::upsert_subscription(
        pool,
        SubscriptionUpsert {
            stripe_subscription_id: format!("trial_{}", user.id.simple()),
            stripe_customer_id: profile.stripe_customer_id.unwrap_or_default(),
            profile_id: user.id,
            plan: plan.as_str().to_string(),
            period: String::new(),
            status: SubscriptionStatus::Trial.as_str().to_string(),
            current_period_start: None,
            current_period_end: None,
            trial_start: Some(Utc::now().naive_utc()),
            trial_end: Some(trial_ends_at),
            cancel_at_period_end: false,
            amount: None,
            currency: None,
        },
    )
    .await?;

    Ok(trial_ends_at)
}

fn trial_end_from(now: NaiveDateTime) -> NaiveDateTime {
    now + Duration::days(TRIAL_DAYS)
}

/// Opens a checkout session for the requested plan. The price lookup
/// happens before any gateway call, so an unknown plan or period never
/// creates a customer.
pub async fn create_checkout(
    pool: &PgPool,
    gateway: &PaymentGateway,
    config: &Config,
    user: &AuthUser,
    req: CheckoutRequest,
) -> Res<CheckoutSessionInfo> {
    let plan = Plan::parse(&req.plan)?;
    let period = BillingPeriod::parse(&req.period)?;
    let price_id = config.prices.lookup(plan, period)?.to_string();

    let profile = db::profile::get_profile(pool, user.id).await?;
    let customer_id = match profile.stripe_customer_id {
        Some(id) => id,
        None => {
            let name = format!("{} {}", profile.first_name, profile.last_name);
            let id = gateway
                .create_customer(&profile.email, name.trim(), user.id)
                .await?;
            db::profile::set_stripe_customer_id(pool, user.id, &id).await?;
            id
        }
    };

    let success_url = req
        .success_url
        .unwrap_or_else(|| format!("{}/payment-success.html", config.frontend_url));
    let cancel_url = req
        .cancel_url
        .unwrap_or_else(|| format!("{}/tarifs.html", config.frontend_url));

    let meta = CheckoutMeta {
        user_id: user.id,
        plan: plan.as_str().to_string(),
        period: period.as_str().to_string(),
    };
    gateway
        .create_checkout_session(&customer_id, &price_id, &meta, &success_url, &cancel_url)
        .await
}

/// Requests cancellation at the end of the current period. The local
/// row is updated after the gateway confirms.
pub async fn cancel_subscription(
    pool: &PgPool,
    gateway: &PaymentGateway,
    user: &AuthUser,
) -> Res<()> {
    let subscription = db::subscription::find_active_by_profile(pool, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No active subscription found".to_string()))?;

    gateway
        .cancel_at_period_end(&subscription.stripe_subscription_id)
        .await?;
    db::subscription::mark_cancel_requested(pool, &subscription.stripe_subscription_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trial_lasts_seven_days() {
        let now = chrono::DateTime::from_timestamp(1_700_000_000, 0)
            .unwrap()
            .naive_utc();
        let end = trial_end_from(now);
        assert_eq!((end - now).num_days(), 7);
    }
}
