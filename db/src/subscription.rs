use common::error::{AppError, Res};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{dtos::subscription::SubscriptionUpsert, models::subscription::Subscription};

/// Applies a gateway snapshot, insert-or-update keyed on the Stripe
/// subscription id. Replaying the same event leaves a single row.
///
/// Any other live row for the profile (e.g. a locally granted trial) is
/// retired first, inside the same transaction, so the
/// one-live-subscription index never rejects the snapshot.
pub async fn upsert_subscription(pool: &PgPool, data: SubscriptionUpsert) -> Res<Subscription> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE subscriptions
        SET status = 'canceled', updated_at = now()
        WHERE profile_id = $1
          AND status IN ('active', 'trial')
          AND stripe_subscription_id <> $2
        "#,
    )
    .bind(data.profile_id)
    .bind(&data.stripe_subscription_id)
    .execute(&mut *tx)
    .await?;

    let subscription = sqlx::query_as::<_, Subscription>(
        r#"
        INSERT INTO subscriptions (
            stripe_subscription_id, stripe_customer_id, profile_id, plan, period,
            status, current_period_start, current_period_end, trial_start, trial_end,
            cancel_at_period_end, amount, currency
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        ON CONFLICT (stripe_subscription_id) DO UPDATE SET
            stripe_customer_id = EXCLUDED.stripe_customer_id,
            profile_id = EXCLUDED.profile_id,
            plan = EXCLUDED.plan,
            period = EXCLUDED.period,
            status = EXCLUDED.status,
            current_period_start = EXCLUDED.current_period_start,
            current_period_end = EXCLUDED.current_period_end,
            trial_start = EXCLUDED.trial_start,
            trial_end = EXCLUDED.trial_end,
            cancel_at_period_end = EXCLUDED.cancel_at_period_end,
            amount = EXCLUDED.amount,
            currency = EXCLUDED.currency,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(data.stripe_subscription_id)
    .bind(data.stripe_customer_id)
    .bind(data.profile_id)
    .bind(data.plan)
    .bind(data.period)
    .bind(data.status)
    .bind(data.current_period_start)
    .bind(data.current_period_end)
    .bind(data.trial_start)
    .bind(data.trial_end)
    .bind(data.cancel_at_period_end)
    .bind(data.amount)
    .bind(data.currency)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(subscription)
}

pub async fn mark_canceled<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    stripe_subscription_id: &str,
) -> Res<()> {
    sqlx::query(
        r#"
        UPDATE subscriptions
        SET status = 'canceled', updated_at = now()
        WHERE stripe_subscription_id = $1
        "#,
    )
    .bind(stripe_subscription_id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn mark_cancel_requested<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    stripe_subscription_id: &str,
) -> Res<()> {
    sqlx::query(
        r#"
        UPDATE subscriptions
        SET cancel_at_period_end = TRUE, status = 'canceled', updated_at = now()
        WHERE stripe_subscription_id = $1
        "#,
    )
    .bind(stripe_subscription_id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn find_live_by_profile<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    profile_id: Uuid,
) -> Res<Option<Subscription>> {
    sqlx::query_as::<_, Subscription>(
        r#"
        SELECT * FROM subscriptions
        WHERE profile_id = $1 AND status IN ('active', 'trial')
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(profile_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn find_active_by_profile<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    profile_id: Uuid,
) -> Res<Option<Subscription>> {
    sqlx::query_as::<_, Subscription>(
        "SELECT * FROM subscriptions WHERE profile_id = $1 AND status = 'active' LIMIT 1",
    )
    .bind(profile_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}
