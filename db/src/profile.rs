use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{dtos::profile::ProfileNew, models::profile::Profile};

pub async fn find_profile<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    profile_id: Uuid,
) -> Res<Option<Profile>> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
        .bind(profile_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_profile<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    profile_id: Uuid,
) -> Res<Profile> {
    find_profile(executor, profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

pub async fn insert_profile<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: ProfileNew,
) -> Res<Profile> {
    sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (id, email, first_name, last_name)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(data.id)
    .bind(data.email)
    .bind(data.first_name)
    .bind(data.last_name)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn set_stripe_customer_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    profile_id: Uuid,
    stripe_customer_id: &str,
) -> Res<()> {
    sqlx::query("UPDATE profiles SET stripe_customer_id = $2, updated_at = now() WHERE id = $1")
        .bind(profile_id)
        .bind(stripe_customer_id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Grants a trial in a single conditional write. Returns false when the
/// profile already carries a live subscription, so concurrent trial
/// starts cannot both succeed.
pub async fn start_trial<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    profile_id: Uuid,
    tier: &str,
    trial_ends_at: chrono::NaiveDateTime,
) -> Res<bool> {
    let result = sqlx::query(
        r#"
        UPDATE profiles
        SET subscription_tier = $2,
            subscription_status = 'trial',
            trial_ends_at = $3,
            updated_at = now()
        WHERE id = $1
          AND subscription_status NOT IN ('active', 'trial')
        "#,
    )
    .bind(profile_id)
    .bind(tier)
    .bind(trial_ends_at)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn set_subscription_status<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    profile_id: Uuid,
    status: &str,
) -> Res<()> {
    sqlx::query(
        "UPDATE profiles SET subscription_status = $2, updated_at = now() WHERE id = $1",
    )
    .bind(profile_id)
    .bind(status)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn set_subscription_state<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    profile_id: Uuid,
    tier: &str,
    status: &str,
) -> Res<()> {
    sqlx::query(
        r#"
        UPDATE profiles
        SET subscription_tier = $2, subscription_status = $3, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(profile_id)
    .bind(tier)
    .bind(status)
    .execute(executor)
    .await?;
    Ok(())
}
