use chrono::{NaiveDateTime, Utc};
use common::auth::AuthUser;
use common::error::Res;
use db::models::{child::Child, profile::Profile};
use futures::future::try_join_all;
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildStats {
    pub child: Child,
    pub exercises_completed: i64,
    pub correct_answers: i64,
    pub success_rate: i64,
    pub video_minutes: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub exercises_completed: i64,
    pub correct_answers: i64,
    pub success_rate: i64,
    pub video_minutes: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSummary {
    pub tier: Option<String>,
    pub status: String,
    pub trial_ends_at: Option<NaiveDateTime>,
    pub is_trial_active: bool,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub profile: Profile,
    pub children: Vec<ChildStats>,
    pub totals: Totals,
    pub subscription: SubscriptionSummary,
}

/// Assembles the parent dashboard. Per-child aggregates are fetched
/// concurrently and joined.
pub async fn dashboard(pool: &PgPool, user: &AuthUser) -> Res<DashboardStats> {
    let profile = db::profile::get_profile(pool, user.id).await?;
    let children = db::child::get_children_by_parent(pool, user.id).await?;

    let children = try_join_all(children.into_iter().map(|child| child_stats(pool, child))).await?;

    let exercises_completed: i64 = children.iter().map(|c| c.exercises_completed).sum();
    let correct_answers: i64 = children.iter().map(|c| c.correct_answers).sum();
    let totals = Totals {
        exercises_completed,
        correct_answers,
        success_rate: success_rate(correct_answers, exercises_completed),
        video_minutes: children.iter().map(|c| c.video_minutes).sum(),
    };

    let subscription = subscription_summary(&profile);
    Ok(DashboardStats {
        profile,
        children,
        totals,
        subscription,
    })
}

async fn child_stats(pool: &PgPool, child: Child) -> Res<ChildStats> {
    let (total, correct) = db::learning::exercise_counts_for_child(pool, child.id).await?;
    let seconds = db::learning::watched_seconds_for_child(pool, child.id).await?;
    Ok(ChildStats {
        child,
        exercises_completed: total,
        correct_answers: correct,
        success_rate: success_rate(correct, total),
        video_minutes: minutes(seconds),
    })
}

fn subscription_summary(profile: &Profile) -> SubscriptionSummary {
    let is_trial_active = profile.subscription_status == "trial"
        && profile
            .trial_ends_at
            .is_some_and(|ends| ends > Utc::now().naive_utc());
    SubscriptionSummary {
        tier: profile.subscription_tier.clone(),
        status: profile.subscription_status.clone(),
        trial_ends_at: profile.trial_ends_at,
        is_trial_active,
    }
}

fn success_rate(correct: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as i64
}

fn minutes(seconds: i64) -> i64 {
    (seconds as f64 / 60.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_rounds_to_nearest_percent() {
        assert_eq!(success_rate(3, 4), 75);
        assert_eq!(success_rate(1, 3), 33);
        assert_eq!(success_rate(2, 3), 67);
    }

    #[test]
    fn success_rate_is_zero_without_sessions() {
        assert_eq!(success_rate(0, 0), 0);
    }

    #[test]
    fn minutes_round_half_up() {
        assert_eq!(minutes(90), 2);
        assert_eq!(minutes(89), 1);
        assert_eq!(minutes(0), 0);
    }
}
