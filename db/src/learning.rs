use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::learning::{ExerciseSessionNew, VideoProgressUpsert},
    models::learning::{Exercise, ExerciseSession, Video, VideoWatchHistory},
};

pub async fn list_exercises<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    level: Option<String>,
    subject: Option<String>,
    limit: i64,
) -> Res<Vec<Exercise>> {
    sqlx::query_as::<_, Exercise>(
        r#"
        SELECT * FROM exercises
        WHERE ($1::text IS NULL OR level = $1)
          AND ($2::text IS NULL OR subject = $2)
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(level)
    .bind(subject)
    .bind(limit)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_exercise<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    exercise_id: Uuid,
) -> Res<Exercise> {
    sqlx::query_as::<_, Exercise>("SELECT * FROM exercises WHERE id = $1")
        .bind(exercise_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))
}

pub async fn insert_exercise_session<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: ExerciseSessionNew,
) -> Res<ExerciseSession> {
    sqlx::query_as::<_, ExerciseSession>(
        r#"
        INSERT INTO exercise_sessions (child_id, exercise_id, user_answer, correct, score, time_spent)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(data.child_id)
    .bind(data.exercise_id)
    .bind(data.user_answer)
    .bind(data.correct)
    .bind(data.score)
    .bind(data.time_spent)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Returns (total sessions, correct sessions) for one child.
pub async fn exercise_counts_for_child<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    child_id: Uuid,
) -> Res<(i64, i64)> {
    sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT COUNT(*), COUNT(*) FILTER (WHERE correct)
        FROM exercise_sessions
        WHERE child_id = $1
        "#,
    )
    .bind(child_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn watched_seconds_for_child<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    child_id: Uuid,
) -> Res<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(watched_seconds), 0)::BIGINT
        FROM video_watch_history
        WHERE child_id = $1
        "#,
    )
    .bind(child_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn list_videos<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    level: Option<String>,
    subject: Option<String>,
    limit: i64,
) -> Res<Vec<Video>> {
    sqlx::query_as::<_, Video>(
        r#"
        SELECT * FROM videos
        WHERE ($1::text IS NULL OR level = $1)
          AND ($2::text IS NULL OR subject = $2)
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(level)
    .bind(subject)
    .bind(limit)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn upsert_video_progress<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: VideoProgressUpsert,
) -> Res<VideoWatchHistory> {
    sqlx::query_as::<_, VideoWatchHistory>(
        r#"
        INSERT INTO video_watch_history (
            child_id, video_id, watched_seconds, completed, completed_at, last_position
        )
        VALUES ($1, $2, $3, $4, CASE WHEN $4 THEN now() END, $5)
        ON CONFLICT (child_id, video_id) DO UPDATE SET
            watched_seconds = EXCLUDED.watched_seconds,
            completed = EXCLUDED.completed,
            completed_at = CASE
                WHEN EXCLUDED.completed THEN COALESCE(video_watch_history.completed_at, now())
            END,
            last_position = EXCLUDED.last_position,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(data.child_id)
    .bind(data.video_id)
    .bind(data.watched_seconds)
    .bind(data.completed)
    .bind(data.last_position)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}
