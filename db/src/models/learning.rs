use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub level: String,
    pub question: String,
    pub solution: String,
    pub points: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub level: String,
    pub duration_seconds: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ExerciseSession {
    pub id: Uuid,
    pub child_id: Uuid,
    pub exercise_id: Uuid,
    pub user_answer: String,
    pub correct: bool,
    pub score: i32,
    pub time_spent: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct VideoWatchHistory {
    pub child_id: Uuid,
    pub video_id: Uuid,
    pub watched_seconds: i32,
    pub completed: bool,
    pub completed_at: Option<NaiveDateTime>,
    pub last_position: i32,
    pub updated_at: NaiveDateTime,
}
