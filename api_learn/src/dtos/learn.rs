use chrono::NaiveDateTime;
use db::models::learning::Exercise;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default and maximum page sizes for the public catalogs.
const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub level: Option<String>,
    pub subject: Option<String>,
    pub limit: Option<i64>,
}

impl CatalogQuery {
    pub fn capped_limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// Exercise as exposed publicly: everything but the solution.
#[derive(Debug, Serialize)]
pub struct ExercisePublic {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub level: String,
    pub question: String,
    pub points: i32,
    pub created_at: NaiveDateTime,
}

impl From<Exercise> for ExercisePublic {
    fn from(e: Exercise) -> Self {
        ExercisePublic {
            id: e.id,
            title: e.title,
            subject: e.subject,
            level: e.level,
            question: e.question,
            points: e.points,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub child_id: Uuid,
    pub exercise_id: Uuid,
    pub user_answer: String,
    #[serde(default)]
    pub time_spent: i32,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub correct: bool,
    pub score: i32,
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProgressRequest {
    pub child_id: Uuid,
    pub video_id: Uuid,
    #[serde(default)]
    pub watched_seconds: i32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub last_position: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_body_uses_camel_case_field_names() {
        let body = serde_json::json!({
            "childId": "6f3b9a1e-9a6a-4a6e-8a8f-0f0f0f0f0f0f",
            "exerciseId": "7c4d0b2f-1b2c-4d5e-9f0a-1a1a1a1a1a1a",
            "userAnswer": "la seine",
            "timeSpent": 90,
        });
        let req: SubmitRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.user_answer, "la seine");
        assert_eq!(req.time_spent, 90);
    }

    #[test]
    fn limit_defaults_and_caps() {
        let q = |limit| CatalogQuery {
            level: None,
            subject: None,
            limit,
        };
        assert_eq!(q(None).capped_limit(), 20);
        assert_eq!(q(Some(10)).capped_limit(), 10);
        assert_eq!(q(Some(500)).capped_limit(), 50);
        assert_eq!(q(Some(0)).capped_limit(), 1);
    }
}
