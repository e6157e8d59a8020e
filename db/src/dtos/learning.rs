use uuid::Uuid;

pub struct ExerciseSessionNew {
    pub child_id: Uuid,
    pub exercise_id: Uuid,
    pub user_answer: String,
    pub correct: bool,
    pub score: i32,
    pub time_spent: i32,
}

pub struct VideoProgressUpsert {
    pub child_id: Uuid,
    pub video_id: Uuid,
    pub watched_seconds: i32,
    pub completed: bool,
    pub last_position: i32,
}
