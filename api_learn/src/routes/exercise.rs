use actix_web::{Responder, get, post, web};
use common::auth::AuthUser;
use common::error::Res;
use common::http::Success;
use db::dtos::learning::ExerciseSessionNew;
use sqlx::PgPool;

use crate::dtos::learn::{CatalogQuery, ExercisePublic, SubmitRequest, SubmitResponse};
use crate::services::grading;

#[get("/exercises")]
async fn get_exercises(
    query: web::Query<CatalogQuery>,
    pool: web::Data<PgPool>,
) -> Res<impl Responder> {
    let exercises = db::learning::list_exercises(
        &**pool,
        query.level.clone(),
        query.subject.clone(),
        query.capped_limit(),
    )
    .await?;
    let exercises: Vec<ExercisePublic> = exercises.into_iter().map(Into::into).collect();
    Success::ok(exercises)
}

/// Grades a submitted answer and records the session. The child must
/// belong to the caller.
#[post("/exercises/submit")]
async fn post_submit(
    user: web::ReqData<AuthUser>,
    req: web::Json<SubmitRequest>,
    pool: web::Data<PgPool>,
) -> Res<impl Responder> {
    let req = req.into_inner();
    let child = db::child::get_child_of_parent(&**pool, req.child_id, user.id).await?;
    let exercise = db::learning::get_exercise(&**pool, req.exercise_id).await?;

    let graded = grading::grade(&req.user_answer, &exercise.solution, req.time_spent);
    db::learning::insert_exercise_session(
        &**pool,
        ExerciseSessionNew {
            child_id: child.id,
            exercise_id: exercise.id,
            user_answer: req.user_answer,
            correct: graded.correct,
            score: graded.score,
            time_spent: req.time_spent,
        },
    )
    .await?;

    let feedback = if graded.correct {
        "Bravo, bonne réponse !".to_string()
    } else {
        format!("Ce n'est pas la bonne réponse. La solution était : {}", exercise.solution)
    };
    Success::ok(SubmitResponse {
        correct: graded.correct,
        score: graded.score,
        feedback,
    })
}
