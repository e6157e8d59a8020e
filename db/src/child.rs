use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::child::{ChildNew, ChildUpdate},
    models::child::Child,
};

pub async fn insert_child<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: ChildNew,
) -> Res<Child> {
    sqlx::query_as::<_, Child>(
        r#"
        INSERT INTO children (parent_id, first_name, last_name, school_level)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(data.parent_id)
    .bind(data.first_name)
    .bind(data.last_name)
    .bind(data.school_level)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_children_by_parent<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    parent_id: Uuid,
) -> Res<Vec<Child>> {
    sqlx::query_as::<_, Child>(
        "SELECT * FROM children WHERE parent_id = $1 ORDER BY created_at DESC",
    )
    .bind(parent_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

/// Ownership is part of the predicate: touching another parent's child
/// behaves like a missing row.
pub async fn get_child_of_parent<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    child_id: Uuid,
    parent_id: Uuid,
) -> Res<Child> {
    sqlx::query_as::<_, Child>("SELECT * FROM children WHERE id = $1 AND parent_id = $2")
        .bind(child_id)
        .bind(parent_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Child not found".to_string()))
}

pub async fn update_child<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    child_id: Uuid,
    parent_id: Uuid,
    data: ChildUpdate,
) -> Res<Child> {
    sqlx::query_as::<_, Child>(
        r#"
        UPDATE children
        SET first_name = $3, last_name = $4, school_level = $5
        WHERE id = $1 AND parent_id = $2
        RETURNING *
        "#,
    )
    .bind(child_id)
    .bind(parent_id)
    .bind(data.first_name)
    .bind(data.last_name)
    .bind(data.school_level)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound("Child not found".to_string()))
}

pub async fn delete_child<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    child_id: Uuid,
    parent_id: Uuid,
) -> Res<()> {
    let result = sqlx::query("DELETE FROM children WHERE id = $1 AND parent_id = $2")
        .bind(child_id)
        .bind(parent_id)
        .execute(executor)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Child not found".to_string()));
    }
    Ok(())
}
