use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};

use crate::dtos::subscription::PaymentNew;

/// Appends a payment row. Deduplicated on the invoice id; returns false
/// when the invoice was already recorded (webhook redelivery).
pub async fn insert_payment<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: PaymentNew,
) -> Res<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO payments (
            stripe_invoice_id, stripe_payment_intent_id, amount, currency, status, receipt_url
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (stripe_invoice_id) DO NOTHING
        "#,
    )
    .bind(data.stripe_invoice_id)
    .bind(data.stripe_payment_intent_id)
    .bind(data.amount)
    .bind(data.currency)
    .bind(data.status)
    .bind(data.receipt_url)
    .execute(executor)
    .await
    .map_err(AppError::from)?;
    Ok(result.rows_affected() == 1)
}
