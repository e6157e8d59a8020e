use chrono::NaiveDateTime;
use common::catalog::SubscriptionStatus;
use common::error::{AppError, Res};
use db::dtos::subscription::{PaymentNew, SubscriptionUpsert};
use sqlx::PgPool;
use stripe::{Event, EventObject, EventType, Invoice, Webhook};
use uuid::Uuid;

/// Verifies the payload signature and parses the event.
pub fn construct_event(payload: &str, signature: &str, webhook_secret: &str) -> Res<Event> {
    match Webhook::construct_event(payload, signature, webhook_secret) {
        Ok(event) => Ok(event),
        Err(e) => {
            log::error!("Error constructing webhook event: {}", e);
            Err(AppError::BadRequest(format!("Webhook Error: {}", e)))
        }
    }
}

/// Applies a verified gateway event to the store. Each handled event
/// maps to one idempotent write, so redelivery converges on the same
/// state.
pub async fn process_event(pool: &PgPool, event: Event) -> Res<()> {
    log::info!("Processing webhook event: {}", event.type_);

    match event.type_ {
        EventType::CheckoutSessionCompleted => {
            if let EventObject::CheckoutSession(session) = event.data.object {
                let metadata = session.metadata.unwrap_or_default();
                let (user_id, plan) = checkout_identity(&metadata)?;
                db::profile::set_subscription_state(pool, user_id, &plan, SubscriptionStatus::Active.as_str())
                    .await?;
                log::info!("Checkout completed for profile {}", user_id);
            }
        }
        EventType::CustomerSubscriptionCreated | EventType::CustomerSubscriptionUpdated => {
            if let EventObject::Subscription(subscription) = event.data.object {
                let snapshot = subscription_snapshot(&subscription)?;
                db::subscription::upsert_subscription(pool, snapshot).await?;
                log::info!("Subscription snapshot applied: {}", subscription.id);
            }
        }
        EventType::CustomerSubscriptionDeleted => {
            if let EventObject::Subscription(subscription) = event.data.object {
                db::subscription::mark_canceled(pool, subscription.id.as_str()).await?;
                if let Some(user_id) = metadata_user_id(&subscription.metadata) {
                    db::profile::set_subscription_status(
                        pool,
                        user_id,
                        SubscriptionStatus::Canceled.as_str(),
                    )
                    .await?;
                }
                log::info!("Subscription deleted: {}", subscription.id);
            }
        }
        EventType::InvoicePaymentSucceeded => {
            if let EventObject::Invoice(invoice) = event.data.object {
                let inserted = db::payment::insert_payment(pool, payment_record(&invoice)).await?;
                if !inserted {
                    log::debug!("Invoice {} already recorded, skipping", invoice.id);
                }
            }
        }
        EventType::InvoicePaymentFailed => {
            if let EventObject::Invoice(invoice) = event.data.object {
                log::warn!("Invoice payment failed: {}", invoice.id);
            }
        }
        _ => {
            log::info!("Unhandled event type: {}", event.type_);
        }
    }

    Ok(())
}

/// Maps a gateway subscription object to the row we persist.
fn subscription_snapshot(subscription: &stripe::Subscription) -> Res<SubscriptionUpsert> {
    let profile_id = metadata_user_id(&subscription.metadata).ok_or_else(|| {
        AppError::Internal(format!(
            "Subscription {} has no userId metadata",
            subscription.id
        ))
    })?;
    let price = subscription
        .items
        .data
        .first()
        .and_then(|item| item.price.as_ref());

    let stripe_customer_id = match &subscription.customer {
        stripe::Expandable::Id(id) => id.to_string(),
        stripe::Expandable::Object(customer) => customer.id.to_string(),
    };

    Ok(SubscriptionUpsert {
        stripe_subscription_id: subscription.id.to_string(),
        stripe_customer_id,
        profile_id,
        plan: metadata_value(&subscription.metadata, "plan"),
        period: metadata_value(&subscription.metadata, "period"),
        status: subscription.status.to_string(),
        current_period_start: ts_to_naive(Some(subscription.current_period_start)),
        current_period_end: ts_to_naive(Some(subscription.current_period_end)),
        trial_start: ts_to_naive(subscription.trial_start),
        trial_end: ts_to_naive(subscription.trial_end),
        cancel_at_period_end: subscription.cancel_at_period_end,
        amount: price.and_then(|p| p.unit_amount),
        currency: price.and_then(|p| p.currency).map(|c| c.to_string()),
    })
}

fn payment_record(invoice: &Invoice) -> PaymentNew {
    PaymentNew {
        stripe_invoice_id: invoice.id.to_string(),
        stripe_payment_intent_id: match &invoice.payment_intent {
            Some(stripe::Expandable::Id(id)) => Some(id.to_string()),
            Some(stripe::Expandable::Object(pi)) => Some(pi.id.to_string()),
            None => None,
        },
        amount: invoice.amount_paid.unwrap_or(0),
        currency: invoice.currency.map(|c| c.to_string()).unwrap_or_default(),
        status: "succeeded".to_string(),
        receipt_url: invoice.hosted_invoice_url.clone(),
    }
}

fn checkout_identity(metadata: &std::collections::HashMap<String, String>) -> Res<(Uuid, String)> {
    let user_id = metadata_user_id(metadata).ok_or_else(|| {
        AppError::Internal("Checkout session has no userId metadata".to_string())
    })?;
    let plan = metadata
        .get("plan")
        .filter(|p| !p.is_empty())
        .cloned()
        .ok_or_else(|| {
            AppError::Internal("Checkout session has no plan metadata".to_string())
        })?;
    Ok((user_id, plan))
}

fn metadata_user_id(metadata: &std::collections::HashMap<String, String>) -> Option<Uuid> {
    metadata.get("userId").and_then(|v| Uuid::parse_str(v).ok())
}

fn metadata_value(metadata: &std::collections::HashMap<String, String>, key: &str) -> String {
    metadata.get(key).cloned().unwrap_or_default()
}

fn ts_to_naive(ts: Option<i64>) -> Option<NaiveDateTime> {
    ts.and_then(|t| chrono::DateTime::from_timestamp(t, 0))
        .map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn metadata_identity_extraction() {
        let id = Uuid::new_v4();
        let metadata = HashMap::from([
            ("userId".to_string(), id.to_string()),
            ("plan".to_string(), "famille".to_string()),
        ]);
        let (user_id, plan) = checkout_identity(&metadata).unwrap();
        assert_eq!(user_id, id);
        assert_eq!(plan, "famille");
    }

    #[test]
    fn missing_user_id_is_an_error() {
        let metadata = HashMap::from([("plan".to_string(), "famille".to_string())]);
        assert!(checkout_identity(&metadata).is_err());
    }

    #[test]
    fn missing_plan_is_an_error() {
        let id = Uuid::new_v4();
        let metadata = HashMap::from([("userId".to_string(), id.to_string())]);
        assert!(checkout_identity(&metadata).is_err());

        // an empty value is as useless as a missing key
        let metadata = HashMap::from([
            ("userId".to_string(), id.to_string()),
            ("plan".to_string(), String::new()),
        ]);
        assert!(checkout_identity(&metadata).is_err());
    }

    #[test]
    fn malformed_user_id_is_ignored() {
        let metadata = HashMap::from([("userId".to_string(), "not-a-uuid".to_string())]);
        assert!(metadata_user_id(&metadata).is_none());
    }

    #[test]
    fn unix_timestamps_become_naive_utc() {
        let dt = ts_to_naive(Some(1_700_000_000)).unwrap();
        assert_eq!(dt.and_utc().timestamp(), 1_700_000_000);
        assert!(ts_to_naive(None).is_none());
    }
}
