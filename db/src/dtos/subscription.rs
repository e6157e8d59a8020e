use chrono::NaiveDateTime;
use uuid::Uuid;

/// Full snapshot of a gateway subscription, applied with an upsert keyed
/// on `stripe_subscription_id` so webhook redelivery converges.
pub struct SubscriptionUpsert {
    pub stripe_subscription_id: String,
    pub stripe_customer_id: String,
    pub profile_id: Uuid,
    pub plan: String,
    pub period: String,
    pub status: String,
    pub current_period_start: Option<NaiveDateTime>,
    pub current_period_end: Option<NaiveDateTime>,
    pub trial_start: Option<NaiveDateTime>,
    pub trial_end: Option<NaiveDateTime>,
    pub cancel_at_period_end: bool,
    pub amount: Option<i64>,
    pub currency: Option<String>,
}

pub struct PaymentNew {
    pub stripe_invoice_id: String,
    pub stripe_payment_intent_id: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub receipt_url: Option<String>,
}
