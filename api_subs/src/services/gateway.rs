use std::collections::HashMap;

use common::catalog::TRIAL_DAYS;
use common::env_config::{Config, PaymentBackendKind};
use common::error::{AppError, Res};
use serde::Serialize;
use stripe::{
    CheckoutSession, CheckoutSessionId, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCustomer, Customer, CustomerId, ListProducts, Product, SubscriptionId,
    UpdateSubscription,
};
use uuid::Uuid;

/// Metadata attached to a checkout session so the webhook can tie the
/// resulting subscription back to a profile.
pub struct CheckoutMeta {
    pub user_id: Uuid,
    pub plan: String,
    pub period: String,
}

impl CheckoutMeta {
    fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            ("userId".to_string(), self.user_id.to_string()),
            ("plan".to_string(), self.plan.clone()),
            ("period".to_string(), self.period.clone()),
        ])
    }
}

pub struct CheckoutSessionInfo {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutStatus {
    pub session_id: String,
    pub status: String,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
    pub plan: Option<String>,
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PriceInfo {
    pub id: String,
    pub amount: Option<i64>,
    pub currency: String,
    pub interval: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductInfo {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<PriceInfo>,
    pub metadata: HashMap<String, String>,
}

/// The payment backend behind every billing operation. Handlers only
/// ever see this enum; which variant runs is a startup decision.
pub enum PaymentGateway {
    Stripe(Client),
    /// Deterministic stand-in for environments without gateway access.
    /// Returns stable identifiers and redirects straight to the
    /// success page.
    Simulated { frontend_url: String },
}

impl PaymentGateway {
    pub fn from_config(config: &Config) -> Self {
        match config.payment_backend {
            PaymentBackendKind::Stripe => {
                PaymentGateway::Stripe(Client::new(config.stripe_secret_key.clone()))
            }
            PaymentBackendKind::Simulated => PaymentGateway::Simulated {
                frontend_url: config.frontend_url.clone(),
            },
        }
    }

    /// Creates a gateway customer and returns its id.
    pub async fn create_customer(&self, email: &str, name: &str, user_id: Uuid) -> Res<String> {
        match self {
            PaymentGateway::Stripe(client) => {
                let params = CreateCustomer {
                    email: Some(email),
                    name: Some(name),
                    metadata: Some(HashMap::from([(
                        "userId".to_string(),
                        user_id.to_string(),
                    )])),
                    ..Default::default()
                };
                let customer = Customer::create(client, params)
                    .await
                    .map_err(AppError::from)?;
                Ok(customer.id.to_string())
            }
            PaymentGateway::Simulated { .. } => Ok(format!("cus_sim_{}", user_id.simple())),
        }
    }

    /// Opens a subscription checkout for the given price. Every session
    /// starts with a free trial and carries the profile metadata on
    /// both the session and the subscription it creates.
    pub async fn create_checkout_session(
        &self,
        customer_id: &str,
        price_id: &str,
        meta: &CheckoutMeta,
        success_url: &str,
        cancel_url: &str,
    ) -> Res<CheckoutSessionInfo> {
        match self {
            PaymentGateway::Stripe(client) => {
                let customer = customer_id.parse::<CustomerId>().map_err(|e| {
                    AppError::Internal(format!(
                        "Failed to parse customer id: {}. {}",
                        customer_id, e
                    ))
                })?;
                let params = CreateCheckoutSession {
                    payment_method_types: Some(vec![
                        stripe::CreateCheckoutSessionPaymentMethodTypes::Card,
                    ]),
                    line_items: Some(vec![stripe::CreateCheckoutSessionLineItems {
                        price: Some(price_id.to_string()),
                        quantity: Some(1),
                        ..Default::default()
                    }]),
                    mode: Some(CheckoutSessionMode::Subscription),
                    success_url: Some(success_url),
                    cancel_url: Some(cancel_url),
                    customer: Some(customer),
                    allow_promotion_codes: Some(true),
                    metadata: Some(meta.to_map()),
                    subscription_data: Some(stripe::CreateCheckoutSessionSubscriptionData {
                        trial_period_days: Some(TRIAL_DAYS as u32),
                        metadata: Some(meta.to_map()),
                        ..Default::default()
                    }),
                    ..Default::default()
                };
                let session = CheckoutSession::create(client, params)
                    .await
                    .map_err(AppError::from)?;
                let url = session
                    .url
                    .ok_or_else(|| AppError::Internal("Checkout session has no URL".to_string()))?;
                Ok(CheckoutSessionInfo {
                    id: session.id.to_string(),
                    url,
                })
            }
            PaymentGateway::Simulated { frontend_url } => {
                let id = format!("cs_sim_{}", meta.user_id.simple());
                Ok(CheckoutSessionInfo {
                    url: format!(
                        "{}/payment-success.html?session_id={}&simulated=true",
                        frontend_url, id
                    ),
                    id,
                })
            }
        }
    }

    /// Schedules a subscription to end at the close of the current
    /// period rather than terminating it immediately.
    pub async fn cancel_at_period_end(&self, subscription_id: &str) -> Res<()> {
        match self {
            PaymentGateway::Stripe(client) => {
                let id = subscription_id.parse::<SubscriptionId>().map_err(|e| {
                    AppError::BadRequest(format!("Invalid subscription ID: {}", e))
                })?;
                stripe::Subscription::update(
                    client,
                    &id,
                    UpdateSubscription {
                        cancel_at_period_end: Some(true),
                        ..Default::default()
                    },
                )
                .await
                .map_err(AppError::from)?;
                Ok(())
            }
            PaymentGateway::Simulated { .. } => Ok(()),
        }
    }

    /// Lists active products with their default price, for the public
    /// pricing page.
    pub async fn list_products(&self) -> Res<Vec<ProductInfo>> {
        match self {
            PaymentGateway::Stripe(client) => {
                let params = ListProducts {
                    active: Some(true),
                    expand: &["data.default_price"],
                    ..Default::default()
                };
                let products = Product::list(client, &params).await.map_err(AppError::from)?;
                Ok(products
                    .data
                    .into_iter()
                    .map(|product| {
                        let price = product
                            .default_price
                            .as_ref()
                            .and_then(|p| p.as_object())
                            .map(|price| PriceInfo {
                                id: price.id.to_string(),
                                amount: price.unit_amount,
                                currency: price
                                    .currency
                                    .map(|c| c.to_string())
                                    .unwrap_or_default(),
                                interval: price
                                    .recurring
                                    .as_ref()
                                    .map(|r| r.interval.to_string()),
                            });
                        ProductInfo {
                            id: product.id.to_string(),
                            name: product.name.unwrap_or_default(),
                            description: product.description,
                            price,
                            metadata: product.metadata.unwrap_or_default(),
                        }
                    })
                    .collect())
            }
            PaymentGateway::Simulated { .. } => Ok(simulated_products()),
        }
    }

    /// Fetches the outcome of a checkout session, for the post-payment
    /// confirmation page.
    pub async fn retrieve_checkout(&self, session_id: &str) -> Res<CheckoutStatus> {
        match self {
            PaymentGateway::Stripe(client) => {
                let id = session_id.parse::<CheckoutSessionId>().map_err(|e| {
                    AppError::BadRequest(format!("Invalid session ID: {}", e))
                })?;
                let session = CheckoutSession::retrieve(client, &id, &[])
                    .await
                    .map_err(AppError::from)?;
                let plan = session
                    .metadata
                    .as_ref()
                    .and_then(|m| m.get("plan").cloned());
                let period = session
                    .metadata
                    .as_ref()
                    .and_then(|m| m.get("period").cloned());
                Ok(CheckoutStatus {
                    session_id: session.id.to_string(),
                    status: session.payment_status.to_string(),
                    amount: session.amount_total,
                    currency: session.currency.map(|c| c.to_string()),
                    customer_email: session.customer_details.and_then(|d| d.email),
                    plan,
                    period,
                })
            }
            PaymentGateway::Simulated { .. } => Ok(CheckoutStatus {
                session_id: session_id.to_string(),
                status: "paid".to_string(),
                amount: None,
                currency: None,
                customer_email: None,
                plan: None,
                period: None,
            }),
        }
    }
}

fn simulated_products() -> Vec<ProductInfo> {
    let entries = [
        ("prod_sim_decouverte", "Découverte", 999_i64),
        ("prod_sim_excellence", "Excellence", 1999),
        ("prod_sim_famille", "Famille", 2999),
    ];
    entries
        .into_iter()
        .map(|(id, name, amount)| ProductInfo {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            price: Some(PriceInfo {
                id: format!("price_sim_{}", id),
                amount: Some(amount),
                currency: "eur".to_string(),
                interval: Some("month".to_string()),
            }),
            metadata: HashMap::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulated() -> PaymentGateway {
        PaymentGateway::Simulated {
            frontend_url: "http://localhost:3000".to_string(),
        }
    }

    #[tokio::test]
    async fn simulated_checkout_is_deterministic() {
        let gateway = simulated();
        let meta = CheckoutMeta {
            user_id: Uuid::nil(),
            plan: "excellence".to_string(),
            period: "monthly".to_string(),
        };
        let a = gateway
            .create_checkout_session("cus_sim_x", "price_1", &meta, "s", "c")
            .await
            .unwrap();
        let b = gateway
            .create_checkout_session("cus_sim_x", "price_1", &meta, "s", "c")
            .await
            .unwrap();
        assert_eq!(a.id, b.id);
        assert!(a.url.contains("simulated=true"));
    }

    #[tokio::test]
    async fn simulated_products_cover_every_plan() {
        let products = simulated().list_products().await.unwrap();
        assert_eq!(products.len(), 3);
        assert!(products.iter().all(|p| p.price.is_some()));
    }

    #[tokio::test]
    async fn simulated_checkout_retrieval_reports_paid() {
        let status = simulated().retrieve_checkout("cs_sim_abc").await.unwrap();
        assert_eq!(status.status, "paid");
        assert_eq!(status.session_id, "cs_sim_abc");
    }
}
