use std::collections::HashMap;
use std::env;

use crate::error::{AppError, Res};

/// Length of the free trial granted before a paid subscription.
pub const TRIAL_DAYS: i64 = 7;

/// Subscription plans sold by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plan {
    Decouverte,
    Excellence,
    Famille,
}

impl Plan {
    pub fn parse(s: &str) -> Res<Self> {
        match s {
            "decouverte" => Ok(Plan::Decouverte),
            "excellence" => Ok(Plan::Excellence),
            "famille" => Ok(Plan::Famille),
            other => Err(AppError::BadRequest(format!("Invalid plan: {}", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Decouverte => "decouverte",
            Plan::Excellence => "excellence",
            Plan::Famille => "famille",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillingPeriod {
    Monthly,
    Yearly,
}

impl BillingPeriod {
    pub fn parse(s: &str) -> Res<Self> {
        match s {
            "monthly" => Ok(BillingPeriod::Monthly),
            "yearly" => Ok(BillingPeriod::Yearly),
            other => Err(AppError::BadRequest(format!("Invalid period: {}", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "monthly",
            BillingPeriod::Yearly => "yearly",
        }
    }
}

/// Profile-level subscription states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    None,
    Trial,
    Active,
    Canceled,
    Pending,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::None => "none",
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Pending => "pending",
        }
    }
}

/// Static mapping from (plan, period) to the Stripe price identifier
/// configured in the dashboard. Unknown pairs are a 400 before any
/// gateway call is made.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<(Plan, BillingPeriod), String>,
}

impl PriceTable {
    pub fn from_env() -> Self {
        let mut table = PriceTable::default();
        let pairs = [
            (Plan::Decouverte, BillingPeriod::Monthly, "STRIPE_PRICE_DECOUVERTE_MONTHLY"),
            (Plan::Decouverte, BillingPeriod::Yearly, "STRIPE_PRICE_DECOUVERTE_YEARLY"),
            (Plan::Excellence, BillingPeriod::Monthly, "STRIPE_PRICE_EXCELLENCE_MONTHLY"),
            (Plan::Excellence, BillingPeriod::Yearly, "STRIPE_PRICE_EXCELLENCE_YEARLY"),
            (Plan::Famille, BillingPeriod::Monthly, "STRIPE_PRICE_FAMILLE_MONTHLY"),
            (Plan::Famille, BillingPeriod::Yearly, "STRIPE_PRICE_FAMILLE_YEARLY"),
        ];
        for (plan, period, var) in pairs {
            if let Ok(price_id) = env::var(var) {
                table.insert(plan, period, price_id);
            }
        }
        table
    }

    pub fn insert(&mut self, plan: Plan, period: BillingPeriod, price_id: String) {
        self.prices.insert((plan, period), price_id);
    }

    pub fn lookup(&self, plan: Plan, period: BillingPeriod) -> Res<&str> {
        self.prices
            .get(&(plan, period))
            .map(|s| s.as_str())
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Invalid plan: no price configured for {} {}",
                    plan.as_str(),
                    period.as_str()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_plans_and_periods() {
        assert_eq!(Plan::parse("famille").unwrap(), Plan::Famille);
        assert_eq!(
            BillingPeriod::parse("yearly").unwrap(),
            BillingPeriod::Yearly
        );
    }

    #[test]
    fn unknown_plan_is_bad_request() {
        let err = Plan::parse("platinum").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn lookup_returns_configured_price() {
        let mut table = PriceTable::default();
        table.insert(
            Plan::Excellence,
            BillingPeriod::Monthly,
            "price_123".to_string(),
        );
        assert_eq!(
            table
                .lookup(Plan::Excellence, BillingPeriod::Monthly)
                .unwrap(),
            "price_123"
        );
    }

    #[test]
    fn lookup_unconfigured_pair_is_bad_request() {
        let table = PriceTable::default();
        let err = table
            .lookup(Plan::Decouverte, BillingPeriod::Yearly)
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
