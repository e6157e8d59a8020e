use std::{env, sync::Arc};

use crate::catalog::PriceTable;

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// Holds everything needed to initialize and run the API: database
/// connection details, identity-service credentials, Stripe keys and
/// the price table, server binding, CORS settings and logging
/// preferences.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Base URL of the frontend, used for default redirect targets.
    pub frontend_url: String,
    /// Base URL of the external identity service.
    pub auth_service_url: String,
    /// Service key sent to the identity service with every request.
    pub auth_service_key: String,
    /// Stripe secret key
    pub stripe_secret_key: String,
    /// Stripe webhook secret
    pub stripe_webhook_secret: String,
    /// Which payment backend to run against.
    pub payment_backend: PaymentBackendKind,
    /// Mapping from (plan, period) to Stripe price identifiers.
    pub prices: PriceTable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Selects the payment backend at startup: the real Stripe API or a
/// deterministic simulation for environments without gateway access.
pub enum PaymentBackendKind {
    Stripe,
    Simulated,
}

impl PaymentBackendKind {
    fn from_env() -> Self {
        match env::var("PAYMENT_BACKEND").as_deref() {
            Ok("simulated") => PaymentBackendKind::Simulated,
            _ => PaymentBackendKind::Stripe,
        }
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ENVIRONMENT`: "development" or "production"
    /// - `DATABASE_URL`: Connection string for the database
    /// - `AUTH_SERVICE_URL`: Base URL of the identity service
    ///
    /// Optional (with defaults):
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `FRONTEND_URL`: Frontend base URL (default: "http://localhost:3000")
    /// - `PAYMENT_BACKEND`: "stripe" or "simulated" (default: "stripe")
    /// - `AUTH_SERVICE_KEY`, `STRIPE_SECRET_KEY`, `STRIPE_WEBHOOK_SECRET`
    /// - `STRIPE_PRICE_<PLAN>_<PERIOD>` price identifiers
    ///
    /// # Panics
    ///
    /// Panics if required environment variables are missing.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            auth_service_url: env::var("AUTH_SERVICE_URL")
                .expect("AUTH_SERVICE_URL must be set"),
            auth_service_key: env::var("AUTH_SERVICE_KEY").unwrap_or_default(),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
            payment_backend: PaymentBackendKind::from_env(),
            prices: PriceTable::from_env(),
        })
    }
}
