use common::auth::AuthUser;
use common::error::{AppError, Res};
use log::warn;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// HTTP client for the external identity service. The platform never
/// stores credentials itself; sign-up, sign-in and session retrieval
/// are all delegated.
pub struct IdentityClient {
    client: Client,
    base_url: String,
    service_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct IdentitySession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: IdentityUser,
}

impl IdentityClient {
    pub fn new(base_url: String, service_key: String) -> Self {
        IdentityClient {
            client: Client::new(),
            base_url,
            service_key,
        }
    }

    /// Registers a new account with the identity service.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Res<IdentityUser> {
        let response = self
            .client
            .post(format!("{}/auth/v1/signup", self.base_url))
            .header("apikey", &self.service_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "first_name": first_name, "last_name": last_name },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let message = error_message(response).await;
            return Err(AppError::BadRequest(message));
        }
        response.json::<IdentityUser>().await.map_err(AppError::from)
    }

    /// Exchanges credentials for a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Res<IdentitySession> {
        let response = self
            .client
            .post(format!(
                "{}/auth/v1/token?grant_type=password",
                self.base_url
            ))
            .header("apikey", &self.service_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            let message = error_message(response).await;
            warn!("Sign-in rejected by identity service: {}", message);
            return Err(AppError::Unauthorized(message));
        }
        response
            .json::<IdentitySession>()
            .await
            .map_err(AppError::from)
    }

    /// Resolves an access token to its user. Any rejection maps to 401.
    pub async fn get_user(&self, access_token: &str) -> Res<AuthUser> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.service_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(AppError::Unauthorized("Invalid token".to_string()));
        }
        let user = response.json::<IdentityUser>().await.map_err(|e| {
            AppError::Internal(format!("Failed to parse identity response: {}", e))
        })?;
        Ok(AuthUser {
            id: user.id,
            email: user.email,
        })
    }
}

async fn error_message(response: reqwest::Response) -> String {
    response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| {
            body.get("error_description")
                .or_else(|| body.get("msg"))
                .or_else(|| body.get("error"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "Identity service request failed".to_string())
}
