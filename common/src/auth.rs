use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller, as resolved by the identity service.
/// Inserted into request extensions by the auth middleware and read by
/// route handlers through `web::ReqData<AuthUser>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}
