use std::sync::Arc;

use actix_web::{Responder, post, web};
use common::auth::AuthUser;
use common::error::Res;
use common::http::Success;
use sqlx::PgPool;

use crate::dtos::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::services::identity::IdentityClient;

/// Registers a new parent account with the identity service.
///
/// # Input
/// - `req`: JSON payload with email, password and optional names
///
/// # Output
/// - Success: the created identity user with 201 Created
/// - Error: 400 Bad Request when the identity service rejects the
///   registration (e.g. email already taken)
#[post("/register")]
async fn post_register(
    req: web::Json<RegisterRequest>,
    identity: web::Data<Arc<IdentityClient>>,
) -> Res<impl Responder> {
    let user = identity
        .sign_up(&req.email, &req.password, &req.first_name, &req.last_name)
        .await?;
    Success::created(user)
}

/// Authenticates a parent and returns the session tokens together with
/// the profile row. The profile is lazily inserted on first sign-in,
/// mirroring the identity-provider user.
#[post("/login")]
async fn post_login(
    req: web::Json<LoginRequest>,
    identity: web::Data<Arc<IdentityClient>>,
    pool: web::Data<PgPool>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &pool;
    let session = identity.sign_in(&req.email, &req.password).await?;

    let profile = match db::profile::find_profile(pg_pool, session.user.id).await? {
        Some(profile) => profile,
        None => {
            let first_name = session
                .user
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string();
            db::profile::insert_profile(
                pg_pool,
                db::dtos::profile::ProfileNew {
                    id: session.user.id,
                    email: session.user.email.clone(),
                    first_name,
                    last_name: String::new(),
                },
            )
            .await?
        }
    };

    Success::ok(AuthResponse {
        token: session.access_token,
        refresh_token: session.refresh_token,
        profile,
    })
}

/// Returns the caller's profile.
pub(crate) async fn get_me(
    user: web::ReqData<AuthUser>,
    pool: web::Data<PgPool>,
) -> Res<impl Responder> {
    let profile = db::profile::get_profile(&**pool, user.id).await?;
    Success::ok(profile)
}
