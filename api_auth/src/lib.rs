use std::sync::Arc;

use actix_web::web::{self};

use middleware::auth::AuthMiddleware;
use services::identity::IdentityClient;

pub mod middleware {
    pub mod auth;
}
pub mod services {
    pub mod identity;
}
mod routes {
    pub(crate) mod auth;
}
mod dtos {
    pub(crate) mod auth;
}

/// Register and login are open; `/me` is guarded on its own resource so
/// the rest of the scope stays public.
pub fn mount_auth(identity: Arc<IdentityClient>) -> actix_web::Scope {
    web::scope("/auth")
        .service(routes::auth::post_register)
        .service(routes::auth::post_login)
        .service(
            web::resource("/me")
                .wrap(AuthMiddleware::new(identity))
                .route(web::get().to(routes::auth::get_me)),
        )
}

pub fn auth_middleware(identity: Arc<IdentityClient>) -> AuthMiddleware {
    AuthMiddleware::new(identity)
}
