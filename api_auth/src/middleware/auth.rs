use std::{future::Future, pin::Pin, sync::Arc};

use actix_web::{
    Error, HttpMessage, HttpResponse,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::{Ready, ok};

use crate::services::identity::IdentityClient;

/// Bearer-token guard for a scope. Requests without a valid session are
/// answered with 401 before any handler (and therefore any store
/// mutation) runs.
pub struct AuthMiddleware {
    identity: Arc<IdentityClient>,
}

impl AuthMiddleware {
    pub fn new(identity: Arc<IdentityClient>) -> Self {
        AuthMiddleware { identity }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Arc::new(service),
            identity: self.identity.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Arc<S>,
    identity: Arc<IdentityClient>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token_value = req
            .headers()
            .get("Authorization")
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(|token| token.to_string());

        let identity = Arc::clone(&self.identity);
        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            if let Some(token) = token_value {
                // resolve the session and stash the caller for handlers
                match identity.get_user(&token).await {
                    Ok(user) => {
                        req.extensions_mut().insert(user);
                        srv.call(req).await.map(|res| res.map_into_boxed_body())
                    }
                    Err(_) => {
                        let response = HttpResponse::Unauthorized()
                            .json(serde_json::json!({"error": "Invalid token"}))
                            .map_into_boxed_body();
                        Ok(req.into_response(response))
                    }
                }
            } else {
                let response = HttpResponse::Unauthorized()
                    .json(serde_json::json!({"error": "No authorization token provided"}))
                    .map_into_boxed_body();
                Ok(req.into_response(response))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use actix_web::{App, http::StatusCode, test, web};

    use super::*;

    fn identity_stub() -> Arc<IdentityClient> {
        // nothing listens on the discard port, so any token lookup fails
        Arc::new(IdentityClient::new(
            "http://127.0.0.1:9".to_string(),
            String::new(),
        ))
    }

    #[actix_web::test]
    async fn missing_token_is_rejected_before_the_handler() {
        let reached = Arc::new(AtomicBool::new(false));
        let flag = reached.clone();
        let app = test::init_service(
            App::new().service(
                web::scope("")
                    .wrap(AuthMiddleware::new(identity_stub()))
                    .route(
                        "/me",
                        web::get().to(move || {
                            let flag = flag.clone();
                            async move {
                                flag.store(true, Ordering::SeqCst);
                                HttpResponse::Ok().finish()
                            }
                        }),
                    ),
            ),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[actix_web::test]
    async fn unresolvable_token_is_rejected_before_the_handler() {
        let reached = Arc::new(AtomicBool::new(false));
        let flag = reached.clone();
        let app = test::init_service(
            App::new().service(
                web::scope("")
                    .wrap(AuthMiddleware::new(identity_stub()))
                    .route(
                        "/me",
                        web::get().to(move || {
                            let flag = flag.clone();
                            async move {
                                flag.store(true, Ordering::SeqCst);
                                HttpResponse::Ok().finish()
                            }
                        }),
                    ),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", "Bearer not-a-session"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(!reached.load(Ordering::SeqCst));
    }
}
