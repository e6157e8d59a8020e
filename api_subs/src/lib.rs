use actix_web::web;

pub mod routes {
    pub mod pay;
    pub mod sub;
}

pub mod services {
    pub mod gateway;
    pub(crate) mod sub;
    pub(crate) mod webhook;
}

mod dtos {
    pub(crate) mod sub;
}

pub fn mount_subscriptions() -> actix_web::Scope {
    web::scope("/subscriptions")
        .service(routes::sub::post_create)
        .service(routes::sub::post_cancel)
}

pub fn mount_trial() -> actix_web::Scope {
    web::scope("/trial").service(routes::sub::post_start)
}

/// Routes reachable without a session: the gateway webhook, the product
/// catalog and the checkout status passthrough.
pub fn configure_public(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::pay::post_webhook)
        .service(routes::pay::get_products)
        .service(routes::pay::get_payment_session);
}
