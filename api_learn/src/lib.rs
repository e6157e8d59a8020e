use actix_web::web;

pub mod routes {
    pub mod child;
    pub mod dashboard;
    pub mod exercise;
    pub mod video;
}

pub mod services {
    pub(crate) mod grading;
    pub(crate) mod stats;
}

mod dtos {
    pub(crate) mod child;
    pub(crate) mod learn;
}

/// Catalog endpoints, browsable without an account.
pub fn configure_public(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::exercise::get_exercises)
        .service(routes::video::get_videos);
}

pub fn mount_children() -> actix_web::Scope {
    web::scope("/children")
        .service(routes::child::post_child)
        .service(routes::child::get_children)
        .service(routes::child::put_child)
        .service(routes::child::delete_child)
}

pub fn mount_dashboard() -> actix_web::Scope {
    web::scope("/dashboard").service(routes::dashboard::get_stats)
}

/// Learning endpoints that record progress and therefore need a caller.
pub fn configure_progress(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::exercise::post_submit)
        .service(routes::video::post_progress);
}
