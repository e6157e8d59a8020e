mod cors;

use std::sync::Arc;

use actix_web::{
    App, HttpResponse, HttpServer, Responder, get,
    web::{self},
};
use api_auth::services::identity::IdentityClient;
use api_subs::services::gateway::PaymentGateway;
use common::env_config::Config;

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.environment == "production";
    let origin = config.cors_allowed_origin.clone();

    // init logger
    if config.console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    // shared clients; handlers only see these through app data
    let identity = Arc::new(IdentityClient::new(
        config.auth_service_url.clone(),
        config.auth_service_key.clone(),
    ));
    let gateway = Arc::new(PaymentGateway::from_config(&config));

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::new(identity.clone()))
            .app_data(web::Data::new(gateway.clone()))
            .wrap(logger::middleware())
            .wrap(cors::middleware(&origin))
            .service(
                web::scope("/api")
                    .service(health)
                    .service(api_auth::mount_auth(identity.clone()))
                    .configure(api_subs::configure_public)
                    .configure(api_learn::configure_public)
                    // everything below requires a session; the empty
                    // prefix means this scope must stay registered last
                    .service(
                        web::scope("")
                            .wrap(api_auth::auth_middleware(identity.clone()))
                            .service(api_subs::mount_trial())
                            .service(api_subs::mount_subscriptions())
                            .service(api_learn::mount_children())
                            .service(api_learn::mount_dashboard())
                            .configure(api_learn::configure_progress),
                    ),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
