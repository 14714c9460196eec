use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use digicard_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::StripeService,
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to connect to the database");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    if config.stripe.secret_key.is_empty() {
        log::warn!("Stripe secret key is not configured; payments will fail");
    }
    let stripe_service = StripeService::new(config.stripe.clone());

    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let subscription_service =
        SubscriptionService::new(pool.clone(), stripe_service, config.app.trial_days);
    let card_service = CardService::new(
        pool.clone(),
        subscription_service.clone(),
        config.app.clone(),
    );
    let public_card_service = PublicCardService::new(pool.clone());
    let template_service = TemplateService::new();
    let trial_expiry_service = TrialExpiryService::new(pool.clone());

    tasks::spawn_all(&config.sweep, trial_expiry_service.clone());

    if config.admin.api_key.is_empty() {
        log::info!("Admin API key not set; admin endpoints are disabled");
    }
    let admin_config = config.admin.clone();

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(subscription_service.clone()))
            .app_data(web::Data::new(card_service.clone()))
            .app_data(web::Data::new(public_card_service.clone()))
            .app_data(web::Data::new(template_service.clone()))
            .app_data(web::Data::new(trial_expiry_service.clone()))
            .app_data(web::Data::new(admin_config.clone()))
            .configure(swagger_config)
            .configure(handlers::configure)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
