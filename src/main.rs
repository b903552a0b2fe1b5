pub mod config;
pub mod db;
pub mod domain;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod service;

use std::io;

use actix_web::{web, App, HttpServer};
use config::Config;
use db::init_db_pool;
use log::{error, info};
use service::{auth::AuthMiddleware, log::LoggerMiddleware};
use sqlx::{postgres::Postgres, Pool};

type PGPool = Pool<Postgres>;

#[actix_web::main]
async fn main() -> io::Result<()> {
    service::log::init_logger();
    let config = Config::from_env().map_err(|e| {
        error!("invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let pool: PGPool = init_db_pool(&config.database_url, config.db_max_connections)
        .await
        .map_err(|e| {
            error!("failed to initialise database: {:?}", e);
            io::Error::new(io::ErrorKind::Other, e.to_string())
        })?;

    let bind = (config.host.clone(), config.port);
    info!("listening on {}:{}", bind.0, bind.1);
    let config_state = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .wrap(LoggerMiddleware)
            .app_data(web::Data::new(pool.clone()))
            .app_data(config_state.clone())
            .configure(handlers::init_extractors)
            .configure(handlers::health::init_routes)
            .configure(handlers::auth::init_routes)
            .service(
                web::scope("")
                    .wrap(AuthMiddleware::new(config_state.auth.clone()))
                    .configure(handlers::user::init_routes)
                    .configure(handlers::contact::init_routes)
                    .configure(handlers::event::init_routes)
                    .configure(handlers::gift::init_routes)
                    .configure(handlers::friend::init_routes),
            )
    })
    .bind(bind)?
    .run()
    .await
}
