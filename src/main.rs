mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod utils;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};
use std::io;
use std::sync::Arc;

use crate::config::Config;
use crate::db::{DirectoryStore, PgStore};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|err| {
        error!("Invalid configuration: {}", err);
        io::Error::new(io::ErrorKind::InvalidInput, err)
    })?;

    let store = PgStore::connect(&config).await.map_err(|err| {
        error!("Database connection error: {}", err);
        io::Error::other(err)
    })?;
    info!("Connected to PostgreSQL database");

    let store: Arc<dyn DirectoryStore> = Arc::new(store);
    let result = serve(&config, Arc::clone(&store)).await;

    // The server has stopped, so no handler can reach the store past this point.
    store.close().await;
    info!("Database client disconnected");

    result
}

async fn serve(config: &Config, store: Arc<dyn DirectoryStore>) -> io::Result<()> {
    let store = web::Data::from(store);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .configure(handlers::configure)
    })
    .bind(config.bind_address())?;

    info!("HR Directory API running on http://{}:{}", config.host, config.port);
    info!("Available endpoints:");
    for (method, path) in handlers::ENDPOINTS {
        info!("{:<7}{}", method, path);
    }

    server.run().await
}
